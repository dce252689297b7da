use std::fmt::Write;

use crate::ast::{
    ast::{Decl, Identifier, Program},
    expressions::{Expr, ExprKind},
    statements::{FnDecl, Stmt, StmtKind},
    types::TypeNode,
};

const INDENT_STEP: usize = 4;

/// Renders a program back to lake source.
///
/// Expressions come out fully parenthesized. Identifiers that name analysis
/// bound to a symbol are followed by the symbol's type, as in `x(int)`.
pub fn unparse_program(program: &Program) -> String {
    let mut out = String::new();
    for decl in &program.decls {
        unparse_decl(&mut out, decl);
    }
    out
}

fn unparse_decl(out: &mut String, decl: &Decl) {
    match decl {
        Decl::Var(var) => unparse_var_decl(out, &var.type_node, &var.name, 0),
        Decl::Fn(function) => unparse_fn_decl(out, function),
    }
}

fn indent(out: &mut String, level: usize) {
    out.push_str(&" ".repeat(level));
}

fn unparse_var_decl(out: &mut String, type_node: &TypeNode, name: &Identifier, level: usize) {
    indent(out, level);
    let _ = write!(out, "{} ", type_node);
    unparse_identifier(out, name);
    out.push_str(";\n");
}

fn unparse_fn_decl(out: &mut String, function: &FnDecl) {
    let _ = write!(out, "{} ", function.return_type);
    unparse_identifier(out, &function.name);
    out.push('(');
    for (index, formal) in function.formals.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{} ", formal.type_node);
        unparse_identifier(out, &formal.name);
    }
    out.push_str(") {\n");
    unparse_stmts(out, &function.body, INDENT_STEP);
    out.push_str("}\n");
}

fn unparse_stmts(out: &mut String, stmts: &[Stmt], level: usize) {
    for stmt in stmts {
        unparse_stmt(out, stmt, level);
    }
}

fn unparse_block(out: &mut String, header: &str, condition: Option<&Expr>, body: &[Stmt], level: usize) {
    indent(out, level);
    out.push_str(header);
    if let Some(condition) = condition {
        out.push('(');
        unparse_expr(out, condition);
        out.push(')');
    }
    out.push_str(" {\n");
    unparse_stmts(out, body, level + INDENT_STEP);
    indent(out, level);
    out.push_str("}\n");
}

fn unparse_stmt(out: &mut String, stmt: &Stmt, level: usize) {
    match &stmt.kind {
        StmtKind::VarDecl(var) => unparse_var_decl(out, &var.type_node, &var.name, level),
        StmtKind::If { condition, body } => unparse_block(out, "if", Some(condition), body, level),
        StmtKind::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            unparse_block(out, "if", Some(condition), then_body, level);
            unparse_block(out, "else", None, else_body, level);
        }
        StmtKind::While { condition, body } => {
            unparse_block(out, "while", Some(condition), body, level)
        }
        StmtKind::Assign(expr) | StmtKind::Call(expr) => {
            indent(out, level);
            unparse_expr(out, expr);
            out.push_str(";\n");
        }
        StmtKind::PostInc(expr) => {
            indent(out, level);
            unparse_expr(out, expr);
            out.push_str("++;\n");
        }
        StmtKind::PostDec(expr) => {
            indent(out, level);
            unparse_expr(out, expr);
            out.push_str("--;\n");
        }
        StmtKind::Read(expr) => {
            indent(out, level);
            out.push_str(">> ");
            unparse_expr(out, expr);
            out.push_str(";\n");
        }
        StmtKind::Write(expr) => {
            indent(out, level);
            out.push_str("<< ");
            unparse_expr(out, expr);
            out.push_str(";\n");
        }
        StmtKind::Return(value) => {
            indent(out, level);
            out.push_str("return ");
            if let Some(value) = value {
                unparse_expr(out, value);
            }
            out.push_str(";\n");
        }
    }
}

fn unparse_identifier(out: &mut String, identifier: &Identifier) {
    out.push_str(&identifier.name);
    if let Some(symbol) = identifier.symbol() {
        let _ = write!(out, "({})", symbol.data_type());
    }
}

pub fn unparse_expr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Identifier(identifier) => unparse_identifier(out, identifier),
        ExprKind::IntLit(value) => {
            let _ = write!(out, "{}", value);
        }
        ExprKind::StrLit(value) => out.push_str(value),
        ExprKind::BoolLit(value) => {
            let _ = write!(out, "{}", value);
        }
        ExprKind::Unary { op, operand } => {
            let _ = write!(out, "({}", op);
            unparse_expr(out, operand);
            out.push(')');
        }
        ExprKind::Binary { op, left, right } => {
            out.push('(');
            unparse_expr(out, left);
            let _ = write!(out, "{}", op);
            unparse_expr(out, right);
            out.push(')');
        }
        ExprKind::Call(call) => {
            unparse_identifier(out, &call.callee);
            out.push('(');
            for (index, arg) in call.args.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                unparse_expr(out, arg);
            }
            out.push(')');
        }
        ExprKind::Assign { target, source } => {
            unparse_expr(out, target);
            out.push_str(" = ");
            unparse_expr(out, source);
        }
    }
}
