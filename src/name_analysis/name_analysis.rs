use std::rc::Rc;

use tracing::{debug, instrument};

use crate::{
    ast::{
        ast::{Decl, Identifier, Program},
        expressions::{Expr, ExprKind},
        statements::{FnDecl, Stmt, StmtKind},
        types::TypeNode,
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{ErrorKind, InternalError},
    },
    symbol_table::{
        symbol::{Symbol, SymbolKind},
        symbol_table::SymbolTable,
    },
    types::type_table::TypeTable,
};

/// State threaded through the resolution pass.
///
/// Every resolver returns `Ok(true)` when its subtree resolved cleanly and
/// `Ok(false)` when it reported at least one diagnostic. `Err` is reserved
/// for analyzer bugs.
#[derive(Debug)]
pub struct NameAnalyzer<'a> {
    pub symbols: SymbolTable,
    pub types: &'a mut TypeTable,
    pub diagnostics: &'a mut Diagnostics,
}

impl<'a> NameAnalyzer<'a> {
    pub fn new(types: &'a mut TypeTable, diagnostics: &'a mut Diagnostics) -> Self {
        NameAnalyzer {
            symbols: SymbolTable::new(),
            types,
            diagnostics,
        }
    }

    /// Runs `body` inside a freshly pushed scope. The scope is popped on
    /// every exit path, including when `body` fails.
    pub fn with_scope<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, InternalError>,
    ) -> Result<T, InternalError> {
        self.symbols.enter_scope();
        let result = body(self);
        let left = self.symbols.leave_scope();

        let value = result?;
        left?;
        Ok(value)
    }
}

/// Resolves a whole program inside its global scope.
#[instrument(skip_all, fields(decls = program.decls.len()))]
pub fn resolve_program(
    analyzer: &mut NameAnalyzer,
    program: &Program,
) -> Result<bool, InternalError> {
    let resolved = analyzer.with_scope(|analyzer| {
        let mut resolved = true;
        for decl in &program.decls {
            resolved = resolve_decl(analyzer, decl)? && resolved;
        }
        Ok(resolved)
    })?;

    debug!(resolved, "name analysis finished");
    Ok(resolved)
}

pub fn resolve_decl(analyzer: &mut NameAnalyzer, decl: &Decl) -> Result<bool, InternalError> {
    match decl {
        Decl::Var(var) => {
            resolve_data_decl(analyzer, &var.type_node, &var.name, SymbolKind::Variable)
        }
        Decl::Fn(function) => resolve_fn_decl(analyzer, function),
    }
}

/// Shared by variables and formals: neither may be `void` or a pointer to
/// `void`, and the name must be fresh in the innermost scope.
fn resolve_data_decl(
    analyzer: &mut NameAnalyzer,
    type_node: &TypeNode,
    name: &Identifier,
    kind: SymbolKind,
) -> Result<bool, InternalError> {
    let mut valid_type = true;
    if type_node.is_void_pointer() {
        analyzer
            .diagnostics
            .report(ErrorKind::InvalidPointerType, name.position);
        valid_type = false;
    } else if type_node.is_void() {
        analyzer
            .diagnostics
            .report(ErrorKind::NonFunctionDeclaredVoid, name.position);
        valid_type = false;
    }

    let valid_name = !analyzer.symbols.clash(&name.name)?;
    if !valid_name {
        analyzer.diagnostics.report(
            ErrorKind::MultiplyDeclared {
                name: name.name.clone(),
            },
            name.position,
        );
    }

    if !valid_type || !valid_name {
        return Ok(false);
    }

    let ty = analyzer.types.from_annotation(type_node);
    let symbol = Rc::new(Symbol::new(kind, ty, name.name.as_str()));
    name.attach_symbol(Rc::clone(&symbol))?;
    analyzer.symbols.insert(symbol)?;
    Ok(true)
}

/// The function's name goes into the enclosing scope before the body is
/// visited, so the body can call it. Formals and body share one scope.
fn resolve_fn_decl(analyzer: &mut NameAnalyzer, function: &FnDecl) -> Result<bool, InternalError> {
    let mut valid_return = true;
    if function.return_type.is_void_pointer() {
        analyzer
            .diagnostics
            .report(ErrorKind::InvalidPointerType, function.return_type.position);
        valid_return = false;
    }

    let enclosing = analyzer.symbols.current_scope_id()?;
    let valid_name = !analyzer.symbols.clash_in(enclosing, &function.name.name)?;
    if !valid_name {
        analyzer.diagnostics.report(
            ErrorKind::MultiplyDeclared {
                name: function.name.name.clone(),
            },
            function.name.position,
        );
    }

    analyzer.with_scope(|analyzer| {
        let mut valid_formals = true;
        for formal in &function.formals {
            valid_formals =
                resolve_data_decl(analyzer, &formal.type_node, &formal.name, SymbolKind::Formal)?
                    && valid_formals;
        }

        if valid_name && valid_formals {
            let formal_types = function
                .formals
                .iter()
                .map(|formal| analyzer.types.from_annotation(&formal.type_node))
                .collect();
            let return_type = analyzer.types.from_annotation(&function.return_type);
            let ty = analyzer.types.produce_function(formal_types, return_type);

            let symbol = Rc::new(Symbol::new(
                SymbolKind::Function,
                ty,
                function.name.name.as_str(),
            ));
            function.name.attach_symbol(Rc::clone(&symbol))?;
            analyzer.symbols.insert_into(enclosing, symbol)?;
        }

        let valid_body = resolve_stmts(analyzer, &function.body)?;
        debug!(function = %function.name.name, "resolved function");

        Ok(valid_return && valid_name && valid_formals && valid_body)
    })
}

pub fn resolve_stmts(analyzer: &mut NameAnalyzer, stmts: &[Stmt]) -> Result<bool, InternalError> {
    let mut resolved = true;
    for stmt in stmts {
        resolved = resolve_stmt(analyzer, stmt)? && resolved;
    }
    Ok(resolved)
}

fn resolve_block(analyzer: &mut NameAnalyzer, stmts: &[Stmt]) -> Result<bool, InternalError> {
    analyzer.with_scope(|analyzer| resolve_stmts(analyzer, stmts))
}

pub fn resolve_stmt(analyzer: &mut NameAnalyzer, stmt: &Stmt) -> Result<bool, InternalError> {
    match &stmt.kind {
        StmtKind::VarDecl(var) => {
            resolve_data_decl(analyzer, &var.type_node, &var.name, SymbolKind::Variable)
        }
        StmtKind::Assign(expr)
        | StmtKind::PostInc(expr)
        | StmtKind::PostDec(expr)
        | StmtKind::Read(expr)
        | StmtKind::Write(expr)
        | StmtKind::Call(expr) => resolve_expr(analyzer, expr),
        StmtKind::If { condition, body } => {
            let condition = resolve_expr(analyzer, condition)?;
            let body = resolve_block(analyzer, body)?;
            Ok(condition && body)
        }
        StmtKind::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            let condition = resolve_expr(analyzer, condition)?;
            let then_body = resolve_block(analyzer, then_body)?;
            let else_body = resolve_block(analyzer, else_body)?;
            Ok(condition && then_body && else_body)
        }
        StmtKind::While { condition, body } => {
            let condition = resolve_expr(analyzer, condition)?;
            let body = resolve_block(analyzer, body)?;
            Ok(condition && body)
        }
        StmtKind::Return(Some(expr)) => resolve_expr(analyzer, expr),
        StmtKind::Return(None) => Ok(true),
    }
}

pub fn resolve_expr(analyzer: &mut NameAnalyzer, expr: &Expr) -> Result<bool, InternalError> {
    match &expr.kind {
        ExprKind::Identifier(identifier) => resolve_use(analyzer, identifier),
        ExprKind::IntLit(_) | ExprKind::StrLit(_) | ExprKind::BoolLit(_) => Ok(true),
        ExprKind::Unary { operand, .. } => resolve_expr(analyzer, operand),
        ExprKind::Binary { left, right, .. } => {
            let left = resolve_expr(analyzer, left)?;
            let right = resolve_expr(analyzer, right)?;
            Ok(left && right)
        }
        ExprKind::Assign { target, source } => {
            let target = resolve_expr(analyzer, target)?;
            let source = resolve_expr(analyzer, source)?;
            Ok(target && source)
        }
        ExprKind::Call(call) => {
            let mut resolved = resolve_use(analyzer, &call.callee)?;
            for arg in &call.args {
                resolved = resolve_expr(analyzer, arg)? && resolved;
            }
            Ok(resolved)
        }
    }
}

/// Binds an identifier use to the innermost visible declaration.
fn resolve_use(analyzer: &mut NameAnalyzer, identifier: &Identifier) -> Result<bool, InternalError> {
    match analyzer.symbols.find(&identifier.name) {
        Some(symbol) => {
            identifier.attach_symbol(symbol)?;
            Ok(true)
        }
        None => {
            analyzer.diagnostics.report(
                ErrorKind::UndeclaredIdentifier {
                    name: identifier.name.clone(),
                },
                identifier.position,
            );
            Ok(false)
        }
    }
}
