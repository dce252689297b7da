use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::name_analysis::{resolve_program, NameAnalyzer};
use crate::{
    ast::{
        ast::{Decl, Identifier, Program},
        expressions::{Expr, ExprKind},
        statements::{Stmt, StmtKind},
    },
    errors::diagnostics::Diagnostics,
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbol_table::symbol::SymbolKind,
    types::type_table::TypeTable,
    Position,
};

struct Resolution {
    program: Program,
    resolved: bool,
    diagnostics: Diagnostics,
    depth: usize,
    entered: usize,
    left: usize,
}

fn resolve(source: &str) -> Resolution {
    let program = parse(tokenize(source).unwrap()).unwrap();
    let mut types = TypeTable::new();
    let mut diagnostics = Diagnostics::new();

    let mut analyzer = NameAnalyzer::new(&mut types, &mut diagnostics);
    let resolved = resolve_program(&mut analyzer, &program).unwrap();
    let depth = analyzer.symbols.depth();
    let entered = analyzer.symbols.scopes_entered();
    let left = analyzer.symbols.scopes_left();

    Resolution {
        program,
        resolved,
        diagnostics,
        depth,
        entered,
        left,
    }
}

fn body(program: &Program, index: usize) -> &[Stmt] {
    match &program.decls[index] {
        Decl::Fn(function) => &function.body,
        Decl::Var(_) => panic!("expected a function"),
    }
}

fn assign_sides(stmt: &Stmt) -> (&Expr, &Expr) {
    match &stmt.kind {
        StmtKind::Assign(Expr {
            kind: ExprKind::Assign { target, source },
            ..
        }) => (target, source),
        other => panic!("expected an assignment, got {:?}", other),
    }
}

fn identifier(expr: &Expr) -> &Identifier {
    match &expr.kind {
        ExprKind::Identifier(identifier) => identifier,
        other => panic!("expected an identifier, got {:?}", other),
    }
}

#[test]
fn test_globals_and_uses_resolve() {
    let result = resolve("int x;\nvoid f() { x = 1; }");

    assert!(result.resolved);
    assert!(result.diagnostics.is_empty());

    let global = result.program.decls[0].name().symbol().unwrap();
    let (target, _) = assign_sides(&body(&result.program, 1)[0]);
    let used = identifier(target).symbol().unwrap();
    assert!(Rc::ptr_eq(global, used));
    assert_eq!(used.kind(), SymbolKind::Variable);
    assert_eq!(used.data_type().to_string(), "int");
}

#[test]
fn test_undeclared_identifier() {
    let result = resolve("void f() {\n  x = 1;\n}");

    assert!(!result.resolved);
    assert_eq!(result.diagnostics.messages(), vec!["2,3: Undeclared identifier"]);

    let (target, _) = assign_sides(&body(&result.program, 0)[0]);
    assert!(identifier(target).symbol().is_none());
}

#[test]
fn test_multiply_declared_reports_later_declaration_only() {
    let result = resolve("int x;\nint x;");

    assert!(!result.resolved);
    assert_eq!(
        result.diagnostics.messages(),
        vec!["2,5: Multiply declared identifier"]
    );
    assert!(result.program.decls[0].name().symbol().is_some());
    assert!(result.program.decls[1].name().symbol().is_none());
}

#[test]
fn test_void_variable_and_void_pointer() {
    let result = resolve("void v;\nvoid@ p;\nvoid f(void a, void@@ b) { }");

    assert!(!result.resolved);
    assert_eq!(
        result.diagnostics.messages(),
        vec![
            "1,6: Non-function declared void",
            "2,7: Invalid pointer type",
            "3,13: Non-function declared void",
            "3,23: Invalid pointer type",
        ]
    );
}

#[test]
fn test_void_pointer_return_type_reported_at_annotation() {
    let result = resolve("int x;\nvoid@ f() { }");

    assert!(!result.resolved);
    assert_eq!(result.diagnostics.messages(), vec!["2,1: Invalid pointer type"]);
}

#[test]
fn test_function_named_like_global_is_multiply_declared() {
    let result = resolve("int f;\nvoid f() { }");

    assert_eq!(
        result.diagnostics.messages(),
        vec!["2,6: Multiply declared identifier"]
    );
}

#[test]
fn test_duplicate_formals() {
    let result = resolve("void f(int a, bool a) { }");

    assert_eq!(
        result.diagnostics.messages(),
        vec!["1,20: Multiply declared identifier"]
    );
    // A bad formal list leaves the function unbound.
    assert!(result.program.decls[0].name().symbol().is_none());
}

#[test]
fn test_local_may_not_redeclare_formal() {
    let result = resolve("void f(int a) { bool a; }");

    assert_eq!(
        result.diagnostics.messages(),
        vec!["1,22: Multiply declared identifier"]
    );
}

#[test]
fn test_recursive_call_resolves() {
    let result = resolve("int fact(int n) { return fact(n); }");

    assert!(result.resolved);
    let function = result.program.decls[0].name().symbol().unwrap();
    assert_eq!(function.kind(), SymbolKind::Function);
    assert_eq!(function.data_type().to_string(), "int->int");
}

#[test]
fn test_later_function_is_not_visible_earlier() {
    let result = resolve("void f() { g(); }\nvoid g() { }");

    assert_eq!(result.diagnostics.messages(), vec!["1,12: Undeclared identifier"]);
}

#[test]
fn test_shadowing_resolves_to_innermost() {
    let result = resolve(
        "int x;\nvoid f() {\n  bool b;\n  if (b) {\n    bool x;\n    x = true;\n  }\n  x = 1;\n}",
    );

    assert!(result.resolved);

    let global = result.program.decls[0].name().symbol().unwrap();
    let stmts = body(&result.program, 1);
    let (inner_decl, inner_use) = match &stmts[1].kind {
        StmtKind::If { body, .. } => {
            let decl = match &body[0].kind {
                StmtKind::VarDecl(var) => var.name.symbol().unwrap(),
                other => panic!("expected a declaration, got {:?}", other),
            };
            let (target, _) = assign_sides(&body[1]);
            (decl, identifier(target).symbol().unwrap())
        }
        other => panic!("expected an if, got {:?}", other),
    };
    assert!(Rc::ptr_eq(inner_decl, inner_use));
    assert_eq!(inner_use.data_type().to_string(), "bool");

    let (outer_target, _) = assign_sides(&stmts[2]);
    assert!(Rc::ptr_eq(global, identifier(outer_target).symbol().unwrap()));
}

#[test]
fn test_block_locals_do_not_leak() {
    let result = resolve("void f() {\n  bool b;\n  if (b) { int y; }\n  y = 2;\n}");

    assert!(!result.resolved);
    assert_eq!(result.diagnostics.messages(), vec!["4,3: Undeclared identifier"]);
}

#[test]
fn test_else_and_while_get_their_own_scopes() {
    let result = resolve(
        "void f(bool b) {\n  if (b) { int y; } else { int y; }\n  while (b) { int y; }\n  int y;\n}",
    );

    assert!(result.resolved);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_all_errors_are_collected() {
    let result = resolve("int x;\nint x;\nvoid f() {\n  a = b;\n  c(d);\n}");

    assert_eq!(
        result.diagnostics.messages(),
        vec![
            "2,5: Multiply declared identifier",
            "4,3: Undeclared identifier",
            "4,7: Undeclared identifier",
            "5,3: Undeclared identifier",
            "5,5: Undeclared identifier",
        ]
    );
}

#[test]
fn test_scopes_are_balanced() {
    let result = resolve(
        "int g;\nvoid f(int a) {\n  if (a == g) { while (true) { a++; } } else { a--; }\n}\nvoid h() { }",
    );

    assert!(result.resolved);
    assert_eq!(result.depth, 0);
    assert_eq!(result.entered, result.left);
    // global, f, if, while, else, h
    assert_eq!(result.entered, 6);
}

#[test]
fn test_scopes_are_balanced_when_resolution_fails() {
    let result = resolve("void f() { if (nope) { int x; int x; } }");

    assert!(!result.resolved);
    assert_eq!(result.depth, 0);
    assert_eq!(result.entered, result.left);
}

#[test]
fn test_formal_symbol_kind() {
    let result = resolve("void f(int@ p) { p = p; }");

    let (target, _) = assign_sides(&body(&result.program, 0)[0]);
    let symbol = identifier(target).symbol().unwrap();
    assert_eq!(symbol.kind(), SymbolKind::Formal);
    assert_eq!(symbol.data_type().to_string(), "int@");
    assert_eq!(
        result.program.decls[0].name().position,
        Position::new(1, 6)
    );
}
