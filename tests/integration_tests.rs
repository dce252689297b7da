//! Integration tests for the whole front end.
//!
//! These tests run lake programs through tokenization, parsing, name
//! analysis and type checking, and match on the exact diagnostics. The last
//! few drive the `lakec` binary itself.

use std::{fs, path::PathBuf, process::Command};

use lakec::{
    analyze,
    ast::{
        ast::{Decl, Program},
        expressions::{Expr, ExprKind},
        statements::StmtKind,
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    types::type_table::TypeTable,
    unparse::unparse::unparse_program,
    SemanticAnalysis,
};
use pretty_assertions::assert_eq;

fn run(source: &str) -> (Program, SemanticAnalysis) {
    let tokens = tokenize(source).expect("source should tokenize");
    let program = parse(tokens).expect("source should parse");
    let analysis = analyze(&program).expect("analysis should not hit an internal error");
    (program, analysis)
}

fn diagnostics(source: &str) -> Vec<String> {
    run(source).1.diagnostics.messages()
}

#[test]
fn test_assigning_bool_to_int() {
    let (program, analysis) = run("int x;\nvoid main() {\n  x = true;\n}");

    assert!(analysis.resolved);
    assert!(!analysis.well_typed);
    assert_eq!(
        analysis.diagnostics.messages(),
        vec!["3,3: Invalid assignment operation"]
    );

    // The declaration of `x` itself is fine.
    let type_map = analysis.type_map.as_ref().unwrap();
    assert_eq!(
        type_map.node_type(program.decls[0].id()).unwrap().to_string(),
        "int"
    );
}

#[test]
fn test_return_statements() {
    assert_eq!(
        diagnostics("int f() {\n  return;\n}"),
        vec!["2,3: Missing return value"]
    );
    assert!(diagnostics("void g() {\n  return;\n}").is_empty());
    assert_eq!(
        diagnostics("void g() {\n  return 3;\n}"),
        vec!["2,10: Return with a value in void function"]
    );
}

#[test]
fn test_duplicate_global() {
    let (program, analysis) = run("int x;\nint x;");

    assert!(!analysis.resolved);
    assert_eq!(
        analysis.diagnostics.messages(),
        vec!["2,5: Multiply declared identifier"]
    );
    assert!(program.decls[0].name().symbol().is_some());
}

#[test]
fn test_block_local_used_after_block() {
    let (_, analysis) = run("bool b;\nvoid main() {\n  if (b) { int y; }\n  y = 1;\n}");

    assert!(!analysis.resolved);
    assert!(analysis.type_map.is_none());
    assert_eq!(
        analysis.diagnostics.messages(),
        vec!["4,3: Undeclared identifier"]
    );
}

#[test]
fn test_pointers() {
    assert_eq!(
        diagnostics("int@ p;\nvoid main() {\n  << p;\n}"),
        vec!["3,6: Attempt to write a raw pointer"]
    );

    let (program, mut analysis) = run("int@ p;\nint y;\nvoid main() {\n  y = *p;\n}");
    assert!(analysis.succeeded());

    let deref = match &program.decls[2] {
        Decl::Fn(function) => match &function.body[0].kind {
            StmtKind::Assign(Expr {
                kind: ExprKind::Assign { source, .. },
                ..
            }) => source.id,
            other => panic!("expected an assignment, got {:?}", other),
        },
        Decl::Var(_) => panic!("expected a function"),
    };
    let int = analysis.types.int();
    assert_eq!(
        analysis.type_map.as_ref().unwrap().node_type(deref).unwrap(),
        &int
    );
}

#[test]
fn test_call_with_mismatched_second_argument() {
    let (program, analysis) = run("void f(int a, bool b) { }\nvoid main() {\n  f(1, 2);\n}");

    assert_eq!(
        analysis.diagnostics.messages(),
        vec!["3,8: Type of actual does not match type of formal"]
    );

    let call = match &program.decls[1] {
        Decl::Fn(function) => match &function.body[0].kind {
            StmtKind::Call(expr) => expr.id,
            other => panic!("expected a call, got {:?}", other),
        },
        Decl::Var(_) => panic!("expected a function"),
    };
    assert!(analysis
        .type_map
        .as_ref()
        .unwrap()
        .node_type(call)
        .unwrap()
        .is_error());
}

#[test]
fn test_shadowed_variable_types() {
    let source = "int x;\nvoid main() {\n  bool b;\n  if (b) {\n    bool x;\n    x = true;\n  }\n  x = 3;\n}";

    assert!(diagnostics(source).is_empty());
}

#[test]
fn test_scope_balance_over_full_run() {
    let (_, analysis) = run(
        "int g;\nint f(int a) {\n  while (a > 0) {\n    if (a == g) { a--; } else { a = a - 2; }\n  }\n  return a;\n}",
    );

    assert!(analysis.succeeded());
    assert_eq!(analysis.scopes_entered, analysis.scopes_left);
    assert_eq!(analysis.scopes_entered, 5);
}

#[test]
fn test_type_canonicalization() {
    let mut table = TypeTable::new();

    let first = table.produce_primitive(lakec::types::types::BaseType::Int, 0);
    let second = table.produce_primitive(lakec::types::types::BaseType::Int, 0);
    let pointer = table.produce_primitive(lakec::types::types::BaseType::Int, 1);

    assert_eq!(first, second);
    assert!(first != pointer);
}

#[test]
fn test_diagnostics_in_traversal_order() {
    let source = "int x;\nbool b;\nvoid main() {\n  x = b + 1;\n  b = x;\n  if (x) { }\n  << main;\n  x(1);\n}";

    assert_eq!(
        diagnostics(source),
        vec![
            "4,7: Arithmetic operator applied to invalid operand",
            "5,3: Invalid assignment operation",
            "6,7: Non-bool expression used as an if condition",
            "7,6: Attempt to write a function",
            "8,3: Attempt to call a non-function",
        ]
    );
}

#[test]
fn test_unparse_after_name_analysis() {
    let (program, analysis) = run("int x;\nvoid main() {\n  x = x + 1;\n}");

    assert!(analysis.succeeded());
    assert_eq!(
        unparse_program(&program),
        "int x(int);\nvoid main(->void)() {\n    x(int) = (x(int)+1);\n}\n"
    );
}

fn write_source(name: &str, source: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("lakec_integration_tests");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_cli_accepts_well_typed_program() {
    let path = write_source("ok.lake", "int x;\nvoid main() {\n  x = 1;\n}\n");
    let unparsed = path.with_extension("unparsed");

    let output = Command::new(env!("CARGO_BIN_EXE_lakec"))
        .arg(&path)
        .arg("-p")
        .arg(&unparsed)
        .arg("-c")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(&unparsed).unwrap(),
        "int x;\nvoid main() {\n    x = 1;\n}\n"
    );
}

#[test]
fn test_cli_reports_type_errors() {
    let path = write_source("bad_types.lake", "int x;\nvoid main() {\n  x = true;\n}\n");

    let output = Command::new(env!("CARGO_BIN_EXE_lakec"))
        .arg(&path)
        .arg("-c")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3,3: Invalid assignment operation"));
    assert!(stderr.contains("Type Analysis Error"));
}

#[test]
fn test_cli_reports_name_errors() {
    let path = write_source("bad_names.lake", "void main() {\n  y = 1;\n}\n");
    let names = path.with_extension("names");
    let _ = fs::remove_file(&names);

    let output = Command::new(env!("CARGO_BIN_EXE_lakec"))
        .arg(&path)
        .arg("-n")
        .arg(&names)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!names.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2,3: Undeclared identifier"));
    assert!(stderr.contains("Name Analysis Error"));
}

#[test]
fn test_cli_reports_syntax_errors() {
    let path = write_source("bad_syntax.lake", "int x\n");

    let output = Command::new(env!("CARGO_BIN_EXE_lakec"))
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Parsing Error"));
}

#[test]
fn test_cli_rejects_missing_input() {
    let output = Command::new(env!("CARGO_BIN_EXE_lakec"))
        .arg("-c")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing input file"));
}
