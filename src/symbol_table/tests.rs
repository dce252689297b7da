use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    symbol::{Symbol, SymbolKind},
    symbol_table::SymbolTable,
};
use crate::{errors::errors::InternalError, types::type_table::TypeTable};

fn variable(types: &mut TypeTable, name: &str) -> Rc<Symbol> {
    Rc::new(Symbol::new(SymbolKind::Variable, types.int(), name))
}

#[test]
fn test_insert_and_find() {
    let mut types = TypeTable::new();
    let mut table = SymbolTable::new();
    table.enter_scope();

    assert_eq!(table.insert(variable(&mut types, "x")), Ok(true));
    assert_eq!(table.find("x").map(|symbol| symbol.name().to_string()), Some("x".to_string()));
    assert!(table.find("y").is_none());
}

#[test]
fn test_duplicate_insert_does_not_replace() {
    let mut types = TypeTable::new();
    let mut table = SymbolTable::new();
    table.enter_scope();

    let first = variable(&mut types, "x");
    let second = Rc::new(Symbol::new(SymbolKind::Formal, types.bool(), "x"));

    assert_eq!(table.insert(first.clone()), Ok(true));
    assert_eq!(table.insert(second), Ok(false));
    assert!(Rc::ptr_eq(&table.find("x").unwrap(), &first));
}

#[test]
fn test_clash_checks_innermost_scope_only() {
    let mut types = TypeTable::new();
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.insert(variable(&mut types, "x")).unwrap();

    table.enter_scope();
    assert_eq!(table.clash("x"), Ok(false));
    assert!(table.find("x").is_some());
}

#[test]
fn test_shadowing() {
    let mut types = TypeTable::new();
    let mut table = SymbolTable::new();
    table.enter_scope();
    let outer = variable(&mut types, "x");
    table.insert(outer.clone()).unwrap();

    table.enter_scope();
    let inner = Rc::new(Symbol::new(SymbolKind::Variable, types.bool(), "x"));
    table.insert(inner.clone()).unwrap();
    assert!(Rc::ptr_eq(&table.find("x").unwrap(), &inner));

    table.leave_scope().unwrap();
    assert!(Rc::ptr_eq(&table.find("x").unwrap(), &outer));
}

#[test]
fn test_insert_into_enclosing_scope() {
    let mut types = TypeTable::new();
    let mut table = SymbolTable::new();
    let global = table.enter_scope();
    table.enter_scope();

    let void = types.void();
    let function = Rc::new(Symbol::new(
        SymbolKind::Function,
        types.produce_function(vec![], void),
        "main",
    ));
    assert_eq!(table.insert_into(global, function), Ok(true));
    assert_eq!(table.clash("main"), Ok(false));
    assert_eq!(table.clash_in(global, "main"), Ok(true));

    table.leave_scope().unwrap();
    assert_eq!(table.clash("main"), Ok(true));
}

#[test]
fn test_stale_scope_handle_is_rejected() {
    let mut types = TypeTable::new();
    let mut table = SymbolTable::new();
    table.enter_scope();
    let block = table.enter_scope();
    table.leave_scope().unwrap();
    table.enter_scope();

    assert!(matches!(
        table.insert_into(block, variable(&mut types, "x")),
        Err(InternalError::ScopeNotOpen { .. })
    ));
}

#[test]
fn test_leave_empty_chain_fails() {
    let mut table = SymbolTable::new();

    assert_eq!(table.leave_scope(), Err(InternalError::EmptyScopeChain));
    assert_eq!(table.clash("x"), Err(InternalError::EmptyScopeChain));
}

#[test]
fn test_scope_counters() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.enter_scope();
    assert_eq!(table.depth(), 2);

    table.leave_scope().unwrap();
    table.leave_scope().unwrap();

    assert_eq!(table.depth(), 0);
    assert_eq!(table.scopes_entered(), 2);
    assert_eq!(table.scopes_left(), 2);
}

#[test]
fn test_symbol_display() {
    let mut types = TypeTable::new();
    let int = types.int();
    let function = types.produce_function(vec![int.clone()], int);
    let symbol = Symbol::new(SymbolKind::Function, function, "succ");

    assert_eq!(symbol.to_string(), "name: succ\nkind: fn\ntype: int->int\n");
}

#[test]
fn test_scope_display_is_sorted() {
    let mut types = TypeTable::new();
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.insert(variable(&mut types, "b")).unwrap();
    table.insert(variable(&mut types, "a")).unwrap();

    assert_eq!(
        table.current_scope().unwrap().to_string(),
        "name: a\nkind: var\ntype: int\n\nname: b\nkind: var\ntype: int\n\n"
    );
}
