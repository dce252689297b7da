use std::{
    collections::HashMap,
    fmt::{self, Display},
    rc::Rc,
};

use tracing::debug;

use super::symbol::Symbol;
use crate::errors::errors::InternalError;

/// Handle to one open scope.
///
/// Carries the serial number the scope was opened with, so a handle that
/// outlived its scope is rejected instead of silently pointing at whichever
/// scope now sits at the same depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId {
    index: usize,
    serial: usize,
}

/// The names declared in one lexical block.
#[derive(Debug, Default)]
pub struct ScopeTable {
    serial: usize,
    symbols: HashMap<String, Rc<Symbol>>,
}

impl ScopeTable {
    fn new(serial: usize) -> Self {
        ScopeTable {
            serial,
            symbols: HashMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Rc<Symbol>> {
        self.symbols.get(name)
    }

    pub fn clash(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Returns false without inserting when the name is already taken.
    pub fn insert(&mut self, symbol: Rc<Symbol>) -> bool {
        if self.clash(symbol.name()) {
            return false;
        }

        self.symbols.insert(symbol.name().to_string(), symbol);
        true
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Display for ScopeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.symbols.keys().collect();
        names.sort();

        for name in names {
            writeln!(f, "{}", self.symbols[name])?;
        }
        Ok(())
    }
}

/// The scope chain: innermost scope last.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<ScopeTable>,
    entered: usize,
    left: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_scope(&mut self) -> ScopeId {
        self.entered += 1;
        let id = ScopeId {
            index: self.scopes.len(),
            serial: self.entered,
        };

        self.scopes.push(ScopeTable::new(self.entered));
        debug!(depth = self.scopes.len(), "entered scope");
        id
    }

    pub fn leave_scope(&mut self) -> Result<(), InternalError> {
        let scope = self.scopes.pop().ok_or(InternalError::EmptyScopeChain)?;
        self.left += 1;

        debug!(
            depth = self.scopes.len(),
            symbols = scope.len(),
            "left scope\n{}",
            scope
        );
        Ok(())
    }

    /// Handle to the innermost scope.
    pub fn current_scope_id(&self) -> Result<ScopeId, InternalError> {
        let scope = self.current_scope()?;
        Ok(ScopeId {
            index: self.scopes.len() - 1,
            serial: scope.serial,
        })
    }

    pub fn current_scope(&self) -> Result<&ScopeTable, InternalError> {
        self.scopes.last().ok_or(InternalError::EmptyScopeChain)
    }

    /// Inserts into the innermost scope.
    pub fn insert(&mut self, symbol: Rc<Symbol>) -> Result<bool, InternalError> {
        let scope = self.scopes.last_mut().ok_or(InternalError::EmptyScopeChain)?;
        Ok(scope.insert(symbol))
    }

    /// Inserts into a specific open scope.
    pub fn insert_into(&mut self, scope: ScopeId, symbol: Rc<Symbol>) -> Result<bool, InternalError> {
        let scope = self.scope_mut(scope)?;
        Ok(scope.insert(symbol))
    }

    /// Checks the innermost scope only.
    pub fn clash(&self, name: &str) -> Result<bool, InternalError> {
        Ok(self.current_scope()?.clash(name))
    }

    pub fn clash_in(&self, scope: ScopeId, name: &str) -> Result<bool, InternalError> {
        Ok(self.scope(scope)?.clash(name))
    }

    /// Innermost match wins.
    pub fn find(&self, name: &str) -> Option<Rc<Symbol>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.lookup(name))
            .cloned()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes_entered(&self) -> usize {
        self.entered
    }

    pub fn scopes_left(&self) -> usize {
        self.left
    }

    fn scope(&self, id: ScopeId) -> Result<&ScopeTable, InternalError> {
        match self.scopes.get(id.index) {
            Some(scope) if scope.serial == id.serial => Ok(scope),
            _ => Err(InternalError::ScopeNotOpen { serial: id.serial }),
        }
    }

    fn scope_mut(&mut self, id: ScopeId) -> Result<&mut ScopeTable, InternalError> {
        match self.scopes.get_mut(id.index) {
            Some(scope) if scope.serial == id.serial => Ok(scope),
            _ => Err(InternalError::ScopeNotOpen { serial: id.serial }),
        }
    }
}
