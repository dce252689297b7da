use std::{
    cell::OnceCell,
    fmt::{self, Display},
    rc::Rc,
};

use crate::{errors::errors::InternalError, symbol_table::symbol::Symbol, Position};

use super::statements::{FnDecl, VarDecl};

/// Unique id of a tree node, assigned by the parser in construction order.
///
/// The type checker keys its node-to-type map on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Root of the tree: the global declarations in source order.
#[derive(Debug, Clone)]
pub struct Program {
    pub id: NodeId,
    pub position: Position,
    pub decls: Vec<Decl>,
}

/// Top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
}

impl Decl {
    pub fn id(&self) -> NodeId {
        match self {
            Decl::Var(decl) => decl.id,
            Decl::Fn(decl) => decl.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Decl::Var(decl) => decl.position,
            Decl::Fn(decl) => decl.position,
        }
    }

    pub fn name(&self) -> &Identifier {
        match self {
            Decl::Var(decl) => &decl.name,
            Decl::Fn(decl) => &decl.name,
        }
    }
}

/// An identifier, either at a declaration site or at a use.
///
/// The symbol slot starts empty and is written at most once, by name
/// analysis. Type checking treats an empty slot as an analyzer bug.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub id: NodeId,
    pub position: Position,
    pub name: String,
    symbol: OnceCell<Rc<Symbol>>,
}

impl Identifier {
    pub fn new(id: NodeId, position: Position, name: impl Into<String>) -> Self {
        Identifier {
            id,
            position,
            name: name.into(),
            symbol: OnceCell::new(),
        }
    }

    pub fn symbol(&self) -> Option<&Rc<Symbol>> {
        self.symbol.get()
    }

    /// The bound symbol, or `UnresolvedIdentifier` if name analysis never
    /// bound one.
    pub fn resolved_symbol(&self) -> Result<&Rc<Symbol>, InternalError> {
        self.symbol
            .get()
            .ok_or_else(|| InternalError::UnresolvedIdentifier {
                name: self.name.clone(),
            })
    }

    pub fn attach_symbol(&self, symbol: Rc<Symbol>) -> Result<(), InternalError> {
        self.symbol
            .set(symbol)
            .map_err(|_| InternalError::SymbolAlreadyAttached {
                name: self.name.clone(),
            })
    }
}
