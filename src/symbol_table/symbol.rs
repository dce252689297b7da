use std::fmt::{self, Display};

use crate::types::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Formal,
    Function,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "var"),
            SymbolKind::Formal => write!(f, "formal"),
            SymbolKind::Function => write!(f, "fn"),
        }
    }
}

/// The entity a declaration introduces.
///
/// Created once at the declaration site and shared, immutably, with every
/// identifier that resolves to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    kind: SymbolKind,
    ty: Type,
    name: String,
}

impl Symbol {
    pub fn new(kind: SymbolKind, ty: Type, name: impl Into<String>) -> Self {
        Symbol {
            kind,
            ty,
            name: name.into(),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn data_type(&self) -> &Type {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "kind: {}", self.kind)?;
        writeln!(f, "type: {}", self.ty)
    }
}
