//! Syntactic type annotations.
//!
//! An annotation is a base keyword followed by zero or more `@`, one per
//! level of indirection. Annotations are turned into semantic types by
//! `TypeTable::from_annotation`.

use std::fmt::{self, Display};

use crate::{types::types::BaseType, Position};

use super::ast::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    pub id: NodeId,
    /// Position of the base keyword.
    pub position: Position,
    pub base: BaseType,
    pub depth: usize,
}

impl TypeNode {
    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void && self.depth == 0
    }

    /// A pointer to void, at any depth.
    pub fn is_void_pointer(&self) -> bool {
        self.base == BaseType::Void && self.depth > 0
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, "@".repeat(self.depth))
    }
}
