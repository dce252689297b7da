use std::collections::HashMap;

use crate::{ast::ast::NodeId, errors::errors::InternalError, types::types::Type};

/// The type recorded for every node the checker visited.
///
/// Kept outside the tree so the tree stays read-only after name analysis.
#[derive(Debug, Default, Clone)]
pub struct TypeMap {
    types: HashMap<NodeId, Type>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, node: NodeId, ty: Type) {
        self.types.insert(node, ty);
    }

    pub fn get(&self, node: NodeId) -> Option<&Type> {
        self.types.get(&node)
    }

    /// Like `get`, but a node that was never visited is an analyzer bug.
    pub fn node_type(&self, node: NodeId) -> Result<&Type, InternalError> {
        self.types
            .get(&node)
            .ok_or(InternalError::NodeNotTyped { node: node.0 })
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.types.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
