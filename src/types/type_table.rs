use std::collections::HashMap;

use tracing::trace;

use super::types::{BaseType, Type};
use crate::ast::types::TypeNode;

/// Interning factory for every `Type` used during one analysis run.
///
/// Each constructor returns the already-produced instance for a logical
/// type when one exists, so identity equality of handles coincides with
/// structural equality of types. The error sentinel is created once per
/// table.
#[derive(Debug)]
pub struct TypeTable {
    primitives: HashMap<(BaseType, usize), Type>,
    tuples: HashMap<Vec<Type>, Type>,
    functions: HashMap<(Type, Type), Type>,
    error: Type,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        Self {
            primitives: HashMap::new(),
            tuples: HashMap::new(),
            functions: HashMap::new(),
            error: Type::error(),
        }
    }

    pub fn produce_primitive(&mut self, base: BaseType, depth: usize) -> Type {
        self.primitives
            .entry((base, depth))
            .or_insert_with(|| {
                trace!(%base, depth, "interning primitive type");
                Type::primitive(base, depth)
            })
            .clone()
    }

    /// Components are compared by identity, which is structural equality
    /// because they came from this table too.
    pub fn produce_tuple(&mut self, elements: Vec<Type>) -> Type {
        if let Some(existing) = self.tuples.get(&elements) {
            return existing.clone();
        }

        let tuple = Type::tuple(elements.clone());
        trace!(%tuple, "interning tuple type");
        self.tuples.insert(elements, tuple.clone());
        tuple
    }

    /// The formals are interned as a tuple first, so `f(int, bool)` and
    /// `g(int, bool)` returning the same type share one function type.
    pub fn produce_function(&mut self, formals: Vec<Type>, return_type: Type) -> Type {
        let formals = self.produce_tuple(formals);

        self.functions
            .entry((formals.clone(), return_type.clone()))
            .or_insert_with(|| Type::function(formals, return_type))
            .clone()
    }

    pub fn produce_error(&self) -> Type {
        self.error.clone()
    }

    /// The type one level of indirection below `ty`, or `None` if `ty` is
    /// not a pointer.
    pub fn produce_dereferenced(&mut self, ty: &Type) -> Option<Type> {
        let primitive = *ty.as_primitive()?;
        if primitive.depth() == 0 {
            return None;
        }

        Some(self.produce_primitive(primitive.base(), primitive.depth() - 1))
    }

    /// The semantic type a syntactic annotation denotes.
    pub fn from_annotation(&mut self, annotation: &TypeNode) -> Type {
        self.produce_primitive(annotation.base, annotation.depth)
    }

    pub fn int(&mut self) -> Type {
        self.produce_primitive(BaseType::Int, 0)
    }

    pub fn bool(&mut self) -> Type {
        self.produce_primitive(BaseType::Bool, 0)
    }

    pub fn void(&mut self) -> Type {
        self.produce_primitive(BaseType::Void, 0)
    }

    pub fn string(&mut self) -> Type {
        self.produce_primitive(BaseType::Str, 0)
    }
}
