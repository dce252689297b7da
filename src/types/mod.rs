//! Semantic type representation.
//!
//! This module defines the types the analyzer assigns to declarations,
//! statements and expressions. It includes:
//!
//! - Primitive types with an indirection (pointer) depth
//! - Tuple types for formal and actual parameter lists
//! - Function types
//! - A single error sentinel per analysis run
//!
//! Every type is produced by a `TypeTable`, which interns them so that
//! two requests for the same logical type yield the same instance.
//! Type comparison is therefore identity comparison.

pub mod type_table;
pub mod types;
