//! Token stream to syntax tree.
//!
//! Declarations and statements are parsed by recursive descent, expressions
//! and type annotations by binding power. Every node gets a fresh `NodeId`
//! in construction order. The first syntax error stops the parse.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
