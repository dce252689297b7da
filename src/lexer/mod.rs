//! Turns lake source text into tokens.
//!
//! Matching is driven by an ordered table of anchored regexes. Identifiers
//! are checked against the reserved words after they match, whitespace and
//! `//` comments are dropped, and every token records the line and column
//! it starts at.

pub mod lexer;
pub mod tokens;
