//! Turns a syntax tree back into lake source.

pub mod unparse;
