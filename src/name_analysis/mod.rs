//! Name analysis.
//!
//! Walks the tree once, opening and closing scopes, installing every
//! declaration as a symbol and binding every identifier use to the symbol
//! it refers to. All faults are reported; the walk never stops early.

pub mod name_analysis;

#[cfg(test)]
mod tests;
