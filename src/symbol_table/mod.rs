//! Symbols, scopes and the scope chain used by name analysis.

pub mod symbol;
pub mod symbol_table;

#[cfg(test)]
mod tests;
