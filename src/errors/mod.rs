//! Faults raised while analyzing a program.
//!
//! User-facing errors carry a position and are either returned (syntax) or
//! collected in a `Diagnostics` sink (name and type analysis). Analyzer
//! bugs are `InternalError`s and never reach the sink.

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
