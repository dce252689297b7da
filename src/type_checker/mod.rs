//! Type checking module.
//!
//! This module runs after name analysis has bound every identifier. It:
//!
//! - Computes a type for every declaration, statement and expression
//! - Records those types in a `TypeMap` keyed by node id
//! - Reports operator, assignment, call and return faults
//! - Suppresses cascades by letting the error type absorb its parents
//!
//! Checking never stops at the first fault; every diagnostic is collected
//! before the verdict is produced.

pub mod type_checker;
pub mod type_map;
