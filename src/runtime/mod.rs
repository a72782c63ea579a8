//! # Runtime
//!
//! Backtracking primitives shared by every recognizer. A [`Parser`] holds the state of one parse; generated code,
//! the bootstrapped grammar recognizer and the [interpreter](crate::codegen::Program) all drive it through the same
//! methods.

mod errors;
mod parser;
mod report;

pub use errors::*;
pub use parser::*;
pub use report::*;
