//! scadsets-lib: Core types and logic for scadsets
//!
//! This crate provides the building blocks used by the `scadsets` CLI:
//! - `Variable`: a named, indexable source of parameter values
//! - `ParameterSpace`: mixed-radix enumeration over a list of variables
//! - `Version`: turns a configuration document into named parameter sets
//! - `execute`: diffs parameter sets against rendered artifacts and drives the renderer

pub mod execute;
pub mod infer;
pub mod placeholder;
pub mod set;
#[cfg(test)]
pub(crate) mod util;
pub mod variable;
pub mod version;
