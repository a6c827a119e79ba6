//! Display models for CLI output
//!
//! Converts tree nodes into the shapes printed by the table and JSON
//! formatters.

pub mod display;

pub use display::{NodeDetail, NodeDisplay};
