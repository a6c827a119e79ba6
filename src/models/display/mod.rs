//! Display model implementations for table and JSON output
//!
//! Display models turn tree nodes into CLI-friendly rows with column names
//! and derived directory fields.

mod common;
mod node;

pub use common::{format_local_timestamp, or_dash, truncate_string};
pub use node::{NodeDetail, NodeDisplay, pruned};
