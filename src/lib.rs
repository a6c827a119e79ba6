//! orgtree - organization chart manager backed by a hosted relational store
//!
//! The library holds the tree model and its persistent operations
//! ([`tree`]), the display helpers derived from a person's name and title
//! ([`directory`]), the persistence contract ([`store`]), an on-disk snapshot
//! cache ([`cache`]) and the read-through [`chart::OrgChart`] that ties them
//! together. The `orgtree` binary is a thin CLI over these.

pub mod cache;
pub mod chart;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod output;
pub mod store;
pub mod tree;

pub use chart::OrgChart;
pub use error::{Error, Result};
pub use tree::{NewNode, NodePatch, OrgNode, OrgTree};
