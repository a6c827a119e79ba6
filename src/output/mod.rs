//! Output formatting for CLI results

pub mod json;
pub mod table;
pub mod tree;

pub use json::format_json;
pub use table::format_table;
pub use tree::render_tree;
