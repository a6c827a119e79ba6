//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeDisplay;
    use crate::tree::OrgNode;

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<NodeDisplay> = vec![];
        assert_eq!(format_table(&rows), "No results found.");
    }

    #[test]
    fn test_format_table_nodes() {
        let tree = OrgNode::new("ceo", "Alice", "CEO")
            .with_children(vec![OrgNode::new("cto", "Bob", "CTO").with_count(4)]);

        let result = format_table(&NodeDisplay::rows(&tree, None));

        assert!(result.contains("ID"));
        assert!(result.contains("PARENT"));
        assert!(result.contains("Alice"));
        assert!(result.contains("Bob"));
        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }
}
