//! Pretty tree rendering for the `pretty` output format

use colored::Colorize;

use crate::tree::{OrgNode, ops};

/// Render `root` as an indented box-drawing tree.
///
/// Each line shows name, title, headcount (when set) and id. Below
/// `max_depth` levels a subtree collapses into a single "N more" line.
pub fn render_tree(root: &OrgNode, max_depth: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&node_line(root));
    out.push('\n');
    render_children(root, "", 1, max_depth, &mut out);
    out
}

fn render_children(
    node: &OrgNode,
    prefix: &str,
    level: usize,
    max_depth: Option<usize>,
    out: &mut String,
) {
    if max_depth.is_some_and(|max| level > max) {
        if !node.children.is_empty() {
            let hidden = ops::node_count(node) - 1;
            out.push_str(prefix);
            out.push_str(&format!("└── {}", format!("… {} more", hidden).dimmed()));
            out.push('\n');
        }
        return;
    }

    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, indent) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&node_line(child));
        out.push('\n');
        render_children(child, &format!("{}{}", prefix, indent), level + 1, max_depth, out);
    }
}

fn node_line(node: &OrgNode) -> String {
    let mut line = format!("{}  {}", node.name.bold(), node.title.cyan());
    if let Some(count) = node.count {
        line.push_str(&format!("  [{}]", count));
    }
    line.push_str(&format!("  {}", format!("({})", node.id).dimmed()));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrgNode {
        OrgNode::new("ceo", "Alice", "CEO").with_children(vec![
            OrgNode::new("cto", "Bob", "CTO")
                .with_children(vec![OrgNode::new("dev", "Dana", "Engineer")]),
            OrgNode::new("ops", "Carl", "Operations").with_count(7),
        ])
    }

    fn plain(root: &OrgNode, max_depth: Option<usize>) -> String {
        colored::control::set_override(false);
        render_tree(root, max_depth)
    }

    #[test]
    fn test_render_full_tree() {
        let out = plain(&sample(), None);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Alice  CEO  (ceo)");
        assert_eq!(lines[1], "├── Bob  CTO  (cto)");
        assert_eq!(lines[2], "│   └── Dana  Engineer  (dev)");
        assert_eq!(lines[3], "└── Carl  Operations  [7]  (ops)");
    }

    #[test]
    fn test_render_depth_limit_collapses() {
        let out = plain(&sample(), Some(1));
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "│   └── … 1 more");
        assert!(!out.contains("Dana"));
    }

    #[test]
    fn test_render_lone_root() {
        let out = plain(&OrgNode::new("ceo", "Alice", "CEO"), Some(0));
        assert_eq!(out, "Alice  CEO  (ceo)\n");
    }
}
