//! Plain-text rendering of the navigation tree
//!
//! Mirrors what a graphical panel shows: folders before documents in every
//! sibling group, collapsed folders hiding their contents.

use para_tree::prelude::*;

/// Marker for a node, by kind and collapse state
pub fn node_marker(is_folder: bool, is_expanded: bool) -> &'static str {
    if is_folder {
        if is_expanded {
            "▾"
        } else {
            "▸"
        }
    } else {
        "·"
    }
}

/// Render the tree as an indented outline, two spaces per level
///
/// The root label comes first. With `show_keys` each line also carries the
/// node's key, which is what move and open commands take.
pub fn render_outline<D, F>(tree: &ParaTree<D>, is_expanded: F, show_keys: bool) -> String
where
    F: Fn(&NodeKey) -> bool,
{
    let mut lines = vec![tree.root_label().to_string()];
    push_children(tree, tree.root(), 1, &is_expanded, show_keys, &mut lines);
    lines.join("\n")
}

fn push_children<D, F>(
    tree: &ParaTree<D>,
    parent: NodeId,
    depth: usize,
    is_expanded: &F,
    show_keys: bool,
    lines: &mut Vec<String>,
) where
    F: Fn(&NodeKey) -> bool,
{
    for child in tree.display_children(parent) {
        let Some(node) = tree.get(child) else {
            continue;
        };
        let expanded = node.is_container() && is_expanded(&node.key);

        let mut line = format!(
            "{}{} {}",
            "  ".repeat(depth),
            node_marker(node.is_container(), expanded),
            node.name
        );
        if show_keys {
            line.push_str(&format!("  [{}]", node.key));
        }
        lines.push(line);

        if expanded {
            push_children(tree, child, depth + 1, is_expanded, show_keys, lines);
        }
    }
}
