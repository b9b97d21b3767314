//! Builds a small navigation tree, prints it, then moves a folder
//!
//! Usage:
//!   cargo run -p para-tree --example outline

use para_tree::prelude::*;

fn print_tree(tree: &ParaTree<&str>) {
    for id in tree.walk() {
        let node = tree.get(id).unwrap();
        let indent = "  ".repeat(tree.depth(id));

        let icon = match node.kind {
            NodeKind::Container => "📁",
            NodeKind::Leaf => "📄",
        };

        if node.kind == NodeKind::Leaf {
            println!("{}{} {}", indent, icon, node.name);
        } else {
            println!("{}{} {} ({} items)", indent, icon, node.name, tree.child_count(id));
        }
    }
}

fn main() {
    let documents = vec![
        DocumentSummary::new("sprint/plan.md", "Plan", "sprint/plan.md")
            .categorization("Project/Sprint1"),
        DocumentSummary::new("sprint/retro.md", "Retro", "sprint/retro.md")
            .categorization("Project/Sprint1/Meetings"),
        DocumentSummary::new("health.md", "Health", "health.md").categorization("Area"),
        DocumentSummary::new("inbox.md", "Inbox", "inbox.md"),
    ];

    let mut tree = TreeBuilder::new().root_label("Demo vault").build(documents);
    print_tree(&tree);

    println!();
    for excluded in tree.excluded() {
        println!("Not shown: {} ({})", excluded.base_name, excluded.reason);
    }

    println!();
    match tree.move_node(&MoveRequest::new("Project/Sprint1", "Archive")) {
        Ok(result) => {
            for update in &result.updates {
                println!("{}: {} -> {}", update.document, update.previous, update.categorization);
            }
        }
        Err(e) => eprintln!("Move refused: {}", e),
    }

    println!();
    print_tree(&tree);
}
