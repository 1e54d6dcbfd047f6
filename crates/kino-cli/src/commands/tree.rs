use super::utils::activate;
use crate::View;
use anyhow::Result;
use kino_core::tree::TreeNode;
use std::path::Path;

pub async fn print(project_root: &Path, view: Option<View>, json: bool) -> Result<()> {
    let shell = activate(project_root).await?;
    let views = shell.views();

    let selected = match view {
        Some(view) => vec![view],
        None => vec![View::Specs, View::Hooks, View::Steering, View::Mcp],
    };

    for view in selected {
        let (title, roots) = match view {
            View::Specs => ("Specs", views.specs.roots().await),
            View::Hooks => ("Hooks", views.hooks.roots().await),
            View::Steering => ("Steering", views.steering.roots().await),
            View::Mcp => ("MCP Servers", views.mcp.roots().await),
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&roots)?);
            continue;
        }

        println!("{title}");
        if roots.is_empty() {
            println!("  (empty)");
        }
        for node in &roots {
            print_node(node, 1);
        }
    }
    Ok(())
}

fn print_node(node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut line = format!("{indent}[{}] {}", node.icon.name, node.label.text);
    if let Some(description) = &node.description {
        line.push_str(&format!("  ({description})"));
    }
    println!("{line}");
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
