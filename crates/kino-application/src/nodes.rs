//! Display-node builders, one per collection.
//!
//! These are pure functions of the scanned record. Anything that needs the
//! filesystem (such as which spec documents exist) is resolved by the scanner.

use kino_core::hook::Hook;
use kino_core::mcp::{McpServer, McpServerStatus};
use kino_core::spec::{Spec, SpecDocument};
use kino_core::steering::SteeringFile;
use kino_core::tree::{IconColor, NodeIcon, NodeKind, NodeLabel, TreeNode};

pub fn spec_node(spec: &Spec) -> TreeNode {
    let children = SpecDocument::ALL
        .into_iter()
        .filter(|document| spec.has_document(*document))
        .map(|document| spec_document_node(spec, document))
        .collect();

    TreeNode::new(
        spec.name.clone(),
        NodeLabel::plain(spec.name.clone()),
        NodeIcon::plain("folder"),
        NodeKind::Spec,
    )
    .with_resource(spec.path.clone())
    .with_children(children)
}

fn spec_document_node(spec: &Spec, document: SpecDocument) -> TreeNode {
    let path = spec.document_path(document);
    TreeNode::new(
        format!("{}/{}", spec.name, document.file_name()),
        NodeLabel::plain(document.file_name()),
        NodeIcon::plain("file"),
        NodeKind::SpecFile,
    )
    .with_resource(path)
    .with_open_action(path, document.open_title())
}

pub fn hook_node(hook: &Hook) -> TreeNode {
    let (label, icon) = if hook.enabled {
        (NodeLabel::plain(hook.name.clone()), NodeIcon::plain("play-circle"))
    } else {
        (
            NodeLabel::fully_highlighted(hook.name.clone()),
            NodeIcon::colored("circle-slash", IconColor::DisabledForeground),
        )
    };

    let tooltip = format!(
        "{}\nEvent: {}\nEnabled: {}\nPatterns: {}",
        hook.name,
        hook.event_type,
        hook.enabled,
        hook.patterns.join(", ")
    );

    TreeNode::new(hook.name.clone(), label, icon, NodeKind::Hook)
        .with_tooltip(tooltip)
        .with_description(hook.event_type.as_str())
        .with_resource(hook.file_path.clone())
}

pub fn steering_node(file: &SteeringFile) -> TreeNode {
    TreeNode::new(
        file.name.clone(),
        NodeLabel::plain(file.name.clone()),
        NodeIcon::plain("file"),
        NodeKind::Steering,
    )
    .with_resource(file.path.clone())
    .with_open_action(file.path.clone(), "Open Steering File")
}

/// Icon for an MCP server status.
pub fn mcp_status_icon(status: McpServerStatus) -> NodeIcon {
    match status {
        McpServerStatus::Connected => NodeIcon::colored("circle-filled", IconColor::Green),
        McpServerStatus::Error => NodeIcon::colored("error", IconColor::Red),
        McpServerStatus::Disconnected => NodeIcon::colored("circle-outline", IconColor::Gray),
    }
}

/// Same mapping over a raw status string. Unrecognized input gets the
/// disconnected style.
pub fn mcp_status_icon_for(status: &str) -> NodeIcon {
    mcp_status_icon(McpServerStatus::from_status_str(status))
}

pub fn mcp_server_tooltip(server: &McpServer) -> String {
    let mut tooltip = format!(
        "{}\nCommand: {}\nArgs: {}\nStatus: {}",
        server.name,
        server.command,
        server.args.join(" "),
        server.status
    );
    if let Some(error) = &server.last_error {
        tooltip.push_str(&format!("\nError: {error}"));
    }
    tooltip
}

pub fn mcp_server_node(server: &McpServer) -> TreeNode {
    TreeNode::new(
        server.name.clone(),
        NodeLabel::plain(server.name.clone()),
        mcp_status_icon(server.status),
        NodeKind::McpServer,
    )
    .with_tooltip(mcp_server_tooltip(server))
    .with_description(server.status.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kino_core::hook::HookEventType;
    use kino_core::tree::NodeAction;
    use std::path::{Path, PathBuf};

    fn hook(enabled: bool) -> Hook {
        Hook {
            name: "format".into(),
            event_type: HookEventType::FileSaved,
            patterns: vec!["**/*.rs".into(), "**/*.toml".into()],
            prompt: "format it".into(),
            enabled,
            file_path: PathBuf::from("/p/.kino/hooks/format.kino.hook"),
        }
    }

    fn server(status: McpServerStatus, last_error: Option<&str>) -> McpServer {
        McpServer {
            name: "fs".into(),
            command: "npx".into(),
            args: vec!["-y".into(), "server-fs".into()],
            status,
            last_error: last_error.map(str::to_string),
        }
    }

    #[test]
    fn test_spec_with_only_requirements_has_one_child() {
        let mut spec = Spec::new("auth", "/p/.kino/specs/auth");
        spec.documents = vec![SpecDocument::Requirements];

        let node = spec_node(&spec);

        assert_eq!(node.icon.name, "folder");
        assert_eq!(node.kind.context_value(), "spec");
        assert_eq!(node.children.len(), 1);
        let child = &node.children[0];
        assert_eq!(child.label.text, "requirements.md");
        assert_eq!(
            child.action,
            Some(NodeAction::OpenFile {
                path: PathBuf::from("/p/.kino/specs/auth/requirements.md"),
                title: "Open Requirements".into(),
            })
        );
    }

    #[test]
    fn test_spec_children_keep_document_order() {
        let mut spec = Spec::new("auth", "/p/.kino/specs/auth");
        spec.documents = SpecDocument::ALL.to_vec();

        let labels: Vec<_> = spec_node(&spec)
            .children
            .into_iter()
            .map(|c| c.label.text)
            .collect();
        assert_eq!(labels, vec!["requirements.md", "design.md", "tasks.md"]);
    }

    #[test]
    fn test_enabled_hook_node() {
        let node = hook_node(&hook(true));

        assert_eq!(node.icon, NodeIcon::plain("play-circle"));
        assert!(node.label.highlights.is_empty());
        assert_eq!(node.description.as_deref(), Some("fileSaved"));
        assert_eq!(
            node.tooltip.as_deref(),
            Some("format\nEvent: fileSaved\nEnabled: true\nPatterns: **/*.rs, **/*.toml")
        );
        assert_eq!(node.resource_path.as_deref(), Some(Path::new("/p/.kino/hooks/format.kino.hook")));
    }

    #[test]
    fn test_disabled_hook_is_muted_and_fully_highlighted() {
        let node = hook_node(&hook(false));

        assert_eq!(node.icon.name, "circle-slash");
        assert_eq!(node.icon.color, Some(IconColor::DisabledForeground));
        assert_eq!(node.label.highlights, vec![(0, "format".len())]);
    }

    #[test]
    fn test_steering_node_opens_file() {
        let file = SteeringFile {
            name: "tone".into(),
            path: PathBuf::from("/p/.kino/steering/tone.md"),
        };
        let node = steering_node(&file);
        assert_eq!(node.kind.context_value(), "steeringFile");
        assert!(matches!(node.action, Some(NodeAction::OpenFile { ref title, .. }) if title == "Open Steering File"));
    }

    #[test]
    fn test_mcp_status_icons() {
        assert_eq!(
            mcp_status_icon(McpServerStatus::Connected),
            NodeIcon::colored("circle-filled", IconColor::Green)
        );
        assert_eq!(
            mcp_status_icon(McpServerStatus::Error),
            NodeIcon::colored("error", IconColor::Red)
        );
        assert_eq!(
            mcp_status_icon(McpServerStatus::Disconnected),
            NodeIcon::colored("circle-outline", IconColor::Gray)
        );
    }

    #[test]
    fn test_mcp_status_icon_is_total_over_strings() {
        for status in ["connected", "error", "disconnected", "", "CONNECTED", "starting"] {
            let icon = mcp_status_icon_for(status);
            let expected = mcp_status_icon(McpServerStatus::from_status_str(status));
            assert_eq!(icon, expected, "status {status:?}");
        }
        assert_eq!(mcp_status_icon_for("weird").color, Some(IconColor::Gray));
    }

    #[test]
    fn test_mcp_tooltip_without_error() {
        let node = mcp_server_node(&server(McpServerStatus::Disconnected, None));
        assert_eq!(
            node.tooltip.as_deref(),
            Some("fs\nCommand: npx\nArgs: -y server-fs\nStatus: disconnected")
        );
        assert_eq!(node.description.as_deref(), Some("disconnected"));
        assert!(node.resource_path.is_none());
    }

    // The error line was once built and then discarded, so errored servers
    // showed no reason. A recorded error is now always the last tooltip line.
    #[test]
    fn test_mcp_tooltip_appends_last_error() {
        let node = mcp_server_node(&server(McpServerStatus::Error, Some("spawn ENOENT")));
        assert_eq!(
            node.tooltip.as_deref(),
            Some("fs\nCommand: npx\nArgs: -y server-fs\nStatus: error\nError: spawn ENOENT")
        );
    }
}
