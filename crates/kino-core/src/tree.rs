//! Display-node model shared by every sidebar view.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Semantic icon colors understood by the host theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconColor {
    Green,
    Red,
    Gray,
    DisabledForeground,
}

impl IconColor {
    /// Theme color identifier.
    pub fn theme_id(self) -> &'static str {
        match self {
            IconColor::Green => "charts.green",
            IconColor::Red => "charts.red",
            IconColor::Gray => "charts.gray",
            IconColor::DisabledForeground => "disabledForeground",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIcon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<IconColor>,
}

impl NodeIcon {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn colored(name: impl Into<String>, color: IconColor) -> Self {
        Self {
            name: name.into(),
            color: Some(color),
        }
    }
}

/// A label and the character ranges the host should highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLabel {
    pub text: String,
    /// Half-open `(start, end)` ranges in characters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<(usize, usize)>,
}

impl NodeLabel {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlights: Vec::new(),
        }
    }

    /// A label whose whole text is highlighted.
    pub fn fully_highlighted(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            highlights: vec![(0, len)],
        }
    }
}

/// Kind of node, used by the host for context menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Spec,
    SpecFile,
    Hook,
    Steering,
    McpServer,
}

impl NodeKind {
    pub fn context_value(self) -> &'static str {
        match self {
            NodeKind::Spec => "spec",
            NodeKind::SpecFile => "specFile",
            NodeKind::Hook => "hook",
            NodeKind::Steering => "steeringFile",
            NodeKind::McpServer => "mcpServer",
        }
    }
}

/// Host action run when the node is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeAction {
    OpenFile { path: PathBuf, title: String },
}

/// One row in a sidebar tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Stable identity within one view
    pub id: String,
    pub label: NodeLabel,
    pub icon: NodeIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NodeAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, label: NodeLabel, icon: NodeIcon, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label,
            icon,
            tooltip: None,
            description: None,
            kind,
            resource_path: None,
            action: None,
            children: Vec::new(),
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_path = Some(path.into());
        self
    }

    pub fn with_open_action(mut self, path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        self.action = Some(NodeAction::OpenFile {
            path: path.into(),
            title: title.into(),
        });
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first lookup by id, including this node.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_highlight_counts_chars() {
        let label = NodeLabel::fully_highlighted("déploy");
        assert_eq!(label.highlights, vec![(0, 6)]);
    }

    #[test]
    fn test_find_descends_into_children() {
        let child = TreeNode::new("a/b", NodeLabel::plain("b"), NodeIcon::plain("file"), NodeKind::SpecFile);
        let root = TreeNode::new("a", NodeLabel::plain("a"), NodeIcon::plain("folder"), NodeKind::Spec)
            .with_children(vec![child]);

        assert_eq!(root.find("a/b").map(|n| n.label.text.as_str()), Some("b"));
        assert!(root.find("missing").is_none());
        assert!(!root.is_leaf());
    }
}
