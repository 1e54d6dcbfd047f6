//! Steering file domain model.

use crate::artifact::Named;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const STEERING_EXTENSION: &str = "md";

/// A markdown steering document under `.kino/steering/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteeringFile {
    /// File stem (`code-style` for `code-style.md`)
    pub name: String,
    pub path: PathBuf,
}

impl SteeringFile {
    /// Initial content written when a steering file is created.
    pub fn template(name: &str) -> String {
        format!("# {name} Steering\n\n## Guidelines\n\nTODO: Add steering guidelines for {name}\n")
    }
}

impl Named for SteeringFile {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Joins steering contents into one prompt-ready document.
///
/// Each `(name, content)` pair becomes `# {name}\n\n{content}`; sections are
/// separated by a horizontal rule. Empty contents are dropped.
pub fn combine_steering_contents<'a, I>(sections: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    sections
        .into_iter()
        .filter(|(_, content)| !content.is_empty())
        .map(|(name, content)| format!("# {name}\n\n{content}"))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
