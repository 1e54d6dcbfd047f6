//! Spec domain model.
//!
//! A spec is a directory under `.kino/specs/` holding up to three markdown
//! documents.

use crate::artifact::Named;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One of the three documents a spec directory may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecDocument {
    Requirements,
    Design,
    Tasks,
}

impl SpecDocument {
    /// All documents in display order.
    pub const ALL: [SpecDocument; 3] = [
        SpecDocument::Requirements,
        SpecDocument::Design,
        SpecDocument::Tasks,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SpecDocument::Requirements => "requirements.md",
            SpecDocument::Design => "design.md",
            SpecDocument::Tasks => "tasks.md",
        }
    }

    /// Title of the "open" action attached to the document node.
    pub fn open_title(self) -> &'static str {
        match self {
            SpecDocument::Requirements => "Open Requirements",
            SpecDocument::Design => "Open Design",
            SpecDocument::Tasks => "Open Tasks",
        }
    }

    /// Initial content written when a spec is created.
    pub fn template(self, spec_name: &str) -> String {
        match self {
            SpecDocument::Requirements => format!(
                "# {spec_name} - Requirements\n\n## Overview\n\nTODO: Add requirements for {spec_name}\n"
            ),
            SpecDocument::Design => format!(
                "# {spec_name} - Design\n\n## Architecture\n\nTODO: Add design for {spec_name}\n"
            ),
            SpecDocument::Tasks => format!(
                "# {spec_name} - Tasks\n\n## Implementation Tasks\n\nTODO: Add tasks for {spec_name}\n"
            ),
        }
    }
}

/// A specification directory as seen by the last scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    /// Directory name, unique within one scan
    pub name: String,
    /// Spec directory (`.kino/specs/<name>`)
    pub path: PathBuf,
    pub requirements_path: PathBuf,
    pub design_path: PathBuf,
    pub tasks_path: PathBuf,
    /// Documents that existed on disk when the spec was scanned, in display order
    #[serde(default)]
    pub documents: Vec<SpecDocument>,
}

impl Spec {
    /// Builds a spec rooted at `path`, deriving the document paths from it.
    ///
    /// `documents` starts empty; scanners fill it in after testing each path.
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: name.into(),
            requirements_path: path.join(SpecDocument::Requirements.file_name()),
            design_path: path.join(SpecDocument::Design.file_name()),
            tasks_path: path.join(SpecDocument::Tasks.file_name()),
            path,
            documents: Vec::new(),
        }
    }

    pub fn document_path(&self, document: SpecDocument) -> &Path {
        match document {
            SpecDocument::Requirements => &self.requirements_path,
            SpecDocument::Design => &self.design_path,
            SpecDocument::Tasks => &self.tasks_path,
        }
    }

    pub fn has_document(&self, document: SpecDocument) -> bool {
        self.documents.contains(&document)
    }
}

impl Named for Spec {
    fn name(&self) -> &str {
        &self.name
    }
}
