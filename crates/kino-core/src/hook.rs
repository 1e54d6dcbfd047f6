//! Agent hook domain model.
//!
//! Hooks are JSON documents stored as `.kino/hooks/<name>.kino.hook`.

use crate::artifact::Named;
use crate::error::{KinoError, Result};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix used for hook files created by Kino.
pub const HOOK_FILE_SUFFIX: &str = ".kino.hook";
/// Any file with this extension is read as a hook.
pub const HOOK_EXTENSION: &str = "hook";

/// The editor event that triggers a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookEventType {
    FileSaved,
    FileCreated,
    FileDeleted,
    #[default]
    Manual,
}

impl HookEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            HookEventType::FileSaved => "fileSaved",
            HookEventType::FileCreated => "fileCreated",
            HookEventType::FileDeleted => "fileDeleted",
            HookEventType::Manual => "manual",
        }
    }
}

impl fmt::Display for HookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The serialized form of a hook file.
///
/// Every field is optional on disk and `null` counts as absent.
/// [`Hook::from_document`] applies defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_event_type_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_type: Option<HookEventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl HookDocument {
    /// The document written by the create-hook command.
    pub fn template(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            event_type: Some(HookEventType::Manual),
            patterns: Some(vec!["**/*".to_string()]),
            prompt: Some("TODO: Define what this hook should do".to_string()),
            enabled: Some(true),
        }
    }
}

// An empty string selects the default event type; unknown names stay errors.
fn empty_event_type_as_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<HookEventType>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => {
            HookEventType::deserialize(IntoDeserializer::<'_, D::Error>::into_deserializer(raw))
                .map(Some)
        }
    }
}

/// An agent hook loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub name: String,
    pub event_type: HookEventType,
    pub patterns: Vec<String>,
    pub prompt: String,
    pub enabled: bool,
    pub file_path: PathBuf,
}

impl Hook {
    /// Parses the JSON content of a hook file.
    ///
    /// # Errors
    ///
    /// Returns `KinoError::FileParse` when the content is not a hook record
    /// (invalid JSON, wrong field types, unknown event type).
    pub fn parse(content: &str, file_path: &Path) -> Result<Self> {
        let document: HookDocument = serde_json::from_str(content)
            .map_err(|e| KinoError::file_parse(file_path, e))?;
        Ok(Self::from_document(document, file_path))
    }

    pub fn from_document(document: HookDocument, file_path: &Path) -> Self {
        let name = document
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| hook_name_from_path(file_path));

        Self {
            name,
            event_type: document.event_type.unwrap_or_default(),
            patterns: document.patterns.unwrap_or_default(),
            prompt: document.prompt.unwrap_or_default(),
            // Only an explicit `false` disables a hook
            enabled: document.enabled != Some(false),
            file_path: file_path.to_path_buf(),
        }
    }

    /// Whether a workspace-relative path matches any of the hook's patterns.
    ///
    /// Patterns that are not valid globs never match.
    pub fn matches_path(&self, relative_path: &str) -> bool {
        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..Default::default()
        };
        self.patterns.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches_with(relative_path, options))
                .unwrap_or(false)
        })
    }
}

impl Named for Hook {
    fn name(&self) -> &str {
        &self.name
    }
}

/// File stem of a hook file with the hook suffix removed.
pub fn hook_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    file_name
        .strip_suffix(HOOK_FILE_SUFFIX)
        .or_else(|| file_name.strip_suffix(".hook"))
        .unwrap_or(&file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("/p/.kino/hooks/lint.kino.hook")
    }

    #[test]
    fn test_parse_full_document() {
        let hook = Hook::parse(
            r#"{"name":"Lint","eventType":"fileSaved","patterns":["src/**/*.rs"],"prompt":"lint it","enabled":false}"#,
            &path(),
        )
        .unwrap();

        assert_eq!(hook.name, "Lint");
        assert_eq!(hook.event_type, HookEventType::FileSaved);
        assert_eq!(hook.patterns, vec!["src/**/*.rs".to_string()]);
        assert!(!hook.enabled);
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let hook = Hook::parse("{}", &path()).unwrap();

        assert_eq!(hook.name, "lint");
        assert_eq!(hook.event_type, HookEventType::Manual);
        assert!(hook.patterns.is_empty());
        assert_eq!(hook.prompt, "");
        assert!(hook.enabled, "omitted enabled flag defaults to enabled");
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let content = r#"{"name":"a","eventType":null,"patterns":null,"prompt":null,"enabled":null}"#;
        let hook = Hook::parse(content, &path()).unwrap();

        assert_eq!(hook.name, "a");
        assert_eq!(hook.event_type, HookEventType::Manual);
        assert!(hook.patterns.is_empty());
        assert_eq!(hook.prompt, "");
        assert!(hook.enabled);
    }

    #[test]
    fn test_empty_event_type_is_manual() {
        let hook = Hook::parse(r#"{"eventType":""}"#, &path()).unwrap();
        assert_eq!(hook.event_type, HookEventType::Manual);
    }

    #[test]
    fn test_unknown_event_type_is_parse_error() {
        let result = Hook::parse(r#"{"eventType":"onCommit"}"#, &path());
        assert!(matches!(result, Err(KinoError::FileParse { .. })));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = Hook::parse("{ not json", &path());
        assert!(matches!(result, Err(KinoError::FileParse { .. })));
    }

    #[test]
    fn test_name_from_plain_hook_extension() {
        assert_eq!(hook_name_from_path(Path::new("/x/fmt.hook")), "fmt");
        assert_eq!(hook_name_from_path(Path::new("/x/fmt.kino.hook")), "fmt");
    }

    #[test]
    fn test_matches_path() {
        let hook = Hook::parse(r#"{"patterns":["src/**/*.rs","[bad"]}"#, &path()).unwrap();
        assert!(hook.matches_path("src/core/lib.rs"));
        assert!(!hook.matches_path("docs/readme.md"));
    }

    #[test]
    fn test_template_round_trips_to_enabled_manual_hook() {
        let json = serde_json::to_string_pretty(&HookDocument::template("deploy")).unwrap();
        let hook = Hook::parse(&json, Path::new("/x/deploy.kino.hook")).unwrap();
        assert_eq!(hook.name, "deploy");
        assert_eq!(hook.event_type, HookEventType::Manual);
        assert_eq!(hook.patterns, vec!["**/*".to_string()]);
        assert!(hook.enabled);
    }
}
