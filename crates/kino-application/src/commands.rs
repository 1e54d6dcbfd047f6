//! Host command surface.
//!
//! [`HostCommand`] enumerates the command ids the host registers.
//! [`KinoCommands`] implements the file operations behind them; it never
//! touches the views directly, the shell refreshes them afterwards.

use kino_core::error::{KinoError, Result};
use kino_core::event::ArtifactCategory;
use kino_core::hook::{HOOK_FILE_SUFFIX, HookDocument};
use kino_core::spec::SpecDocument;
use kino_core::steering::{STEERING_EXTENSION, SteeringFile};
use kino_infrastructure::{KinoPaths, ProjectFiles};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCommand {
    OpenChat,
    CreateNewSpec,
    OpenSpecRequirements,
    OpenSpecDesign,
    OpenSpecTasks,
    DeleteSpec,
    CreateHook,
    ExecuteHook,
    EditHook,
    DeleteHook,
    CreateSteeringFile,
    EditSteeringFile,
    DeleteSteeringFile,
    OpenMcpConfiguration,
    RefreshSpecs,
    RefreshHooks,
    RefreshSteering,
    RefreshMcp,
}

impl HostCommand {
    pub const ALL: [HostCommand; 18] = [
        HostCommand::OpenChat,
        HostCommand::CreateNewSpec,
        HostCommand::OpenSpecRequirements,
        HostCommand::OpenSpecDesign,
        HostCommand::OpenSpecTasks,
        HostCommand::DeleteSpec,
        HostCommand::CreateHook,
        HostCommand::ExecuteHook,
        HostCommand::EditHook,
        HostCommand::DeleteHook,
        HostCommand::CreateSteeringFile,
        HostCommand::EditSteeringFile,
        HostCommand::DeleteSteeringFile,
        HostCommand::OpenMcpConfiguration,
        HostCommand::RefreshSpecs,
        HostCommand::RefreshHooks,
        HostCommand::RefreshSteering,
        HostCommand::RefreshMcp,
    ];

    /// The id registered with the host.
    pub fn id(self) -> &'static str {
        match self {
            HostCommand::OpenChat => "kinoAI.openChat",
            HostCommand::CreateNewSpec => "kinoAI.createNewSpec",
            HostCommand::OpenSpecRequirements => "kinoAI.openSpecRequirements",
            HostCommand::OpenSpecDesign => "kinoAI.openSpecDesign",
            HostCommand::OpenSpecTasks => "kinoAI.openSpecTasks",
            HostCommand::DeleteSpec => "kinoAI.deleteSpec",
            HostCommand::CreateHook => "kinoAI.createHook",
            HostCommand::ExecuteHook => "kinoAI.executeHook",
            HostCommand::EditHook => "kinoAI.editHook",
            HostCommand::DeleteHook => "kinoAI.deleteHook",
            HostCommand::CreateSteeringFile => "kinoAI.createSteeringFile",
            HostCommand::EditSteeringFile => "kinoAI.editSteeringFile",
            HostCommand::DeleteSteeringFile => "kinoAI.deleteSteeringFile",
            HostCommand::OpenMcpConfiguration => "kinoAI.openMCPConfiguration",
            HostCommand::RefreshSpecs => "kinoAI.refreshSpecs",
            HostCommand::RefreshHooks => "kinoAI.refreshHooks",
            HostCommand::RefreshSteering => "kinoAI.refreshSteering",
            HostCommand::RefreshMcp => "kinoAI.refreshMCP",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }

    /// Whether the command acts on a named artifact.
    pub fn takes_name(self) -> bool {
        !matches!(
            self,
            HostCommand::OpenChat
                | HostCommand::OpenMcpConfiguration
                | HostCommand::RefreshSpecs
                | HostCommand::RefreshHooks
                | HostCommand::RefreshSteering
                | HostCommand::RefreshMcp
        )
    }

    /// The collection a command changes or refreshes, if any.
    pub fn category(self) -> Option<ArtifactCategory> {
        match self {
            HostCommand::CreateNewSpec | HostCommand::DeleteSpec | HostCommand::RefreshSpecs => {
                Some(ArtifactCategory::Specs)
            }
            HostCommand::CreateHook | HostCommand::DeleteHook | HostCommand::RefreshHooks => {
                Some(ArtifactCategory::Hooks)
            }
            HostCommand::CreateSteeringFile
            | HostCommand::DeleteSteeringFile
            | HostCommand::RefreshSteering => Some(ArtifactCategory::Steering),
            HostCommand::RefreshMcp => Some(ArtifactCategory::Settings),
            _ => None,
        }
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What the host should do once a command has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Open this file in an editor
    OpenFile(PathBuf),
    /// Show an information message
    Message(String),
    /// Reveal the chat panel on this session
    ShowChat { session_id: String },
    /// A view was refreshed
    Refreshed(ArtifactCategory),
}

/// Rejects names that are empty or would escape their directory.
pub fn validate_artifact_name(kind: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(KinoError::invalid_input(format!("{kind} name must not be empty")));
    }
    if name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(KinoError::invalid_input(format!(
            "{kind} name '{name}' must not start with '.' or contain path separators"
        )));
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone)]
pub struct KinoCommands {
    paths: KinoPaths,
    files: ProjectFiles,
}

impl KinoCommands {
    pub fn new(paths: KinoPaths) -> Self {
        Self {
            files: ProjectFiles::new(paths.kino_dir()),
            paths,
        }
    }

    pub fn files(&self) -> &ProjectFiles {
        &self.files
    }

    fn spec_dir(name: &str) -> String {
        format!("{}/{}", ArtifactCategory::Specs.dir_name(), name)
    }

    fn hook_file(name: &str) -> String {
        format!("{}/{}{}", ArtifactCategory::Hooks.dir_name(), name, HOOK_FILE_SUFFIX)
    }

    fn steering_file(name: &str) -> String {
        format!("{}/{}.{}", ArtifactCategory::Steering.dir_name(), name, STEERING_EXTENSION)
    }

    /// Creates `specs/<name>/` with the three document templates and returns
    /// the requirements path.
    pub async fn create_spec(&self, name: &str) -> Result<PathBuf> {
        let name = validate_artifact_name("Spec", name)?;
        let dir = Self::spec_dir(&name);
        if self.files.file_exists(&dir).await {
            return Err(KinoError::invalid_input(format!("Spec '{name}' already exists")));
        }

        for document in SpecDocument::ALL {
            self.files
                .write_file(format!("{dir}/{}", document.file_name()), &document.template(&name))
                .await?;
        }
        tracing::info!("[Commands] Created spec {}", name);
        self.files
            .resolve(format!("{dir}/{}", SpecDocument::Requirements.file_name()))
    }

    /// Path of one document of an existing spec.
    pub async fn open_spec_document(&self, name: &str, document: SpecDocument) -> Result<PathBuf> {
        let name = validate_artifact_name("Spec", name)?;
        let relative = format!("{}/{}", Self::spec_dir(&name), document.file_name());
        if !self.files.file_exists(&relative).await {
            return Err(KinoError::not_found("File", relative));
        }
        self.files.resolve(relative)
    }

    /// Removes a spec directory and everything in it.
    pub async fn delete_spec(&self, name: &str) -> Result<()> {
        let name = validate_artifact_name("Spec", name)?;
        let dir = self.files.resolve(Self::spec_dir(&name))?;
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KinoError::not_found("Spec", name));
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!("[Commands] Deleted spec {}", name);
        Ok(())
    }

    /// Writes `hooks/<name>.kino.hook` from the hook template.
    pub async fn create_hook(&self, name: &str) -> Result<PathBuf> {
        let name = validate_artifact_name("Hook", name)?;
        let relative = Self::hook_file(&name);
        if self.files.file_exists(&relative).await {
            return Err(KinoError::invalid_input(format!("Hook '{name}' already exists")));
        }

        let content = serde_json::to_string_pretty(&HookDocument::template(&name))?;
        self.files.write_file(&relative, &content).await?;
        tracing::info!("[Commands] Created hook {}", name);
        self.files.resolve(relative)
    }

    pub async fn edit_hook(&self, name: &str) -> Result<PathBuf> {
        self.existing(Self::hook_file(&validate_artifact_name("Hook", name)?)).await
    }

    pub async fn delete_hook(&self, name: &str) -> Result<()> {
        let name = validate_artifact_name("Hook", name)?;
        self.files.delete_file(Self::hook_file(&name)).await?;
        tracing::info!("[Commands] Deleted hook {}", name);
        Ok(())
    }

    /// Hook execution is not available yet; reports that to the user.
    pub fn execute_hook(&self, name: &str) -> String {
        format!("Executing hook: {name} (hook execution is not implemented yet)")
    }

    pub async fn create_steering(&self, name: &str) -> Result<PathBuf> {
        let name = validate_artifact_name("Steering file", name)?;
        let relative = Self::steering_file(&name);
        if self.files.file_exists(&relative).await {
            return Err(KinoError::invalid_input(format!("Steering file '{name}' already exists")));
        }

        self.files.write_file(&relative, &SteeringFile::template(&name)).await?;
        tracing::info!("[Commands] Created steering file {}", name);
        self.files.resolve(relative)
    }

    pub async fn edit_steering(&self, name: &str) -> Result<PathBuf> {
        self.existing(Self::steering_file(&validate_artifact_name("Steering file", name)?))
            .await
    }

    pub async fn delete_steering(&self, name: &str) -> Result<()> {
        let name = validate_artifact_name("Steering file", name)?;
        self.files.delete_file(Self::steering_file(&name)).await?;
        tracing::info!("[Commands] Deleted steering file {}", name);
        Ok(())
    }

    /// `settings/mcp.json`, created with an empty server map if missing.
    pub async fn open_mcp_configuration(&self) -> Result<PathBuf> {
        let path = self.paths.mcp_config_file();
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            self.paths.ensure_layout()?;
        }
        Ok(path)
    }

    async fn existing(&self, relative: String) -> Result<PathBuf> {
        if !self.files.file_exists(&relative).await {
            return Err(KinoError::not_found("File", relative));
        }
        self.files.resolve(relative)
    }
}
