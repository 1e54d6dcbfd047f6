//! Extension shell: owns every component of one activated project.
//!
//! Activation creates the `.kino` layout, starts the watcher, loads settings,
//! builds the four views and the chat store, then spawns a relay task that
//! turns watcher signals into view refreshes. Disposing (or dropping) the
//! shell stops the relay and the watcher.

use crate::chat_store::ChatSessionStore;
use crate::commands::{CommandOutcome, HostCommand, KinoCommands};
use crate::context::ArtifactPromptContext;
use crate::providers::{
    HooksProvider, McpProvider, SpecsProvider, SteeringProvider, hooks_provider, specs_provider,
    steering_provider,
};
use kino_core::completion::CompletionClient;
use kino_core::error::{KinoError, Result};
use kino_core::event::{ArtifactCategory, ArtifactEventBus};
use kino_core::secret::SecretService;
use kino_core::spec::SpecDocument;
use kino_infrastructure::{
    DirectoryWatcher, JsonSessionRepository, KinoPaths, SecretServiceImpl, SettingsService,
};
use kino_interaction::create_completion_client;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// The four views, cheap to clone into the relay task.
#[derive(Clone)]
pub struct ArtifactViews {
    pub specs: Arc<SpecsProvider>,
    pub hooks: Arc<HooksProvider>,
    pub steering: Arc<SteeringProvider>,
    pub mcp: Arc<McpProvider>,
}

impl ArtifactViews {
    fn new(paths: &KinoPaths) -> Self {
        Self {
            specs: Arc::new(specs_provider(paths)),
            hooks: Arc::new(hooks_provider(paths)),
            steering: Arc::new(steering_provider(paths)),
            mcp: Arc::new(McpProvider::new(paths)),
        }
    }

    /// Re-scans the view fed by `category`.
    pub async fn refresh(&self, category: ArtifactCategory) -> Result<()> {
        match category {
            ArtifactCategory::Specs => self.specs.refresh().await,
            ArtifactCategory::Hooks => self.hooks.refresh().await,
            ArtifactCategory::Steering => self.steering.refresh().await,
            ArtifactCategory::Settings => self.mcp.refresh().await,
        }
    }

    /// Refreshes every view; failures are logged and do not stop the others.
    pub async fn refresh_all(&self) {
        for category in ArtifactCategory::ALL {
            if let Err(e) = self.refresh(category).await {
                tracing::warn!("[Shell] Initial {} scan failed: {}", category.dir_name(), e);
            }
        }
    }
}

pub struct KinoShell {
    paths: KinoPaths,
    watcher: DirectoryWatcher,
    settings: SettingsService,
    secrets: Arc<dyn SecretService>,
    views: ArtifactViews,
    context: Arc<ArtifactPromptContext>,
    chat: Arc<ChatSessionStore>,
    commands: KinoCommands,
    relay: Mutex<Option<JoinHandle<()>>>,
}

impl KinoShell {
    /// Activates `project_root` with the per-user secret store and the
    /// configured completion provider.
    pub async fn activate(project_root: impl AsRef<Path>) -> Result<Self> {
        let secrets = Arc::new(SecretServiceImpl::new()?);
        Self::activate_with(project_root, secrets, None).await
    }

    /// Activates with explicit collaborators. `client` overrides the one
    /// selected by `llm.defaultProvider`.
    ///
    /// # Errors
    ///
    /// `KinoError::DirectoryInit` when the `.kino` layout cannot be created,
    /// `KinoError::FileParse` for an unreadable settings file and
    /// `KinoError::Config` for an unsupported provider.
    pub async fn activate_with(
        project_root: impl AsRef<Path>,
        secrets: Arc<dyn SecretService>,
        client: Option<Arc<dyn CompletionClient>>,
    ) -> Result<Self> {
        let paths = KinoPaths::for_project(project_root);
        let bus = ArtifactEventBus::new();
        let watcher = DirectoryWatcher::start(paths.clone(), bus.clone())?;
        let settings = SettingsService::load(&paths)?;

        let client = match client {
            Some(client) => client,
            None => create_completion_client(&settings.settings().await.llm.default_provider)?,
        };

        let views = ArtifactViews::new(&paths);
        let context = Arc::new(ArtifactPromptContext::new(
            views.specs.clone(),
            views.hooks.clone(),
        ));
        let chat = Arc::new(
            ChatSessionStore::new(client, secrets.clone(), settings.clone())
                .with_repository(Arc::new(JsonSessionRepository::for_project(&paths)))
                .with_context_provider(context.clone()),
        );
        if let Err(e) = chat.restore().await {
            tracing::warn!("[Shell] Could not restore chat sessions: {}", e);
        }

        views.refresh_all().await;
        let relay = spawn_relay(bus.subscribe(), views.clone(), settings.clone());

        tracing::info!("[Shell] Activated {}", paths.project_root().display());
        Ok(Self {
            commands: KinoCommands::new(paths.clone()),
            paths,
            watcher,
            settings,
            secrets,
            views,
            context,
            chat,
            relay: Mutex::new(Some(relay)),
        })
    }

    pub fn paths(&self) -> &KinoPaths {
        &self.paths
    }

    pub fn views(&self) -> &ArtifactViews {
        &self.views
    }

    pub fn chat(&self) -> &Arc<ChatSessionStore> {
        &self.chat
    }

    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    pub fn secrets(&self) -> &Arc<dyn SecretService> {
        &self.secrets
    }

    pub fn context(&self) -> &Arc<ArtifactPromptContext> {
        &self.context
    }

    pub fn commands(&self) -> &KinoCommands {
        &self.commands
    }

    /// Subscribes to raw watcher signals.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ArtifactCategory> {
        self.watcher.subscribe()
    }

    /// Runs a host command. `name` is the artifact the command targets and is
    /// required for every command where [`HostCommand::takes_name`] is true.
    pub async fn execute(&self, command: HostCommand, name: Option<&str>) -> Result<CommandOutcome> {
        let name = match (command.takes_name(), name) {
            (true, Some(name)) => name,
            (true, None) => {
                return Err(KinoError::invalid_input(format!("{command} requires a name")));
            }
            (false, _) => "",
        };
        tracing::debug!("[Shell] Executing {}", command);

        let outcome = match command {
            HostCommand::OpenChat => CommandOutcome::ShowChat {
                session_id: self.chat.ensure_current().await.id,
            },
            HostCommand::CreateNewSpec => CommandOutcome::OpenFile(self.commands.create_spec(name).await?),
            HostCommand::OpenSpecRequirements => CommandOutcome::OpenFile(
                self.commands.open_spec_document(name, SpecDocument::Requirements).await?,
            ),
            HostCommand::OpenSpecDesign => CommandOutcome::OpenFile(
                self.commands.open_spec_document(name, SpecDocument::Design).await?,
            ),
            HostCommand::OpenSpecTasks => CommandOutcome::OpenFile(
                self.commands.open_spec_document(name, SpecDocument::Tasks).await?,
            ),
            HostCommand::DeleteSpec => {
                self.commands.delete_spec(name).await?;
                CommandOutcome::Message(format!("Deleted spec: {name}"))
            }
            HostCommand::CreateHook => CommandOutcome::OpenFile(self.commands.create_hook(name).await?),
            HostCommand::ExecuteHook => {
                if self.views.hooks.find(name).await.is_none() {
                    return Err(KinoError::not_found("Hook", name));
                }
                CommandOutcome::Message(self.commands.execute_hook(name))
            }
            HostCommand::EditHook => CommandOutcome::OpenFile(self.commands.edit_hook(name).await?),
            HostCommand::DeleteHook => {
                self.commands.delete_hook(name).await?;
                CommandOutcome::Message(format!("Deleted hook: {name}"))
            }
            HostCommand::CreateSteeringFile => {
                CommandOutcome::OpenFile(self.commands.create_steering(name).await?)
            }
            HostCommand::EditSteeringFile => {
                CommandOutcome::OpenFile(self.commands.edit_steering(name).await?)
            }
            HostCommand::DeleteSteeringFile => {
                self.commands.delete_steering(name).await?;
                CommandOutcome::Message(format!("Deleted steering file: {name}"))
            }
            HostCommand::OpenMcpConfiguration => {
                CommandOutcome::OpenFile(self.commands.open_mcp_configuration().await?)
            }
            HostCommand::RefreshSpecs
            | HostCommand::RefreshHooks
            | HostCommand::RefreshSteering
            | HostCommand::RefreshMcp => {
                let category = command.category().ok_or_else(|| {
                    KinoError::internal(format!("{command} has no category"))
                })?;
                self.views.refresh(category).await?;
                return Ok(CommandOutcome::Refreshed(category));
            }
        };

        // File changes reach the view through the watcher too; refreshing here
        // makes the result visible before the command returns
        if let Some(category) = command.category() {
            if let Err(e) = self.views.refresh(category).await {
                tracing::warn!("[Shell] Refresh after {} failed: {}", command, e);
            }
        }
        Ok(outcome)
    }

    pub fn is_disposed(&self) -> bool {
        self.watcher.is_disposed()
    }

    /// Stops the relay and the watcher. Safe to call more than once.
    pub fn dispose(&self) {
        let relay = match self.relay.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(relay) = relay {
            relay.abort();
        }
        self.watcher.dispose();
    }
}

impl Drop for KinoShell {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn spawn_relay(
    mut changes: broadcast::Receiver<ArtifactCategory>,
    views: ArtifactViews,
    settings: SettingsService,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(category) => relay_change(category, &views, &settings).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Shell] Missed {} change signal(s), refreshing all views", skipped);
                    views.refresh_all().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("[Shell] Change relay stopped");
    })
}

async fn relay_change(category: ArtifactCategory, views: &ArtifactViews, settings: &SettingsService) {
    tracing::debug!("[Shell] {}", category);

    if category == ArtifactCategory::Settings {
        if let Err(e) = settings.reload().await {
            tracing::warn!("[Shell] Keeping previous settings: {}", e);
        }
    } else if !settings.settings().await.general.auto_refresh {
        return;
    }

    if let Err(e) = views.refresh(category).await {
        tracing::warn!("[Shell] Refresh on {} failed: {}", category, e);
    }
}
