//! Chat session store and the user/assistant turn protocol.
//!
//! The store keeps every session in memory (in creation order) together with
//! the id of the current one. A turn appends the user message, asks the
//! completion client for a reply and appends it. UI updates are published as
//! [`ChatEvent`]s on a broadcast channel; the panel renders whatever it
//! receives.
//!
//! When a [`SessionRepository`] is attached, sessions are restored with
//! [`ChatSessionStore::restore`] and written back after every state change.
//! Persistence failures are logged and never fail the operation that caused
//! them.

use chrono::SecondsFormat;
use kino_core::completion::{
    CompletionClient, CompletionRequest, NoPromptContext, PromptContextProvider,
};
use kino_core::error::{KinoError, Result};
use kino_core::event::ChatEvent;
use kino_core::secret::SecretService;
use kino_core::session::{
    ChatMessage, ChatMode, ChatSession, MessageContext, MessageRole, SessionRepository,
};
use kino_infrastructure::SettingsService;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Default)]
struct StoreState {
    sessions: Vec<ChatSession>,
    current: Option<String>,
}

impl StoreState {
    fn session_mut(&mut self, session_id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }

    fn current_mut(&mut self) -> Option<&mut ChatSession> {
        let id = self.current.clone()?;
        self.session_mut(&id)
    }
}

pub struct ChatSessionStore {
    state: RwLock<StoreState>,
    repository: Option<Arc<dyn SessionRepository>>,
    client: Arc<dyn CompletionClient>,
    secrets: Arc<dyn SecretService>,
    settings: SettingsService,
    context_provider: Arc<dyn PromptContextProvider>,
    events: broadcast::Sender<ChatEvent>,
}

impl ChatSessionStore {
    /// Creates an empty, purely in-memory store.
    pub fn new(
        client: Arc<dyn CompletionClient>,
        secrets: Arc<dyn SecretService>,
        settings: SettingsService,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(StoreState::default()),
            repository: None,
            client,
            secrets,
            settings,
            context_provider: Arc::new(NoPromptContext),
            events,
        }
    }

    /// Persists sessions through `repository`.
    pub fn with_repository(mut self, repository: Arc<dyn SessionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Supplies the spec/hook/file names sent along with each turn.
    pub fn with_context_provider(mut self, provider: Arc<dyn PromptContextProvider>) -> Self {
        self.context_provider = provider;
        self
    }

    /// Replaces the in-memory sessions with the persisted ones.
    ///
    /// No session is current afterwards. Returns the number of sessions loaded;
    /// without a repository this is always zero.
    pub async fn restore(&self) -> Result<usize> {
        let Some(repository) = &self.repository else {
            return Ok(0);
        };

        let sessions = repository.list_all().await?;
        let count = sessions.len();
        let mut state = self.state.write().await;
        state.sessions = sessions;
        state.current = None;
        tracing::info!("[Chat] Restored {} session(s)", count);
        Ok(count)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.state.read().await.sessions.clone()
    }

    pub async fn current_session(&self) -> Option<ChatSession> {
        let state = self.state.read().await;
        let id = state.current.as_deref()?;
        state.sessions.iter().find(|s| s.id == id).cloned()
    }

    pub async fn session(&self, session_id: &str) -> Option<ChatSession> {
        self.state
            .read()
            .await
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    /// Creates a session titled `Session {n+1}` and makes it current.
    pub async fn create_session(&self) -> ChatSession {
        let session = {
            let mut state = self.state.write().await;
            let session = ChatSession::new(format!("Session {}", state.sessions.len() + 1));
            state.current = Some(session.id.clone());
            state.sessions.push(session.clone());
            session
        };

        tracing::info!("[Chat] Created session {} ({})", session.title, session.id);
        self.persist(&session).await;
        session
    }

    /// Makes `session_id` the current session.
    pub async fn load_session(&self, session_id: &str) -> Result<ChatSession> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or_else(|| KinoError::not_found("Session", session_id))?;
        state.current = Some(session.id.clone());
        Ok(session)
    }

    /// Returns the current session, selecting the first one or creating a new
    /// one when none is current.
    pub async fn ensure_current(&self) -> ChatSession {
        {
            let mut state = self.state.write().await;
            if let Some(current) = state.current_mut() {
                return current.clone();
            }
            if let Some(first) = state.sessions.first().cloned() {
                state.current = Some(first.id.clone());
                return first;
            }
        }
        self.create_session().await
    }

    /// Removes a session. Deleting the current session leaves none current.
    ///
    /// Returns `false` when no session has that id.
    pub async fn delete_session(&self, session_id: &str) -> bool {
        {
            let mut state = self.state.write().await;
            let before = state.sessions.len();
            state.sessions.retain(|s| s.id != session_id);
            if state.sessions.len() == before {
                return false;
            }
            if state.current.as_deref() == Some(session_id) {
                state.current = None;
            }
        }

        if let Some(repository) = &self.repository {
            if let Err(e) = repository.delete(session_id).await {
                tracing::warn!("[Chat] Failed to delete persisted session {}: {}", session_id, e);
            }
        }
        tracing::info!("[Chat] Deleted session {}", session_id);
        true
    }

    /// Empties the current session's messages; the session itself stays.
    pub async fn clear_current(&self) -> Result<ChatSession> {
        let session = {
            let mut state = self.state.write().await;
            let current = state.current_mut().ok_or(KinoError::NoActiveSession)?;
            current.clear();
            current.clone()
        };
        self.persist(&session).await;
        Ok(session)
    }

    /// Runs one turn against `session_id` and returns the assistant message.
    ///
    /// # Errors
    ///
    /// - `KinoError::NoActiveSession` if no session is current. Nothing is
    ///   sent and no event is published.
    /// - `KinoError::NotFound` if `session_id` is unknown.
    /// - Any turn failure (missing API key, upstream, timeout, ...). The user
    ///   message stays in the session and the panel receives an error event
    ///   followed by "typing stopped".
    pub async fn send_user_turn(
        &self,
        session_id: &str,
        text: &str,
        mode: ChatMode,
        model: &str,
    ) -> Result<ChatMessage> {
        let context = self.context_provider.prompt_context().await;

        let user_message = {
            let mut state = self.state.write().await;
            if state.current.is_none() {
                return Err(KinoError::NoActiveSession);
            }
            let session = state
                .session_mut(session_id)
                .ok_or_else(|| KinoError::not_found("Session", session_id))?;

            let message = ChatMessage::new(MessageRole::User, text)
                .with_mode_and_model(mode.as_str(), model)
                .with_context(context.clone());
            session.mode = mode.as_str().to_string();
            session.model = model.to_string();
            session.push(message.clone());
            message
        };

        self.emit(ChatEvent::AddMessage {
            message: user_message,
        });
        self.emit(ChatEvent::SetTyping { typing: true });

        match self.request_completion(text, mode, model, context).await {
            Ok(reply) => {
                let assistant_message = ChatMessage::new(MessageRole::Assistant, reply)
                    .with_mode_and_model(mode.as_str(), model);
                let session = {
                    let mut state = self.state.write().await;
                    let session = state
                        .session_mut(session_id)
                        .ok_or_else(|| KinoError::not_found("Session", session_id))?;
                    session.push(assistant_message.clone());
                    session.clone()
                };

                self.emit(ChatEvent::AddMessage {
                    message: assistant_message.clone(),
                });
                self.emit(ChatEvent::SetTyping { typing: false });
                self.persist(&session).await;
                Ok(assistant_message)
            }
            Err(e) => {
                tracing::error!("[Chat] Turn failed in session {}: {}", session_id, e);
                self.emit(ChatEvent::Error {
                    message: format!("Error: {e}"),
                });
                self.emit(ChatEvent::SetTyping { typing: false });
                if let Some(session) = self.session(session_id).await {
                    self.persist(&session).await;
                }
                Err(e)
            }
        }
    }

    async fn request_completion(
        &self,
        text: &str,
        mode: ChatMode,
        model: &str,
        context: MessageContext,
    ) -> Result<String> {
        let settings = self.settings.settings().await;
        let provider = settings.llm.default_provider.as_str();
        let api_key = self
            .secrets
            .api_key(provider)
            .await?
            .ok_or_else(|| KinoError::missing_credential(provider))?;

        let timeout = settings.llm.request_timeout();
        let request = CompletionRequest {
            text: text.to_string(),
            mode,
            context,
            api_key,
            model: model.to_string(),
            timeout,
        };

        tracing::debug!("[Chat] Requesting completion from {} ({})", provider, model);
        match tokio::time::timeout(timeout, self.client.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(KinoError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    /// Renders a session as a Markdown transcript.
    pub async fn export_session(&self, session_id: &str) -> Result<String> {
        let session = self
            .session(session_id)
            .await
            .ok_or_else(|| KinoError::not_found("Session", session_id))?;
        Ok(render_markdown(&session))
    }

    fn emit(&self, event: ChatEvent) {
        // No panel attached is fine
        let _ = self.events.send(event);
    }

    async fn persist(&self, session: &ChatSession) {
        if let Some(repository) = &self.repository {
            if let Err(e) = repository.save(session).await {
                tracing::warn!("[Chat] Failed to persist session {}: {}", session.id, e);
            }
        }
    }
}

fn render_markdown(session: &ChatSession) -> String {
    let mut out = format!(
        "# {}\n\n- Created: {}\n- Mode: {}\n- Model: {}\n",
        session.title,
        session.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        session.mode,
        session.model
    );

    for message in &session.messages {
        let role = match message.role {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
            MessageRole::System => "System",
        };
        out.push_str(&format!(
            "\n## {} ({})\n\n{}\n",
            role,
            message.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            message.content.trim_end()
        ));
    }
    out
}
