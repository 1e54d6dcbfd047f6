use super::utils::activate;
use anyhow::{Context, Result};
use kino_core::event::ChatEvent;
use kino_core::secret::SecretService;
use kino_core::session::ChatMode;
use kino_infrastructure::{KinoPaths, SecretServiceImpl, SettingsService};
use std::path::Path;

pub async fn send(
    project_root: &Path,
    session: Option<String>,
    mode: &str,
    model: &str,
    message: &str,
) -> Result<()> {
    let shell = activate(project_root).await?;
    let chat = shell.chat();

    let session = match session {
        Some(id) => chat.load_session(&id).await?,
        None => chat.ensure_current().await,
    };

    let mut events = chat.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ChatEvent::SetTyping { typing: true } => eprintln!("…"),
                ChatEvent::Error { message } => eprintln!("{message}"),
                _ => {}
            }
        }
    });

    let result = chat
        .send_user_turn(&session.id, message, ChatMode::parse(mode), model)
        .await;
    printer.abort();

    let reply = result.with_context(|| format!("Chat turn failed in {}", session.title))?;
    println!("{}", reply.content);
    Ok(())
}

pub async fn list(project_root: &Path) -> Result<()> {
    let shell = activate(project_root).await?;
    let sessions = shell.chat().sessions().await;
    if sessions.is_empty() {
        println!("No chat sessions");
    }
    for session in sessions {
        println!(
            "{}  {}  {} message(s)  updated {}",
            session.id,
            session.title,
            session.messages.len(),
            session.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub async fn export(project_root: &Path, session_id: &str) -> Result<()> {
    let shell = activate(project_root).await?;
    let markdown = shell.chat().export_session(session_id).await?;
    print!("{markdown}");
    Ok(())
}

pub async fn set_key(project_root: &Path, provider: Option<String>, key: &str) -> Result<()> {
    let provider = match provider {
        Some(provider) => provider,
        None => {
            let settings = SettingsService::load(&KinoPaths::for_project(project_root))?;
            settings.settings().await.llm.default_provider
        }
    };

    let secrets = SecretServiceImpl::new()?;
    secrets
        .set_api_key(&provider, key)
        .await
        .with_context(|| format!("Failed to store the {provider} API key"))?;
    println!("✓ Stored API key for {provider}");
    Ok(())
}
