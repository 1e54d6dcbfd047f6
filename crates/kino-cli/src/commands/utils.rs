use anyhow::{Context, Result};
use kino_application::{CommandOutcome, KinoShell};
use kino_infrastructure::paths::KINO_DIR_NAME;
use std::env;
use std::path::{Path, PathBuf};

/// Finds the project root.
///
/// An explicit `--project` wins. Otherwise the nearest ancestor of the current
/// directory that contains `.kino` is used, falling back to the current
/// directory itself.
pub fn resolve_project_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }

    let cwd = env::current_dir().context("Failed to get current directory")?;
    let found = cwd
        .ancestors()
        .find(|dir| dir.join(KINO_DIR_NAME).is_dir())
        .map(Path::to_path_buf);
    Ok(found.unwrap_or(cwd))
}

pub async fn activate(project_root: &Path) -> Result<KinoShell> {
    KinoShell::activate(project_root)
        .await
        .with_context(|| format!("Failed to activate Kino in {}", project_root.display()))
}

pub fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::OpenFile(path) => println!("✓ {}", path.display()),
        CommandOutcome::Message(message) => println!("{message}"),
        CommandOutcome::ShowChat { session_id } => println!("✓ Chat session {session_id}"),
        CommandOutcome::Refreshed(category) => println!("✓ Refreshed {}", category.dir_name()),
    }
}
