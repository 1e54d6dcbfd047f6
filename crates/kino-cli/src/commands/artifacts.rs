use super::utils::{activate, print_outcome};
use crate::Document;
use anyhow::{Context, Result};
use kino_application::HostCommand;
use kino_infrastructure::KinoPaths;
use std::path::Path;

pub fn init(project_root: &Path) -> Result<()> {
    let paths = KinoPaths::for_project(project_root);
    paths
        .ensure_layout()
        .context("Failed to create the .kino layout")?;
    println!("✓ Initialized {}", paths.kino_dir().display());
    Ok(())
}

async fn run(project_root: &Path, command: HostCommand, name: &str) -> Result<()> {
    let shell = activate(project_root).await?;
    let outcome = shell
        .execute(command, Some(name))
        .await
        .with_context(|| format!("{command} failed for '{name}'"))?;
    print_outcome(&outcome);
    Ok(())
}

pub async fn create_spec(project_root: &Path, name: &str) -> Result<()> {
    run(project_root, HostCommand::CreateNewSpec, name).await
}

pub async fn delete_spec(project_root: &Path, name: &str) -> Result<()> {
    run(project_root, HostCommand::DeleteSpec, name).await
}

pub async fn open_spec(project_root: &Path, name: &str, document: Document) -> Result<()> {
    let command = match document {
        Document::Requirements => HostCommand::OpenSpecRequirements,
        Document::Design => HostCommand::OpenSpecDesign,
        Document::Tasks => HostCommand::OpenSpecTasks,
    };
    run(project_root, command, name).await
}

pub async fn create_hook(project_root: &Path, name: &str) -> Result<()> {
    run(project_root, HostCommand::CreateHook, name).await
}

pub async fn delete_hook(project_root: &Path, name: &str) -> Result<()> {
    run(project_root, HostCommand::DeleteHook, name).await
}

pub async fn run_hook(project_root: &Path, name: &str) -> Result<()> {
    run(project_root, HostCommand::ExecuteHook, name).await
}

pub async fn create_steering(project_root: &Path, name: &str) -> Result<()> {
    run(project_root, HostCommand::CreateSteeringFile, name).await
}

pub async fn delete_steering(project_root: &Path, name: &str) -> Result<()> {
    run(project_root, HostCommand::DeleteSteeringFile, name).await
}
