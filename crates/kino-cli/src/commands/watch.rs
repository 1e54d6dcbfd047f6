use super::utils::activate;
use anyhow::Result;
use std::path::Path;
use tokio::sync::broadcast::error::RecvError;

pub async fn run(project_root: &Path) -> Result<()> {
    let shell = activate(project_root).await?;
    let mut changes = shell.subscribe_changes();
    println!("Watching {} (Ctrl-C to stop)", shell.paths().kino_dir().display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            change = changes.recv() => match change {
                Ok(category) => println!("{category}"),
                Err(RecvError::Lagged(skipped)) => eprintln!("missed {skipped} signal(s)"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    shell.dispose();
    Ok(())
}
