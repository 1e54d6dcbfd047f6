use kino_core::config::LogLevel;
use kino_infrastructure::{KinoPaths, SettingsService};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "kino.log";

/// Installs the global subscriber: stderr plus a daily file under the user
/// config dir. `RUST_LOG` wins over `general.logLevel`.
///
/// The returned guard flushes the file writer when dropped.
pub async fn init(project_root: &Path) -> Option<WorkerGuard> {
    let level = configured_level(project_root).await;
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let (file_layer, guard) = match KinoPaths::logs_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("File logging disabled: {e}");
            (None, None)
        }
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }
    guard
}

async fn configured_level(project_root: &Path) -> LogLevel {
    match SettingsService::load(&KinoPaths::for_project(project_root)) {
        Ok(service) => service.settings().await.general.log_level,
        Err(_) => LogLevel::default(),
    }
}
