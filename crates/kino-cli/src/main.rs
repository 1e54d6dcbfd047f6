use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "kino")]
#[command(about = "Kino CLI - project specs, hooks, steering and chat", long_about = None)]
struct Cli {
    /// Project root (defaults to the nearest directory containing `.kino`)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the `.kino` folder layout
    Init,
    /// Print the sidebar views
    Tree {
        #[arg(value_enum)]
        view: Option<View>,
        /// Print nodes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage specs
    Spec {
        #[command(subcommand)]
        action: SpecAction,
    },
    /// Manage hooks
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },
    /// Manage steering files
    Steering {
        #[command(subcommand)]
        action: ArtifactAction,
    },
    /// Send one chat turn
    Chat {
        /// Session id (defaults to the first session, creating one if needed)
        #[arg(long)]
        session: Option<String>,
        #[arg(long, default_value = "chat")]
        mode: String,
        #[arg(long, default_value = kino_core::session::DEFAULT_MODEL)]
        model: String,
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// List chat sessions
    Sessions,
    /// Print a chat session as Markdown
    Export { session: String },
    /// Store the API key of a completion provider
    SetKey {
        /// Provider name (defaults to `llm.defaultProvider`)
        #[arg(long)]
        provider: Option<String>,
        key: String,
    },
    /// Print change signals until interrupted
    Watch,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum View {
    Specs,
    Hooks,
    Steering,
    Mcp,
}

#[derive(Subcommand)]
enum SpecAction {
    Create { name: String },
    Delete { name: String },
    /// Print the path of one spec document
    Open {
        name: String,
        #[arg(value_enum, default_value = "requirements")]
        document: Document,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Document {
    Requirements,
    Design,
    Tasks,
}

#[derive(Subcommand)]
enum HookAction {
    Create { name: String },
    Delete { name: String },
    Run { name: String },
}

#[derive(Subcommand)]
enum ArtifactAction {
    Create { name: String },
    Delete { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_root = commands::utils::resolve_project_root(cli.project)?;
    let _log_guard = logging::init(&project_root).await;

    match cli.command {
        Commands::Init => commands::artifacts::init(&project_root)?,
        Commands::Tree { view, json } => commands::tree::print(&project_root, view, json).await?,
        Commands::Spec { action } => match action {
            SpecAction::Create { name } => commands::artifacts::create_spec(&project_root, &name).await?,
            SpecAction::Delete { name } => commands::artifacts::delete_spec(&project_root, &name).await?,
            SpecAction::Open { name, document } => {
                commands::artifacts::open_spec(&project_root, &name, document).await?
            }
        },
        Commands::Hook { action } => match action {
            HookAction::Create { name } => commands::artifacts::create_hook(&project_root, &name).await?,
            HookAction::Delete { name } => commands::artifacts::delete_hook(&project_root, &name).await?,
            HookAction::Run { name } => commands::artifacts::run_hook(&project_root, &name).await?,
        },
        Commands::Steering { action } => match action {
            ArtifactAction::Create { name } => {
                commands::artifacts::create_steering(&project_root, &name).await?
            }
            ArtifactAction::Delete { name } => {
                commands::artifacts::delete_steering(&project_root, &name).await?
            }
        },
        Commands::Chat {
            session,
            mode,
            model,
            message,
        } => {
            commands::chat::send(&project_root, session, &mode, &model, &message.join(" ")).await?
        }
        Commands::Sessions => commands::chat::list(&project_root).await?,
        Commands::Export { session } => commands::chat::export(&project_root, &session).await?,
        Commands::SetKey { provider, key } => {
            commands::chat::set_key(&project_root, provider, &key).await?
        }
        Commands::Watch => commands::watch::run(&project_root).await?,
    }

    Ok(())
}
