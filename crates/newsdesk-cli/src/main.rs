use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use newsdesk_api::ApiClient;
use newsdesk_core::DeskService;
use newsdesk_storage::{KeyValueStore, MemoryStore, SqliteStore};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{Config, StorageBackend, StorageSettings};

#[derive(Debug, Parser)]
#[command(name = "newsdesk", version, about = "Browse newsroom desks and pick the current one")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, short, default_value = "newsdesk.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Locale used to look up label overrides.
    #[arg(long, default_value = "en")]
    locale: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List desks with their resolved member counts.
    Desks,
    /// List the resolved members of a desk.
    Members { desk_id: String },
    /// List the desks a user belongs to, as reported by the server.
    UserDesks { user_id: String },
    /// Show or change the current desk.
    Current {
        #[command(subcommand)]
        action: Option<CurrentAction>,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Subcommand)]
enum CurrentAction {
    /// Show the current desk from the loaded registry.
    Show,
    /// Select a desk by id.
    Set { desk_id: String },
    /// Clear the selection.
    Clear,
    /// Fetch the current desk from the server.
    Fetch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    init_tracing(&config.log.level, cli.json_logs);

    let labels = commands::Labels::new(&config.ui, &cli.locale);
    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Command::Desks => commands::list_desks(&connect(&config).await?, &labels).await,
        Command::Members { desk_id } => {
            commands::list_members(&connect(&config).await?, &labels, &desk_id).await
        }
        Command::UserDesks { user_id } => {
            commands::user_desks(&connect(&config).await?, &labels, &user_id).await
        }
        Command::Current { action } => {
            let service = connect(&config).await?;
            match action.unwrap_or(CurrentAction::Show) {
                CurrentAction::Show => commands::show_current(&service, &labels).await,
                CurrentAction::Set { desk_id } => commands::set_current(&service, &desk_id).await,
                CurrentAction::Clear => commands::clear_current(&service).await,
                CurrentAction::Fetch => commands::fetch_current(&service, &labels).await,
            }
        }
    }
}

/// API client and storage are only set up for commands that talk to the server.
async fn connect(config: &Config) -> Result<DeskService> {
    let mut client = ApiClient::new(&config.api.url)
        .with_context(|| format!("Invalid API url {:?}", config.api.url))?
        .with_timeout(config.api.timeout());
    if let Some(token) = &config.api.token {
        client = client.with_token(token.clone());
    }
    let store = open_store(&config.storage).await?;
    Ok(DeskService::new(Arc::new(client), store).with_page_size(config.api.page_size))
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_store(settings: &StorageSettings) -> Result<Arc<dyn KeyValueStore>> {
    match settings.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, the current desk will not persist");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            let store = SqliteStore::open(&settings.path)
                .await
                .with_context(|| format!("Failed to open storage at {:?}", settings.path))?;
            Ok(Arc::new(store))
        }
    }
}
