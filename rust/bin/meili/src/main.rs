//! `meili`, a command-line client for Meilisearch.
//!
//! Manages named server contexts, waits on tasks, and signs tenant tokens.
//! Think of it as a tiny `kubectl` for a search instance.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Meilisearch CLI tool.
#[derive(Parser, Debug)]
#[command(name = "meili", about = "Meilisearch CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.meili/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage server contexts.
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Check server health.
    Health,

    /// Show server version.
    Version,

    /// Index management.
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },

    /// Inspect and wait on tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Document operations.
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },

    /// Search an index.
    Search {
        /// Index uid.
        index: String,
        /// Query string.
        q: String,
        #[arg(long)]
        limit: Option<usize>,
        /// Filter expression, e.g. "genre = action".
        #[arg(long)]
        filter: Option<String>,
    },

    /// Tenant tokens.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context.
    Create {
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[derive(Subcommand, Debug)]
enum IndexAction {
    List {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },
    Create {
        uid: String,
        #[arg(long)]
        primary_key: Option<String>,
        /// Block until the task finishes.
        #[arg(long)]
        wait: bool,
    },
    Delete {
        uid: String,
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TaskAction {
    Get { uid: u64 },
    List {
        #[arg(long)]
        limit: Option<u32>,
        /// Filter by status (repeatable).
        #[arg(long = "status")]
        statuses: Vec<String>,
    },
    /// Poll until the task is succeeded, failed or canceled.
    Wait {
        uid: u64,
        #[arg(long, default_value_t = meili_client::DEFAULT_WAIT_TIMEOUT_MS)]
        timeout_ms: u64,
        #[arg(long, default_value_t = meili_client::DEFAULT_WAIT_INTERVAL_MS)]
        interval_ms: u64,
    },
}

#[derive(Subcommand, Debug)]
enum DocsAction {
    /// Add documents from a JSON file.
    Add {
        index: String,
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        #[arg(long)]
        primary_key: Option<String>,
        /// Send in chunks of this many documents.
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Sign a tenant token locally.
    Generate {
        /// JSON rules object/array, or comma-separated index list.
        #[arg(long, default_value = "*")]
        rules: String,
        /// Lifetime in seconds (default: never expires).
        #[arg(long)]
        expires_in_secs: Option<i64>,
        /// Signing key (default: current context's key).
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);
    let json_output = cli.output == "json";

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create { name, url, api_key } => {
                commands::context::create(&name, &url, api_key.as_deref(), &config_path)?;
            }
            ContextAction::List => {
                commands::context::list(&config_path)?;
            }
            ContextAction::Set { name, url, api_key } => {
                commands::context::set(&name, url.as_deref(), api_key.as_deref(), &config_path)?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&name, &config_path)?;
            }
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => {
                commands::context::use_context(&name, &config_path)?;
            }
        },

        Commands::Health => {
            commands::server::health(&config_path).await?;
        }

        Commands::Version => {
            commands::server::version(json_output, &config_path).await?;
        }

        Commands::Index { action } => match action {
            IndexAction::List { limit, offset } => {
                commands::index::list(limit, offset, json_output, &config_path).await?;
            }
            IndexAction::Create { uid, primary_key, wait } => {
                commands::index::create(&uid, primary_key.as_deref(), wait, json_output, &config_path)
                    .await?;
            }
            IndexAction::Delete { uid, wait } => {
                commands::index::delete(&uid, wait, json_output, &config_path).await?;
            }
        },

        Commands::Task { action } => match action {
            TaskAction::Get { uid } => {
                commands::task::get(uid, json_output, &config_path).await?;
            }
            TaskAction::List { limit, statuses } => {
                commands::task::list(limit, &statuses, json_output, &config_path).await?;
            }
            TaskAction::Wait { uid, timeout_ms, interval_ms } => {
                commands::task::wait(uid, timeout_ms, interval_ms, json_output, &config_path).await?;
            }
        },

        Commands::Docs { action } => match action {
            DocsAction::Add { index, file, primary_key, batch_size, wait } => {
                commands::docs::add(
                    &index,
                    &file,
                    primary_key.as_deref(),
                    batch_size,
                    wait,
                    json_output,
                    &config_path,
                )
                .await?;
            }
        },

        Commands::Search { index, q, limit, filter } => {
            commands::docs::search(&index, &q, limit, filter.as_deref(), json_output, &config_path)
                .await?;
        }

        Commands::Token { action } => match action {
            TokenAction::Generate { rules, expires_in_secs, api_key } => {
                commands::token::generate(&rules, expires_in_secs, api_key.as_deref(), &config_path)?;
            }
        },
    }

    Ok(())
}
