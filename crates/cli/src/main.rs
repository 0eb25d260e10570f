//! mcpilot CLI — the main entry point.
//!
//! Commands:
//! - `chat`     — Interactive query loop
//! - `ask`      — Answer a single query
//! - `catalog`  — Show the registry's tools, resources and prompts
//! - `init`     — Write a starter config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "mcpilot",
    about = "mcpilot — route natural-language queries to MCP capabilities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./mcpilot.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Chat,

    /// Answer one query and exit
    Ask {
        /// The query text
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },

    /// Discover and print the registry's capabilities
    Catalog,

    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Chat => commands::chat::run(config_path).await?,
        Commands::Ask { query } => commands::ask::run(config_path, &query.join(" ")).await?,
        Commands::Catalog => commands::catalog::run(config_path).await?,
        Commands::Init { force } => commands::init::run(config_path, force)?,
    }

    Ok(())
}
