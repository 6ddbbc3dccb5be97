//! # Program Relay CLI (`relay`)
//!
//! ## Usage
//!
//! ```bash
//! relay --config ./config/relay.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `relay serve` | Start the HTTP relay |
//! | `relay context "<query>" --document <pdf>` | Print the context selected from a PDF |
//! | `relay prompt "<query>" [--document <pdf>]` | Print the prompt that would be sent |
//! | `relay ask "<query>" [--document <pdf>]` | Send one query upstream and print the answer |
//!
//! The upstream key is read from `GEMINI_API_KEY` or `VITE_GEMINI_API_KEY`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use program_relay::{commands, config, server};

/// Program Relay: forwards career queries to Gemini, grounded in an uploaded PDF.
#[derive(Parser)]
#[command(name = "relay", version)]
struct Cli {
    /// Path to configuration file (TOML). Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "./config/relay.toml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Override `[server].bind` (e.g. `0.0.0.0:3001`).
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the context snippet selected from a PDF for a query.
    Context {
        query: String,
        /// PDF to select context from.
        #[arg(long)]
        document: PathBuf,
    },

    /// Print the prompt that would be sent upstream.
    Prompt {
        query: String,
        /// Optional PDF to ground the prompt in.
        #[arg(long)]
        document: Option<PathBuf>,
    },

    /// Send a single query upstream and print the answer.
    Ask {
        query: String,
        /// Optional PDF to ground the prompt in.
        #[arg(long)]
        document: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "program_relay=debug,relay=debug,tower_http=debug"
    } else {
        "program_relay=info,relay=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            server::run_server(&cfg).await?;
        }
        Commands::Context { query, document } => {
            commands::run_context(&cfg, &query, &document)?;
        }
        Commands::Prompt { query, document } => {
            commands::run_prompt(&cfg, &query, document.as_deref())?;
        }
        Commands::Ask { query, document } => {
            commands::run_ask(&cfg, &query, document.as_deref()).await?;
        }
    }

    Ok(())
}
