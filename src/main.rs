//! toolrelay — dispatch LLM tool calls from the command line.
//!
//! Usage:
//!   toolrelay declarations         Print the tool declarations as JSON
//!   toolrelay check                Validate the registry against the declarations
//!   toolrelay summarize <FILE|->   Describe a JSON array of tool calls
//!   toolrelay dispatch <FILE|->    Run a JSON array of tool calls
//!   toolrelay init                 Write a default config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use toolrelay::config::{self, RelayConfig};
use toolrelay::summary::summarize;
use toolrelay::tools::{tool_declarations, ToolDispatcher, ToolRegistry};
use toolrelay::types::ToolCall;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "toolrelay")]
#[command(version)]
#[command(about = "Function-calling dispatch layer for LLM agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file.
    #[arg(long)]
    config: Option<String>,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tool declarations advertised to the model.
    Declarations,

    /// Check that every declared tool has exactly one handler.
    Check,

    /// Print a one-line summary of a JSON array of tool calls.
    Summarize {
        /// File with the calls, or `-` for stdin.
        input: String,
    },

    /// Dispatch a JSON array of tool calls in order and print the envelopes.
    Dispatch {
        /// File with the calls, or `-` for stdin.
        input: String,

        /// Re-run handlers that fail, using the configured retry policy.
        #[arg(long)]
        retry: bool,
    },

    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = config::config_path(cli.config.as_deref());
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Declarations => cmd_declarations(),
        Commands::Check => cmd_check(&cfg),
        Commands::Summarize { input } => cmd_summarize(&input).await,
        Commands::Dispatch { input, retry } => cmd_dispatch(&cfg, &input, retry).await,
        Commands::Init { force } => cmd_init(&config_path, force),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_declarations() -> Result<()> {
    let json = serde_json::to_string_pretty(&tool_declarations())
        .context("Failed to serialize tool declarations")?;
    println!("{}", json);
    Ok(())
}

fn cmd_check(cfg: &RelayConfig) -> Result<()> {
    let registry = ToolRegistry::standard(cfg)?;
    for decl in registry.declarations() {
        println!("  {} {}", "ok".green().bold(), decl.name);
    }
    println!("{} {} tools registered", ">>>".green().bold(), registry.len());
    Ok(())
}

async fn cmd_summarize(input: &str) -> Result<()> {
    let calls = read_calls(input).await?;
    println!("{}", summarize(&calls));
    Ok(())
}

async fn cmd_dispatch(cfg: &RelayConfig, input: &str, retry: bool) -> Result<()> {
    let calls = read_calls(input).await?;
    let dispatcher = ToolDispatcher::new(Arc::new(ToolRegistry::standard(cfg)?));

    let summary = summarize(&calls);
    if !summary.is_empty() {
        info!("Calling {}", summary);
    }

    let mut envelopes = Vec::with_capacity(calls.len());
    for call in &calls {
        let result = if retry {
            dispatcher.dispatch_with_retry(call, &cfg.retry).await
        } else {
            dispatcher.dispatch(call).await
        };

        match result {
            Ok(env) => envelopes.push(env),
            Err(e) => {
                error!("Dispatch aborted: {}", e);
                return Err(e.into());
            }
        }
    }

    let json = serde_json::to_string_pretty(&envelopes).context("Failed to serialize envelopes")?;
    println!("{}", json);
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    config::init_config(path, force)?;
    println!("{} Wrote {}", ">>>".green().bold(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a JSON array of tool calls from a file, or stdin for `-`.
async fn read_calls(input: &str) -> Result<Vec<ToolCall>> {
    let raw = if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read tool calls from stdin")?;
        buf
    } else {
        let path = config::expand_path(input);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read tool calls from {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Tool calls must be a JSON array of {name, args} objects")
}
