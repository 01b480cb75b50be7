//! CLI module for llm-console
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `infer` - Submit one prompt and print the response
//! - `logs` - Show recent inference history
//! - `metrics` - Show per-model latency metrics
//! - `health` - Show proxy backend health
//! - `watch` - Live dashboard with background refresh and prompt input
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Ask the accurate model
//! llm-console infer "Explain retries" --strategy accurate
//!
//! # Live dashboard against a remote proxy
//! llm-console watch --api-url http://proxy.internal:8000
//! ```

pub mod completions;
pub mod config;
pub mod health;
pub mod history;
pub mod infer;
pub mod output;
pub mod setup;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::api::Strategy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// llm-console - terminal client for the LLM proxy
#[derive(Parser, Debug)]
#[command(
    name = "llm-console",
    version,
    about = "Submit prompts to the LLM proxy and watch its logs and latency"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a prompt and print the response
    Infer(InferArgs),
    /// Show recent inference logs
    Logs(LogsArgs),
    /// Show latency metrics per model
    Metrics(MetricsArgs),
    /// Show proxy backend health
    Health(HealthArgs),
    /// Live dashboard refreshed on a timer
    Watch(WatchArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that talks to the proxy.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "llm-console.toml")]
    pub config: PathBuf,

    /// Override proxy base URL
    #[arg(long, env = "LLM_CONSOLE_API_URL")]
    pub api_url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LLM_CONSOLE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct InferArgs {
    /// Prompt text
    pub prompt: String,

    /// Model strategy (fast, accurate)
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Number of rows to fetch (defaults to polling.log_limit)
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Refresh interval in milliseconds (defaults to polling.interval_ms)
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Initial model strategy (fast, accurate)
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "llm-console.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
