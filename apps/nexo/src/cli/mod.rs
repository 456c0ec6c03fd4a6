//! # NeXO CLI Module
//!
//! This module implements the CLI interface for the NeXO viewer client.
//!
//! ## Available Commands
//!
//! - `networks` - List configured networks
//! - `search` - Search terms or genes and show snippets
//! - `path` - Show the path overlay of a node
//! - `details` - Show the detail panel of a node
//! - `explore` - Interactive session over stdin

mod commands;

use crate::client::NexoClient;
use crate::settings::Settings;
use clap::{Parser, Subcommand};
use nexo_core::NexoError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// NeXO - ontology network viewer
///
/// Explores the NeXO ontology and its GO networks from the terminal: path
/// overlays, search snippets and term details.
#[derive(Parser, Debug)]
#[command(name = "nexo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data service base URL
    #[arg(short = 'u', long, global = true)]
    pub url: Option<String>,

    /// Local application configuration (JSON); fetched from the service when omitted
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(short = 'S', long, global = true)]
    pub settings: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configured networks
    Networks,

    /// Search terms (or genes) and highlight the matches
    Search {
        /// Query words
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Search gene names instead of terms
        #[arg(short, long)]
        genes: bool,

        /// Network to search in (default network when omitted)
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Show the path overlay from a node to the root
    Path {
        /// Node ID
        node: String,

        /// Network the node belongs to
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Show the detail panel of a node
    Details {
        /// Node ID
        node: String,

        /// Network the node belongs to
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Start an interactive session (commands on stdin)
    Explore {
        /// Network to start on
        #[arg(short, long)]
        network: Option<String>,
    },
}

impl Cli {
    /// Resolve settings: file, then environment, then flags.
    pub fn resolve_settings(&self) -> Result<Settings, NexoError> {
        let mut settings = Settings::load(self.settings.as_deref())?.with_env();
        if let Some(url) = &self.url {
            settings.base_url.clone_from(url);
        }
        if let Some(config) = &self.config {
            settings.config = Some(config.clone());
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout_secs = timeout;
        }
        Ok(settings)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli, settings: Settings) -> Result<(), NexoError> {
    let json_mode = cli.json_mode;
    let client = NexoClient::new(&settings.base_url)
        .map_err(|e| NexoError::InvalidConfig(e.to_string()))?;
    let config = load_app_config(&settings, &client).await?;

    match cli.command {
        Some(Commands::Search {
            query,
            genes,
            network,
        }) => {
            let mut runtime = open_runtime(&config, client, &settings, network.as_deref()).await?;
            cmd_search(&mut runtime, &query.join(" "), genes, json_mode).await
        }
        Some(Commands::Path { node, network }) => {
            let mut runtime = open_runtime(&config, client, &settings, network.as_deref()).await?;
            cmd_path(&mut runtime, &node, json_mode).await
        }
        Some(Commands::Details { node, network }) => {
            let mut runtime = open_runtime(&config, client, &settings, network.as_deref()).await?;
            cmd_details(&mut runtime, &node, json_mode).await
        }
        Some(Commands::Explore { network }) => {
            let mut runtime = open_runtime(&config, client, &settings, network.as_deref()).await?;
            cmd_explore(&mut runtime, json_mode).await
        }
        Some(Commands::Networks) | None => cmd_networks(&config, json_mode),
    }
}
