//! # NeXO - Ontology Network Viewer
//!
//! The client binary for the NeXO ontology viewer.
//!
//! This application provides:
//! - A data client for the read-only NeXO data service
//! - A fetch runtime driving the visual-state engine
//! - CLI commands and an interactive explore session
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      apps/nexo (THE BINARY)                     │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐    │
//! │  │   CLI       │    │   Runtime   │    │   Data Client    │    │
//! │  │  (clap)     │───▶│  (tokio)    │───▶│   (reqwest)      │    │
//! │  └─────────────┘    └──────┬──────┘    └──────────────────┘    │
//! │                            │ commands / completions            │
//! │                            ▼                                   │
//! │                    ┌───────────────┐                           │
//! │                    │   nexo-core   │                           │
//! │                    │  (THE LOGIC)  │                           │
//! │                    └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! nexo networks
//! nexo search protein kinase
//! nexo path GO:0005737 --network "GO CC"
//! nexo --url http://localhost:8080 explore
//! ```

use clap::Parser;
use nexo::cli;
use nexo::settings::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let settings = cli.resolve_settings();

    // NEXO_LOG_FORMAT=json (or log_format in settings) enables machine-parseable output.
    let log_format = settings.as_ref().map(|s| s.log_format).unwrap_or_default();
    init_tracing(log_format, cli.verbose);

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::execute(cli, settings).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr; stdout carries command output.
fn init_tracing(format: LogFormat, verbose: bool) {
    let default_filter = if verbose {
        "nexo=debug,nexo_core=debug"
    } else {
        "nexo=info,nexo_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
