//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::client::NexoClient;
use crate::render::TerminalRenderer;
use crate::runtime::Runtime;
use crate::settings::Settings;
use nexo_core::details::{DetailContent, DetailValue, GeneTable};
use nexo_core::primitives::NO_MATCH;
use nexo_core::{
    AppConfig, DetailPanel, FetchFailure, LoadState, NetworkId, NexoError, NodeId, SearchPanel,
    Session, SessionOptions, SessionStatus, Subnetwork,
};
use serde::Serialize;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Runtime used by every command that talks to the data service.
pub type ViewerRuntime = Runtime<TerminalRenderer>;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum application configuration size (10 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Read and validate a local application configuration.
pub fn read_app_config(path: &Path) -> Result<AppConfig, NexoError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        NexoError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(NexoError::InvalidConfig(format!(
            "Config file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_CONFIG_FILE_SIZE
        )));
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        NexoError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    AppConfig::from_json(&raw)
}

/// Load the application configuration from disk or the data service.
pub async fn load_app_config(settings: &Settings, client: &NexoClient) -> Result<AppConfig, NexoError> {
    match &settings.config {
        Some(path) => read_app_config(path),
        None => client.fetch_config().await,
    }
}

// =============================================================================
// SESSION STARTUP
// =============================================================================

/// Start a session, wait for the default network and optionally switch.
pub async fn open_runtime(
    config: &AppConfig,
    client: NexoClient,
    settings: &Settings,
    network: Option<&str>,
) -> Result<ViewerRuntime, NexoError> {
    let options = SessionOptions {
        max_retries: settings.max_retries,
    };
    let session = Session::new(config, TerminalRenderer::new(), options)?;
    let mut runtime = Runtime::new(session, client, settings.request_timeout());
    runtime.settle().await;

    if let Some(name) = network {
        runtime.session_mut().switch_network(&NetworkId::new(name))?;
        runtime.settle().await;
    }

    ensure_loaded(runtime.session_mut())?;
    Ok(runtime)
}

/// Fail when the active network did not load, reporting why.
fn ensure_loaded(session: &mut Session<TerminalRenderer>) -> Result<(), NexoError> {
    let status = session.status();
    if status.load == Some(LoadState::Loaded) {
        return Ok(());
    }

    let reason = session
        .take_notices()
        .into_iter()
        .map(|notice| notice.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    let network = status.active.map(|id| id.to_string()).unwrap_or_default();
    Err(NexoError::Fetch(FetchFailure::Network(format!(
        "network '{}' not loaded: {}",
        network, reason
    ))))
}

// =============================================================================
// NETWORKS COMMAND
// =============================================================================

#[derive(Serialize)]
struct NetworkRow<'a> {
    name: &'a str,
    network_data: &'a str,
    default: bool,
}

/// List configured networks.
pub fn cmd_networks(config: &AppConfig, json_mode: bool) -> Result<(), NexoError> {
    let default = config.default_network().map(|network| network.name.clone());
    let rows: Vec<NetworkRow<'_>> = config
        .networks
        .iter()
        .map(|network| NetworkRow {
            name: network.name.as_str(),
            network_data: &network.network_data,
            default: Some(&network.name) == default.as_ref(),
        })
        .collect();

    if json_mode {
        print_json(&rows);
        return Ok(());
    }

    println!("NeXO Networks");
    println!("=============");
    for row in &rows {
        let marker = if row.default { "*" } else { " " };
        println!("{} {:<20} {}", marker, row.name, row.network_data);
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Run a search and print the result panel.
pub async fn cmd_search(
    runtime: &mut ViewerRuntime,
    query: &str,
    genes: bool,
    json_mode: bool,
) -> Result<(), NexoError> {
    runtime.session_mut().search(query, genes);
    runtime.settle().await;

    print_search(runtime.session().search_panel(), json_mode);
    print_notices(runtime.session_mut());
    Ok(())
}

fn print_search(panel: &SearchPanel, json_mode: bool) {
    if json_mode {
        print_json(panel);
        return;
    }

    match panel {
        SearchPanel::Results { query, rows } => {
            println!("Results for '{}' ({})", query, rows.len());
            println!();
            for row in rows {
                println!("{}  {}", row.node_id, row.label.as_deref().unwrap_or(""));
                for snippet in &row.snippets {
                    println!("    {}: {}", snippet.field, snippet.excerpt);
                }
            }
        }
        SearchPanel::NoMatch { .. } => println!("{}", NO_MATCH),
        SearchPanel::Failed { query, message } => {
            println!("Search for '{}' failed: {}", query, message);
        }
        SearchPanel::Idle | SearchPanel::Pending { .. } => println!("No search results"),
    }
}

// =============================================================================
// PATH COMMAND
// =============================================================================

/// Click a node and print the resulting view.
pub async fn cmd_path(runtime: &mut ViewerRuntime, node: &str, json_mode: bool) -> Result<(), NexoError> {
    runtime.session_mut().node_clicked(&NodeId::new(node))?;
    runtime.settle().await;

    print_status(&runtime.session().status(), json_mode);
    print_notices(runtime.session_mut());
    Ok(())
}

fn print_status(status: &SessionStatus, json_mode: bool) {
    if json_mode {
        print_json(status);
        return;
    }

    let network = status.active.as_ref().map(NetworkId::as_str).unwrap_or("-");
    println!("NeXO View Status");
    println!("================");
    println!("Network:       {}", network);
    println!("Load:          {:?}", status.load);
    println!("Generation:    {}", status.generation);
    println!("In flight:     {}", status.in_flight);
    println!("Overlay edges: {}", status.overlay_edges);
    if let Some(partition) = &status.partition {
        println!();
        print_nodes("Query", &partition.query);
        print_nodes("Selected", &partition.selected);
        println!("Dimmed:        {}", partition.dimmed.len());
        println!("Normal:        {}", partition.normal.len());
    }
}

fn print_nodes<'a>(label: &str, nodes: impl IntoIterator<Item = &'a NodeId>) {
    let ids: Vec<&str> = nodes.into_iter().map(NodeId::as_str).collect();
    println!("{:<15}{}", format!("{}:", label), ids.join(", "));
}

// =============================================================================
// DETAILS COMMAND
// =============================================================================

#[derive(Serialize)]
struct DetailsOutput<'a> {
    panel: &'a DetailPanel,
    subnetwork: Option<&'a Subnetwork>,
}

/// Click a node and print its detail panel.
pub async fn cmd_details(
    runtime: &mut ViewerRuntime,
    node: &str,
    json_mode: bool,
) -> Result<(), NexoError> {
    runtime.session_mut().node_clicked(&NodeId::new(node))?;
    runtime.settle().await;

    let session = runtime.session();
    print_details(session.detail_panel(), session.subnetwork(), json_mode);
    print_notices(runtime.session_mut());
    Ok(())
}

fn print_details(panel: &DetailPanel, subnetwork: Option<&Subnetwork>, json_mode: bool) {
    if json_mode {
        print_json(&DetailsOutput { panel, subnetwork });
        return;
    }

    let details = match &panel.content {
        DetailContent::Ready { details } => details,
        DetailContent::Empty => {
            println!("No details");
            return;
        }
        DetailContent::Loading { node } => {
            println!("Details for {} still loading", node);
            return;
        }
        DetailContent::Failed { node, message } => {
            println!("Details for {} failed: {}", node, message);
            return;
        }
    };

    println!("{} ({:?})", details.title, details.kind);
    if let Some(link) = &details.link {
        println!("{}", link);
    }
    println!();
    for row in &details.summary {
        println!("{:<22}{}", row.label, format_value(&row.value));
    }
    for section in &details.sections {
        println!();
        println!("[{}]", section.title);
        for row in &section.rows {
            println!("  {:<20}{}", row.label, format_value(&row.value));
        }
    }
    if !details.scores.is_empty() {
        println!();
        for score in &details.scores {
            let value = score.value.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
            println!("{:<22}{}", score.category, value);
        }
    }
    if !details.genes.is_empty() {
        println!();
        println!("Genes: {}", details.genes.join(", "));
    }
    match &details.gene_table {
        GeneTable::None => {}
        GeneTable::Pending { names } => println!("Gene table pending ({} genes)", names.len()),
        GeneTable::Loaded { rows } => {
            println!();
            for row in rows {
                println!("  {:<12}{:<12}{}", row.sgd_id, row.symbol, row.orf);
            }
        }
        GeneTable::Failed { message } => println!("Gene table failed: {}", message),
    }
    if let Some(subnetwork) = subnetwork.filter(|_| details.shows_subnetwork) {
        println!();
        println!(
            "Interactions: {} genes, {} interactions",
            subnetwork.nodes, subnetwork.edges
        );
    }
}

fn format_value(value: &DetailValue) -> String {
    match value {
        DetailValue::Text(text) => text.clone(),
        DetailValue::Link { text, href } => format!("{} <{}>", text, href),
        DetailValue::List(items) => items.join("; "),
    }
}

// =============================================================================
// EXPLORE COMMAND
// =============================================================================

/// A line of the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreCommand {
    Search(String),
    Genes(String),
    Select(NodeId),
    Pick(NodeId),
    Switch(NetworkId),
    Parents(NodeId),
    Close,
    Clear,
    Refresh,
    Status,
    Help,
    Quit,
}

const EXPLORE_HELP: &str = "\
search <query>   search terms
genes <query>    search genes
select <node>    click a node (path, details, interactions)
pick <node>      zoom to a search result
switch <network> change network
parents <node>   add parent terms to the highlight
close            hide the detail panel
clear            clear search, hide details, refresh
refresh          restore the resting view
status           show the view status
quit             leave";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ExploreCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let argument = |name: &str| {
        if rest.is_empty() {
            Err(format!("'{}' needs an argument", name))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_lowercase().as_str() {
        "search" => ExploreCommand::Search(argument("search")?),
        "genes" => ExploreCommand::Genes(argument("genes")?),
        "select" => ExploreCommand::Select(NodeId::new(argument("select")?)),
        "pick" => ExploreCommand::Pick(NodeId::new(argument("pick")?)),
        "switch" => ExploreCommand::Switch(NetworkId::new(argument("switch")?)),
        "parents" => ExploreCommand::Parents(NodeId::new(argument("parents")?)),
        "close" => ExploreCommand::Close,
        "clear" => ExploreCommand::Clear,
        "refresh" => ExploreCommand::Refresh,
        "status" => ExploreCommand::Status,
        "help" | "?" => ExploreCommand::Help,
        "quit" | "exit" => ExploreCommand::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(Some(command))
}

/// Apply one interactive command and print its outcome.
pub async fn run_explore_command(
    runtime: &mut ViewerRuntime,
    command: ExploreCommand,
    json_mode: bool,
) -> Result<(), NexoError> {
    match command {
        ExploreCommand::Search(query) => return cmd_search(runtime, &query, false, json_mode).await,
        ExploreCommand::Genes(query) => return cmd_search(runtime, &query, true, json_mode).await,
        ExploreCommand::Select(node) => {
            runtime.session_mut().node_clicked(&node)?;
            runtime.settle().await;
            let session = runtime.session();
            print_details(session.detail_panel(), session.subnetwork(), json_mode);
        }
        ExploreCommand::Pick(node) => {
            runtime.session_mut().select_search_result(&node);
            let focus = runtime.session().renderer().focus().cloned();
            match focus {
                Some(focus) if focus == node => println!("Zoomed to {}", focus),
                _ => println!("{} is not in the current view", node),
            }
        }
        ExploreCommand::Switch(network) => {
            runtime.session_mut().switch_network(&network)?;
            runtime.settle().await;
            print_status(&runtime.session().status(), json_mode);
        }
        ExploreCommand::Parents(node) => {
            runtime.session_mut().show_parents(&node);
            runtime.settle().await;
            print_status(&runtime.session().status(), json_mode);
        }
        ExploreCommand::Close => {
            runtime.session_mut().close_details();
            print_status(&runtime.session().status(), json_mode);
        }
        ExploreCommand::Clear => {
            runtime.session_mut().clear_search();
            print_status(&runtime.session().status(), json_mode);
        }
        ExploreCommand::Refresh => {
            runtime.session_mut().refresh_view();
            print_status(&runtime.session().status(), json_mode);
        }
        ExploreCommand::Status => print_status(&runtime.session().status(), json_mode),
        ExploreCommand::Help => println!("{}", EXPLORE_HELP),
        ExploreCommand::Quit => {}
    }
    print_notices(runtime.session_mut());
    Ok(())
}

/// Interactive session over stdin, one command per line.
pub async fn cmd_explore(runtime: &mut ViewerRuntime, json_mode: bool) -> Result<(), NexoError> {
    if !json_mode {
        let network = runtime.session().active_network().map(|id| id.to_string());
        println!("Exploring {} (type 'help' for commands)", network.unwrap_or_default());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| NexoError::IoError(format!("Cannot read stdin: {}", e)))?
    {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ExploreCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = run_explore_command(runtime, command, json_mode).await {
                    println!("Error: {}", e);
                }
            }
            Err(message) => println!("{}", message),
        }
    }

    runtime.shutdown();
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print and clear surfaced failures.
fn print_notices(session: &mut Session<TerminalRenderer>) {
    for notice in session.take_notices() {
        tracing::warn!(source = %notice.source, "{}", notice.message);
        println!("Warning: {}", notice);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse_line("  search  protein kinase "),
            Ok(Some(ExploreCommand::Search("protein kinase".into())))
        );
        assert_eq!(
            parse_line("switch GO CC"),
            Ok(Some(ExploreCommand::Switch(NetworkId::new("GO CC"))))
        );
        assert_eq!(
            parse_line("SELECT GO:0005737"),
            Ok(Some(ExploreCommand::Select(NodeId::new("GO:0005737"))))
        );
    }

    #[test]
    fn blank_and_bad_lines() {
        assert_eq!(parse_line("   "), Ok(None));
        assert!(parse_line("search").is_err());
        assert!(parse_line("frobnicate").is_err());
        assert_eq!(parse_line("exit"), Ok(Some(ExploreCommand::Quit)));
        assert_eq!(parse_line("close"), Ok(Some(ExploreCommand::Close)));
    }

    #[test]
    fn detail_values_render_as_text() {
        assert_eq!(format_value(&DetailValue::List(vec!["a".into(), "b".into()])), "a; b");
        assert_eq!(
            format_value(&DetailValue::Link {
                text: "GO:1".into(),
                href: "http://x".into()
            }),
            "GO:1 <http://x>"
        );
    }
}
