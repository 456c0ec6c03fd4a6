//! # Session Module
//!
//! The single owned context of a viewer: network registry, mediator, view
//! synchronization, panels and an injected renderer.
//!
//! ## Driving a Session
//!
//! User gestures (`node_clicked`, `search`, `switch_network`, ...) mutate state
//! synchronously and may queue `Command`s. The host drains the queue with
//! `drain_commands`, executes each fetch however it likes, and reports back
//! through `complete`. Completions whose ticket is unknown (never issued,
//! already completed or cancelled) are dropped, as are completions of a
//! search that a newer search has superseded.
//!
//! ## Network Switches
//!
//! A switch bumps the view generation, cancels every view-scoped request still
//! in flight, rebinds the mediator's view scope and activates the new
//! network, loading it on first use.

use crate::details::{DetailContent, DetailPanel, NodeDetails, Subnetwork};
use crate::formats::AppConfig;
use crate::mediator::{Event, EventMediator};
use crate::network::{LoadPlan, LoadState, NetworkRegistry};
use crate::overlay::{OverlayEngine, PathOverlayEngine};
use crate::primitives::DEFAULT_NETWORK;
use crate::renderer::Renderer;
use crate::requests::{Command, FailureAction, Notice, Request, Response, Ticket, failure_action};
use crate::search::{
    DEFAULT_EXCLUDED, Matcher, SearchPanel, SnippetMatcher, parse_search_response, query_terms,
};
use crate::store::{GraphStateStore, Partition, StateStore};
use crate::sync::{Binding, Reaction, ViewSyncCoordinator, bind_persistent};
use crate::{FetchFailure, HighlightMode, NetworkId, NexoError, NodeId};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info, warn};

/// Retries granted to transient failures unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Tunables of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_retries: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone)]
struct Pending {
    ticket: Ticket,
    request: Request,
    attempts: u32,
    /// Node whose detail panel a names lookup fills.
    subject: Option<NodeId>,
}

/// Snapshot of a session for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub active: Option<NetworkId>,
    pub load: Option<LoadState>,
    pub generation: u64,
    pub in_flight: usize,
    pub overlay_edges: usize,
    pub partition: Option<Partition>,
    pub search: SearchPanel,
    pub details_visible: bool,
}

// =============================================================================
// SESSION
// =============================================================================

/// A viewer session over one renderer.
#[derive(Debug)]
pub struct Session<R: Renderer> {
    registry: NetworkRegistry,
    mediator: EventMediator<Binding>,
    sync: ViewSyncCoordinator,
    renderer: R,
    matcher: SnippetMatcher,
    overlay: PathOverlayEngine,
    search: SearchPanel,
    /// Ticket id of the latest search; older search completions are dropped.
    search_ticket: Option<u64>,
    details: DetailPanel,
    subnetwork: Option<Subnetwork>,
    pending: BTreeMap<u64, Pending>,
    commands: VecDeque<Command>,
    notices: Vec<Notice>,
    next_ticket: u64,
    generation: u64,
    options: SessionOptions,
    closed: bool,
}

impl<R: Renderer> Session<R> {
    /// Create a session and start loading the default network.
    pub fn new(config: &AppConfig, renderer: R, options: SessionOptions) -> Result<Self, NexoError> {
        let registry = NetworkRegistry::new(config)?;
        let mut mediator = EventMediator::new();
        bind_persistent(&mut mediator);

        let default = registry.default_network().clone();
        let mut session = Self {
            registry,
            mediator,
            sync: ViewSyncCoordinator::new(),
            renderer,
            matcher: SnippetMatcher::default(),
            overlay: PathOverlayEngine,
            search: SearchPanel::Idle,
            search_ticket: None,
            details: DetailPanel::default(),
            subnetwork: None,
            pending: BTreeMap::new(),
            commands: VecDeque::new(),
            notices: Vec::new(),
            next_ticket: 1,
            generation: 0,
            options,
            closed: false,
        };

        info!(network = %default, "session started");
        session.publish(Event::NetworkSelected(default));
        Ok(session)
    }

    // =========================================================================
    // USER GESTURES
    // =========================================================================

    /// Select another network. Loads it on first use.
    pub fn switch_network(&mut self, network: &NetworkId) -> Result<(), NexoError> {
        if self.registry.get(network).is_none() {
            return Err(NexoError::UnknownNetwork(network.to_string()));
        }
        self.publish(Event::NetworkSelected(network.clone()));
        Ok(())
    }

    /// A node was clicked in the graph view: query its path and announce
    /// the selection.
    pub fn node_clicked(&mut self, node: &NodeId) -> Result<(), NexoError> {
        let visible = self
            .registry
            .active_store()
            .is_some_and(|store| store.contains_node(node));
        if !visible || !self.is_active_loaded() {
            return Err(NexoError::NodeNotFound(node.to_string()));
        }

        self.issue(Request::Path { node: node.clone() });
        self.publish(Event::NodeSelected(node.clone()));
        Ok(())
    }

    /// Ask for the parent terms of a node and add them to the highlight.
    pub fn show_parents(&mut self, node: &NodeId) {
        self.issue(Request::Parents { node: node.clone() });
    }

    /// Run a search. Blank queries show the no-match indicator at once.
    pub fn search(&mut self, query: &str, by_genes: bool) {
        if query_terms(query).is_empty() {
            debug!("blank search query");
            self.search_ticket = None;
            self.search = SearchPanel::NoMatch {
                query: query.to_string(),
            };
            return;
        }

        self.search = SearchPanel::Pending {
            query: query.to_string(),
        };
        self.issue(Request::Search {
            query: query.trim().to_string(),
            by_genes,
        });
    }

    /// A row of the search result table was picked.
    pub fn select_search_result(&mut self, node: &NodeId) {
        self.publish(Event::SearchResultSelected(node.clone()));
    }

    /// Clear the search panel, which also hides details and refreshes the view.
    pub fn clear_search(&mut self) {
        self.search = SearchPanel::Idle;
        self.search_ticket = None;
        self.publish(Event::Clear);
    }

    /// Restore the active view to its resting state and fit it.
    pub fn refresh_view(&mut self) {
        let Some(store) = self.registry.active_store_mut() else {
            return;
        };
        for id in store.refresh() {
            self.renderer.drop_edge(&id);
        }
        self.renderer.draw(store);
        self.renderer.fit();
    }

    /// Hide the detail panel.
    pub fn close_details(&mut self) {
        self.details.visible = false;
    }

    // =========================================================================
    // HOST INTERFACE
    // =========================================================================

    /// Take every queued command.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        self.commands.drain(..).collect()
    }

    /// Resolve a fetch issued with `ticket`.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<Response, FetchFailure>) {
        let Some(pending) = self.pending.remove(&ticket.id) else {
            warn!(ticket = %ticket, "dropping completion for unknown ticket");
            return;
        };
        if pending.ticket != ticket {
            warn!(ticket = %ticket, expected = %pending.ticket, "dropping completion with mismatched ticket");
            self.pending.insert(ticket.id, pending);
            return;
        }
        if pending.request.is_view_scoped() && ticket.generation != self.generation {
            debug!(ticket = %ticket, "dropping stale view completion");
            return;
        }
        if matches!(pending.request, Request::Search { .. })
            && self.search_ticket != Some(ticket.id)
        {
            debug!(ticket = %ticket, "dropping superseded search completion");
            return;
        }

        match outcome {
            Ok(response) if response.kind() == pending.request.kind() => {
                self.apply(pending, response);
            }
            Ok(response) => {
                let failure = FetchFailure::Malformed(format!(
                    "expected {} response, got {}",
                    pending.request.kind(),
                    response.kind()
                ));
                self.fail(pending, failure);
            }
            Err(failure) => self.fail(pending, failure),
        }
    }

    /// Cancel every in-flight request and tear down view bindings. Returns
    /// the cancel commands; the session ignores all later completions.
    pub fn shutdown(&mut self) -> Vec<Command> {
        self.commands.clear();
        let cancels: Vec<Command> = std::mem::take(&mut self.pending)
            .into_values()
            .map(|pending| Command::Cancel(pending.ticket))
            .collect();
        self.sync.unbind(&mut self.mediator);
        self.closed = true;
        info!(cancelled = cancels.len(), "session shut down");
        cancels
    }

    /// Take surfaced failures.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    #[must_use]
    pub fn active_network(&self) -> Option<&NetworkId> {
        self.registry.active_id()
    }

    /// State store of the active network.
    #[must_use]
    pub fn store(&self) -> Option<&GraphStateStore> {
        self.registry.active_store()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn mediator(&self) -> &EventMediator<Binding> {
        &self.mediator
    }

    #[must_use]
    pub fn sync(&self) -> &ViewSyncCoordinator {
        &self.sync
    }

    #[must_use]
    pub fn search_panel(&self) -> &SearchPanel {
        &self.search
    }

    #[must_use]
    pub fn detail_panel(&self) -> &DetailPanel {
        &self.details
    }

    #[must_use]
    pub fn subnetwork(&self) -> Option<&Subnetwork> {
        self.subnetwork.as_ref()
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of requests issued and not yet resolved.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        let store = self.registry.active_store();
        SessionStatus {
            active: self.registry.active_id().cloned(),
            load: self.registry.active().map(|network| network.load),
            generation: self.generation,
            in_flight: self.pending.len(),
            overlay_edges: store.map_or(0, |store| store.overlay_edges().count()),
            partition: store.map(GraphStateStore::partition),
            search: self.search.clone(),
            details_visible: self.details.visible,
        }
    }

    // =========================================================================
    // EVENT DISPATCH
    // =========================================================================

    fn publish(&mut self, event: Event) {
        let mut bindings = Vec::new();
        let delivered = self
            .mediator
            .publish(&event, |binding, _| bindings.push(binding.clone()));
        debug!(event = ?event.kind(), delivered, "event published");

        for binding in bindings {
            self.react(&binding, &event);
        }
    }

    fn react(&mut self, binding: &Binding, event: &Event) {
        if let Some(view) = &binding.view
            && self.registry.active_id() != Some(view)
        {
            warn!(view = %view, reaction = ?binding.reaction, "skipping binding of inactive view");
            return;
        }

        match (binding.reaction, event) {
            (Reaction::LoadNetwork, Event::NetworkSelected(network)) => {
                self.activate(network);
            }
            (Reaction::MountView, Event::NetworkLoaded(network)) => {
                if self.registry.is_active_and_loaded(network) {
                    self.mount(network);
                }
            }
            (Reaction::HideDetails, Event::Clear) => {
                self.details.visible = false;
            }
            (Reaction::HighlightNodes, Event::NodesSelected(nodes)) => {
                if let Some(store) = self.registry.active_store_mut() {
                    let targets = store.visible(nodes);
                    store.highlight(&targets, HighlightMode::NodesOnly, None);
                    self.renderer.draw(store);
                }
            }
            (Reaction::ZoomTo, Event::SearchResultSelected(node)) => {
                if let Some(store) = self.registry.active_store_mut()
                    && store.zoom_to(node)
                    && let Some(focus) = store.node(node)
                {
                    self.renderer.fit();
                    self.renderer.zoom_to(focus);
                    self.renderer.draw(store);
                }
            }
            (Reaction::ShowDetails, Event::NodeSelected(node)) => {
                self.details.visible = true;
                self.details.content = DetailContent::Loading { node: node.clone() };
            }
            (Reaction::FetchDetails, Event::NodeSelected(node)) => {
                self.issue(Request::Details { node: node.clone() });
            }
            (Reaction::UpdateSubnetwork, Event::NodeSelected(node)) => {
                let on_default = self
                    .registry
                    .active_id()
                    .is_some_and(|id| id.as_str() == DEFAULT_NETWORK);
                if on_default {
                    self.issue(Request::Interactions { node: node.clone() });
                }
            }
            (Reaction::RefreshView, Event::Clear) => {
                self.refresh_view();
            }
            (reaction, event) => {
                warn!(?reaction, event = ?event.kind(), "binding received unexpected event");
            }
        }
    }

    fn activate(&mut self, network: &NetworkId) {
        if self.registry.active_id() == Some(network) {
            let unloaded = self
                .registry
                .get(network)
                .is_some_and(|state| state.load == LoadState::NotLoaded);
            if unloaded {
                info!(network = %network, "retrying load of active network");
                self.load(network);
            } else {
                debug!(network = %network, "network already active");
            }
            return;
        }

        self.generation = self.generation.saturating_add(1);
        self.cancel_view_requests();
        if let Err(e) = self.registry.activate(network) {
            warn!(error = %e, "cannot activate network");
            return;
        }
        self.sync.bind_to(&mut self.mediator, network.clone());
        info!(network = %network, generation = self.generation, "network selected");
        self.load(network);
    }

    fn load(&mut self, network: &NetworkId) {
        match self.registry.begin_load(network) {
            Ok(LoadPlan::Cached) => self.publish(Event::NetworkLoaded(network.clone())),
            Ok(LoadPlan::InFlight) => debug!(network = %network, "network load already in flight"),
            Ok(LoadPlan::Fetch { network_data }) => {
                self.issue(Request::NetworkData { network_data });
            }
            Err(e) => warn!(error = %e, "cannot load network"),
        }
    }

    /// Push the active network's graph to the renderer.
    fn mount(&mut self, network: &NetworkId) {
        let Some(state) = self.registry.get(network) else {
            return;
        };
        self.renderer.reset(state.config.sigma.as_ref());
        for node in state.store.nodes() {
            self.renderer.add_node(node);
        }
        for edge in state.store.edges() {
            self.renderer.add_edge(edge);
        }
        self.renderer.draw(&state.store);
        self.renderer.fit();
        debug!(network = %network, "network mounted");
    }

    // =========================================================================
    // REQUESTS
    // =========================================================================

    fn issue(&mut self, request: Request) -> Option<Ticket> {
        let network = self
            .registry
            .active_id()
            .cloned()
            .unwrap_or_else(|| self.registry.default_network().clone());
        self.issue_for(network, request, 1, None)
    }

    fn issue_for(
        &mut self,
        network: NetworkId,
        request: Request,
        attempts: u32,
        subject: Option<NodeId>,
    ) -> Option<Ticket> {
        if self.closed {
            debug!(request = %request.path(), "session closed; request not issued");
            return None;
        }
        if matches!(request, Request::Search { .. }) {
            self.search_ticket = Some(self.next_ticket);
        }

        let ticket = Ticket {
            id: self.next_ticket,
            network,
            generation: self.generation,
        };
        self.next_ticket = self.next_ticket.saturating_add(1);

        debug!(ticket = %ticket, request = %request.path(), attempts, "request issued");
        self.pending.insert(
            ticket.id,
            Pending {
                ticket: ticket.clone(),
                request: request.clone(),
                attempts,
                subject,
            },
        );
        self.commands.push_back(Command::Fetch(ticket.clone(), request));
        Some(ticket)
    }

    fn cancel_view_requests(&mut self) {
        let stale: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.request.is_view_scoped())
            .map(|(id, _)| *id)
            .collect();

        for id in stale {
            if let Some(pending) = self.pending.remove(&id) {
                debug!(ticket = %pending.ticket, "cancelling view request");
                self.commands.push_back(Command::Cancel(pending.ticket));
            }
        }
    }

    fn is_active_loaded(&self) -> bool {
        self.registry
            .active_id()
            .is_some_and(|id| self.registry.is_active_and_loaded(id))
    }

    // =========================================================================
    // COMPLETIONS
    // =========================================================================

    fn apply(&mut self, pending: Pending, response: Response) {
        match (pending.request, response) {
            (Request::NetworkData { .. }, Response::NetworkData(data)) => {
                let network = pending.ticket.network;
                if let Err(e) = self.registry.complete_load(&network, &data) {
                    warn!(error = %e, "network data for unknown network");
                    return;
                }
                self.publish(Event::NetworkLoaded(network));
            }
            (Request::Path { node }, Response::Path(path)) => {
                let Some(path) = path.into_path_result() else {
                    debug!(node = %node, "path response without elements");
                    return;
                };
                let Some(store) = self.registry.active_store_mut() else {
                    return;
                };
                match self.overlay.show_path(&path, store) {
                    Some(change) => {
                        for id in &change.dropped {
                            self.renderer.drop_edge(id);
                        }
                        for edge in &change.added {
                            self.renderer.add_edge(edge);
                        }
                        self.renderer.draw(store);
                    }
                    None => debug!(node = %node, "path has no visible start node"),
                }
            }
            (Request::Parents { node }, Response::Parents(parents)) => {
                let ids: Vec<NodeId> = parents.into_iter().map(|parent| parent.name).collect();
                let Some(store) = self.registry.active_store_mut() else {
                    return;
                };
                if self.overlay.extend_with_parents(&ids, store) {
                    self.renderer.draw(store);
                } else {
                    debug!(node = %node, "no visible parents to add");
                }
            }
            (Request::Search { query, .. }, Response::Search(payload)) => {
                let (header_terms, records) = parse_search_response(payload);
                let terms = header_terms.unwrap_or_else(|| query_terms(&query));
                let rows = self.matcher.match_all(&records, &terms, DEFAULT_EXCLUDED);

                if rows.is_empty() {
                    info!(query = %query, "no match");
                    self.search = SearchPanel::NoMatch { query };
                    return;
                }

                info!(query = %query, results = rows.len(), "search results");
                let nodes: Vec<NodeId> = rows.iter().map(|row| row.node_id.clone()).collect();
                self.search = SearchPanel::Results { query, rows };
                self.publish(Event::NodesSelected(nodes));
            }
            (Request::Details { node }, Response::Details(record)) => {
                if self.details.node() != Some(&node) {
                    debug!(node = %node, "details arrived for a node no longer shown");
                    return;
                }
                let details = NodeDetails::from_record(&record);
                let names = details.pending_names().map(<[String]>::to_vec);
                self.details.content = DetailContent::Ready {
                    details: Box::new(details),
                };
                if let Some(names) = names {
                    let network = pending.ticket.network;
                    self.issue_for(network, Request::Names { names }, 1, Some(node));
                }
            }
            (Request::Names { .. }, Response::Names(records)) => {
                match self.details.details_mut() {
                    Some(details) if Some(&details.id) == pending.subject.as_ref() => {
                        details.apply_names(&records);
                    }
                    _ => debug!("gene names arrived for a panel no longer shown"),
                }
            }
            (Request::Interactions { node }, Response::Interactions(response)) => {
                let subnetwork = Subnetwork::from_response(node, response);
                debug!(
                    term = %subnetwork.term,
                    nodes = subnetwork.nodes,
                    edges = subnetwork.edges,
                    "subnetwork updated"
                );
                self.subnetwork = Some(subnetwork);
            }
            (request, response) => {
                warn!(request = %request.path(), kind = %response.kind(), "response does not match request");
            }
        }
    }

    fn fail(&mut self, pending: Pending, failure: FetchFailure) {
        let kind = pending.request.kind();
        let action = failure_action(kind, &failure, pending.attempts, self.options.max_retries);
        warn!(
            ticket = %pending.ticket,
            request = %pending.request.path(),
            attempts = pending.attempts,
            error = %failure,
            ?action,
            "request failed"
        );

        match action {
            FailureAction::Retry => {
                self.issue_for(
                    pending.ticket.network,
                    pending.request,
                    pending.attempts.saturating_add(1),
                    pending.subject,
                );
            }
            FailureAction::Ignore => {}
            FailureAction::Surface => {
                let message = failure.to_string();
                match &pending.request {
                    Request::NetworkData { .. } => {
                        if let Err(e) = self.registry.fail_load(&pending.ticket.network) {
                            warn!(error = %e, "cannot reset network load state");
                        }
                    }
                    Request::Search { query, .. } => {
                        self.search = SearchPanel::Failed {
                            query: query.clone(),
                            message: message.clone(),
                        };
                    }
                    Request::Details { node } => {
                        if self.details.node() == Some(node) {
                            self.details.content = DetailContent::Failed {
                                node: node.clone(),
                                message: message.clone(),
                            };
                        }
                    }
                    Request::Names { .. } => {
                        if let Some(details) = self.details.details_mut() {
                            details.fail_names(message.clone());
                        }
                    }
                    Request::Path { .. } | Request::Parents { .. } | Request::Interactions { .. } => {}
                }
                self.notices.push(Notice {
                    source: kind,
                    message,
                });
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{NetworkData, PathResponse};
    use crate::requests::RequestKind;
    use crate::renderer::{RecordingRenderer, RenderCall};
    use serde_json::json;

    fn config() -> AppConfig {
        AppConfig::from_json(
            r#"{"networks": [
                {"name": "NeXO", "networkData": "nexo.json"},
                {"name": "GO BP", "networkData": "go_bp.json"}
            ]}"#,
        )
        .expect("config")
    }

    fn graph() -> NetworkData {
        serde_json::from_value(json!({
            "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
            "edges": [{"source": "A", "target": "B"}]
        }))
        .expect("graph")
    }

    fn fetches(session: &mut Session<RecordingRenderer>) -> Vec<(Ticket, Request)> {
        session
            .drain_commands()
            .into_iter()
            .filter_map(|command| match command {
                Command::Fetch(ticket, request) => Some((ticket, request)),
                Command::Cancel(_) => None,
            })
            .collect()
    }

    fn loaded_session() -> Session<RecordingRenderer> {
        let mut session =
            Session::new(&config(), RecordingRenderer::new(), SessionOptions::default())
                .expect("session");
        let (ticket, request) = fetches(&mut session).remove(0);
        assert_eq!(request.kind(), RequestKind::NetworkData);
        session.complete(ticket, Ok(Response::NetworkData(graph())));
        session
    }

    #[test]
    fn startup_loads_default_network() {
        let session = loaded_session();
        assert_eq!(session.active_network(), Some(&NetworkId::new("NeXO")));
        assert_eq!(session.store().expect("store").node_count(), 3);
        assert_eq!(session.renderer().count(&RenderCall::Reset), 1);
        assert_eq!(session.renderer().count(&RenderCall::Fit), 1);
    }

    #[test]
    fn click_requests_path_details_and_subnetwork() {
        let mut session = loaded_session();
        session.node_clicked(&NodeId::new("A")).expect("click");

        let kinds: Vec<RequestKind> = fetches(&mut session).iter().map(|(_, r)| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![RequestKind::Path, RequestKind::Details, RequestKind::Interactions]
        );
        assert!(session.detail_panel().visible);
        assert!(session.node_clicked(&NodeId::new("missing")).is_err());
    }

    #[test]
    fn loaded_networks_mount_only_while_active() {
        let mut session = loaded_session();
        session.switch_network(&NetworkId::new("GO BP")).expect("switch");
        let (ticket, _) = fetches(&mut session).remove(0);
        session.switch_network(&NetworkId::new("NeXO")).expect("switch back");
        assert_eq!(session.renderer().count(&RenderCall::Reset), 2);

        session.complete(ticket, Ok(Response::NetworkData(graph())));
        assert_eq!(session.renderer().count(&RenderCall::Reset), 2);
        let go = session.registry().get(&NetworkId::new("GO BP")).expect("network");
        assert_eq!(go.load, LoadState::Loaded);

        session.switch_network(&NetworkId::new("GO BP")).expect("switch");
        assert!(fetches(&mut session).is_empty());
        assert_eq!(session.renderer().count(&RenderCall::Reset), 3);
    }

    #[test]
    fn close_details_hides_panel() {
        let mut session = loaded_session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        assert!(session.detail_panel().visible);

        session.close_details();
        assert!(!session.detail_panel().visible);
        assert!(!session.status().details_visible);
    }

    #[test]
    fn switch_cancels_view_requests() {
        let mut session = loaded_session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let issued = fetches(&mut session);

        session.switch_network(&NetworkId::new("GO BP")).expect("switch");
        let cancels = session
            .drain_commands()
            .into_iter()
            .filter(|c| matches!(c, Command::Cancel(_)))
            .count();
        assert_eq!(cancels, 3);

        let (ticket, _) = issued[0].clone();
        session.complete(ticket, Ok(Response::Path(PathResponse::default())));
        assert!(session.notices().is_empty());
    }

    #[test]
    fn transient_search_failure_is_retried_then_surfaced() {
        let mut session = loaded_session();
        session.search("kinase", false);

        for _ in 0..=DEFAULT_MAX_RETRIES {
            let (ticket, request) = fetches(&mut session).remove(0);
            assert_eq!(request.kind(), RequestKind::Search);
            session.complete(ticket, Err(FetchFailure::Timeout));
        }

        assert!(fetches(&mut session).is_empty());
        assert!(matches!(session.search_panel(), SearchPanel::Failed { .. }));
        assert_eq!(session.take_notices().len(), 1);
    }

    #[test]
    fn shutdown_cancels_everything() {
        let mut session = loaded_session();
        session.search("kinase", false);
        let (ticket, _) = fetches(&mut session).remove(0);

        let cancels = session.shutdown();
        assert_eq!(cancels, vec![Command::Cancel(ticket.clone())]);
        assert!(session.is_closed());

        session.complete(ticket, Ok(Response::Search(Vec::new())));
        assert!(matches!(session.search_panel(), SearchPanel::Pending { .. }));
        session.search("actin", false);
        assert!(session.drain_commands().is_empty());
    }
}
