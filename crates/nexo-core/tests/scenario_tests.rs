//! # Scenario Tests
//!
//! End-to-end scenarios driven through a `Session` with a recording renderer.
//!
//! ## Scenarios
//! - A: Path overlay on a partial base graph
//! - B: Search snippet and match set
//! - C: Empty search and zero matches
//! - D: Network switching keeps one live view wiring

use nexo_core::{
    AppConfig, Command, EdgeId, EdgeState, EventKind, FetchFailure, LoadState, NetworkData,
    NetworkId, NodeId, RecordingRenderer, RenderCall, Request, RequestKind, Response, Scope, SearchPanel,
    Session, SessionOptions, Ticket, VisualState,
};
use serde_json::json;

// =============================================================================
// HARNESS
// =============================================================================

fn config() -> AppConfig {
    AppConfig::from_json(
        r##"{"networks": [
            {"name": "NeXO", "networkData": "nexo.json",
             "sigma": {"drawingProperties": {"defaultLabelColor": "#000"}}},
            {"name": "GO CC", "networkData": "go_cc.json"}
        ]}"##,
    )
    .expect("config")
}

fn nexo_graph() -> NetworkData {
    serde_json::from_value(json!({
        "nodes": [
            {"id": "A", "label": "root", "color": "#a00"},
            {"id": "B", "label": "middle", "color": "#0b0"},
            {"id": "C", "label": "leaf", "color": "#00c"},
            {"id": "D", "label": "bystander", "color": "#ddd"}
        ],
        "edges": [{"source": "A", "target": "B", "relationship": "is_a", "color": "#eee"}]
    }))
    .expect("graph")
}

fn go_graph() -> NetworkData {
    serde_json::from_value(json!({
        "nodes": [{"id": "GO:0005737", "label": "cytoplasm"}],
        "edges": []
    }))
    .expect("graph")
}

/// A session whose default network is loaded.
fn session() -> Session<RecordingRenderer> {
    let mut session =
        Session::new(&config(), RecordingRenderer::new(), SessionOptions::default())
            .expect("session");
    let (ticket, _) = take_fetch(&mut session, RequestKind::NetworkData);
    session.complete(ticket, Ok(Response::NetworkData(nexo_graph())));
    session
}

/// Drain commands and return the single fetch of `kind`.
fn take_fetch(session: &mut Session<RecordingRenderer>, kind: RequestKind) -> (Ticket, Request) {
    session
        .drain_commands()
        .into_iter()
        .find_map(|command| match command {
            Command::Fetch(ticket, request) if request.kind() == kind => Some((ticket, request)),
            _ => None,
        })
        .expect("fetch of the requested kind")
}

fn overlay_id(source: &str, target: &str) -> EdgeId {
    EdgeId::composite(&NodeId::new(source), &NodeId::new(target))
}

fn fetch_kinds(commands: &[Command]) -> Vec<RequestKind> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::Fetch(_, request) => Some(request.kind()),
            Command::Cancel(_) => None,
        })
        .collect()
}

// =============================================================================
// SCENARIO A: PATH OVERLAY
// =============================================================================

mod scenario_a_path_overlay {
    use super::*;

    fn path_response() -> Response {
        let body = json!({
            "elements": {
                "nodes": [
                    {"data": {"id": "A", "type": "start"}},
                    {"data": {"id": "B"}},
                    {"data": {"id": "C"}}
                ],
                "edges": [
                    {"data": {"source": "A", "target": "B"}},
                    {"data": {"source": "B", "target": "C"}}
                ]
            }
        });
        Response::decode(&Request::Path { node: NodeId::new("A") }, body).expect("decode")
    }

    /// A.1: Exactly one overlay edge is injected for the missing segment.
    #[test]
    fn missing_segment_becomes_overlay() {
        let mut session = session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let (ticket, _) = take_fetch(&mut session, RequestKind::Path);
        session.complete(ticket, Ok(path_response()));

        let store = session.store().expect("store");
        let overlay: Vec<String> = store.overlay_edges().map(|e| e.id.to_string()).collect();
        assert_eq!(overlay, vec!["B-C"]);

        let extra = store.edge(&overlay_id("B", "C")).expect("overlay edge");
        assert_eq!(extra.state, EdgeState::ExtraSelected);
        let base = store.edge(&EdgeId::indexed(0)).expect("base edge");
        assert_eq!(base.state, EdgeState::Selected);
    }

    /// A.2: Query, selected and dimmed nodes follow the path.
    #[test]
    fn nodes_follow_path_roles() {
        let mut session = session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let (ticket, _) = take_fetch(&mut session, RequestKind::Path);
        session.complete(ticket, Ok(path_response()));

        let store = session.store().expect("store");
        let state = |id: &str| store.node(&NodeId::new(id)).expect("node").state;
        assert_eq!(state("A"), VisualState::Query);
        assert_eq!(state("B"), VisualState::Selected);
        assert_eq!(state("C"), VisualState::Selected);
        assert_eq!(state("D"), VisualState::Dimmed);
    }

    /// A.3: The renderer is told about the overlay edge.
    #[test]
    fn renderer_receives_overlay() {
        let mut session = session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let (ticket, _) = take_fetch(&mut session, RequestKind::Path);
        session.renderer_mut().take();
        session.complete(ticket, Ok(path_response()));

        let calls = session.renderer().calls();
        assert_eq!(
            calls,
            &[
                RenderCall::AddEdge(overlay_id("B", "C")),
                RenderCall::Draw
            ]
        );
    }

    /// A.4: Clearing restores resting colors and drops the overlay.
    #[test]
    fn clear_restores_view() {
        let mut session = session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let (ticket, _) = take_fetch(&mut session, RequestKind::Path);
        session.complete(ticket, Ok(path_response()));

        session.clear_search();

        let store = session.store().expect("store");
        assert_eq!(store.overlay_edges().count(), 0);
        assert_eq!(store.node(&NodeId::new("C")).expect("node").color.as_str(), "#00c");
        assert_eq!(store.edge(&EdgeId::indexed(0)).expect("edge").color.as_str(), "#eee");
        assert!(!session.detail_panel().visible);
    }

    /// A.5: A path without elements changes nothing.
    #[test]
    fn empty_path_is_ignored() {
        let mut session = session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let (ticket, request) = take_fetch(&mut session, RequestKind::Path);
        let empty = Response::decode(&request, json!({"elements": null})).expect("decode");
        session.complete(ticket, Ok(empty));

        let partition = session.store().expect("store").partition();
        assert_eq!(partition.normal.len(), 4);
    }

    /// A.6: Parent terms join the highlighted path.
    #[test]
    fn parents_extend_path() {
        let mut session = session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let (ticket, _) = take_fetch(&mut session, RequestKind::Path);
        session.complete(ticket, Ok(path_response()));

        session.show_parents(&NodeId::new("A"));
        let (ticket, request) = take_fetch(&mut session, RequestKind::Parents);
        let parents = Response::decode(&request, json!([{"name": "D"}])).expect("decode");
        session.complete(ticket, Ok(parents));

        let store = session.store().expect("store");
        assert_eq!(store.node(&NodeId::new("D")).expect("node").state, VisualState::Selected);
        assert_eq!(store.node(&NodeId::new("A")).expect("node").state, VisualState::Query);
    }
}

// =============================================================================
// SCENARIO B: SEARCH SNIPPETS
// =============================================================================

mod scenario_b_search {
    use super::*;

    /// B.1: "kinase" against a definition yields the windowed snippet and
    /// highlights the match.
    #[test]
    fn kinase_definition_matches() {
        let mut session = session();
        session.search("kinase", false);
        let (ticket, request) = take_fetch(&mut session, RequestKind::Search);
        assert_eq!(request.path(), "/search/kinase");

        let body = json!([
            {"name": "B", "label": "middle", "BP Definition": "protein kinase activity"}
        ]);
        session.complete(ticket, Ok(Response::decode(&request, body).expect("decode")));

        let SearchPanel::Results { rows, .. } = session.search_panel() else {
            unreachable!("search produced results");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].snippet("BP Definition"), Some("protein kinase activity"));

        let store = session.store().expect("store");
        assert_eq!(store.node(&NodeId::new("B")).expect("node").state, VisualState::Selected);
        assert!(store.edges().all(|e| e.state == EdgeState::Dimmed));
    }

    /// B.2: Picking a result focuses it with the query color.
    #[test]
    fn picking_a_result_zooms() {
        let mut session = session();
        session.renderer_mut().take();
        session.select_search_result(&NodeId::new("C"));

        let store = session.store().expect("store");
        assert_eq!(store.node(&NodeId::new("C")).expect("node").state, VisualState::Query);
        assert_eq!(session.renderer().count(&RenderCall::ZoomTo(NodeId::new("C"))), 1);

        session.select_search_result(&NodeId::new("D"));
        let store = session.store().expect("store");
        assert_eq!(store.node(&NodeId::new("C")).expect("node").color.as_str(), "#00c");
    }

    /// B.3: An older search completing after a newer one does not replace
    /// the newer results.
    #[test]
    fn out_of_order_searches_keep_latest() {
        let mut session = session();
        session.search("kinase", false);
        let (kinase, kinase_request) = take_fetch(&mut session, RequestKind::Search);
        session.search("actin", false);
        let (actin, actin_request) = take_fetch(&mut session, RequestKind::Search);

        let body = json!([{"name": "C", "label": "leaf", "BP Definition": "actin filament binding"}]);
        session.complete(actin, Ok(Response::decode(&actin_request, body).expect("decode")));
        let body = json!([{"name": "B", "label": "middle", "def": "protein kinase activity"}]);
        session.complete(kinase, Ok(Response::decode(&kinase_request, body).expect("decode")));

        let SearchPanel::Results { query, rows } = session.search_panel() else {
            unreachable!("newer search keeps its results");
        };
        assert_eq!(query, "actin");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node_id, NodeId::new("C"));
        assert_eq!(rows[0].snippet("BP Definition"), Some("actin filament binding"));

        let store = session.store().expect("store");
        assert_eq!(store.node(&NodeId::new("C")).expect("node").state, VisualState::Selected);
        assert_eq!(store.node(&NodeId::new("B")).expect("node").state, VisualState::Dimmed);
    }

    /// B.4: A superseded search is dropped even when it completes first.
    #[test]
    fn superseded_search_is_dropped() {
        let mut session = session();
        session.search("kinase", false);
        let (kinase, kinase_request) = take_fetch(&mut session, RequestKind::Search);
        session.search("actin", false);
        session.drain_commands();

        let body = json!([{"name": "B", "def": "protein kinase activity"}]);
        session.complete(kinase, Ok(Response::decode(&kinase_request, body).expect("decode")));

        assert!(matches!(
            session.search_panel(),
            SearchPanel::Pending { query } if query == "actin"
        ));
        assert_eq!(session.store().expect("store").partition().normal.len(), 4);
    }

    /// B.5: Gene searches use the gene endpoint.
    #[test]
    fn gene_search_endpoint() {
        let mut session = session();
        session.search("ACT1", true);
        let (_, request) = take_fetch(&mut session, RequestKind::Search);
        assert_eq!(request.path(), "/search/genes/ACT1");
    }
}

// =============================================================================
// SCENARIO C: EMPTY SEARCH
// =============================================================================

mod scenario_c_no_match {
    use super::*;

    /// C.1: A blank query shows "No Match!" without a request.
    #[test]
    fn blank_query() {
        let mut session = session();
        session.search("   ", false);
        assert!(matches!(session.search_panel(), SearchPanel::NoMatch { .. }));
        assert!(fetch_kinds(&session.drain_commands()).is_empty());
        assert_eq!(session.store().expect("store").partition().normal.len(), 4);
    }

    /// C.2: Zero matches clear the rows and leave the graph alone.
    #[test]
    fn zero_matches() {
        let mut session = session();
        session.search("kinase", false);
        let (ticket, _) = take_fetch(&mut session, RequestKind::Search);
        session.complete(ticket, Ok(Response::Search(Vec::new())));

        assert!(matches!(session.search_panel(), SearchPanel::NoMatch { .. }));
        assert!(session.search_panel().rows().is_empty());
        assert_eq!(session.store().expect("store").partition().normal.len(), 4);
    }

    /// C.3: Records the matcher cannot confirm do not count as matches.
    #[test]
    fn unconfirmed_records() {
        let mut session = session();
        session.search("kinase", false);
        let (ticket, _) = take_fetch(&mut session, RequestKind::Search);
        let body = vec![json!({"name": "A", "label": "kinase"})];
        session.complete(ticket, Ok(Response::Search(body)));

        assert!(matches!(session.search_panel(), SearchPanel::NoMatch { .. }));
    }
}

// =============================================================================
// SCENARIO D: NETWORK SWITCHING
// =============================================================================

mod scenario_d_switching {
    use super::*;

    /// D.1: N1 -> N2 -> N1 leaves one live view wiring, delivered once per
    /// binding.
    #[test]
    fn round_trip_keeps_one_wiring() {
        let mut session = session();
        let nexo = NetworkId::new("NeXO");
        let go = NetworkId::new("GO CC");

        session.switch_network(&go).expect("switch");
        let (ticket, _) = take_fetch(&mut session, RequestKind::NetworkData);
        session.complete(ticket, Ok(Response::NetworkData(go_graph())));
        session.switch_network(&nexo).expect("switch back");
        session.drain_commands();

        let mediator = session.mediator();
        assert_eq!(mediator.count(Scope::View), 6);
        assert_eq!(mediator.count_for(Scope::View, EventKind::NodeSelected), 3);
        assert_eq!(mediator.count(Scope::Persistent), 3);
        assert_eq!(mediator.count_for(Scope::Persistent, EventKind::NetworkLoaded), 1);

        session.node_clicked(&NodeId::new("B")).expect("click");
        let kinds = fetch_kinds(&session.drain_commands());
        assert_eq!(
            kinds,
            vec![RequestKind::Path, RequestKind::Details, RequestKind::Interactions]
        );
    }

    /// D.2: Cached networks are not fetched again.
    #[test]
    fn cached_network_is_not_refetched() {
        let mut session = session();
        session.switch_network(&NetworkId::new("GO CC")).expect("switch");
        let (ticket, _) = take_fetch(&mut session, RequestKind::NetworkData);
        session.complete(ticket, Ok(Response::NetworkData(go_graph())));

        session.switch_network(&NetworkId::new("NeXO")).expect("switch");
        assert!(!fetch_kinds(&session.drain_commands()).contains(&RequestKind::NetworkData));
        assert_eq!(session.store().expect("store").node_count(), 4);
    }

    /// D.3: A path completion for the previous view is dropped.
    #[test]
    fn stale_path_is_dropped() {
        let mut session = session();
        session.node_clicked(&NodeId::new("A")).expect("click");
        let (ticket, request) = take_fetch(&mut session, RequestKind::Path);

        session.switch_network(&NetworkId::new("GO CC")).expect("switch");
        let path = Response::decode(
            &request,
            json!({"elements": {"nodes": [{"data": {"id": "A", "type": "start"}}], "edges": []}}),
        )
        .expect("decode");
        session.complete(ticket, Ok(path));

        let nexo = session
            .registry()
            .get(&NetworkId::new("NeXO"))
            .expect("network");
        assert_eq!(nexo.store.partition().normal.len(), 4);
    }

    /// D.4: Subnetworks are only requested on the NeXO network.
    #[test]
    fn subnetwork_only_on_default_network() {
        let mut session = session();
        session.switch_network(&NetworkId::new("GO CC")).expect("switch");
        let (ticket, _) = take_fetch(&mut session, RequestKind::NetworkData);
        session.complete(ticket, Ok(Response::NetworkData(go_graph())));

        session.node_clicked(&NodeId::new("GO:0005737")).expect("click");
        let kinds = fetch_kinds(&session.drain_commands());
        assert_eq!(kinds, vec![RequestKind::Path, RequestKind::Details]);
    }

    /// D.5: A failed network load is surfaced and can be retried.
    #[test]
    fn failed_load_is_retryable() {
        let mut session = session();
        let go = NetworkId::new("GO CC");
        session.switch_network(&go).expect("switch");
        let (ticket, _) = take_fetch(&mut session, RequestKind::NetworkData);
        session.complete(ticket, Err(FetchFailure::Status(404)));
        assert_eq!(session.take_notices().len(), 1);

        session.switch_network(&NetworkId::new("NeXO")).expect("switch");
        session.switch_network(&go).expect("switch again");
        let (_, request) = take_fetch(&mut session, RequestKind::NetworkData);
        assert_eq!(request.path(), "/front/data/go_cc.json");
    }

    /// D.6: Reselecting the active network after its load failed fetches it
    /// again.
    #[test]
    fn failed_startup_load_retries_on_reselect() {
        let options = SessionOptions { max_retries: 0 };
        let mut session =
            Session::new(&config(), RecordingRenderer::new(), options).expect("session");
        let nexo = NetworkId::new("NeXO");
        let (ticket, _) = take_fetch(&mut session, RequestKind::NetworkData);
        session.complete(ticket, Err(FetchFailure::Status(500)));
        assert_eq!(session.status().load, Some(LoadState::NotLoaded));

        session.switch_network(&nexo).expect("reselect");
        let (ticket, request) = take_fetch(&mut session, RequestKind::NetworkData);
        assert_eq!(request.path(), "/front/data/nexo.json");
        assert_eq!(session.status().load, Some(LoadState::Loading));

        session.complete(ticket, Ok(Response::NetworkData(nexo_graph())));
        assert_eq!(session.active_network(), Some(&nexo));
        assert_eq!(session.status().load, Some(LoadState::Loaded));
        assert_eq!(session.store().expect("store").node_count(), 4);

        session.switch_network(&nexo).expect("reselect loaded");
        assert!(fetch_kinds(&session.drain_commands()).is_empty());
    }
}

// =============================================================================
// DETAILS
// =============================================================================

mod details_panel {
    use super::*;
    use nexo_core::details::GeneTable;

    /// GO terms resolve their assigned genes with a names lookup.
    #[test]
    fn go_term_gene_table() {
        let mut session = session();
        session.switch_network(&NetworkId::new("GO CC")).expect("switch");
        let (ticket, _) = take_fetch(&mut session, RequestKind::NetworkData);
        session.complete(ticket, Ok(Response::NetworkData(go_graph())));

        let node = NodeId::new("GO:0005737");
        session.node_clicked(&node).expect("click");
        let (ticket, request) = take_fetch(&mut session, RequestKind::Details);
        let record = json!({
            "name": "GO:0005737",
            "term name": "cytoplasm",
            "Assigned Gene Ids": ["S000001855", "S000001855"]
        });
        session.complete(ticket, Ok(Response::decode(&request, record).expect("decode")));

        let (ticket, request) = take_fetch(&mut session, RequestKind::Names);
        assert_eq!(request.path(), "/search/names/S000001855");
        let names = json!([{"name": "S000001855", "Assigned Genes": "ACT1"}]);
        session.complete(ticket, Ok(Response::decode(&request, names).expect("decode")));

        let details = session.detail_panel().details().expect("details");
        assert_eq!(details.title, "cytoplasm");
        assert!(matches!(&details.gene_table, GeneTable::Loaded { rows } if rows.len() == 1));
    }

    /// A failed detail fetch is shown in the panel.
    #[test]
    fn failed_details_are_surfaced() {
        let mut session = session();
        session.node_clicked(&NodeId::new("B")).expect("click");
        let (ticket, _) = take_fetch(&mut session, RequestKind::Details);
        session.complete(ticket, Err(FetchFailure::Timeout));

        assert!(matches!(
            session.detail_panel().content,
            nexo_core::details::DetailContent::Failed { .. }
        ));
        assert_eq!(session.notices().len(), 1);
    }
}
