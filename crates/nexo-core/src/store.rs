//! # Graph State Store
//!
//! Per-node and per-edge visual state of one network view.
//!
//! This module implements the `StateStore` trait. The store is the only owner
//! of visual attributes; renderers receive a read-only projection through
//! `Renderer::draw`.
//!
//! ## Highlight Cycles
//!
//! A highlight cycle starts with the first `highlight` or `zoom_to` after a
//! `refresh` and ends at the next `refresh`. Within one cycle every element
//! captures its resting color at most once, so any number of nested highlights
//! still restore the true resting color.

use crate::types::truncate_label;
use crate::{EdgeId, EdgeState, GraphEdge, GraphNode, HighlightMode, NetworkData, NodeId, VisualState};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

// =============================================================================
// STATESTORE TRAIT
// =============================================================================

/// Mutation primitives and lookups used by overlays and the session.
///
/// Missing ids are never errors: mutations that name an absent node or edge
/// degrade to no-ops.
pub trait StateStore {
    /// Replace the base graph, resetting every element to its resting state.
    fn set_base_graph(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>);

    /// Insert an overlay edge. Returns `false` (and changes nothing) when an
    /// endpoint is missing or the id is already taken.
    fn add_overlay_edge(&mut self, edge: GraphEdge) -> bool;

    /// Remove every overlay edge, returning the removed ids.
    fn drop_overlay_edges(&mut self) -> Vec<EdgeId>;

    /// Color the graph around a target set.
    fn highlight(&mut self, targets: &BTreeSet<NodeId>, mode: HighlightMode, query: Option<&NodeId>);

    /// Restore every element to its resting state and drop overlay edges.
    /// Returns the ids of the dropped overlay edges.
    fn refresh(&mut self) -> Vec<EdgeId>;

    /// Mark a single node as the zoom focus.
    fn zoom_to(&mut self, id: &NodeId) -> bool;

    /// Check if a node is part of the visible graph.
    fn contains_node(&self, id: &NodeId) -> bool;

    /// `source-target` keys of every base (non-overlay) edge.
    fn base_edge_keys(&self) -> BTreeSet<String>;

    /// Node set of the current highlight.
    fn highlighted(&self) -> &BTreeSet<NodeId>;

    /// Query node of the current highlight, if any.
    fn query_node(&self) -> Option<&NodeId>;
}

// =============================================================================
// PARTITION
// =============================================================================

/// Nodes grouped by visual state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub normal: BTreeSet<NodeId>,
    pub query: BTreeSet<NodeId>,
    pub selected: BTreeSet<NodeId>,
    pub dimmed: BTreeSet<NodeId>,
}

// =============================================================================
// STORE IMPLEMENTATION
// =============================================================================

/// In-memory state store.
///
/// Uses `BTreeMap` so iteration order (and therefore draw order and test
/// output) is stable.
#[derive(Debug, Clone, Default)]
pub struct GraphStateStore {
    nodes: BTreeMap<NodeId, GraphNode>,
    edges: BTreeMap<EdgeId, GraphEdge>,
    focus: BTreeSet<NodeId>,
    query: Option<NodeId>,
    last_zoomed: Option<NodeId>,
}

impl GraphStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from network data; base edges are numbered in load order.
    #[must_use]
    pub fn from_network_data(data: &NetworkData) -> Self {
        let mut store = Self::new();
        store.load(data);
        store
    }

    /// Replace the base graph with the given network data.
    pub fn load(&mut self, data: &NetworkData) {
        let nodes = data.nodes.iter().map(|node| node.to_graph_node()).collect();
        let edges = data
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| edge.to_graph_edge(index))
            .collect();
        self.set_base_graph(nodes, edges);
    }

    /// Lookup a node.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Lookup an edge.
    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// All edges (base and overlay) in id order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    /// Overlay edges only.
    pub fn overlay_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values().filter(|edge| edge.is_extra)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The node last focused by `zoom_to`.
    #[must_use]
    pub fn last_zoomed(&self) -> Option<&NodeId> {
        self.last_zoomed.as_ref()
    }

    /// Group nodes by visual state.
    #[must_use]
    pub fn partition(&self) -> Partition {
        let mut partition = Partition::default();
        for node in self.nodes.values() {
            let bucket = match node.state {
                VisualState::Normal => &mut partition.normal,
                VisualState::Query => &mut partition.query,
                VisualState::Selected => &mut partition.selected,
                VisualState::Dimmed => &mut partition.dimmed,
            };
            bucket.insert(node.id.clone());
        }
        partition
    }

    /// Ids of the visible nodes among `ids`.
    #[must_use]
    pub fn visible<'a>(&self, ids: impl IntoIterator<Item = &'a NodeId>) -> BTreeSet<NodeId> {
        ids.into_iter()
            .filter(|id| self.nodes.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Find a node whose id or full label equals `needle` (labels compared
    /// case-insensitively).
    #[must_use]
    pub fn find_node(&self, needle: &str) -> Option<&GraphNode> {
        self.nodes.get(&NodeId::new(needle)).or_else(|| {
            let folded = needle.to_lowercase();
            self.nodes
                .values()
                .find(|node| node.full_label.to_lowercase() == folded)
        })
    }
}

impl StateStore for GraphStateStore {
    fn set_base_graph(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
        self.nodes = nodes
            .into_iter()
            .map(|mut node| {
                node.label = truncate_label(&node.full_label);
                node.restore();
                (node.id.clone(), node)
            })
            .collect();
        self.edges = edges
            .into_iter()
            .map(|mut edge| {
                edge.restore();
                edge.is_extra = false;
                (edge.id.clone(), edge)
            })
            .collect();
        self.focus.clear();
        self.query = None;
        self.last_zoomed = None;

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "base graph replaced"
        );
    }

    fn add_overlay_edge(&mut self, mut edge: GraphEdge) -> bool {
        if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
            debug!(edge = %edge.id, "overlay edge skipped: missing endpoint");
            return false;
        }
        if self.edges.contains_key(&edge.id) {
            return false;
        }
        edge.is_extra = true;
        self.edges.insert(edge.id.clone(), edge);
        true
    }

    fn drop_overlay_edges(&mut self) -> Vec<EdgeId> {
        let dropped: Vec<EdgeId> = self.overlay_edges().map(|edge| edge.id.clone()).collect();
        for id in &dropped {
            self.edges.remove(id);
        }
        dropped
    }

    fn highlight(&mut self, targets: &BTreeSet<NodeId>, mode: HighlightMode, query: Option<&NodeId>) {
        // Capture every resting color before any marker is applied.
        for edge in self.edges.values_mut() {
            edge.capture_color();
        }
        for node in self.nodes.values_mut() {
            node.capture_color();
        }

        for edge in self.edges.values_mut() {
            let state = match mode {
                HighlightMode::NodesOnly => EdgeState::Dimmed,
                HighlightMode::Path => {
                    if !targets.contains(&edge.source) || !targets.contains(&edge.target) {
                        EdgeState::Dimmed
                    } else if edge.is_extra {
                        EdgeState::ExtraSelected
                    } else {
                        EdgeState::Selected
                    }
                }
            };
            edge.set_state(state);
        }

        for node in self.nodes.values_mut() {
            let state = if query == Some(&node.id) {
                VisualState::Query
            } else if targets.contains(&node.id) {
                VisualState::Selected
            } else {
                VisualState::Dimmed
            };
            node.set_state(state);
        }

        self.focus = targets.clone();
        self.query = query.cloned();

        debug!(targets = targets.len(), ?mode, query = ?query, "highlight applied");
    }

    fn refresh(&mut self) -> Vec<EdgeId> {
        let dropped = self.drop_overlay_edges();
        for edge in self.edges.values_mut() {
            edge.restore();
        }
        for node in self.nodes.values_mut() {
            node.restore();
        }
        self.focus.clear();
        self.query = None;
        self.last_zoomed = None;
        dropped
    }

    fn zoom_to(&mut self, id: &NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            debug!(node = %id, "zoom target not in view");
            return false;
        }

        if let Some(previous) = self.last_zoomed.take()
            && let Some(node) = self.nodes.get_mut(&previous)
        {
            node.restore();
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.set_state(VisualState::Query);
        }
        self.last_zoomed = Some(id.clone());
        true
    }

    fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn base_edge_keys(&self) -> BTreeSet<String> {
        self.edges
            .values()
            .filter(|edge| !edge.is_extra)
            .map(GraphEdge::key)
            .collect()
    }

    fn highlighted(&self) -> &BTreeSet<NodeId> {
        &self.focus
    }

    fn query_node(&self) -> Option<&NodeId> {
        self.query.as_ref()
    }
}

// =============================================================================
// TESTS
// =============================================================================
