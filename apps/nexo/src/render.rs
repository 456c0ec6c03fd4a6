//! # Terminal Renderer
//!
//! A headless drawing surface: it tracks what would be on screen and reports
//! each change through `tracing`.

use nexo_core::{EdgeId, GraphEdge, GraphNode, GraphStateStore, NodeId, Renderer, RendererStyle};
use std::collections::BTreeSet;

/// Renderer that keeps a shadow of the drawn graph and logs changes.
#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<EdgeId>,
    draws: u64,
    focus: Option<NodeId>,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of repaints since the last reset.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Node the viewport was last centered on.
    #[must_use]
    pub fn focus(&self) -> Option<&NodeId> {
        self.focus.as_ref()
    }
}

impl Renderer for TerminalRenderer {
    fn reset(&mut self, style: Option<&RendererStyle>) {
        self.nodes.clear();
        self.edges.clear();
        self.draws = 0;
        self.focus = None;
        tracing::debug!(styled = style.is_some(), "surface reset");
    }

    fn add_node(&mut self, node: &GraphNode) {
        self.nodes.insert(node.id.clone());
    }

    fn add_edge(&mut self, edge: &GraphEdge) {
        if edge.is_extra {
            tracing::debug!(edge = %edge.id, "overlay edge added");
        }
        self.edges.insert(edge.id.clone());
    }

    fn drop_edge(&mut self, id: &EdgeId) {
        if self.edges.remove(id) {
            tracing::debug!(edge = %id, "overlay edge dropped");
        }
    }

    fn draw(&mut self, store: &GraphStateStore) {
        self.draws = self.draws.saturating_add(1);
        let partition = store.partition();
        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            query = partition.query.len(),
            selected = partition.selected.len(),
            dimmed = partition.dimmed.len(),
            "draw"
        );
    }

    fn fit(&mut self) {
        self.focus = None;
        tracing::debug!("fit to viewport");
    }

    fn zoom_to(&mut self, node: &GraphNode) {
        tracing::debug!(node = %node.id, label = %node.full_label, "zoom");
        self.focus = Some(node.id.clone());
    }
}
