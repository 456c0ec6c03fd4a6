//! # Renderer Interface
//!
//! The drawing surface is an external collaborator. The engine computes every
//! visual attribute and tells the renderer what changed; the renderer only
//! draws.

use crate::formats::RendererStyle;
use crate::store::GraphStateStore;
use crate::{EdgeId, GraphEdge, GraphNode, NodeId};

/// A drawing surface for one graph view.
pub trait Renderer {
    /// Clear the surface and apply a network's style parameters.
    fn reset(&mut self, style: Option<&RendererStyle>);

    /// Add a node to the surface.
    fn add_node(&mut self, node: &GraphNode);

    /// Add an edge to the surface.
    fn add_edge(&mut self, edge: &GraphEdge);

    /// Remove an edge from the surface.
    fn drop_edge(&mut self, id: &EdgeId);

    /// Repaint from the current visual state.
    fn draw(&mut self, store: &GraphStateStore);

    /// Fit the whole graph into the viewport.
    fn fit(&mut self);

    /// Center the viewport on a node.
    fn zoom_to(&mut self, node: &GraphNode);
}

/// A call received by a `RecordingRenderer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Reset,
    AddNode(NodeId),
    AddEdge(EdgeId),
    DropEdge(EdgeId),
    Draw,
    Fit,
    ZoomTo(NodeId),
}

/// Renderer that records every call, for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls equal to `call`.
    #[must_use]
    pub fn count(&self, call: &RenderCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Renderer for RecordingRenderer {
    fn reset(&mut self, _style: Option<&RendererStyle>) {
        self.calls.push(RenderCall::Reset);
    }

    fn add_node(&mut self, node: &GraphNode) {
        self.calls.push(RenderCall::AddNode(node.id.clone()));
    }

    fn add_edge(&mut self, edge: &GraphEdge) {
        self.calls.push(RenderCall::AddEdge(edge.id.clone()));
    }

    fn drop_edge(&mut self, id: &EdgeId) {
        self.calls.push(RenderCall::DropEdge(id.clone()));
    }

    fn draw(&mut self, _store: &GraphStateStore) {
        self.calls.push(RenderCall::Draw);
    }

    fn fit(&mut self) {
        self.calls.push(RenderCall::Fit);
    }

    fn zoom_to(&mut self, node: &GraphNode) {
        self.calls.push(RenderCall::ZoomTo(node.id.clone()));
    }
}
