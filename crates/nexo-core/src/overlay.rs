//! # Path Overlay
//!
//! Turns a path query result into overlay edges and a highlight set.
//!
//! Path segments that the base drawing lacks are injected as transient
//! `extra` edges. Overlays never accumulate: each `show_path` drops the
//! previous overlay before adding the new one.

use crate::store::StateStore;
use crate::types::edge_key;
use crate::{EdgeId, GraphEdge, HighlightMode, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

// =============================================================================
// PATH RESULT
// =============================================================================

/// Role of a node within a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathRole {
    /// The query focus.
    Start,
    /// Any other node on the path.
    Member,
}

impl PathRole {
    /// Interpret the wire `type` tag.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        if tag == Some("start") {
            Self::Start
        } else {
            Self::Member
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: NodeId,
    pub role: PathRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Result of a path query, consumed once by the overlay engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub nodes: Vec<PathNode>,
    pub edges: Vec<PathEdge>,
}

impl PathResult {
    /// Id of the node tagged `start`.
    #[must_use]
    pub fn start(&self) -> Option<&NodeId> {
        self.nodes
            .iter()
            .find(|node| node.role == PathRole::Start)
            .map(|node| &node.id)
    }
}

/// What a path adds to the view.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub edges: Vec<GraphEdge>,
    pub highlight: BTreeSet<NodeId>,
    pub start: NodeId,
}

/// Outcome of `show_path`, used by callers to sync the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayChange {
    pub dropped: Vec<EdgeId>,
    pub added: Vec<GraphEdge>,
}

// =============================================================================
// OVERLAY ENGINE
// =============================================================================

/// Computes and applies path overlays on a state store.
pub trait OverlayEngine {
    /// Compute the overlay without touching the store.
    fn compute_overlay<S: StateStore>(&self, path: &PathResult, store: &S) -> Option<Overlay>;

    /// Replace the current overlay with the one for `path` and highlight it.
    /// Returns `None`, leaving the store untouched, when the path yields
    /// nothing visible.
    fn show_path<S: StateStore>(&self, path: &PathResult, store: &mut S) -> Option<OverlayChange> {
        let overlay = self.compute_overlay(path, store)?;

        let dropped = store.drop_overlay_edges();
        let added: Vec<GraphEdge> = overlay
            .edges
            .into_iter()
            .filter(|edge| store.add_overlay_edge(edge.clone()))
            .collect();
        store.highlight(&overlay.highlight, HighlightMode::Path, Some(&overlay.start));

        debug!(
            start = %overlay.start,
            nodes = overlay.highlight.len(),
            added = added.len(),
            "path overlay shown"
        );
        Some(OverlayChange { dropped, added })
    }

    /// Add visible parent terms to the current highlight and re-highlight it,
    /// keeping the current query node. Returns `false` if nothing changed.
    fn extend_with_parents<S: StateStore>(&self, parents: &[NodeId], store: &mut S) -> bool {
        let mut targets = store.highlighted().clone();
        let before = targets.len();
        targets.extend(
            parents
                .iter()
                .filter(|id| store.contains_node(id))
                .cloned(),
        );
        if targets.len() == before {
            return false;
        }

        let query = store.query_node().cloned();
        store.highlight(&targets, HighlightMode::Path, query.as_ref());
        true
    }
}

/// The overlay engine used by the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOverlayEngine;

impl OverlayEngine for PathOverlayEngine {
    fn compute_overlay<S: StateStore>(&self, path: &PathResult, store: &S) -> Option<Overlay> {
        if path.nodes.is_empty() {
            return None;
        }

        let start = path
            .nodes
            .iter()
            .find(|node| node.role == PathRole::Start && store.contains_node(&node.id))?
            .id
            .clone();

        let highlight: BTreeSet<NodeId> = path
            .nodes
            .iter()
            .filter(|node| store.contains_node(&node.id))
            .map(|node| node.id.clone())
            .collect();

        let existing = store.base_edge_keys();
        let mut seen = BTreeSet::new();
        let edges = path
            .edges
            .iter()
            .filter(|edge| store.contains_node(&edge.source) && store.contains_node(&edge.target))
            .filter(|edge| {
                let key = edge_key(&edge.source, &edge.target);
                !existing.contains(&key) && seen.insert(key)
            })
            .map(|edge| GraphEdge::overlay(edge.source.clone(), edge.target.clone()))
            .collect();

        Some(Overlay {
            edges,
            highlight,
            start,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
