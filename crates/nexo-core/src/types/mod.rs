//! # Core Type Definitions
//!
//! This module contains the core types shared by every part of the engine:
//! - Identifiers (`NodeId`, `EdgeId`, `NetworkId`)
//! - Visual attributes (`Color`, `VisualState`, `EdgeState`, `EdgeKind`)
//! - Graph elements as seen by the state store (`GraphNode`, `GraphEdge`)
//! - Error types (`NexoError`, `FetchFailure`)
//!
//! ## Ordering Guarantees
//!
//! Identifiers implement `Ord` so that stores keyed by them iterate in a
//! stable order, which keeps snapshots and test output reproducible.

use crate::primitives::{
    DEFAULT_EDGE_COLOR, DEFAULT_NODE_COLOR, DIM_COLOR, ELLIPSIS, EXTRA_EDGE_LABEL,
    EXTRA_EDGE_WEIGHT, EXTRA_SELECTED_COLOR, LABEL_LENGTH_THRESHOLD, QUERY_NODE_COLOR,
    SELECTED_NODE_COLOR,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a node, stable and unique within one network.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of an edge.
///
/// Base edges use their load index (`"0"`, `"1"`, ...); overlay edges use the
/// `source-target` composite key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Id of the base edge at the given load index.
    #[must_use]
    pub fn indexed(index: usize) -> Self {
        Self(index.to_string())
    }

    /// Composite `source-target` id used for overlay edges.
    #[must_use]
    pub fn composite(source: &NodeId, target: &NodeId) -> Self {
        Self(edge_key(source, target))
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite identity of a directed edge, `source-target`.
#[must_use]
pub fn edge_key(source: &NodeId, target: &NodeId) -> String {
    format!("{}-{}", source.0, target.0)
}

/// Identifier of a configured network (its display name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub String);

impl NetworkId {
    /// Create a network id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// VISUAL ATTRIBUTES
// =============================================================================

/// A renderer color, kept as the CSS color string the drawing surface expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    /// Create a color from a CSS color string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Marker color for elements outside the current focus.
    #[must_use]
    pub fn dimmed() -> Self {
        Self::new(DIM_COLOR)
    }

    /// Marker color for selected nodes and path edges.
    #[must_use]
    pub fn selected() -> Self {
        Self::new(SELECTED_NODE_COLOR)
    }

    /// Marker color for the query node.
    #[must_use]
    pub fn query() -> Self {
        Self::new(QUERY_NODE_COLOR)
    }

    /// Tint for overlay edges that lie on the highlighted path.
    #[must_use]
    pub fn extra_selected() -> Self {
        Self::new(EXTRA_SELECTED_COLOR)
    }

    /// Get the color as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visual state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum VisualState {
    /// Resting state.
    #[default]
    Normal,
    /// Part of the current focus.
    Selected,
    /// Outside the current focus.
    Dimmed,
    /// The node a path or zoom is centered on.
    Query,
}

/// Visual state of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum EdgeState {
    /// Resting state.
    #[default]
    Normal,
    /// Base edge on the highlighted path.
    Selected,
    /// Overlay edge on the highlighted path.
    ExtraSelected,
    /// Outside the current focus.
    Dimmed,
}

/// How the renderer should draw an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Straight line (base edges).
    #[default]
    Line,
    /// Curved line (overlay edges).
    Curve,
}

/// Highlight mode.
///
/// `Path` colors edges by path membership; `NodesOnly` (search selection)
/// dims every edge and only highlights nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// Path highlighting: edges between target nodes stay lit.
    Path,
    /// Node selection: every edge is dimmed.
    NodesOnly,
}

// =============================================================================
// GRAPH ELEMENTS
// =============================================================================

/// A node as owned by the state store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node id.
    pub id: NodeId,
    /// Display label, truncated past `LABEL_LENGTH_THRESHOLD` characters.
    pub label: String,
    /// The untruncated label.
    pub full_label: String,
    /// Color currently drawn.
    pub color: Color,
    /// Resting color captured at the start of the current highlight cycle.
    pub saved_color: Option<Color>,
    /// Current visual state.
    pub state: VisualState,
    /// Whether the renderer must draw the label regardless of zoom.
    pub force_label: bool,
    /// Layout position and size, passed through to the renderer.
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub size: Option<f64>,
}

impl GraphNode {
    /// Create a resting node, truncating the label when it is too long.
    #[must_use]
    pub fn new(id: NodeId, label: &str, color: Option<Color>) -> Self {
        Self {
            id,
            label: truncate_label(label),
            full_label: label.to_string(),
            color: color.unwrap_or_else(|| Color::new(DEFAULT_NODE_COLOR)),
            saved_color: None,
            state: VisualState::Normal,
            force_label: false,
            x: None,
            y: None,
            size: None,
        }
    }

    /// Remember the resting color unless one was already captured this cycle.
    pub fn capture_color(&mut self) {
        if self.saved_color.is_none() {
            self.saved_color = Some(self.color.clone());
        }
    }

    /// Return to the resting color and state.
    pub fn restore(&mut self) {
        if let Some(saved) = self.saved_color.take() {
            self.color = saved;
        }
        self.state = VisualState::Normal;
        self.force_label = false;
    }

    /// Apply a visual state, with its marker color and label flag.
    pub fn set_state(&mut self, state: VisualState) {
        self.capture_color();
        self.color = match state {
            VisualState::Normal => self.saved_color.clone().unwrap_or_else(|| self.color.clone()),
            VisualState::Selected => Color::selected(),
            VisualState::Dimmed => Color::dimmed(),
            VisualState::Query => Color::query(),
        };
        self.force_label = matches!(state, VisualState::Selected | VisualState::Query);
        self.state = state;
    }
}

/// Truncate a label to `LABEL_LENGTH_THRESHOLD` characters plus an ellipsis.
#[must_use]
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > LABEL_LENGTH_THRESHOLD {
        let mut truncated: String = label.chars().take(LABEL_LENGTH_THRESHOLD).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        label.to_string()
    }
}

/// An edge as owned by the state store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Edge id.
    pub id: EdgeId,
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// Relationship name, or `"extra"` for overlay edges.
    pub label: String,
    /// Edge weight as supplied by the data source.
    pub weight: f64,
    /// Color currently drawn.
    pub color: Color,
    /// Resting color captured at the start of the current highlight cycle.
    pub saved_color: Option<Color>,
    /// Current visual state.
    pub state: EdgeState,
    /// Render kind.
    pub kind: EdgeKind,
    /// True iff the edge was injected by a path overlay.
    pub is_extra: bool,
}

impl GraphEdge {
    /// Create a resting base edge.
    #[must_use]
    pub fn base(
        index: usize,
        source: NodeId,
        target: NodeId,
        label: impl Into<String>,
        weight: f64,
        color: Option<Color>,
    ) -> Self {
        Self {
            id: EdgeId::indexed(index),
            source,
            target,
            label: label.into(),
            weight,
            color: color.unwrap_or_else(|| Color::new(DEFAULT_EDGE_COLOR)),
            saved_color: None,
            state: EdgeState::Normal,
            kind: EdgeKind::Line,
            is_extra: false,
        }
    }

    /// Create an overlay edge for a path segment missing from the base graph.
    #[must_use]
    pub fn overlay(source: NodeId, target: NodeId) -> Self {
        Self {
            id: EdgeId::composite(&source, &target),
            source,
            target,
            label: EXTRA_EDGE_LABEL.to_string(),
            weight: EXTRA_EDGE_WEIGHT,
            color: Color::new(DEFAULT_EDGE_COLOR),
            saved_color: None,
            state: EdgeState::Normal,
            kind: EdgeKind::Curve,
            is_extra: true,
        }
    }

    /// Composite `source-target` identity.
    #[must_use]
    pub fn key(&self) -> String {
        edge_key(&self.source, &self.target)
    }

    /// Remember the resting color unless one was already captured this cycle.
    pub fn capture_color(&mut self) {
        if self.saved_color.is_none() {
            self.saved_color = Some(self.color.clone());
        }
    }

    /// Return to the resting color and state.
    pub fn restore(&mut self) {
        if let Some(saved) = self.saved_color.take() {
            self.color = saved;
        }
        self.state = EdgeState::Normal;
    }

    /// Apply a visual state with its marker color.
    pub fn set_state(&mut self, state: EdgeState) {
        self.capture_color();
        self.color = match state {
            EdgeState::Normal => self.saved_color.clone().unwrap_or_else(|| self.color.clone()),
            EdgeState::Selected => Color::selected(),
            EdgeState::ExtraSelected => Color::extra_selected(),
            EdgeState::Dimmed => Color::dimmed(),
        };
        self.state = state;
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Explicit failure signal for an asynchronous fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The data service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The data service answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The response body could not be interpreted.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl FetchFailure {
    /// Whether the failure is transient and worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }
}

/// Errors that can occur in the NeXO engine.
///
/// Missing lookups inside highlight/overlay operations are not errors; they
/// degrade to no-ops. These variants cover what callers must handle.
#[derive(Debug, Error)]
pub enum NexoError {
    /// The requested network is not configured.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// The requested node is not part of the visible graph.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The application configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A payload could not be parsed into the expected shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// An asynchronous fetch failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchFailure),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
