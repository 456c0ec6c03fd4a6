//! # Service Payloads
//!
//! JSON shapes returned by the data service for network data, path queries,
//! parent queries and subnetwork interactions.

use crate::overlay::{PathEdge, PathNode, PathResult, PathRole};
use crate::{Color, GraphEdge, GraphNode, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// NETWORK DATA
// =============================================================================

/// Base graph of a network, as stored by the data service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

/// A node of the stored network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
}

impl RawNode {
    /// Convert into a resting store node; nodes without a label show their id.
    #[must_use]
    pub fn to_graph_node(&self) -> GraphNode {
        let label = self.label.as_deref().unwrap_or(self.id.as_str());
        let mut node = GraphNode::new(self.id.clone(), label, self.color.clone().map(Color::new));
        node.x = self.x;
        node.y = self.y;
        node.size = self.size;
        node
    }
}

/// An edge of the stored network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub relationship: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

impl RawEdge {
    /// Convert into a resting store edge with the given load index.
    #[must_use]
    pub fn to_graph_edge(&self, index: usize) -> GraphEdge {
        GraphEdge::base(
            index,
            self.source.clone(),
            self.target.clone(),
            self.relationship.clone(),
            self.weight,
            self.color.clone().map(Color::new),
        )
    }
}

// =============================================================================
// PATH RESPONSE
// =============================================================================

/// Cytoscape-style element wrapper: `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNodeData {
    pub id: NodeId,
    #[serde(default, rename = "type")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEdgeData {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathElements {
    #[serde(default)]
    pub nodes: Vec<Element<PathNodeData>>,
    #[serde(default)]
    pub edges: Vec<Element<PathEdgeData>>,
}

/// Response of the path query for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathResponse {
    #[serde(default)]
    pub elements: Option<PathElements>,
}

impl PathResponse {
    /// Convert into a path result; `None` when the response has no path data.
    #[must_use]
    pub fn into_path_result(self) -> Option<PathResult> {
        let elements = self.elements?;
        if elements.nodes.is_empty() {
            return None;
        }

        let nodes = elements
            .nodes
            .into_iter()
            .map(|element| PathNode {
                role: PathRole::from_tag(element.data.role.as_deref()),
                id: element.data.id,
            })
            .collect();
        let edges = elements
            .edges
            .into_iter()
            .map(|element| PathEdge {
                source: element.data.source,
                target: element.data.target,
            })
            .collect();

        Some(PathResult { nodes, edges })
    }
}

// =============================================================================
// PARENTS & INTERACTIONS
// =============================================================================

/// One entry of the parent-term query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentTerm {
    pub name: NodeId,
}

/// Response of the interactions query behind the subnetwork view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionsResponse {
    #[serde(default)]
    pub graph: InteractionGraph,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionGraph {
    #[serde(default)]
    pub elements: Value,
}

impl InteractionsResponse {
    /// Number of `(nodes, edges)` in the interaction elements.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        let count = |key: &str| {
            self.graph
                .elements
                .get(key)
                .and_then(Value::as_array)
                .map_or(0, Vec::len)
        };
        (count("nodes"), count("edges"))
    }
}

// =============================================================================
// TESTS
// =============================================================================
