//! # Requests
//!
//! The request/response model for asynchronous fetches.
//!
//! The engine never performs I/O. It issues `Command::Fetch` with a `Ticket`
//! and a `Request`; the host executes the request and hands the outcome back
//! with `Session::complete`. Tickets carry the network and generation they
//! were issued under, which is how stale completions are recognized.

use crate::formats::{InteractionsResponse, NetworkData, ParentTerm, PathResponse, Record};
use crate::{FetchFailure, NetworkId, NodeId};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

// =============================================================================
// REQUESTS
// =============================================================================

/// A read-only query against the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum Request {
    /// Base graph of a network.
    NetworkData { network_data: String },
    /// Path from a node to the root.
    Path { node: NodeId },
    /// Parent terms of a node.
    Parents { node: NodeId },
    /// Full-text search, or gene search when `by_genes`.
    Search { query: String, by_genes: bool },
    /// Gene records by name.
    Names { names: Vec<String> },
    /// A node's record.
    Details { node: NodeId },
    /// Interaction subnetwork of a term.
    Interactions { node: NodeId },
}

/// Discriminant of a `Request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequestKind {
    NetworkData,
    Path,
    Parents,
    Search,
    Names,
    Details,
    Interactions,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NetworkData => "network data",
            Self::Path => "path",
            Self::Parents => "parents",
            Self::Search => "search",
            Self::Names => "names",
            Self::Details => "details",
            Self::Interactions => "interactions",
        };
        f.write_str(name)
    }
}

impl Request {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::NetworkData { .. } => RequestKind::NetworkData,
            Self::Path { .. } => RequestKind::Path,
            Self::Parents { .. } => RequestKind::Parents,
            Self::Search { .. } => RequestKind::Search,
            Self::Names { .. } => RequestKind::Names,
            Self::Details { .. } => RequestKind::Details,
            Self::Interactions { .. } => RequestKind::Interactions,
        }
    }

    /// Whether the request belongs to the active view and must be cancelled
    /// when the view changes.
    #[must_use]
    pub fn is_view_scoped(&self) -> bool {
        !matches!(self, Self::NetworkData { .. } | Self::Search { .. })
    }

    /// URL path segments, unescaped.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::NetworkData { network_data } => {
                vec!["front".into(), "data".into(), network_data.clone()]
            }
            Self::Path { node } => vec![node.to_string(), "path".into()],
            Self::Parents { node } => vec!["nexo".into(), node.to_string(), "parents".into()],
            Self::Search { query, by_genes } => {
                if *by_genes {
                    vec!["search".into(), "genes".into(), query.clone()]
                } else {
                    vec!["search".into(), query.clone()]
                }
            }
            Self::Names { names } => vec!["search".into(), "names".into(), names.join(" ")],
            Self::Details { node } => vec![node.to_string()],
            Self::Interactions { node } => vec![node.to_string(), "interactions".into()],
        }
    }

    /// Relative path for display and logging.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    NetworkData(NetworkData),
    Path(PathResponse),
    Parents(Vec<ParentTerm>),
    Search(Vec<Value>),
    Names(Vec<Record>),
    Details(Record),
    Interactions(InteractionsResponse),
}

impl Response {
    /// Decode a JSON body into the response shape of `request`.
    ///
    /// A `null` body is an empty result for list-shaped and path responses.
    pub fn decode(request: &Request, body: Value) -> Result<Self, FetchFailure> {
        fn parse<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, FetchFailure> {
            serde_json::from_value(body).map_err(|e| FetchFailure::Malformed(e.to_string()))
        }

        let body = match (request.kind(), body) {
            (
                RequestKind::Parents | RequestKind::Search | RequestKind::Names,
                Value::Null,
            ) => Value::Array(Vec::new()),
            (RequestKind::Path, Value::Null) => Value::Object(serde_json::Map::new()),
            (_, body) => body,
        };

        Ok(match request.kind() {
            RequestKind::NetworkData => Self::NetworkData(parse(body)?),
            RequestKind::Path => Self::Path(parse(body)?),
            RequestKind::Parents => Self::Parents(parse(body)?),
            RequestKind::Search => Self::Search(parse(body)?),
            RequestKind::Names => Self::Names(parse(body)?),
            RequestKind::Details => Self::Details(parse(body)?),
            RequestKind::Interactions => Self::Interactions(parse(body)?),
        })
    }

    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::NetworkData(_) => RequestKind::NetworkData,
            Self::Path(_) => RequestKind::Path,
            Self::Parents(_) => RequestKind::Parents,
            Self::Search(_) => RequestKind::Search,
            Self::Names(_) => RequestKind::Names,
            Self::Details(_) => RequestKind::Details,
            Self::Interactions(_) => RequestKind::Interactions,
        }
    }
}

// =============================================================================
// TICKETS & COMMANDS
// =============================================================================

/// Identity of one issued request.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket {
    pub id: u64,
    /// Network that was active when the request was issued.
    pub network: NetworkId,
    /// View generation at issue time.
    pub generation: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}/{}", self.id, self.network, self.generation)
    }
}

/// Work the host must perform on behalf of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    /// Execute a request and report back with the same ticket.
    Fetch(Ticket, Request),
    /// Abort a request; its completion will be ignored anyway.
    Cancel(Ticket),
}

// =============================================================================
// FAILURE POLICY
// =============================================================================

/// What to do with a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Issue the request again.
    Retry,
    /// Report the failure to the user.
    Surface,
    /// Leave state unchanged; the failure is only logged.
    Ignore,
}

/// Decide how to handle `failure` after `attempts` tries of a `kind` request.
#[must_use]
pub fn failure_action(
    kind: RequestKind,
    failure: &FetchFailure,
    attempts: u32,
    max_retries: u32,
) -> FailureAction {
    match kind {
        RequestKind::NetworkData | RequestKind::Search => {
            if failure.is_transient() && attempts <= max_retries {
                FailureAction::Retry
            } else {
                FailureAction::Surface
            }
        }
        RequestKind::Details | RequestKind::Names => FailureAction::Surface,
        RequestKind::Path | RequestKind::Parents | RequestKind::Interactions => {
            FailureAction::Ignore
        }
    }
}

/// A failure surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub source: RequestKind,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.source, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_paths() {
        let node = NodeId::new("GO:0005737");
        assert_eq!(Request::Path { node: node.clone() }.path(), "/GO:0005737/path");
        assert_eq!(
            Request::Parents { node: node.clone() }.path(),
            "/nexo/GO:0005737/parents"
        );
        assert_eq!(
            Request::Search {
                query: "act1".into(),
                by_genes: true
            }
            .path(),
            "/search/genes/act1"
        );
        assert_eq!(
            Request::Names {
                names: vec!["ACT1".into(), "CDC28".into()]
            }
            .segments()
            .last()
            .map(String::as_str),
            Some("ACT1 CDC28")
        );
        assert_eq!(
            Request::NetworkData {
                network_data: "nexo.json".into()
            }
            .path(),
            "/front/data/nexo.json"
        );
    }

    #[test]
    fn view_scope() {
        let node = NodeId::new("1");
        assert!(Request::Details { node: node.clone() }.is_view_scoped());
        assert!(Request::Interactions { node }.is_view_scoped());
        assert!(
            !Request::Search {
                query: "x".into(),
                by_genes: false
            }
            .is_view_scoped()
        );
    }

    #[test]
    fn null_bodies_are_empty_results() {
        let parents = Response::decode(
            &Request::Parents {
                node: NodeId::new("1"),
            },
            Value::Null,
        )
        .expect("decode");
        assert_eq!(parents, Response::Parents(Vec::new()));

        let path = Response::decode(
            &Request::Path {
                node: NodeId::new("1"),
            },
            Value::Null,
        )
        .expect("decode");
        assert_eq!(path, Response::Path(PathResponse::default()));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let result = Response::decode(
            &Request::NetworkData {
                network_data: "x".into(),
            },
            json!("not a graph"),
        );
        assert!(matches!(result, Err(FetchFailure::Malformed(_))));
    }

    #[test]
    fn retry_policy() {
        let timeout = FetchFailure::Timeout;
        let status = FetchFailure::Status(500);

        assert_eq!(failure_action(RequestKind::Search, &timeout, 1, 2), FailureAction::Retry);
        assert_eq!(failure_action(RequestKind::Search, &timeout, 3, 2), FailureAction::Surface);
        assert_eq!(failure_action(RequestKind::NetworkData, &status, 1, 2), FailureAction::Surface);
        assert_eq!(failure_action(RequestKind::Details, &timeout, 1, 2), FailureAction::Surface);
        assert_eq!(failure_action(RequestKind::Path, &timeout, 1, 2), FailureAction::Ignore);
    }
}
