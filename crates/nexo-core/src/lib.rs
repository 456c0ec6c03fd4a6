//! # nexo-core
//!
//! The visual-state engine and cross-view coordinator of the NeXO ontology
//! viewer - THE LOGIC.
//!
//! This crate models what the viewer shows, not how it is drawn:
//! - per-node and per-edge visual state (`store`)
//! - path overlays injected on top of the base network (`overlay`)
//! - search-and-snippet matching over term and gene records (`search`)
//! - a publish/subscribe mediator and the view rebinding on network switches
//!   (`mediator`, `sync`)
//! - the session that ties them together around an injected `Renderer`
//!
//! ## Architectural Constraints
//!
//! - Sans-IO: fetches leave the core as `Command`s and come back through
//!   `Session::complete`; there is NO async and NO network dependency here
//! - Deterministic: `BTreeMap` ordering everywhere iteration order is visible
//! - Missing ids degrade to no-ops, never to panics

// =============================================================================
// MODULES
// =============================================================================

pub mod details;
pub mod formats;
pub mod mediator;
pub mod network;
pub mod overlay;
pub mod primitives;
pub mod renderer;
pub mod requests;
pub mod search;
pub mod session;
pub mod store;
pub mod sync;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Color, EdgeId, EdgeKind, EdgeState, FetchFailure, GraphEdge, GraphNode, HighlightMode,
    NetworkId, NexoError, NodeId, VisualState,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use details::{DetailPanel, NodeDetails, PanelKind, Subnetwork};
pub use mediator::{Event, EventKind, EventMediator, Scope, SubscriptionHandle};
pub use network::{LoadPlan, LoadState, NetworkRegistry, NetworkState};
pub use overlay::{Overlay, OverlayEngine, PathOverlayEngine, PathResult, PathRole};
pub use renderer::{RecordingRenderer, RenderCall, Renderer};
pub use requests::{Command, FailureAction, Notice, Request, RequestKind, Response, Ticket};
pub use search::{Matcher, SearchMatch, SearchPanel, SnippetMatcher};
pub use session::{Session, SessionOptions, SessionStatus};
pub use store::{GraphStateStore, Partition, StateStore};
pub use sync::{Binding, Reaction, SyncState, ViewSyncCoordinator};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{AppConfig, NetworkConfig, NetworkData, Record, RendererStyle};
