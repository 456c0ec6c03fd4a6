//! # View Synchronization
//!
//! Rebinds the mediator's view-scoped subscriptions whenever the active
//! network changes, so that exactly one wiring between the graph view and the
//! search, detail and subnetwork views is live at any time.
//!
//! ## State Machine
//!
//! ```text
//! Unbound --bind_to(n)--> Bound(n) --bind_to(m)--> Bound(m)
//!    ^                        |
//!    +--------unbind----------+
//! ```

use crate::mediator::{EventKind, EventMediator, Scope, SubscriptionHandle};
use crate::NetworkId;
use serde::Serialize;
use tracing::debug;

// =============================================================================
// BINDINGS
// =============================================================================

/// What a subscription does when its event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reaction {
    /// Load (if needed) and activate the selected network.
    LoadNetwork,
    /// Push a freshly loaded network to the renderer if it is on screen.
    MountView,
    /// Hide the detail panel.
    HideDetails,
    /// Highlight search results without path edges.
    HighlightNodes,
    /// Focus and center the picked search result.
    ZoomTo,
    /// Show the detail panel.
    ShowDetails,
    /// Request the selected node's record.
    FetchDetails,
    /// Request the selected term's interaction subnetwork.
    UpdateSubnetwork,
    /// Restore the graph to its resting state.
    RefreshView,
}

/// A mediator listener: a reaction, tied to the view it was bound against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub reaction: Reaction,
    /// `None` for persistent bindings.
    pub view: Option<NetworkId>,
}

/// Bindings registered once for the session lifetime.
pub const PERSISTENT_BINDINGS: [(EventKind, Reaction); 3] = [
    (EventKind::NetworkSelected, Reaction::LoadNetwork),
    (EventKind::NetworkLoaded, Reaction::MountView),
    (EventKind::Clear, Reaction::HideDetails),
];

/// Bindings registered against the active view on every rebind.
pub const VIEW_BINDINGS: [(EventKind, Reaction); 6] = [
    (EventKind::NodesSelected, Reaction::HighlightNodes),
    (EventKind::SearchResultSelected, Reaction::ZoomTo),
    (EventKind::NodeSelected, Reaction::ShowDetails),
    (EventKind::NodeSelected, Reaction::FetchDetails),
    (EventKind::NodeSelected, Reaction::UpdateSubnetwork),
    (EventKind::Clear, Reaction::RefreshView),
];

/// Register the persistent bindings.
pub fn bind_persistent(mediator: &mut EventMediator<Binding>) -> Vec<SubscriptionHandle> {
    PERSISTENT_BINDINGS
        .iter()
        .map(|(kind, reaction)| {
            mediator.subscribe(
                Scope::Persistent,
                *kind,
                Binding {
                    reaction: *reaction,
                    view: None,
                },
            )
        })
        .collect()
}

// =============================================================================
// COORDINATOR
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum SyncState {
    #[default]
    Unbound,
    Bound(NetworkId),
}

/// Owns the view-scope wiring of the mediator.
#[derive(Debug, Clone, Default)]
pub struct ViewSyncCoordinator {
    state: SyncState,
    handles: Vec<SubscriptionHandle>,
}

impl ViewSyncCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// The network the view bindings currently target.
    #[must_use]
    pub fn bound_network(&self) -> Option<&NetworkId> {
        match &self.state {
            SyncState::Bound(network) => Some(network),
            SyncState::Unbound => None,
        }
    }

    /// Handles of the live view bindings.
    #[must_use]
    pub fn handles(&self) -> &[SubscriptionHandle] {
        &self.handles
    }

    /// Tear down every view binding and register a fresh set against
    /// `network`. Returns how many stale bindings were removed.
    pub fn bind_to(&mut self, mediator: &mut EventMediator<Binding>, network: NetworkId) -> usize {
        let removed = mediator.unsubscribe_all(Scope::View);

        self.handles = VIEW_BINDINGS
            .iter()
            .map(|(kind, reaction)| {
                mediator.subscribe(
                    Scope::View,
                    *kind,
                    Binding {
                        reaction: *reaction,
                        view: Some(network.clone()),
                    },
                )
            })
            .collect();

        debug!(network = %network, removed, bound = self.handles.len(), "view bindings rebuilt");
        self.state = SyncState::Bound(network);
        removed
    }

    /// Tear down every view binding.
    pub fn unbind(&mut self, mediator: &mut EventMediator<Binding>) -> usize {
        self.handles.clear();
        self.state = SyncState::Unbound;
        mediator.unsubscribe_all(Scope::View)
    }
}
