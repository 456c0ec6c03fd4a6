//! # Event Mediator
//!
//! Typed publish/subscribe bus used to wire independent views together.
//!
//! Subscriptions belong to a `Scope`. Persistent bindings live for the whole
//! session; view bindings connect the active graph view to the search,
//! detail and subnetwork views and are torn down as a batch whenever the
//! active network changes.
//!
//! Delivery is synchronous and in subscription order. The listener payload is
//! generic so callers decide what a binding carries (a closure, a reaction
//! tag, a channel sender, ...).

use crate::{NetworkId, NodeId};
use serde::Serialize;
use std::fmt;

// =============================================================================
// EVENTS
// =============================================================================

/// Lifetime of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Scope {
    Persistent,
    View,
}

/// Discriminant of an `Event`, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EventKind {
    NetworkLoaded,
    NetworkSelected,
    NodeSelected,
    NodesSelected,
    SearchResultSelected,
    Clear,
}

/// An event published on the mediator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Event {
    /// Network data finished loading.
    NetworkLoaded(NetworkId),
    /// The user picked another network.
    NetworkSelected(NetworkId),
    /// A node was clicked in the graph view.
    NodeSelected(NodeId),
    /// A search produced these result nodes.
    NodesSelected(Vec<NodeId>),
    /// A row of the search result table was picked.
    SearchResultSelected(NodeId),
    /// The search panel was cleared.
    Clear,
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NetworkLoaded(_) => EventKind::NetworkLoaded,
            Self::NetworkSelected(_) => EventKind::NetworkSelected,
            Self::NodeSelected(_) => EventKind::NodeSelected,
            Self::NodesSelected(_) => EventKind::NodesSelected,
            Self::SearchResultSelected(_) => EventKind::SearchResultSelected,
            Self::Clear => EventKind::Clear,
        }
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// Handle returned by `subscribe`, used to remove a single binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionHandle(u64);

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Subscription<L> {
    handle: SubscriptionHandle,
    scope: Scope,
    kind: EventKind,
    listener: L,
}

/// The publish/subscribe bus.
#[derive(Debug, Clone)]
pub struct EventMediator<L> {
    subscriptions: Vec<Subscription<L>>,
    next_handle: u64,
}

impl<L> Default for EventMediator<L> {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<L> EventMediator<L> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`.
    pub fn subscribe(&mut self, scope: Scope, kind: EventKind, listener: L) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.subscriptions.push(Subscription {
            handle,
            scope,
            kind,
            listener,
        });
        handle
    }

    /// Remove one binding. Returns `false` if the handle is not live.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.handle != handle);
        self.subscriptions.len() != before
    }

    /// Remove every binding of a scope. Returns how many were removed.
    pub fn unsubscribe_all(&mut self, scope: Scope) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.scope != scope);
        before - self.subscriptions.len()
    }

    /// Deliver `event` to every subscriber of its kind, in subscription
    /// order. Returns the number of deliveries.
    pub fn publish<F>(&self, event: &Event, mut deliver: F) -> usize
    where
        F: FnMut(&L, &Event),
    {
        let kind = event.kind();
        let mut delivered = 0;
        for sub in self.subscriptions.iter().filter(|sub| sub.kind == kind) {
            deliver(&sub.listener, event);
            delivered += 1;
        }
        delivered
    }

    /// Number of live bindings in a scope.
    #[must_use]
    pub fn count(&self, scope: Scope) -> usize {
        self.subscriptions.iter().filter(|sub| sub.scope == scope).count()
    }

    /// Number of live bindings of a scope for one event kind.
    #[must_use]
    pub fn count_for(&self, scope: Scope, kind: EventKind) -> usize {
        self.subscriptions
            .iter()
            .filter(|sub| sub.scope == scope && sub.kind == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_subscription_order() {
        let mut mediator = EventMediator::new();
        mediator.subscribe(Scope::View, EventKind::Clear, "first");
        mediator.subscribe(Scope::Persistent, EventKind::Clear, "second");
        mediator.subscribe(Scope::View, EventKind::NodeSelected, "other");

        let mut seen = Vec::new();
        let delivered = mediator.publish(&Event::Clear, |listener, _| seen.push(*listener));

        assert_eq!(delivered, 2);
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_all_is_scoped_and_idempotent() {
        let mut mediator = EventMediator::new();
        mediator.subscribe(Scope::View, EventKind::Clear, 1);
        mediator.subscribe(Scope::View, EventKind::NodeSelected, 2);
        mediator.subscribe(Scope::Persistent, EventKind::Clear, 3);

        assert_eq!(mediator.unsubscribe_all(Scope::View), 2);
        assert_eq!(mediator.unsubscribe_all(Scope::View), 0);
        assert_eq!(mediator.count(Scope::Persistent), 1);
    }

    #[test]
    fn unsubscribe_single_handle() {
        let mut mediator = EventMediator::new();
        let handle = mediator.subscribe(Scope::View, EventKind::Clear, ());
        assert!(mediator.unsubscribe(handle));
        assert!(!mediator.unsubscribe(handle));
        assert_eq!(mediator.publish(&Event::Clear, |_, _| {}), 0);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut mediator = EventMediator::new();
        let first = mediator.subscribe(Scope::View, EventKind::Clear, ());
        mediator.unsubscribe_all(Scope::View);
        let second = mediator.subscribe(Scope::View, EventKind::Clear, ());
        assert_ne!(first, second);
    }
}
