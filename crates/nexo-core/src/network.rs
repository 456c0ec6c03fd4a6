//! # Network Registry
//!
//! One `NetworkState` per configured network, with memoized loading.
//!
//! Each network keeps its own state store, so switching away from a network
//! and back finds its graph, overlay and zoom focus exactly as they were left.
//! Loading is idempotent: once a network is `Loaded`, its data is never
//! fetched again.

use crate::formats::{AppConfig, NetworkConfig};
use crate::store::GraphStateStore;
use crate::{NetworkData, NetworkId, NexoError};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Loading status of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
}

/// What the caller must do to get a network's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPlan {
    /// Data is cached; activate right away.
    Cached,
    /// A fetch is already under way.
    InFlight,
    /// Fetch the given data source.
    Fetch { network_data: String },
}

/// Per-network state.
#[derive(Debug, Clone)]
pub struct NetworkState {
    pub config: NetworkConfig,
    pub load: LoadState,
    pub store: GraphStateStore,
}

impl NetworkState {
    #[must_use]
    pub fn id(&self) -> &NetworkId {
        &self.config.name
    }
}

/// All configured networks and the active one.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: BTreeMap<NetworkId, NetworkState>,
    order: Vec<NetworkId>,
    default: NetworkId,
    active: Option<NetworkId>,
}

impl NetworkRegistry {
    /// Build the registry from a validated configuration.
    pub fn new(config: &AppConfig) -> Result<Self, NexoError> {
        config.validate()?;
        let default = config
            .default_network()
            .map(|network| network.name.clone())
            .ok_or_else(|| NexoError::InvalidConfig("no networks configured".to_string()))?;

        let order: Vec<NetworkId> = config.networks.iter().map(|n| n.name.clone()).collect();
        let networks = config
            .networks
            .iter()
            .map(|network| {
                (
                    network.name.clone(),
                    NetworkState {
                        config: network.clone(),
                        load: LoadState::NotLoaded,
                        store: GraphStateStore::new(),
                    },
                )
            })
            .collect();

        Ok(Self {
            networks,
            order,
            default,
            active: None,
        })
    }

    /// The network loaded at startup.
    #[must_use]
    pub fn default_network(&self) -> &NetworkId {
        &self.default
    }

    /// Networks in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkState> {
        self.order.iter().filter_map(|id| self.networks.get(id))
    }

    #[must_use]
    pub fn get(&self, id: &NetworkId) -> Option<&NetworkState> {
        self.networks.get(id)
    }

    fn get_mut(&mut self, id: &NetworkId) -> Result<&mut NetworkState, NexoError> {
        self.networks
            .get_mut(id)
            .ok_or_else(|| NexoError::UnknownNetwork(id.to_string()))
    }

    /// Decide how to obtain a network's data, marking it `Loading` when a
    /// fetch is needed.
    pub fn begin_load(&mut self, id: &NetworkId) -> Result<LoadPlan, NexoError> {
        let network = self.get_mut(id)?;
        Ok(match network.load {
            LoadState::Loaded => LoadPlan::Cached,
            LoadState::Loading => LoadPlan::InFlight,
            LoadState::NotLoaded => {
                network.load = LoadState::Loading;
                LoadPlan::Fetch {
                    network_data: network.config.network_data.clone(),
                }
            }
        })
    }

    /// Cache loaded data, whether or not the network is still active.
    pub fn complete_load(&mut self, id: &NetworkId, data: &NetworkData) -> Result<(), NexoError> {
        let network = self.get_mut(id)?;
        network.store.load(data);
        network.load = LoadState::Loaded;
        info!(
            network = %id,
            nodes = data.nodes.len(),
            edges = data.edges.len(),
            "network loaded"
        );
        Ok(())
    }

    /// Return a network to `NotLoaded` so a later selection retries.
    pub fn fail_load(&mut self, id: &NetworkId) -> Result<(), NexoError> {
        let network = self.get_mut(id)?;
        network.load = LoadState::NotLoaded;
        Ok(())
    }

    /// Make a network the active one.
    pub fn activate(&mut self, id: &NetworkId) -> Result<(), NexoError> {
        if !self.networks.contains_key(id) {
            return Err(NexoError::UnknownNetwork(id.to_string()));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&NetworkId> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn active(&self) -> Option<&NetworkState> {
        self.active.as_ref().and_then(|id| self.networks.get(id))
    }

    /// State store of the active network.
    #[must_use]
    pub fn active_store(&self) -> Option<&GraphStateStore> {
        self.active().map(|network| &network.store)
    }

    /// Mutable state store of the active network, only once it is loaded.
    pub fn active_store_mut(&mut self) -> Option<&mut GraphStateStore> {
        let id = self.active.as_ref()?;
        self.networks
            .get_mut(id)
            .filter(|network| network.load == LoadState::Loaded)
            .map(|network| &mut network.store)
    }

    /// Whether the given network is active and loaded.
    #[must_use]
    pub fn is_active_and_loaded(&self, id: &NetworkId) -> bool {
        self.active.as_ref() == Some(id)
            && self
                .networks
                .get(id)
                .is_some_and(|network| network.load == LoadState::Loaded)
    }
}
