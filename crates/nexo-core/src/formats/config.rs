//! # Application Configuration
//!
//! The JSON document listing the networks the viewer can show. Renderer style
//! parameters are carried through untouched.

use crate::primitives::DEFAULT_NETWORK;
use crate::{NetworkId, NexoError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Renderer-specific style parameters of one network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RendererStyle {
    #[serde(default, rename = "drawingProperties")]
    pub drawing: Value,
    #[serde(default, rename = "graphProperties")]
    pub graph: Value,
    #[serde(default, rename = "mouseProperties")]
    pub mouse: Value,
}

/// One configured network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Display name, also the network id.
    pub name: NetworkId,
    /// Data-source identifier of the network file.
    #[serde(rename = "networkData")]
    pub network_data: String,
    #[serde(default)]
    pub sigma: Option<RendererStyle>,
}

/// The application configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
}

impl AppConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(raw: &str) -> Result<Self, NexoError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| NexoError::InvalidConfig(format!("cannot parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that at least one network is configured and names are unique.
    pub fn validate(&self) -> Result<(), NexoError> {
        if self.networks.is_empty() {
            return Err(NexoError::InvalidConfig("no networks configured".to_string()));
        }

        let mut seen = BTreeSet::new();
        for network in &self.networks {
            if network.network_data.trim().is_empty() {
                return Err(NexoError::InvalidConfig(format!(
                    "network '{}' has no data source",
                    network.name
                )));
            }
            if !seen.insert(&network.name) {
                return Err(NexoError::InvalidConfig(format!(
                    "duplicate network name '{}'",
                    network.name
                )));
            }
        }
        Ok(())
    }

    /// The network loaded at startup: `NeXO` when configured, else the first.
    #[must_use]
    pub fn default_network(&self) -> Option<&NetworkConfig> {
        self.networks
            .iter()
            .find(|network| network.name.as_str() == DEFAULT_NETWORK)
            .or_else(|| self.networks.first())
    }

    /// Look up a network by name.
    #[must_use]
    pub fn network(&self, name: &NetworkId) -> Option<&NetworkConfig> {
        self.networks.iter().find(|network| &network.name == name)
    }
}
