//! # Formats
//!
//! Serde schemas for everything that crosses the service boundary:
//! - `config`: the application configuration document
//! - `records`: typed term and gene records
//! - `wire`: network data, path, parent and interaction payloads

pub mod config;
pub mod records;
pub mod wire;

pub use config::{AppConfig, NetworkConfig, RendererStyle};
pub use records::{GeneRecord, OntologyTermRecord, Record};
pub use wire::{InteractionsResponse, NetworkData, ParentTerm, PathResponse, RawEdge, RawNode};
