//! # nexo
//!
//! Client side of the NeXO ontology viewer: the data client, the fetch
//! runtime that drives a `nexo_core::Session`, settings, and the CLI.

pub mod cli;
pub mod client;
pub mod render;
pub mod runtime;
pub mod settings;

pub use client::{ClientError, NexoClient};
pub use render::TerminalRenderer;
pub use runtime::Runtime;
pub use settings::{LogFormat, Settings};
