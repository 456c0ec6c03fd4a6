//! # Client Settings
//!
//! TOML settings for the viewer client. Precedence, lowest first: built-in
//! defaults, the settings file, `NEXO_*` environment variables, CLI flags.
//!
//! ```toml
//! base_url = "http://localhost:8080"
//! config = "app-config.json"
//! request_timeout_secs = 30
//! max_retries = 2
//! log_format = "json"
//! ```

use nexo_core::NexoError;
use nexo_core::session::DEFAULT_MAX_RETRIES;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default data service URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum settings file size (1 MB).
const MAX_SETTINGS_FILE_SIZE: u64 = 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse a format name; anything but `json` is text.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Data service base URL.
    pub base_url: String,
    /// Local application configuration; fetched from the service when unset.
    pub config: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            config: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            log_format: LogFormat::Text,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self, NexoError> {
        toml::from_str(raw).map_err(|e| NexoError::InvalidConfig(format!("settings: {e}")))
    }

    /// Read a settings file. A missing path yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, NexoError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            NexoError::IoError(format!("Cannot read settings '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(NexoError::InvalidConfig(format!(
                "Settings file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_SETTINGS_FILE_SIZE
            )));
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            NexoError::IoError(format!("Cannot read settings '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Apply `NEXO_URL`, `NEXO_CONFIG` and `NEXO_LOG_FORMAT` through a
    /// variable lookup.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("NEXO_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(config) = lookup("NEXO_CONFIG").filter(|v| !v.trim().is_empty()) {
            self.config = Some(PathBuf::from(config));
        }
        if let Some(format) = lookup("NEXO_LOG_FORMAT") {
            self.log_format = LogFormat::from_name(&format);
        }
        self
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

// =============================================================================
// TESTS
// =============================================================================
