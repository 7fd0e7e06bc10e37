//! Configuration types.
//!
//! Configuration lives in `config.toml` under the platform config directory.
//! Every field has a default, so a missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::entry::{MatchField, MatchFields};
use crate::error::ConfigError;

/// Quiet period before a query is dispatched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Queries of this many characters or fewer are never dispatched.
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Debounce quiet period in milliseconds.
    pub debounce_ms: u64,

    /// Queries must be strictly longer than this to dispatch.
    pub min_query_length: usize,

    /// Keep at most this many suggestions, in source order.
    pub max_results: Option<usize>,

    /// Fields considered by local filtering.
    pub match_fields: Vec<MatchField>,

    /// Remote search endpoint, if the surface searches a backend.
    pub remote: Option<RemoteConfig>,

    /// Key binding overrides, e.g. `"ctrl+j" = "next"`.
    pub keymap: BTreeMap<String, String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            max_results: None,
            match_fields: vec![MatchField::Id, MatchField::Label],
            remote: None,
            keymap: BTreeMap::new(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn match_fields(&self) -> MatchFields {
        self.match_fields.iter().copied().collect()
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            tracing::info!("No config found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {:?}", path);
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Remote search endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Endpoint URL, e.g. `https://shop.example.com/api/products/search`.
    pub endpoint: String,

    /// Name of the query-string parameter carrying the query.
    #[serde(default = "default_query_param")]
    pub query_param: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query_param: default_query_param(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_query_param() -> String {
    "q".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("shopsearch"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
