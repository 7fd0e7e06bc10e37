//! Error types for the Shopsearch engine.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Search errors - absorbed at the surface boundary.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Connection or protocol failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("Search endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a list of entries.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request did not complete in time.
    #[error("Search timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error reading {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid keystroke format.
    #[error("Invalid keystroke: {0}")]
    InvalidKeystroke(String),

    /// Key binding names a command that does not exist.
    #[error("Unknown command '{command}' bound to '{key}'")]
    UnknownCommand { key: String, command: String },

    /// A remote surface was requested without a `[remote]` section.
    #[error("No [remote] section configured")]
    MissingRemote,

    /// The `[remote]` section could not be turned into a client.
    #[error("Invalid remote configuration: {0}")]
    Remote(#[from] SearchError),
}
