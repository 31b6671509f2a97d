//! Error types for the extract client.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, WikiError>;

/// Errors that can occur in the extract client.
///
/// Only transport and API-reported failures are raised; structural
/// oddities in extract text (mismatched heading markers, missing
/// preambles, unknown section titles) degrade to fallback values
/// instead of erroring.
#[derive(Error, Debug)]
pub enum WikiError {
    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failure reported by the API itself (an `error` field in the
    /// response body).
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not decode into the expected shape.
    #[error("Failed to decode API response: {0}")]
    Decode(String),

    /// A requested page does not exist on the remote side.
    #[error("Page '{0}' does not exist")]
    PageNotFound(String),

    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WikiError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for WikiError {
    fn from(err: reqwest::Error) -> Self {
        WikiError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for WikiError {
    fn from(err: serde_json::Error) -> Self {
        WikiError::Decode(err.to_string())
    }
}
