// Error taxonomy for the vendor clients and feed fetchers.
//
// The library returns typed errors so callers can tell a rejected request
// (RemoteApi) from bad input (Validation). The binary wraps everything in
// anyhow like the rest of the CLI.

use thiserror::Error;

/// Failures produced by the search, mitigation and feed clients.
#[derive(Debug, Error)]
pub enum Error {
    /// An endpoint answered with a status other than the one expected.
    #[error("remote API returned {status}: {body}")]
    RemoteApi { status: u16, body: String },

    /// Search criteria rejected before any request was made.
    #[error("invalid search criteria: {0}")]
    Validation(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to parse feed: {0}")]
    Feed(#[from] csv::Error),

    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status carried by a `RemoteApi` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;
