//! Error types for the study room chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the connection because it is at capacity
    #[error("Server is at capacity (503), try again later")]
    ServerBusy,

    /// The server URL cannot be used
    #[error("Invalid server URL '{0}': expected ws:// or wss://")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Reading the room history failed
    #[error("Failed to fetch history: {0}")]
    History(#[from] reqwest::Error),
}
