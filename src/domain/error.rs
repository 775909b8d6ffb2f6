//! Error types shared by the ports and services.

use thiserror::Error;

/// Failures reported by a ghost store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the command
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A ghost record could not be encoded
    #[error("Failed to serialize ghost response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `increment` hit a value that is not an integer
    #[error("Counter {key} does not hold an integer")]
    NotAnInteger {
        /// Offending key
        key: String,
    },
}

/// Failures that end the consume loop
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// The subscription stream ended
    #[error("Traffic source closed: the subscription ended")]
    SourceClosed,
}

/// Failures establishing the transport at startup
#[derive(Error, Debug)]
pub enum TransportError {
    /// The settings do not form a usable connection URL
    #[error("Invalid connection settings for {url}: {reason}")]
    InvalidUrl {
        /// Redacted connection URL
        url: String,
        /// Client error text
        reason: String,
    },

    /// The server refused the connection or the PING
    #[error("Could not connect to {url}: {reason}")]
    Connect {
        /// Redacted connection URL
        url: String,
        /// Client error text
        reason: String,
    },

    /// A connect, PING or SUBSCRIBE step did not finish in time
    #[error("Timed out after {seconds}s connecting to {url}")]
    Timeout {
        /// Redacted connection URL
        url: String,
        /// Configured bound
        seconds: u64,
    },

    /// The server rejected the SUBSCRIBE
    #[error("Failed to subscribe to channel {channel}: {reason}")]
    Subscribe {
        /// Channel that was requested
        channel: String,
        /// Client error text
        reason: String,
    },
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
