//! Error types for the catalog fixture layer

use thiserror::Error;

/// Result type alias using the catalog Error
pub type Result<T> = std::result::Result<T, Error>;

/// Catalog fixture error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{method} {url} returned {actual}, expected {expected}")]
    UnexpectedStatus {
        method: String,
        url: String,
        expected: u16,
        actual: u16,
    },

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),
}
