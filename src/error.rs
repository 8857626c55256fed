//! Error types for firewatch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Payload is not well-formed JSON.
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Payload parsed but lacks a required field.
    #[error("payload schema violation: {0}")]
    Schema(String),

    /// The record store or queue substrate failed.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("emergency not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether redelivering the same message could succeed.
    ///
    /// Decode and schema failures are permanent properties of the payload;
    /// everything else is assumed transient.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Error::Decode(_) | Error::Schema(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
