//! Core error types for Shopsnap.

use thiserror::Error;

/// Core error type for Shopsnap operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A payload could not be parsed as a catalog page.
    #[error("Malformed catalog payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}
