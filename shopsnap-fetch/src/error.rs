//! Fetch error types.

use thiserror::Error;

/// Error type for catalog fetch operations.
///
/// Page-level failures (rate limiting, server errors, schema violations)
/// never surface here; they are classified into
/// [`FetchOutcome`](crate::page::FetchOutcome) and terminate pagination
/// gracefully. What remains are operational problems the caller must see.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store URL could not be parsed or normalized.
    #[error("Invalid store URL: {0}")]
    InvalidStoreUrl(String),

    /// Every configured proxy endpoint is currently blacklisted.
    ///
    /// Distinct from an ordinary fetch failure: the remote site may be fine,
    /// but our relay pool is burned.
    #[error("All {configured} configured proxies are blacklisted")]
    ProxyPoolExhausted {
        /// Number of endpoints in the pool.
        configured: usize,
    },
}
