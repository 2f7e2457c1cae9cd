//! HTTP transport seam.
//!
//! [`HttpTransport`] is the one place wire I/O happens. The production
//! implementation is reqwest-backed; tests substitute scripted
//! implementations to drive the classification and retry machinery
//! deterministically.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::error::FetchError;
use crate::proxy::ProxyEndpoint;

// ============================================================================
// Wire Types
// ============================================================================

/// A received HTTP response, reduced to what classification needs.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
    /// Response header name/value pairs.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// A response carrying only a status and a body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }
}

/// Why the transport could not produce a response at all: connection
/// refused, timeout, DNS failure, or a relay that could not be applied.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct TransportFailure {
    /// Human-readable failure description.
    pub reason: String,
}

impl TransportFailure {
    /// Creates a failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// One wire request. Implementations must not retry internally; the layers
/// above own all retry and substitution decisions.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a GET, optionally through a relay endpoint. Any received
    /// response is `Ok` regardless of status.
    async fn get(
        &self,
        url: &str,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<TransportResponse, TransportFailure>;

    /// Issues a direct HEAD request; the response body is empty.
    async fn head(&self, url: &str) -> Result<TransportResponse, TransportFailure>;
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// Production transport over reqwest.
///
/// Relay endpoints bind to a `Client` at construction time, so one client is
/// built per endpoint and cached by key; connection pooling within each
/// client is reqwest's concern.
pub struct ReqwestTransport {
    timeout: Duration,
    user_agent: String,
    direct: Client,
    proxied: Mutex<HashMap<String, Client>>,
}

impl ReqwestTransport {
    /// Creates a transport with the given per-request timeout and
    /// user-agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let direct = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            timeout,
            user_agent: user_agent.to_owned(),
            direct,
            proxied: Mutex::new(HashMap::new()),
        })
    }

    fn client_for(&self, proxy: Option<&ProxyEndpoint>) -> Result<Client, TransportFailure> {
        let Some(endpoint) = proxy else {
            return Ok(self.direct.clone());
        };

        let mut cache = self
            .proxied
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = cache.get(endpoint.key()) {
            return Ok(client.clone());
        }

        let http = reqwest::Proxy::http(endpoint.http_addr())
            .map_err(|e| TransportFailure::new(format!("invalid proxy address: {e}")))?;
        let https = reqwest::Proxy::https(endpoint.https_addr())
            .map_err(|e| TransportFailure::new(format!("invalid proxy address: {e}")))?;
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .proxy(http)
            .proxy(https)
            .build()
            .map_err(|e| TransportFailure::new(format!("proxy client build failed: {e}")))?;

        cache.insert(endpoint.key().to_owned(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<TransportResponse, TransportFailure> {
        let client = self.client_for(proxy)?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportFailure::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::new(e.to_string()))?;

        Ok(TransportResponse {
            status,
            body,
            headers,
        })
    }

    async fn head(&self, url: &str) -> Result<TransportResponse, TransportFailure> {
        let response = self
            .direct
            .head(url)
            .send()
            .await
            .map_err(|e| TransportFailure::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(TransportResponse {
            status,
            body: String::new(),
            headers,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
