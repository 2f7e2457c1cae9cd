//! Single-request execution with proxy substitution.
//!
//! The executor issues one logical request and reports proxy health back to
//! the pool. A relay answering 502/503/504 (or failing at the transport
//! level) is penalized and substituted with the next candidate; this is a
//! proxy swap, not a protocol retry. The layers above own retries.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::proxy::ProxyPool;
use crate::transport::{HttpTransport, TransportResponse};

// ============================================================================
// Execution Result
// ============================================================================

/// Classified result of one executed request.
#[derive(Debug)]
pub enum ExecutionResult {
    /// A response was received; any status code counts.
    Response(TransportResponse),
    /// No response could be obtained at the transport level.
    Transport(String),
}

// ============================================================================
// Request Executor
// ============================================================================

/// Issues one GET through the proxy pool, or directly when the pool is
/// empty.
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    pool: ProxyPool,
    proxy_fault_statuses: Vec<u16>,
}

impl RequestExecutor {
    /// Creates an executor over the given transport and pool.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        pool: ProxyPool,
        proxy_fault_statuses: Vec<u16>,
    ) -> Self {
        Self {
            transport,
            pool,
            proxy_fault_statuses,
        }
    }

    /// Shared access to the proxy pool.
    pub fn pool(&self) -> &ProxyPool {
        &self.pool
    }

    /// Mutable access to the proxy pool, for add/remove.
    pub fn pool_mut(&mut self) -> &mut ProxyPool {
        &mut self.pool
    }

    /// Executes one GET against `url`.
    ///
    /// With proxies configured, tries at most one candidate per configured
    /// endpoint, substituting on proxy-attributable statuses and transport
    /// failures; it never falls back to a direct request. The only `Err` is
    /// [`FetchError::ProxyPoolExhausted`].
    pub async fn execute(&mut self, url: &str) -> Result<ExecutionResult, FetchError> {
        if self.pool.is_empty() {
            debug!(url, "Executing direct request");
            return Ok(match self.transport.get(url, None).await {
                Ok(response) => ExecutionResult::Response(response),
                Err(failure) => ExecutionResult::Transport(failure.to_string()),
            });
        }

        let candidates = self.pool.len();
        let mut last_failure = String::from("no proxy candidate produced a response");
        for _ in 0..candidates {
            let Some(proxy) = self.pool.select_next()? else {
                break;
            };
            debug!(url, proxy = %proxy.key(), "Executing proxied request");

            match self.transport.get(url, Some(&proxy)).await {
                Ok(response) if self.proxy_fault_statuses.contains(&response.status) => {
                    warn!(
                        proxy = %proxy.key(),
                        status = response.status,
                        "Proxy-attributable status, substituting"
                    );
                    self.pool.record_failure(proxy.key());
                    last_failure = format!("proxy {} answered {}", proxy.key(), response.status);
                }
                Ok(response) => {
                    self.pool.record_success(proxy.key());
                    return Ok(ExecutionResult::Response(response));
                }
                Err(failure) => {
                    warn!(
                        proxy = %proxy.key(),
                        error = %failure,
                        "Transport failure through proxy, substituting"
                    );
                    self.pool.record_failure(proxy.key());
                    last_failure = failure.to_string();
                }
            }
        }

        Ok(ExecutionResult::Transport(last_failure))
    }
}

// ============================================================================
// Tests
// ============================================================================
