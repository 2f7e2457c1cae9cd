//! High-level scraper handle.
//!
//! Wires the pool, executor, fetcher, and paginator together behind one
//! entry point, and exposes the proxy management surface.

use std::sync::Arc;

use shopsnap_core::Product;

use crate::error::FetchError;
use crate::executor::RequestExecutor;
use crate::page::PageFetcher;
use crate::paginate::Paginator;
use crate::proxy::{ProxyEndpoint, ProxyPool, ProxyPoolConfig};
use crate::settings::ScrapeSettings;
use crate::transport::{HttpTransport, ReqwestTransport};

/// A configured catalog scraper.
pub struct Scraper {
    paginator: Paginator,
}

impl Scraper {
    /// Creates a scraper over a reqwest transport.
    pub fn new(settings: ScrapeSettings, proxies: Vec<ProxyEndpoint>) -> Result<Self, FetchError> {
        let transport = Arc::new(ReqwestTransport::new(
            settings.request_timeout,
            &settings.user_agent,
        )?);
        Ok(Self::with_transport(settings, proxies, transport))
    }

    /// Creates a scraper over an arbitrary transport; the seam tests use.
    pub fn with_transport(
        settings: ScrapeSettings,
        proxies: Vec<ProxyEndpoint>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let pool = ProxyPool::new(
            proxies,
            ProxyPoolConfig {
                failure_threshold: settings.proxy_failure_threshold,
                cooldown: settings.proxy_cooldown,
                rotate: settings.rotate_proxies,
            },
        );
        let executor = RequestExecutor::new(transport, pool, settings.proxy_fault_statuses.clone());
        let fetcher = PageFetcher::new(executor, settings.clone());
        Self {
            paginator: Paginator::new(fetcher, settings),
        }
    }

    /// Fetches the whole catalog. See [`Paginator::fetch_all`] for the
    /// termination contract.
    pub async fn fetch_all(&mut self) -> Result<Vec<Product>, FetchError> {
        self.paginator.fetch_all().await
    }

    /// Adds a proxy endpoint to the pool.
    pub fn add_proxy(&mut self, endpoint: ProxyEndpoint) {
        self.pool_mut().add(endpoint);
    }

    /// Removes a proxy endpoint and its health history.
    pub fn remove_proxy(&mut self, key: &str) -> bool {
        self.pool_mut().remove(key)
    }

    fn pool_mut(&mut self) -> &mut ProxyPool {
        self.paginator.fetcher_mut().executor_mut().pool_mut()
    }
}
