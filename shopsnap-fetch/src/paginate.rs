//! Sequential pagination over the catalog endpoint.

use tracing::{info, warn};

use shopsnap_core::Product;

use crate::error::FetchError;
use crate::page::{FetchOutcome, PageFetcher};
use crate::settings::ScrapeSettings;

/// Walks the catalog page by page, strictly sequentially, and accumulates
/// every record until a stop condition is met.
pub struct Paginator {
    fetcher: PageFetcher,
    settings: ScrapeSettings,
}

impl Paginator {
    /// Creates a paginator over the given fetcher and settings.
    pub fn new(fetcher: PageFetcher, settings: ScrapeSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Mutable access to the page fetcher, for proxy management.
    pub fn fetcher_mut(&mut self) -> &mut PageFetcher {
        &mut self.fetcher
    }

    /// Fetches all pages starting at 1.
    ///
    /// Stops on the `max_pages` ceiling, an empty page, or a fatal page
    /// classification; all three are normal termination and everything
    /// accumulated so far is returned. The only `Err` is
    /// [`FetchError::ProxyPoolExhausted`]. Between successful fetches the
    /// politeness delay is awaited; it is skipped after the terminal page.
    pub async fn fetch_all(&mut self) -> Result<Vec<Product>, FetchError> {
        let mut products = Vec::new();
        let mut page = 1u32;

        info!(store = %self.settings.store_url, "Starting catalog scrape");
        loop {
            if page > self.settings.max_pages {
                info!(max_pages = self.settings.max_pages, "Page ceiling reached");
                break;
            }

            match self.fetcher.fetch(page).await? {
                FetchOutcome::Success(batch) => {
                    info!(page, count = batch.len(), "Page complete");
                    products.extend(batch);
                }
                FetchOutcome::EmptyPage => {
                    info!(page, "Empty page, catalog complete");
                    break;
                }
                FetchOutcome::FatalFailure(reason) => {
                    warn!(page, %reason, "Stopping pagination");
                    break;
                }
            }

            page += 1;
            if page <= self.settings.max_pages && !self.settings.page_delay.is_zero() {
                tokio::time::sleep(self.settings.page_delay).await;
            }
        }

        info!(total = products.len(), "Scrape finished");
        Ok(products)
    }
}
