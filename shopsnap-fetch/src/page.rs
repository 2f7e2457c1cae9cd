//! Page-level fetching with retry and exponential backoff.
//!
//! One call to [`PageFetcher::fetch`] drives one logical page to a terminal
//! classification: records, an empty page, or a fatal condition. Transient
//! conditions (transport failures, 429, 5xx) are retried with exponential
//! backoff up to the configured attempt bound.

use tracing::{debug, warn};

use shopsnap_core::{Product, ProductPage};

use crate::error::FetchError;
use crate::executor::{ExecutionResult, RequestExecutor};
use crate::settings::ScrapeSettings;

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Terminal classification of one page fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page yielded records.
    Success(Vec<Product>),
    /// The page exists but holds no records; the catalog is complete.
    EmptyPage,
    /// The page cannot be fetched; pagination stops here. This is a normal
    /// termination for the scrape as a whole, not an error.
    FatalFailure(String),
}

// ============================================================================
// Page Fetcher
// ============================================================================

/// Fetches one catalog page through the executor, retrying transient
/// failures.
pub struct PageFetcher {
    executor: RequestExecutor,
    settings: ScrapeSettings,
}

impl PageFetcher {
    /// Creates a fetcher over the given executor and settings.
    pub fn new(executor: RequestExecutor, settings: ScrapeSettings) -> Self {
        Self { executor, settings }
    }

    /// Mutable access to the executor, for proxy management.
    pub fn executor_mut(&mut self) -> &mut RequestExecutor {
        &mut self.executor
    }

    /// Fetches page `page` to a terminal classification.
    ///
    /// The only `Err` is proxy-pool exhaustion bubbling up from the
    /// executor; every other condition becomes a [`FetchOutcome`].
    pub async fn fetch(&mut self, page: u32) -> Result<FetchOutcome, FetchError> {
        let url = self.settings.page_url(page);

        for attempt in 1..=self.settings.max_retries {
            match self.executor.execute(&url).await? {
                ExecutionResult::Transport(reason) => {
                    warn!(page, attempt, %reason, "Transport failure");
                }
                ExecutionResult::Response(response) if response.status == 429 => {
                    warn!(page, attempt, "Rate limited");
                }
                ExecutionResult::Response(response) if response.status == 200 => {
                    return Ok(self.classify_body(page, &response.body));
                }
                ExecutionResult::Response(response)
                    if (500..600).contains(&response.status) =>
                {
                    warn!(page, attempt, status = response.status, "Server error");
                }
                ExecutionResult::Response(response) => {
                    return Ok(FetchOutcome::FatalFailure(format!(
                        "unexpected status {}",
                        response.status
                    )));
                }
            }

            if attempt < self.settings.max_retries {
                let delay = self.settings.backoff_delay(attempt);
                debug!(page, attempt, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
            }
        }

        Ok(FetchOutcome::FatalFailure("retries exhausted".to_owned()))
    }

    fn classify_body(&self, page: u32, body: &str) -> FetchOutcome {
        let parsed = match ProductPage::from_json(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(page, error = %e, "Response body is not a catalog page");
                return FetchOutcome::FatalFailure(format!("malformed payload: {e}"));
            }
        };

        match parsed.products {
            None => {
                warn!(page, "Response lacks a products field");
                FetchOutcome::FatalFailure("products field missing".to_owned())
            }
            Some(products) if products.is_empty() => FetchOutcome::EmptyPage,
            Some(products) => {
                debug!(page, count = products.len(), "Page fetched");
                FetchOutcome::Success(products)
            }
        }
    }
}
