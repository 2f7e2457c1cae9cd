//! Scrape configuration surface.
//!
//! [`ScrapeSettings`] carries everything the fetch layer needs: the
//! normalized store URL, pagination bounds, retry/backoff tuning, the
//! politeness delay, proxy pool tuning, and the outbound user-agent.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use url::Url;

use crate::error::FetchError;

/// Records per page requested from the endpoint; its documented maximum.
const DEFAULT_PAGE_LIMIT: u32 = 250;

/// Domain suffix appended to bare store names without a dot.
const HOSTED_DOMAIN_SUFFIX: &str = ".myshopify.com";

/// Outbound user-agents, one picked uniformly when none is configured.
const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

// ============================================================================
// Scrape Settings
// ============================================================================

/// Settings for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Normalized store URL; always ends with `/`.
    pub store_url: Url,
    /// Records requested per page.
    pub page_limit: u32,
    /// Hard ceiling on the number of pages fetched.
    pub max_pages: u32,
    /// Attempts per page before giving up on it.
    pub max_retries: u32,
    /// Base of the exponential backoff schedule, in seconds.
    pub backoff_factor: f64,
    /// Politeness delay between successive page fetches.
    pub page_delay: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Outbound user-agent string.
    pub user_agent: String,
    /// Whether proxy selection rotates round-robin or sticks to the first
    /// configured endpoint.
    pub rotate_proxies: bool,
    /// Failures before a proxy is blacklisted.
    pub proxy_failure_threshold: u32,
    /// How long a blacklisted proxy sits out.
    pub proxy_cooldown: Duration,
    /// Status codes attributed to the proxy rather than the origin.
    pub proxy_fault_statuses: Vec<u16>,
}

impl ScrapeSettings {
    /// Creates settings for the given store with defaults for everything
    /// else. The user-agent is picked at random from a small fixed pool.
    pub fn new(store: &str) -> Result<Self, FetchError> {
        Ok(Self {
            store_url: normalize_store_url(store)?,
            page_limit: DEFAULT_PAGE_LIMIT,
            max_pages: 200,
            max_retries: 3,
            backoff_factor: 1.0,
            page_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            user_agent: pick_user_agent(&mut rand::thread_rng()).to_owned(),
            rotate_proxies: true,
            proxy_failure_threshold: 2,
            proxy_cooldown: Duration::from_secs(300),
            proxy_fault_statuses: vec![502, 503, 504],
        })
    }

    /// Sets the per-page record limit.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Sets the page ceiling.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Sets the attempts-per-page bound.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the exponential backoff base, in seconds.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Sets the politeness delay between pages.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets an explicit user-agent instead of the pool pick.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enables or disables proxy rotation.
    pub fn with_rotation(mut self, rotate: bool) -> Self {
        self.rotate_proxies = rotate;
        self
    }

    /// Sets the proxy failure threshold.
    pub fn with_proxy_failure_threshold(mut self, threshold: u32) -> Self {
        self.proxy_failure_threshold = threshold;
        self
    }

    /// Sets the proxy blacklist cooldown.
    pub fn with_proxy_cooldown(mut self, cooldown: Duration) -> Self {
        self.proxy_cooldown = cooldown;
        self
    }

    /// Builds the URL for one catalog page.
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}products.json?page={}&limit={}",
            self.store_url, page, self.page_limit
        )
    }

    /// Computes the backoff delay before retrying after failed attempt
    /// `attempt` (1-based): `backoff_factor * 2^(attempt - 1)` seconds.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let secs = self.backoff_factor * f64::from(2u32.saturating_pow(attempt.saturating_sub(1)));
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}

// ============================================================================
// URL Normalization
// ============================================================================

/// Normalizes a raw store argument into a base URL.
///
/// - surrounding whitespace and trailing slashes are stripped
/// - a bare name without a dot gets the hosted-platform domain appended
/// - a missing scheme defaults to HTTPS
/// - the result always ends with `/` so page paths join cleanly
pub fn normalize_store_url(raw: &str) -> Result<Url, FetchError> {
    let mut store = raw.trim().trim_end_matches('/').to_owned();
    if store.is_empty() {
        return Err(FetchError::InvalidStoreUrl(raw.to_owned()));
    }
    if !store.contains('.') {
        store.push_str(HOSTED_DOMAIN_SUFFIX);
    }
    if !store.starts_with("http://") && !store.starts_with("https://") {
        store = format!("https://{store}");
    }

    let mut url =
        Url::parse(&store).map_err(|e| FetchError::InvalidStoreUrl(format!("{raw}: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Picks a user-agent from the fixed pool with the supplied randomness
/// source; injectable so tests can seed it.
pub fn pick_user_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENT_POOL
        .choose(rng)
        .copied()
        .unwrap_or(USER_AGENT_POOL[0])
}

// ============================================================================
// Tests
// ============================================================================
