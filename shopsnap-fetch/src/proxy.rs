//! Proxy endpoint pool with failure-based blacklisting.
//!
//! The pool owns the configured relay endpoints and their health records.
//! Selection is round-robin over an explicit cursor so endpoints can be
//! added and removed mid-run without invalidating iteration state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::FetchError;

// ============================================================================
// Proxy Endpoint
// ============================================================================

/// An outbound relay address.
///
/// One address can serve both transport schemes, or each scheme can get its
/// own. Identity is the canonical string key; endpoints are never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    http: String,
    https: String,
    key: String,
}

impl ProxyEndpoint {
    /// Endpoint applying one address to both schemes.
    pub fn new(addr: impl Into<String>) -> Self {
        let addr = ensure_scheme(addr.into());
        Self {
            http: addr.clone(),
            https: addr.clone(),
            key: addr,
        }
    }

    /// Endpoint with scheme-specific addresses.
    pub fn per_scheme(http: impl Into<String>, https: impl Into<String>) -> Self {
        let http = ensure_scheme(http.into());
        let https = ensure_scheme(https.into());
        let key = if http == https {
            http.clone()
        } else {
            format!("{http},{https}")
        };
        Self { http, https, key }
    }

    /// Canonical string key identifying this endpoint.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Address used for plain HTTP traffic.
    pub fn http_addr(&self) -> &str {
        &self.http
    }

    /// Address used for HTTPS traffic.
    pub fn https_addr(&self) -> &str {
        &self.https
    }
}

fn ensure_scheme(addr: String) -> String {
    if addr.contains("://") {
        addr
    } else {
        format!("http://{addr}")
    }
}

// ============================================================================
// Pool Configuration
// ============================================================================

/// Tunables for pool health tracking.
///
/// The defaults mirror long-standing heuristics (two strikes, five-minute
/// cooldown); they are configuration rather than constants because neither
/// value is derived from anything.
#[derive(Debug, Clone)]
pub struct ProxyPoolConfig {
    /// Failures before an endpoint is blacklisted.
    pub failure_threshold: u32,
    /// How long a blacklisted endpoint sits out.
    pub cooldown: Duration,
    /// Round-robin across endpoints, or stick to the first one.
    pub rotate: bool,
}

impl Default for ProxyPoolConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 2,
            cooldown: Duration::from_secs(300),
            rotate: true,
        }
    }
}

// ============================================================================
// Proxy Pool
// ============================================================================

#[derive(Debug, Default)]
struct ProxyHealth {
    failures: u32,
    blacklisted_until: Option<Instant>,
}

/// The set of configured relay endpoints plus per-endpoint health.
#[derive(Debug)]
pub struct ProxyPool {
    endpoints: Vec<ProxyEndpoint>,
    health: HashMap<String, ProxyHealth>,
    cursor: usize,
    config: ProxyPoolConfig,
}

impl ProxyPool {
    /// Creates a pool over the given endpoints.
    pub fn new(endpoints: Vec<ProxyEndpoint>, config: ProxyPoolConfig) -> Self {
        Self {
            endpoints,
            health: HashMap::new(),
            cursor: 0,
            config,
        }
    }

    /// Returns true when no endpoints are configured.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Number of configured endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Adds an endpoint; duplicates (by key) are ignored.
    pub fn add(&mut self, endpoint: ProxyEndpoint) {
        if self.endpoints.iter().any(|e| e.key() == endpoint.key()) {
            return;
        }
        debug!(proxy = %endpoint.key(), "Proxy added");
        self.endpoints.push(endpoint);
    }

    /// Removes an endpoint and its health history. Returns whether the key
    /// was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.endpoints.len();
        self.endpoints.retain(|e| e.key() != key);
        if self.endpoints.len() == before {
            return false;
        }
        self.health.remove(key);
        if !self.endpoints.is_empty() {
            self.cursor %= self.endpoints.len();
        } else {
            self.cursor = 0;
        }
        debug!(proxy = %key, "Proxy removed");
        true
    }

    /// Selects the next usable endpoint.
    ///
    /// Round-robin over the configured order, skipping blacklisted entries;
    /// with rotation disabled the scan always starts at the first endpoint
    /// and the cursor never advances. Returns `Ok(None)` when no endpoints
    /// are configured at all, and [`FetchError::ProxyPoolExhausted`] when
    /// endpoints exist but every one is currently blacklisted.
    pub fn select_next(&mut self) -> Result<Option<ProxyEndpoint>, FetchError> {
        if self.endpoints.is_empty() {
            return Ok(None);
        }

        let len = self.endpoints.len();
        let start = if self.config.rotate { self.cursor } else { 0 };
        for offset in 0..len {
            let idx = (start + offset) % len;
            let key = self.endpoints[idx].key().to_owned();
            if self.is_blacklisted(&key) {
                continue;
            }
            if self.config.rotate {
                self.cursor = (idx + 1) % len;
            }
            return Ok(Some(self.endpoints[idx].clone()));
        }

        Err(FetchError::ProxyPoolExhausted { configured: len })
    }

    /// Clears the health record for an endpoint after a served response.
    pub fn record_success(&mut self, key: &str) {
        if self.health.remove(key).is_some() {
            debug!(proxy = %key, "Proxy health cleared");
        }
    }

    /// Records one failure; at the threshold the endpoint is blacklisted
    /// for the cooldown. The failure count stays in place, so an endpoint
    /// that fails again right after cooldown is re-blacklisted immediately
    /// rather than after a fresh round of strikes.
    pub fn record_failure(&mut self, key: &str) {
        let threshold = self.config.failure_threshold;
        let cooldown = self.config.cooldown;
        let entry = self.health.entry(key.to_owned()).or_default();
        entry.failures += 1;
        if entry.failures >= threshold {
            entry.blacklisted_until = Some(Instant::now() + cooldown);
            warn!(
                proxy = %key,
                failures = entry.failures,
                cooldown_secs = cooldown.as_secs(),
                "Proxy blacklisted"
            );
        }
    }

    /// Returns whether an endpoint is currently blacklisted, lazily lifting
    /// the mark once its cooldown has elapsed.
    pub fn is_blacklisted(&mut self, key: &str) -> bool {
        let Some(entry) = self.health.get_mut(key) else {
            return false;
        };
        match entry.blacklisted_until {
            Some(until) if Instant::now() < until => true,
            Some(_) => {
                entry.blacklisted_until = None;
                debug!(proxy = %key, "Proxy cooldown elapsed");
                false
            }
            None => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_of(addrs: &[&str], config: ProxyPoolConfig) -> ProxyPool {
        ProxyPool::new(
            addrs.iter().copied().map(ProxyEndpoint::new).collect(),
            config,
        )
    }

    fn select_key(pool: &mut ProxyPool) -> String {
        pool.select_next().unwrap().unwrap().key().to_owned()
    }

    #[test]
    fn test_round_robin_order() {
        let mut pool = pool_of(&["a:1", "b:1", "c:1"], ProxyPoolConfig::default());
        assert_eq!(select_key(&mut pool), "http://a:1");
        assert_eq!(select_key(&mut pool), "http://b:1");
        assert_eq!(select_key(&mut pool), "http://c:1");
        assert_eq!(select_key(&mut pool), "http://a:1");
    }

    #[test]
    fn test_rotation_disabled_sticks_to_first() {
        let config = ProxyPoolConfig {
            rotate: false,
            ..ProxyPoolConfig::default()
        };
        let mut pool = pool_of(&["a:1", "b:1"], config);
        assert_eq!(select_key(&mut pool), "http://a:1");
        assert_eq!(select_key(&mut pool), "http://a:1");
    }

    #[test]
    fn test_empty_pool_selects_none() {
        let mut pool = ProxyPool::new(Vec::new(), ProxyPoolConfig::default());
        assert!(pool.select_next().unwrap().is_none());
    }

    #[test]
    fn test_two_failures_blacklist_and_third_proxy_preferred() {
        let mut pool = pool_of(&["a:1", "b:1", "c:1"], ProxyPoolConfig::default());

        pool.record_failure("http://b:1");
        pool.record_failure("http://b:1");
        assert!(pool.is_blacklisted("http://b:1"));

        // Starting from the cursor at "a", the rotation must skip "b".
        assert_eq!(select_key(&mut pool), "http://a:1");
        assert_eq!(select_key(&mut pool), "http://c:1");
        assert_eq!(select_key(&mut pool), "http://a:1");
    }

    #[test]
    fn test_one_failure_does_not_blacklist() {
        let mut pool = pool_of(&["a:1"], ProxyPoolConfig::default());
        pool.record_failure("http://a:1");
        assert!(!pool.is_blacklisted("http://a:1"));
    }

    #[test]
    fn test_all_blacklisted_signals_exhaustion() {
        let mut pool = pool_of(&["a:1", "b:1"], ProxyPoolConfig::default());
        for key in ["http://a:1", "http://b:1"] {
            pool.record_failure(key);
            pool.record_failure(key);
        }

        assert!(matches!(
            pool.select_next(),
            Err(FetchError::ProxyPoolExhausted { configured: 2 })
        ));
    }

    #[test]
    fn test_cooldown_elapses_and_next_failure_reblacklists() {
        let config = ProxyPoolConfig {
            cooldown: Duration::from_millis(20),
            ..ProxyPoolConfig::default()
        };
        let mut pool = pool_of(&["a:1"], config);

        pool.record_failure("http://a:1");
        pool.record_failure("http://a:1");
        assert!(pool.is_blacklisted("http://a:1"));

        std::thread::sleep(Duration::from_millis(30));
        assert!(!pool.is_blacklisted("http://a:1"));

        // The failure count survived the cooldown: one more strike is enough.
        pool.record_failure("http://a:1");
        assert!(pool.is_blacklisted("http://a:1"));
    }

    #[test]
    fn test_success_clears_history() {
        let mut pool = pool_of(&["a:1"], ProxyPoolConfig::default());
        pool.record_failure("http://a:1");
        pool.record_success("http://a:1");

        // Back to a clean slate: two fresh strikes are needed again.
        pool.record_failure("http://a:1");
        assert!(!pool.is_blacklisted("http://a:1"));
    }

    #[test]
    fn test_remove_clears_health_and_fixes_cursor() {
        let mut pool = pool_of(&["a:1", "b:1"], ProxyPoolConfig::default());
        pool.record_failure("http://b:1");

        assert_eq!(select_key(&mut pool), "http://a:1");
        assert!(pool.remove("http://b:1"));
        assert!(!pool.remove("http://b:1"));
        assert_eq!(select_key(&mut pool), "http://a:1");

        pool.add(ProxyEndpoint::new("b:1"));
        assert!(!pool.is_blacklisted("http://b:1"));
    }

    #[test]
    fn test_per_scheme_endpoint_key() {
        let endpoint = ProxyEndpoint::per_scheme("p1:8080", "p2:8443");
        assert_eq!(endpoint.key(), "http://p1:8080,http://p2:8443");
        assert_eq!(endpoint.http_addr(), "http://p1:8080");
        assert_eq!(endpoint.https_addr(), "http://p2:8443");
    }
}
