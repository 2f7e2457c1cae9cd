//! End-to-end scrape flows over a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use shopsnap_fetch::{
    FetchError, HttpTransport, ProxyEndpoint, ScrapeSettings, Scraper, TransportFailure,
    TransportResponse,
};

/// Serves scripted responses in order; once the script runs dry it keeps
/// serving the final entry. Every request URL is recorded.
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TransportFailure>>>,
    last: Mutex<Option<Result<TransportResponse, TransportFailure>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<TransportResponse, TransportFailure>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        _proxy: Option<&ProxyEndpoint>,
    ) -> Result<TransportResponse, TransportFailure> {
        self.requests.lock().unwrap().push(url.to_owned());
        let mut last = self.last.lock().unwrap();
        match self.script.lock().unwrap().pop_front() {
            Some(entry) => {
                *last = Some(entry.clone());
                entry
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(TransportFailure::new("script exhausted"))),
        }
    }

    async fn head(&self, _url: &str) -> Result<TransportResponse, TransportFailure> {
        Err(TransportFailure::new("not scripted"))
    }
}

fn page_body(ids: &[u64]) -> TransportResponse {
    let products: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id": {id}, "title": "Item {id}"}}"#))
        .collect();
    TransportResponse::new(200, format!(r#"{{"products": [{}]}}"#, products.join(",")))
}

fn settings(store: &str) -> ScrapeSettings {
    ScrapeSettings::new(store)
        .unwrap()
        .with_user_agent("shopsnap-tests/1.0")
        .with_page_delay(Duration::ZERO)
        .with_backoff_factor(0.1)
}

#[tokio::test(start_paused = true)]
async fn pages_concatenate_until_empty_page() {
    let transport = ScriptedTransport::new(vec![
        Ok(page_body(&[1, 2])),
        Ok(page_body(&[3, 4])),
        Ok(page_body(&[])),
    ]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example").with_max_pages(3),
        Vec::new(),
        transport.clone(),
    );

    let products = scraper.fetch_all().await.unwrap();

    let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(transport.request_count(), 3);
    assert_eq!(
        transport.requests()[0],
        "https://shop.example/products.json?page=1&limit=250"
    );
    assert_eq!(
        transport.requests()[2],
        "https://shop.example/products.json?page=3&limit=250"
    );
}

#[tokio::test(start_paused = true)]
async fn page_ceiling_bounds_the_scrape() {
    // The script never runs out of non-empty pages.
    let transport = ScriptedTransport::new(vec![Ok(page_body(&[1]))]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example").with_max_pages(3),
        Vec::new(),
        transport.clone(),
    );

    let products = scraper.fetch_all().await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn missing_products_field_stops_immediately() {
    let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(
        200,
        r#"{"errors": "unknown shop"}"#,
    ))]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example").with_max_retries(5),
        Vec::new(),
        transport.clone(),
    );

    let products = scraper.fetch_all().await.unwrap();

    // Fatal on the spot: no retries, nothing accumulated.
    assert!(products.is_empty());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn server_errors_back_off_then_succeed() {
    let transport = ScriptedTransport::new(vec![
        Ok(TransportResponse::new(503, "")),
        Ok(TransportResponse::new(503, "")),
        Ok(page_body(&[7])),
        Ok(page_body(&[])),
    ]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example").with_max_retries(3),
        Vec::new(),
        transport.clone(),
    );

    let start = tokio::time::Instant::now();
    let products = scraper.fetch_all().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, 7);
    // Two backoff sleeps: 0.1s after the first 503, 0.2s after the second.
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn retries_exhausted_returns_partial_catalog() {
    let transport = ScriptedTransport::new(vec![
        Ok(page_body(&[1])),
        Ok(TransportResponse::new(500, "")),
        Ok(TransportResponse::new(500, "")),
        Ok(TransportResponse::new(500, "")),
    ]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example").with_max_retries(3),
        Vec::new(),
        transport.clone(),
    );

    let products = scraper.fetch_all().await.unwrap();

    // Page 1 survived; page 2 burned its three attempts and stopped the run.
    assert_eq!(products.len(), 1);
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn politeness_delay_runs_between_pages_only() {
    let transport = ScriptedTransport::new(vec![
        Ok(page_body(&[1])),
        Ok(page_body(&[2])),
        Ok(page_body(&[])),
    ]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example").with_page_delay(Duration::from_secs(5)),
        Vec::new(),
        transport.clone(),
    );

    let start = tokio::time::Instant::now();
    let products = scraper.fetch_all().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(products.len(), 2);
    // Two inter-page delays; none after the terminal empty page.
    assert!(elapsed >= Duration::from_secs(10));
    assert!(elapsed < Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn burned_proxy_pool_is_a_distinct_error() {
    let transport = ScriptedTransport::new(vec![Err(TransportFailure::new("connection refused"))]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example").with_max_retries(5),
        vec![ProxyEndpoint::new("relay:8080")],
        transport.clone(),
    );

    let result = scraper.fetch_all().await;

    // Two transport failures blacklist the only relay; the next attempt
    // must surface exhaustion instead of an empty success.
    assert!(matches!(
        result,
        Err(FetchError::ProxyPoolExhausted { configured: 1 })
    ));
}

#[tokio::test(start_paused = true)]
async fn removing_the_dead_proxy_recovers_the_run() {
    let transport = ScriptedTransport::new(vec![Ok(page_body(&[5])), Ok(page_body(&[]))]);
    let mut scraper = Scraper::with_transport(
        settings("shop.example"),
        vec![
            ProxyEndpoint::new("dead:8080"),
            ProxyEndpoint::new("alive:8080"),
        ],
        transport.clone(),
    );
    scraper.remove_proxy("http://dead:8080");
    scraper.add_proxy(ProxyEndpoint::new("spare:8080"));

    let products = scraper.fetch_all().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(transport.request_count(), 2);
}
