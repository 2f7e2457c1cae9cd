//! Storefront verification heuristics.
//!
//! Confirms a URL is a supported storefront before scraping starts. Each
//! heuristic tolerates failure; the composite check passes when any one of
//! them does.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Response header fragment identifying the platform.
const HEADER_MARKER: &str = "shopify";

/// Landing-page HTML markers.
const HTML_MARKERS: &[&str] = &["cdn.shopify.com", "shopify-digital-wallet"];

/// Composite storefront check.
pub struct StorefrontProbe {
    transport: Arc<dyn HttpTransport>,
}

impl StorefrontProbe {
    /// Creates a probe with its own reqwest transport.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        Ok(Self {
            transport: Arc::new(ReqwestTransport::new(timeout, user_agent)?),
        })
    }

    /// Creates a probe over an existing transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Returns true when `base_url` looks like a supported storefront.
    pub async fn verify(&self, base_url: &Url) -> bool {
        self.has_catalog_endpoint(base_url).await
            || self.has_platform_headers(base_url).await
            || self.has_platform_markup(base_url).await
    }

    /// Checks that `products.json` exists and returns an object with a
    /// `products` key.
    async fn has_catalog_endpoint(&self, base_url: &Url) -> bool {
        let url = format!("{base_url}products.json");
        debug!(%url, "Probing catalog endpoint");
        match self.transport.get(&url, None).await {
            Ok(response) if response.status == 200 => {
                serde_json::from_str::<serde_json::Value>(&response.body)
                    .map(|value| value.get("products").is_some())
                    .unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Checks for platform-specific response headers on the landing page.
    async fn has_platform_headers(&self, base_url: &Url) -> bool {
        debug!(url = %base_url, "Probing response headers");
        match self.transport.head(base_url.as_str()).await {
            Ok(response) => response
                .headers
                .iter()
                .any(|(name, _)| name.to_ascii_lowercase().contains(HEADER_MARKER)),
            Err(_) => false,
        }
    }

    /// Checks the landing-page HTML for known platform markers.
    async fn has_platform_markup(&self, base_url: &Url) -> bool {
        debug!(url = %base_url, "Probing landing page markup");
        match self.transport.get(base_url.as_str(), None).await {
            Ok(response) => {
                let html = response.body.to_ascii_lowercase();
                HTML_MARKERS.iter().any(|marker| html.contains(marker))
            }
            Err(_) => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyEndpoint;
    use crate::settings::normalize_store_url;
    use crate::transport::{TransportFailure, TransportResponse};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Answers by URL suffix; everything else fails at the transport level.
    struct FixtureTransport {
        by_suffix: HashMap<&'static str, TransportResponse>,
        head_response: Option<TransportResponse>,
    }

    #[async_trait]
    impl HttpTransport for FixtureTransport {
        async fn get(
            &self,
            url: &str,
            _proxy: Option<&ProxyEndpoint>,
        ) -> Result<TransportResponse, TransportFailure> {
            self.by_suffix
                .iter()
                .find(|(suffix, _)| url.ends_with(*suffix))
                .map(|(_, response)| response.clone())
                .ok_or_else(|| TransportFailure::new("unreachable"))
        }

        async fn head(&self, _url: &str) -> Result<TransportResponse, TransportFailure> {
            self.head_response
                .clone()
                .ok_or_else(|| TransportFailure::new("unreachable"))
        }
    }

    fn probe_with(transport: FixtureTransport) -> StorefrontProbe {
        StorefrontProbe::with_transport(Arc::new(transport))
    }

    #[tokio::test]
    async fn test_catalog_endpoint_confirms() {
        let probe = probe_with(FixtureTransport {
            by_suffix: HashMap::from([(
                "products.json",
                TransportResponse::new(200, r#"{"products": []}"#),
            )]),
            head_response: None,
        });

        let url = normalize_store_url("shop.example").unwrap();
        assert!(probe.verify(&url).await);
    }

    #[tokio::test]
    async fn test_header_marker_confirms() {
        let mut head = TransportResponse::new(200, "");
        head.headers
            .push(("X-Shopify-Stage".to_owned(), "production".to_owned()));

        let probe = probe_with(FixtureTransport {
            by_suffix: HashMap::new(),
            head_response: Some(head),
        });

        let url = normalize_store_url("shop.example").unwrap();
        assert!(probe.verify(&url).await);
    }

    #[tokio::test]
    async fn test_markup_marker_confirms() {
        let probe = probe_with(FixtureTransport {
            by_suffix: HashMap::from([(
                "shop.example/",
                TransportResponse::new(200, r#"<script src="https://cdn.shopify.com/x.js">"#),
            )]),
            head_response: None,
        });

        let url = normalize_store_url("shop.example").unwrap();
        assert!(probe.verify(&url).await);
    }

    #[tokio::test]
    async fn test_unrelated_site_is_rejected() {
        let probe = probe_with(FixtureTransport {
            by_suffix: HashMap::from([
                ("products.json", TransportResponse::new(404, "not found")),
                ("shop.example/", TransportResponse::new(200, "<html>hi</html>")),
            ]),
            head_response: Some(TransportResponse::new(200, "")),
        });

        let url = normalize_store_url("shop.example").unwrap();
        assert!(!probe.verify(&url).await);
    }
}
