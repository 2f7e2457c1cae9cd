// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Shopsnap Fetch
//!
//! Resilient catalog fetching for Shopsnap.
//!
//! This crate retrieves paginated product catalogs from a storefront's JSON
//! endpoint while tolerating rate limiting, transient server errors, and
//! unreliable outbound proxies. The layers, leaves first:
//!
//! - [`proxy::ProxyPool`] - configured relay endpoints with failure counts
//!   and cooldown blacklisting
//! - [`executor::RequestExecutor`] - one request through a chosen relay (or
//!   direct), with proxy substitution and health reporting
//! - [`page::PageFetcher`] - retry/backoff for one logical page
//! - [`paginate::Paginator`] - sequential page loop with stop conditions
//!   and the politeness delay
//!
//! [`scraper::Scraper`] bundles the stack behind one handle, and
//! [`probe::StorefrontProbe`] verifies a URL looks like a supported
//! storefront before any scraping starts.
//!
//! ## Example
//!
//! ```ignore
//! use shopsnap_fetch::{ProxyEndpoint, ScrapeSettings, Scraper};
//!
//! let settings = ScrapeSettings::new("shop.example")?.with_max_pages(10);
//! let proxies = vec![ProxyEndpoint::new("relay.internal:8080")];
//! let mut scraper = Scraper::new(settings, proxies)?;
//! let products = scraper.fetch_all().await?;
//! ```

pub mod error;
pub mod executor;
pub mod page;
pub mod paginate;
pub mod probe;
pub mod proxy;
pub mod scraper;
pub mod settings;
pub mod transport;

// Re-export key types at crate root

pub use error::FetchError;
pub use executor::{ExecutionResult, RequestExecutor};
pub use page::{FetchOutcome, PageFetcher};
pub use paginate::Paginator;
pub use probe::StorefrontProbe;
pub use proxy::{ProxyEndpoint, ProxyPool, ProxyPoolConfig};
pub use scraper::Scraper;
pub use settings::{ScrapeSettings, normalize_store_url, pick_user_agent};
pub use transport::{HttpTransport, ReqwestTransport, TransportFailure, TransportResponse};
