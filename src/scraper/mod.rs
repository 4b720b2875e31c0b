//! Browser-driven tweet scraping.
//!
//! # Architecture
//!
//! ```text
//! URL → TweetExtractor → SessionManager::acquire → PageHandle
//!         ↓                                            ↓
//!     retry/backoff                     FieldExtractors (per-field strategies)
//!         ↓                                            ↓
//!   SessionManager::release  ←───────────────  TweetFields → ExtractionResult
//! ```
//!
//! The browser is reached only through two capabilities: [`SessionManager`]
//! hands out one fresh [`PageHandle`] per attempt, and every field extractor
//! reads the page through `PageHandle` alone. [`ChromeSessionManager`] is the
//! chromiumoxide implementation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tweet_extractor::scraper::{
//!     ChromeSessionManager, RetryConfig, ScraperConfig, TweetExtractor,
//! };
//!
//! let config = ScraperConfig::default();
//! let extractor = TweetExtractor::new(
//!     ChromeSessionManager::new(config.clone()),
//!     config,
//!     RetryConfig::default(),
//! );
//! let result = extractor.extract("https://x.com/nasa/status/123").await;
//! ```

mod chrome;
mod config;
mod fields;
mod metrics;
mod orchestrator;
mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use chrome::{ChromeSession, ChromeSessionManager};
pub use config::{RetryConfig, ScraperConfig, CHROME_FLAGS};
pub use fields::{dismiss_dialogs, FieldExtractors, TWEET_ARTICLE};
pub use metrics::{reconcile_max, Metric, MetricReadings};
pub use orchestrator::{Extract, TweetExtractor};
pub use strategy::{first_match, Strategy};

use crate::app::Result;
use async_trait::async_trait;

/// A live, loaded page that extractors can query.
///
/// Selector arguments are CSS selectors (selector lists allowed).
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate to `url` and wait for the load to finish.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Visible text of every element matching `selector`, in document order.
    async fn texts(&self, selector: &str) -> Result<Vec<String>>;

    /// Values of attribute `name` on matching elements that carry it.
    async fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>>;

    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Click the first match. Returns false when nothing matched.
    async fn click_first(&self, selector: &str) -> Result<bool>;
}

/// Hands out one browser session per extraction attempt.
#[async_trait]
pub trait SessionManager: Send + Sync {
    type Session: PageHandle + 'static;

    /// Launch a fresh session. Fails with `DriverSetup` when no browser can be started.
    async fn acquire(&self) -> Result<Self::Session>;

    /// Tear a session down. Failures are logged, never returned.
    async fn release(&self, session: Self::Session);
}
