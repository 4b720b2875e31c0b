//! # Tweet Extractor
//!
//! Pulls structured data out of public X/Twitter posts by driving a headless
//! Chrome.
//!
//! ## Architecture
//!
//! ```text
//! HTTP/CLI → TweetExtractor → browser session → field extractors → ExtractionResult
//! ```
//!
//! - [`domain`]: URL validation and the sparse result record
//! - [`normalizer`]: "1.5K"-style counts to integers
//! - [`scraper`]: Chrome sessions, field strategies, the retrying orchestrator
//! - [`server`]: axum HTTP facade
//!
//! ## Quick Start
//!
//! ```bash
//! # One-shot extraction
//! tweet-extractor extract https://x.com/nasa/status/1677700000000000000
//!
//! # Run the API on port 8080
//! tweet-extractor serve
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires configuration to a
/// Chrome-backed extractor.
pub mod app;

/// Command-line interface using clap.
///
/// - `serve` - Run the HTTP API
/// - `extract <url>` - Extract one tweet
/// - `batch <url>...` - Extract several tweets in order
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/tweet-extractor/config.toml`, creating a commented
/// default on first run.
pub mod config;

/// Core domain models.
///
/// - [`ExtractionResult`](domain::ExtractionResult): sparse per-URL record
/// - [`BatchResponse`](domain::BatchResponse): aggregate of a batch run
/// - [`is_valid_tweet_url`](domain::is_valid_tweet_url): syntactic URL check
pub mod domain;

/// Count normalization for abbreviated engagement numbers.
pub mod normalizer;

/// Browser-driven scraping.
///
/// - [`TweetExtractor`](scraper::TweetExtractor): retrying orchestrator
/// - [`ChromeSessionManager`](scraper::ChromeSessionManager): chromiumoxide sessions
/// - [`Strategy`](scraper::Strategy): one way of reading a field off a page
pub mod scraper;

/// HTTP facade built on axum.
pub mod server;
