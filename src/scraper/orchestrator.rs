use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{error, info, info_span, warn, Instrument};

use crate::app::{ExtractError, Result};
use crate::domain::url::navigable_url;
use crate::domain::{is_valid_tweet_url, ExtractionResult, TweetFields};
use crate::scraper::config::{RetryConfig, ScraperConfig};
use crate::scraper::fields::{dismiss_dialogs, FieldExtractors, TWEET_ARTICLE};
use crate::scraper::{PageHandle, SessionManager};

const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// Anything that can turn a tweet URL into an [`ExtractionResult`].
///
/// Never fails: every outcome, including bad input, is a result record.
#[async_trait]
pub trait Extract: Send + Sync {
    async fn extract(&self, url: &str) -> ExtractionResult;
}

/// Retrying extractor that uses a fresh browser session for every attempt.
pub struct TweetExtractor<M: SessionManager> {
    sessions: M,
    fields: FieldExtractors,
    scraper: ScraperConfig,
    retry: RetryConfig,
}

impl<M: SessionManager> TweetExtractor<M> {
    pub fn new(sessions: M, scraper: ScraperConfig, retry: RetryConfig) -> Self {
        Self {
            sessions,
            fields: FieldExtractors::default(),
            scraper,
            retry,
        }
    }

    pub fn sessions(&self) -> &M {
        &self.sessions
    }

    async fn run(&self, url: &str) -> ExtractionResult {
        if let Err(e) = check_url(url) {
            warn!("{}", e);
            return ExtractionResult::invalid_url(url);
        }

        let result = ExtractionResult::pending(url);
        let total = self.retry.total_attempts();

        for attempt in 0..total {
            info!("Extraction attempt {}/{}", attempt + 1, total);

            match self.attempt(url).await {
                Ok(fields) => {
                    info!("Successfully extracted tweet data");
                    return result.succeeded(fields);
                }
                Err(e) => warn!("Attempt {} failed: {}", attempt + 1, e),
            }

            if attempt < self.retry.max_retries {
                let delay = self.retry.backoff(attempt);
                info!("Retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        error!("Giving up after {} attempts", total);
        result.exhausted()
    }

    /// One attempt with its own session. The session is released on every
    /// exit path, including a panic inside the scrape.
    async fn attempt(&self, url: &str) -> Result<TweetFields> {
        let session = self.sessions.acquire().await?;

        let outcome = AssertUnwindSafe(self.scrape(&session, url))
            .catch_unwind()
            .await;

        self.sessions.release(session).await;

        match outcome {
            Ok(result) => result,
            Err(panic) => Err(ExtractError::Unexpected(format!(
                "Extraction panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }

    async fn scrape(&self, page: &M::Session, url: &str) -> Result<TweetFields> {
        page.navigate(&navigable_url(url)).await?;
        dismiss_dialogs(page, self.scraper.dialog_pause()).await;
        wait_for_selector(page, TWEET_ARTICLE, self.scraper.element_timeout()).await?;

        let fields = self.fields.scrape(page).await;
        if !fields.has_essentials() {
            return Err(ExtractError::ExtractionIncomplete);
        }
        Ok(fields)
    }
}

#[async_trait]
impl<M: SessionManager> Extract for TweetExtractor<M> {
    async fn extract(&self, url: &str) -> ExtractionResult {
        self.run(url).instrument(info_span!("extract", url)).await
    }
}

/// Bad input is the only terminal error; it never reaches an attempt.
fn check_url(url: &str) -> Result<()> {
    if is_valid_tweet_url(url) {
        Ok(())
    } else {
        Err(ExtractError::InvalidInput(url.to_string()))
    }
}

/// Poll until `selector` matches at least one element.
async fn wait_for_selector(page: &dyn PageHandle, selector: &str, timeout: Duration) -> Result<()> {
    let poll = async {
        loop {
            match page.count(selector).await {
                Ok(n) if n > 0 => return,
                Ok(_) => {}
                Err(e) => warn!("Selector poll failed: {}", e),
            }
            tokio::time::sleep(SELECTOR_POLL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| ExtractError::NavigationTimeout(selector.to_string()))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
