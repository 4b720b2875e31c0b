use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::tweet::{TweetFields, TIMESTAMP_FORMAT};
use crate::scraper::metrics::{self, reconcile_max, MetricReadings};
use crate::scraper::strategy::{first_match, SelectorText, Strategy};
use crate::scraper::PageHandle;

/// The main tweet container; its presence means the post has rendered.
pub const TWEET_ARTICLE: &str = r#"article[data-testid="tweet"]"#;

const USER_NAME_BLOCK: &str = concat!(
    r#"article[data-testid="tweet"] div[data-testid="User-Name"]"#,
    " > div:first-child > div:first-child span",
);
const MODAL_DIALOG: &str = r#"div[aria-modal="true"] div[role="dialog"]"#;
const MODAL_CLOSE: &str = r#"div[aria-modal="true"] div[role="button"][aria-label="Close"]"#;
const TWEET_IMAGES: &str = r#"article[data-testid="tweet"] img[alt="Image"]"#;
const IMAGE_HOST: &str = "pbs.twimg.com";

/// Ordered strategies for every field of a tweet.
pub struct FieldExtractors {
    author_name: Vec<Box<dyn Strategy<String>>>,
    text: Vec<Box<dyn Strategy<String>>>,
    metrics: Vec<Box<dyn Strategy<MetricReadings>>>,
    images: Vec<Box<dyn Strategy<Vec<String>>>>,
    created_at: Vec<Box<dyn Strategy<String>>>,
}

impl Default for FieldExtractors {
    fn default() -> Self {
        Self {
            author_name: vec![
                Box::new(SelectorText::new("user-name-block", USER_NAME_BLOCK)),
                Box::new(SelectorText::new(
                    "profile-link",
                    r#"article[data-testid="tweet"] a[role="link"] div[dir="auto"] span span"#,
                )),
                Box::new(SelectorText::new(
                    "user-name-any",
                    r#"article[data-testid="tweet"] div[data-testid="User-Name"] span"#,
                )),
            ],
            text: vec![
                Box::new(SelectorText::new(
                    "tweet-text",
                    r#"article[data-testid="tweet"] div[data-testid="tweetText"]"#,
                )),
                Box::new(SelectorText::new(
                    "lang-block",
                    r#"article[data-testid="tweet"] div[lang]"#,
                )),
            ],
            metrics: metrics::default_strategies(),
            images: vec![Box::new(TweetImages)],
            created_at: vec![
                Box::new(TimeStamp::new("article-time", r#"article[data-testid="tweet"] time"#)),
                Box::new(TimeStamp::new("any-time", "time[datetime]")),
            ],
        }
    }
}

impl FieldExtractors {
    /// Run every extractor against `page`. Misses become empty values.
    pub async fn scrape(&self, page: &dyn PageHandle) -> TweetFields {
        info!("Extracting tweet data...");

        let author_name = first_match("author_name", &self.author_name, page)
            .await
            .unwrap_or_default();
        let text = first_match("text", &self.text, page).await.unwrap_or_default();

        let mut readings = Vec::with_capacity(self.metrics.len());
        for strategy in &self.metrics {
            let reading = strategy.extract(page).await.unwrap_or_default();
            debug!(strategy = strategy.name(), ?reading, "Metric reading");
            readings.push(reading);
        }
        let metrics = reconcile_max(&readings);

        let images = first_match("images", &self.images, page)
            .await
            .unwrap_or_default();
        let created_at = first_match("created_at", &self.created_at, page)
            .await
            .unwrap_or_default();

        TweetFields {
            author_name,
            text,
            metrics,
            images,
            created_at,
        }
    }
}

/// Close a login/consent modal if one is covering the tweet.
///
/// Failures are logged and otherwise ignored.
pub async fn dismiss_dialogs(page: &dyn PageHandle, pause: Duration) {
    let dialogs = match page.count(MODAL_DIALOG).await {
        Ok(n) => n,
        Err(e) => {
            warn!("Error handling dialogs: {}", e);
            return;
        }
    };
    if dialogs == 0 {
        return;
    }

    match page.click_first(MODAL_CLOSE).await {
        Ok(true) => {
            info!("Dismissed modal dialog");
            tokio::time::sleep(pause).await;
        }
        Ok(false) => debug!("Modal dialog has no close button"),
        Err(e) => warn!("Error handling dialogs: {}", e),
    }
}

/// Media image URLs, canonicalized and deduplicated in page order.
struct TweetImages;

#[async_trait]
impl Strategy<Vec<String>> for TweetImages {
    fn name(&self) -> &str {
        "alt-image"
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<Vec<String>> {
        let sources = match page.attributes(TWEET_IMAGES, "src").await {
            Ok(sources) => sources,
            Err(e) => {
                debug!("Image lookup failed: {}", e);
                return None;
            }
        };

        let mut images: Vec<String> = Vec::new();
        for src in sources {
            if let Some(url) = canonical_image_url(&src) {
                if !images.contains(&url) {
                    images.push(url);
                }
            }
        }

        (!images.is_empty()).then_some(images)
    }
}

/// Strip sizing parameters from a media URL. Profile pictures and
/// non-media hosts yield `None`.
fn canonical_image_url(src: &str) -> Option<String> {
    if src.contains("profile") {
        return None;
    }
    let mut url = Url::parse(src).ok()?;
    if url.host_str() != Some(IMAGE_HOST) {
        return None;
    }
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// Machine-readable `datetime` of a `<time>` element, reformatted in UTC.
struct TimeStamp {
    name: &'static str,
    selector: &'static str,
}

impl TimeStamp {
    const fn new(name: &'static str, selector: &'static str) -> Self {
        Self { name, selector }
    }
}

#[async_trait]
impl Strategy<String> for TimeStamp {
    fn name(&self) -> &str {
        self.name
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<String> {
        let values = page.attributes(self.selector, "datetime").await.ok()?;
        values.iter().find_map(|raw| format_datetime(raw))
    }
}

fn format_datetime(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string())
}
