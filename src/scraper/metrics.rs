//! Engagement metrics.
//!
//! Counts are read by several independent strategies and combined with
//! [`reconcile_max`]: a metric only changes when a later reading is strictly
//! larger. The markup exposes different subsets of the real numbers depending
//! on how far the page has loaded, so the largest reading is kept.
//!
//! NOTE: max-wins is a heuristic around unstable markup, not a business rule.
//! It is preserved as observable behavior; do not read a reconciled value as
//! more than "the largest number any strategy saw".

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::domain::Metrics;
use crate::normalizer::{is_count_like, normalize_count};
use crate::scraper::strategy::Strategy;
use crate::scraper::PageHandle;

const ARTICLE: &str = r#"article[data-testid="tweet"]"#;

/// Positional strategy only trusts the first few count-looking nodes.
const POSITIONAL_MIN: usize = 3;
const POSITIONAL_MAX: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Replies,
    Retweets,
    Likes,
    Views,
}

impl Metric {
    /// Document order of the action bar.
    pub const ALL: [Metric; 4] = [
        Metric::Replies,
        Metric::Retweets,
        Metric::Likes,
        Metric::Views,
    ];

    /// `data-testid` values of the action control, including toggled states.
    fn test_ids(self) -> &'static [&'static str] {
        match self {
            Metric::Replies => &["reply"],
            Metric::Retweets => &["retweet", "unretweet"],
            Metric::Likes => &["like", "unlike"],
            Metric::Views => &["analyticsButton"],
        }
    }

    fn from_label_word(word: &str) -> Option<Metric> {
        match word.to_ascii_lowercase().as_str() {
            "reply" | "replies" => Some(Metric::Replies),
            "repost" | "reposts" | "retweet" | "retweets" => Some(Metric::Retweets),
            "like" | "likes" => Some(Metric::Likes),
            "view" | "views" => Some(Metric::Views),
            _ => None,
        }
    }

    /// Selector list for this metric's control inside the tweet article.
    fn control_selector(self, suffix: &str) -> String {
        self.test_ids()
            .iter()
            .map(|id| format!(r#"{ARTICLE} [data-testid="{id}"]{suffix}"#))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One strategy's view of the four counts; `None` means "not seen".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricReadings {
    pub replies: Option<u64>,
    pub retweets: Option<u64>,
    pub likes: Option<u64>,
    pub views: Option<u64>,
}

impl MetricReadings {
    pub fn get(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Replies => self.replies,
            Metric::Retweets => self.retweets,
            Metric::Likes => self.likes,
            Metric::Views => self.views,
        }
    }

    /// Record `value`, keeping the larger one if the metric was already seen.
    pub fn observe(&mut self, metric: Metric, value: u64) {
        let slot = match metric {
            Metric::Replies => &mut self.replies,
            Metric::Retweets => &mut self.retweets,
            Metric::Likes => &mut self.likes,
            Metric::Views => &mut self.views,
        };
        *slot = Some(slot.map_or(value, |current| current.max(value)));
    }

    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Combine readings in strategy order. Each metric starts at 0 and is only
/// replaced by a strictly greater reading.
pub fn reconcile_max(readings: &[MetricReadings]) -> Metrics {
    let mut best = [0u64; 4];
    for reading in readings {
        for (slot, metric) in best.iter_mut().zip(Metric::ALL) {
            if let Some(value) = reading.get(metric) {
                if value > *slot {
                    *slot = value;
                }
            }
        }
    }

    let [replies, retweets, likes, views] = best;
    Metrics {
        likes: likes.to_string(),
        retweets: retweets.to_string(),
        replies: replies.to_string(),
        views: views.to_string(),
    }
}

/// The strategies in the order they are consulted.
pub fn default_strategies() -> Vec<Box<dyn Strategy<MetricReadings>>> {
    vec![
        Box::new(SiblingCount),
        Box::new(CountTestId),
        Box::new(AccessibilityLabel),
        Box::new(ControlCaption),
        Box::new(Positional),
    ]
}

async fn first_text_count(page: &dyn PageHandle, selector: &str) -> Option<u64> {
    let texts = match page.texts(selector).await {
        Ok(texts) => texts,
        Err(e) => {
            debug!("Metric lookup failed for {}: {}", selector, e);
            return None;
        }
    };
    texts
        .iter()
        .find(|t| !t.trim().is_empty())
        .map(|t| normalize_count(t))
}

async fn first_label_count(page: &dyn PageHandle, selector: &str) -> Option<u64> {
    let labels = page.attributes(selector, "aria-label").await.ok()?;
    labels
        .iter()
        .find(|label| !label.trim().is_empty())
        .map(|label| normalize_count(label))
}

fn none_if_empty(readings: MetricReadings) -> Option<MetricReadings> {
    (!readings.is_empty()).then_some(readings)
}

/// Count nodes rendered as siblings after each action control; views come
/// from the caption of the analytics link.
struct SiblingCount;

#[async_trait]
impl Strategy<MetricReadings> for SiblingCount {
    fn name(&self) -> &str {
        "sibling-count"
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<MetricReadings> {
        let mut readings = MetricReadings::default();
        for metric in [Metric::Replies, Metric::Retweets, Metric::Likes] {
            let selector = metric.control_selector(" ~ span");
            if let Some(value) = first_text_count(page, &selector).await {
                readings.observe(metric, value);
            }
        }
        let views = format!(r#"{ARTICLE} a[aria-label*="view"]"#);
        if let Some(value) = first_text_count(page, &views).await {
            readings.observe(Metric::Views, value);
        }
        none_if_empty(readings)
    }
}

/// Dedicated `<metric>-count` test ids.
struct CountTestId;

#[async_trait]
impl Strategy<MetricReadings> for CountTestId {
    fn name(&self) -> &str {
        "count-test-id"
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<MetricReadings> {
        let mut readings = MetricReadings::default();
        for metric in Metric::ALL {
            let selector = metric
                .test_ids()
                .iter()
                .map(|id| format!(r#"{ARTICLE} [data-testid="{id}-count"]"#))
                .collect::<Vec<_>>()
                .join(", ");
            if let Some(value) = first_text_count(page, &selector).await {
                readings.observe(metric, value);
            }
        }
        none_if_empty(readings)
    }
}

static GROUP_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(\d+(?:[.,]\d+)*[KMB]?)\s+",
        r"(replies|reply|reposts|repost|retweets|retweet|likes|like|views|view)\b",
    ))
    .expect("group label pattern is valid")
});

/// `aria-label`s: per-control labels ("1,234 Likes. Like") and the action
/// bar's summary ("12 replies, 34 reposts, 567 likes, 8,901 views").
struct AccessibilityLabel;

#[async_trait]
impl Strategy<MetricReadings> for AccessibilityLabel {
    fn name(&self) -> &str {
        "aria-label"
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<MetricReadings> {
        let mut readings = MetricReadings::default();

        for metric in [Metric::Replies, Metric::Retweets, Metric::Likes] {
            if let Some(value) = first_label_count(page, &metric.control_selector("")).await {
                readings.observe(metric, value);
            }
        }
        let views = format!(r#"{ARTICLE} a[aria-label*="view"]"#);
        if let Some(value) = first_label_count(page, &views).await {
            readings.observe(Metric::Views, value);
        }

        let group = format!(r#"{ARTICLE} [role="group"][aria-label]"#);
        if let Ok(labels) = page.attributes(&group, "aria-label").await {
            for label in labels {
                for caps in GROUP_LABEL_RE.captures_iter(&label) {
                    if let Some(metric) = Metric::from_label_word(&caps[2]) {
                        readings.observe(metric, normalize_count(&caps[1]));
                    }
                }
            }
        }

        none_if_empty(readings)
    }
}

/// Caption text of the interactive control itself ("1.2K").
struct ControlCaption;

#[async_trait]
impl Strategy<MetricReadings> for ControlCaption {
    fn name(&self) -> &str {
        "control-caption"
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<MetricReadings> {
        let mut readings = MetricReadings::default();
        for metric in Metric::ALL {
            let selector = metric.control_selector("");
            let texts = page.texts(&selector).await.unwrap_or_default();
            if let Some(caption) = texts.iter().find(|t| is_count_like(t)) {
                readings.observe(metric, normalize_count(caption));
            }
        }
        none_if_empty(readings)
    }
}

/// Numeric-looking counters in document order, assumed to be
/// reply, retweet, like, view.
struct Positional;

#[async_trait]
impl Strategy<MetricReadings> for Positional {
    fn name(&self) -> &str {
        "positional"
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<MetricReadings> {
        let selector = format!(r#"{ARTICLE} [data-testid="app-text-transition-container"]"#);
        let texts = page.texts(&selector).await.ok()?;
        let counts: Vec<u64> = texts
            .iter()
            .filter(|t| is_count_like(t))
            .take(POSITIONAL_MAX)
            .map(|t| normalize_count(t))
            .collect();

        if counts.len() < POSITIONAL_MIN {
            return None;
        }

        let mut readings = MetricReadings::default();
        for (metric, value) in Metric::ALL.into_iter().zip(counts) {
            readings.observe(metric, value);
        }
        Some(readings)
    }
}
