use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::url::author_handle;

/// Timestamp layout used for every time field the service emits.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const INVALID_URL_MESSAGE: &str = "Invalid tweet URL";
pub const EXHAUSTED_MESSAGE: &str = "Could not extract tweet information after multiple attempts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Success,
    Error,
}

/// Engagement counts as decimal strings, already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub likes: String,
    pub retweets: String,
    pub replies: String,
    pub views: String,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            likes: "0".into(),
            retweets: "0".into(),
            replies: "0".into(),
            views: "0".into(),
        }
    }
}

/// Fields scraped from one loaded page during a single attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetFields {
    pub author_name: String,
    pub text: String,
    pub metrics: Metrics,
    pub images: Vec<String>,
    pub created_at: String,
}

impl TweetFields {
    /// An attempt only counts when the author name or the text was found.
    pub fn has_essentials(&self) -> bool {
        !self.author_name.is_empty() || !self.text.is_empty()
    }
}

/// The sparse record returned for one extraction call.
///
/// Absent, empty-string and empty-list fields are never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub url: String,
    pub status: ExtractionStatus,
    #[serde(serialize_with = "serialize_timestamp", deserialize_with = "deserialize_timestamp")]
    pub extracted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ExtractionResult {
    /// Start a record for `url`. The timestamp is taken now, not at completion.
    pub fn pending(url: &str) -> Self {
        Self {
            url: url.to_string(),
            status: ExtractionStatus::Error,
            extracted_at: Utc::now(),
            message: None,
            author: author_handle(url),
            author_name: None,
            text: None,
            likes: None,
            retweets: None,
            replies: None,
            views: None,
            images: Vec::new(),
            created_at: None,
        }
    }

    /// Record for a URL that failed validation. No handle is reported.
    pub fn invalid_url(url: &str) -> Self {
        let mut result = Self::pending(url);
        result.author = None;
        result.message = Some(INVALID_URL_MESSAGE.to_string());
        result
    }

    pub fn exhausted(mut self) -> Self {
        self.status = ExtractionStatus::Error;
        self.message = Some(EXHAUSTED_MESSAGE.to_string());
        self
    }

    pub fn failed(mut self, message: impl Into<String>) -> Self {
        self.status = ExtractionStatus::Error;
        self.message = Some(message.into());
        self
    }

    /// Fill the record from a successful attempt, dropping empty values.
    pub fn succeeded(mut self, fields: TweetFields) -> Self {
        self.status = ExtractionStatus::Success;
        self.message = None;
        self.author_name = non_empty(fields.author_name);
        self.text = non_empty(fields.text);
        self.likes = non_empty(fields.metrics.likes);
        self.retweets = non_empty(fields.metrics.retweets);
        self.replies = non_empty(fields.metrics.replies);
        self.views = non_empty(fields.metrics.views);
        self.images = fields.images.into_iter().filter(|i| !i.is_empty()).collect();
        self.created_at = non_empty(fields.created_at);
        self.author = self.author.take().and_then(non_empty);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

/// Format a UTC timestamp in the service-wide layout.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn serialize_timestamp<S: Serializer>(
    at: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(at))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    chrono::NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
