use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Chrome flags applied to every session, on top of chromiumoxide's defaults.
pub const CHROME_FLAGS: &[&str] = &[
    "--no-sandbox",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--disable-features=site-per-process",
    "--js-flags=--expose-gc",
];

/// Configuration for browser sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Viewport width in pixels (default: 1280)
    pub window_width: u32,

    /// Viewport height in pixels (default: 720)
    pub window_height: u32,

    /// Page navigation timeout in seconds (default: 30)
    pub navigation_timeout_secs: u64,

    /// How long to wait for the tweet article to appear, in seconds (default: 15)
    pub element_timeout_secs: u64,

    /// Pause after closing a login/consent dialog in milliseconds (default: 1000)
    pub dialog_pause_ms: u64,

    /// User agent string to use
    pub user_agent: Option<String>,

    /// Explicit Chrome/Chromium binary. Auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 720,
            navigation_timeout_secs: 30,
            element_timeout_secs: 15,
            dialog_pause_ms: 1000,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            chrome_executable: None,
        }
    }
}

impl ScraperConfig {
    /// Get the navigation timeout as a Duration
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Get the element wait timeout as a Duration
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn dialog_pause(&self) -> Duration {
        Duration::from_millis(self.dialog_pause_ms)
    }
}

/// Retry policy for the extraction loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (default: 2, so 3 attempts in total)
    pub max_retries: u32,

    /// Base backoff delay in seconds (default: 1)
    pub retry_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay_secs: 1,
        }
    }
}

impl RetryConfig {
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Exponential backoff before the attempt after `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_secs(self.retry_delay_secs.saturating_mul(factor))
    }
}
