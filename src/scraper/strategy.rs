use async_trait::async_trait;
use tracing::{debug, warn};

use crate::scraper::PageHandle;

/// One way of reading a value off a loaded page.
///
/// Strategies never fail: a miss, or any page error, is `None`.
#[async_trait]
pub trait Strategy<T: Send>: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self, page: &dyn PageHandle) -> Option<T>;
}

/// Try `strategies` in order and return the first hit.
pub async fn first_match<T: Send>(
    field: &str,
    strategies: &[Box<dyn Strategy<T>>],
    page: &dyn PageHandle,
) -> Option<T> {
    for strategy in strategies {
        if let Some(value) = strategy.extract(page).await {
            debug!(field, strategy = strategy.name(), "Strategy matched");
            return Some(value);
        }
    }
    warn!(field, "No strategy produced a value");
    None
}

/// First non-empty text among the elements matching a selector.
pub struct SelectorText {
    name: &'static str,
    selector: &'static str,
}

impl SelectorText {
    pub const fn new(name: &'static str, selector: &'static str) -> Self {
        Self { name, selector }
    }
}

#[async_trait]
impl Strategy<String> for SelectorText {
    fn name(&self) -> &str {
        self.name
    }

    async fn extract(&self, page: &dyn PageHandle) -> Option<String> {
        match page.texts(self.selector).await {
            Ok(texts) => texts
                .into_iter()
                .map(|t| t.trim().to_string())
                .find(|t| !t.is_empty()),
            Err(e) => {
                debug!(strategy = self.name, "Selector lookup failed: {}", e);
                None
            }
        }
    }
}
