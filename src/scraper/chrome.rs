use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{ExtractError, Result};
use crate::scraper::config::{ScraperConfig, CHROME_FLAGS};
use crate::scraper::{PageHandle, SessionManager};

/// Launches one headless Chrome per session using chromiumoxide
#[derive(Debug, Clone)]
pub struct ChromeSessionManager {
    config: ScraperConfig,
}

impl ChromeSessionManager {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Create a session manager with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ScraperConfig::default())
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.config.window_width, self.config.window_height)
            .request_timeout(self.config.navigation_timeout());

        for flag in CHROME_FLAGS {
            builder = builder.arg(*flag);
        }

        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(|e| {
            ExtractError::DriverSetup(format!("Failed to build browser config: {}", e))
        })
    }
}

#[async_trait]
impl SessionManager for ChromeSessionManager {
    type Session = ChromeSession;

    async fn acquire(&self) -> Result<ChromeSession> {
        let browser_config = self.browser_config()?;

        let (mut browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ExtractError::DriverSetup(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Spawn the browser handler
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Handle browser events
            }
        });

        let page = match open_page(&browser, &self.config).await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!("Failed to close browser after setup error: {}", close_err);
                }
                handler.abort();
                return Err(e);
            }
        };

        debug!("Browser session started");
        Ok(ChromeSession {
            browser,
            page,
            handler,
            navigation_timeout: self.config.navigation_timeout(),
        })
    }

    async fn release(&self, mut session: ChromeSession) {
        if let Err(e) = session.page.clone().close().await {
            debug!("Failed to close page: {}", e);
        }
        if let Err(e) = session.browser.close().await {
            warn!("Error during browser cleanup: {}", e);
        }
        if let Err(e) = session.browser.wait().await {
            warn!("Error waiting for browser exit: {}", e);
        }
        info!("Browser session released");
    }
}

async fn open_page(browser: &Browser, config: &ScraperConfig) -> Result<Page> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| ExtractError::DriverSetup(format!("Failed to create page: {}", e)))?;

    // Set user agent if configured
    if let Some(ref ua) = config.user_agent {
        page.set_user_agent(ua)
            .await
            .map_err(|e| ExtractError::DriverSetup(format!("Failed to set user agent: {}", e)))?;
    }

    Ok(page)
}

/// A running Chrome with one open tab, owned by a single attempt.
///
/// Dropping the session stops its event handler; chromiumoxide kills the
/// child process when the `Browser` is dropped without being closed.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: std::time::Duration,
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl PageHandle for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        info!("Navigating to URL: {}", url);
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(CdpError::Timeout)) | Err(_) => {
                Err(ExtractError::NavigationTimeout(url.to_string()))
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let elements = self.page.find_elements(selector).await?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element.inner_text().await?.unwrap_or_default();
            texts.push(text.trim().to_string());
        }
        Ok(texts)
    }

    async fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        let elements = self.page.find_elements(selector).await?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(value) = element.attribute(name).await? {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.page.find_elements(selector).await?.len())
    }

    async fn click_first(&self, selector: &str) -> Result<bool> {
        let elements = self.page.find_elements(selector).await?;
        match elements.first() {
            Some(element) => {
                element.click().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_keeps_config() {
        let manager = ChromeSessionManager::with_defaults();
        assert_eq!(manager.config(), &ScraperConfig::default());
    }

    #[tokio::test]
    async fn test_missing_executable_is_driver_setup_error() {
        let manager = ChromeSessionManager::new(ScraperConfig {
            chrome_executable: Some("/nonexistent/chrome-binary".into()),
            ..ScraperConfig::default()
        });
        match manager.acquire().await {
            Err(ExtractError::DriverSetup(_)) => {}
            Err(other) => panic!("expected DriverSetup, got {other}"),
            Ok(_) => panic!("a browser should not launch from a missing path"),
        }
    }
}
