//! In-memory page and session doubles for extractor and orchestrator tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::app::{ExtractError, Result};
use crate::scraper::{PageHandle, SessionManager, TWEET_ARTICLE};

/// A canned page: selectors map to texts and attribute values.
#[derive(Clone, Default)]
pub struct FakePage {
    texts: HashMap<String, Vec<String>>,
    attributes: HashMap<(String, String), Vec<String>>,
    present: HashMap<String, usize>,
    broken: HashSet<String>,
    clickable: HashSet<String>,
    fail_navigation: bool,
    clicks: Arc<Mutex<Vec<String>>>,
    navigations: Arc<Mutex<Vec<String>>>,
}

impl FakePage {
    /// A page on which the tweet article has rendered.
    pub fn tweet() -> Self {
        Self::default().with_present(TWEET_ARTICLE, 1)
    }

    pub fn with_texts(mut self, selector: &str, texts: &[&str]) -> Self {
        self.texts.insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_attributes(mut self, selector: &str, name: &str, values: &[&str]) -> Self {
        self.attributes.insert(
            (selector.to_string(), name.to_string()),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_present(mut self, selector: &str, count: usize) -> Self {
        self.present.insert(selector.to_string(), count);
        self
    }

    pub fn with_clickable(mut self, selector: &str) -> Self {
        self.clickable.insert(selector.to_string());
        self
    }

    /// Any lookup of `selector` returns an error.
    pub fn with_broken_selector(mut self, selector: &str) -> Self {
        self.broken.insert(selector.to_string());
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    fn check(&self, selector: &str) -> Result<()> {
        if self.broken.contains(selector) {
            return Err(ExtractError::Unexpected(format!("stale element for {selector}")));
        }
        Ok(())
    }
}

#[async_trait]
impl PageHandle for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.navigations.lock().unwrap().push(url.to_string());
        if self.fail_navigation {
            return Err(ExtractError::NavigationTimeout(url.to_string()));
        }
        Ok(())
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        self.check(selector)?;
        Ok(self.texts.get(selector).cloned().unwrap_or_default())
    }

    async fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        self.check(selector)?;
        Ok(self
            .attributes
            .get(&(selector.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        self.check(selector)?;
        let from_texts = self.texts.get(selector).map_or(0, Vec::len);
        let explicit = self.present.get(selector).copied().unwrap_or(0);
        let clickable = usize::from(self.clickable.contains(selector));
        Ok(from_texts.max(explicit).max(clickable))
    }

    async fn click_first(&self, selector: &str) -> Result<bool> {
        self.check(selector)?;
        if self.clickable.contains(selector) {
            self.clicks.lock().unwrap().push(selector.to_string());
            return Ok(true);
        }
        Ok(false)
    }
}

/// What the next `acquire` call should do.
pub enum Launch {
    Page(FakePage),
    SetupFails,
    Panics,
}

/// Scripted session manager that counts acquisitions and releases.
pub struct FakeSessions {
    script: Mutex<VecDeque<Launch>>,
    fallback: Option<FakePage>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl FakeSessions {
    pub fn scripted(script: Vec<Launch>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Every acquisition yields a copy of `page`.
    pub fn always(page: FakePage) -> Self {
        Self {
            fallback: Some(page),
            ..Self::scripted(Vec::new())
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// A session handed out by [`FakeSessions`]; may be rigged to panic mid-attempt.
pub struct FakeSession {
    page: FakePage,
    panic_on_navigate: bool,
}

#[async_trait]
impl PageHandle for FakeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        if self.panic_on_navigate {
            panic!("renderer crashed");
        }
        self.page.navigate(url).await
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        self.page.texts(selector).await
    }

    async fn attributes(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        self.page.attributes(selector, name).await
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        self.page.count(selector).await
    }

    async fn click_first(&self, selector: &str) -> Result<bool> {
        self.page.click_first(selector).await
    }
}

#[async_trait]
impl SessionManager for FakeSessions {
    type Session = FakeSession;

    async fn acquire(&self) -> Result<FakeSession> {
        let next = self.script.lock().unwrap().pop_front();
        let launch = match next {
            Some(launch) => launch,
            None => match &self.fallback {
                Some(page) => Launch::Page(page.clone()),
                None => Launch::SetupFails,
            },
        };

        match launch {
            Launch::Page(page) => {
                self.acquired.fetch_add(1, Ordering::SeqCst);
                Ok(FakeSession {
                    page,
                    panic_on_navigate: false,
                })
            }
            Launch::Panics => {
                self.acquired.fetch_add(1, Ordering::SeqCst);
                Ok(FakeSession {
                    page: FakePage::default(),
                    panic_on_navigate: true,
                })
            }
            Launch::SetupFails => Err(ExtractError::DriverSetup("no chrome binary".into())),
        }
    }

    async fn release(&self, _session: FakeSession) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
