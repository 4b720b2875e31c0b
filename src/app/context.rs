use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, ConfigError, PORT_ENV};
use crate::scraper::{ChromeSessionManager, TweetExtractor};
use crate::server::AppState;

/// Wires configuration to a Chrome-backed extractor.
pub struct AppContext {
    pub config: Config,
    pub extractor: Arc<TweetExtractor<ChromeSessionManager>>,
}

impl AppContext {
    /// Load configuration (default path unless `config_path` is given) and
    /// build the extractor from it.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => Config::load_from(&path)?,
            None => Config::load()?,
        };
        let config = config.with_port_override(std::env::var(PORT_ENV).ok());
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let sessions = ChromeSessionManager::new(config.scraper.clone());
        let extractor = Arc::new(TweetExtractor::new(
            sessions,
            config.scraper.clone(),
            config.retry.clone(),
        ));
        Self { config, extractor }
    }

    /// Handler state for the HTTP facade.
    pub fn app_state(&self) -> AppState {
        AppState::new(self.extractor.clone(), &self.config.server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nrequest_timeout_secs = 7\n").unwrap();

        let ctx = AppContext::new(Some(path)).unwrap();
        assert_eq!(ctx.config.server.request_timeout_secs, 7);
        assert_eq!(ctx.extractor.sessions().config(), &ctx.config.scraper);
    }

    #[test]
    fn test_app_state_uses_server_timeout() {
        let mut config = Config::default();
        config.server.request_timeout_secs = 42;
        let ctx = AppContext::with_config(config);
        assert_eq!(ctx.app_state().request_timeout.as_secs(), 42);
    }
}
