use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid tweet URL: {0}")]
    InvalidInput(String),

    #[error("Browser setup failed: {0}")]
    DriverSetup(String),

    #[error("Timed out waiting for {0}")]
    NavigationTimeout(String),

    #[error("Failed to extract essential tweet data")]
    ExtractionIncomplete,

    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("{0}")]
    Unexpected(String),
}

impl ExtractError {
    /// Whether the orchestrator may spend another attempt after this error.
    ///
    /// Only bad input is terminal; every per-attempt failure counts against
    /// the retry budget.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExtractError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
