use thiserror::Error;

use fintrack_config::ConfigError;
use fintrack_core::CoreError;

/// Error type covering every failure surfaced by the fintrack facade.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FinanceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FinanceError::Core(err) if err.is_not_found())
    }
}

pub type FinanceResult<T> = Result<T, FinanceError>;
