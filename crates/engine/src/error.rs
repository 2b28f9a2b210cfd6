use thiserror::Error;

use smartstock_core::DomainError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid job input: {0}")]
    InvalidInput(String),

    #[error("forecast failed: {0}")]
    Forecast(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl EngineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn forecast(msg: impl Into<String>) -> Self {
        Self::Forecast(msg.into())
    }
}
