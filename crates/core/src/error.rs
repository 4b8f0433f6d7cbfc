use thiserror::Error;

pub type AudienceResult<T> = Result<T, AudienceError>;

#[derive(Error, Debug)]
pub enum AudienceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AudienceError {
    fn from(err: config::ConfigError) -> Self {
        AudienceError::Config(err.to_string())
    }
}
