//! Error handling and custom error types
//!
//! Provides unified error handling across the pipeline using thiserror. Most
//! provider failures are absorbed by the cascade; only `InvalidRequest`
//! reaches callers of `ImagePipeline::generate`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("All image tiers failed")]
    CascadeExhausted,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
