//! Error types for block tree construction and the surrounding tooling.

use thiserror::Error;

/// Tree construction and proof errors
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Empty input: the stream produced no blocks")]
    EmptyInput,

    #[error("Block {index} out of range (tree has {leaves} blocks)")]
    BlockOutOfRange { index: usize, leaves: usize },

    #[error("Stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by configuration loading, logging setup, and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
