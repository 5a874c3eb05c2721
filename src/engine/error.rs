//! Recipe graph error types.

use thiserror::Error;

/// Errors raised by the recipe graph engine and its collaborators.
#[derive(Error, Debug)]
pub enum ShopError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("item not found: {0}")]
    NotFound(String),

    #[error("recipe already exists: {0}")]
    AlreadyExists(String),

    #[error("operation not implemented: {0}")]
    Unsupported(&'static str),

    #[error("recipe cycle detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("no more input while defining '{0}'")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse recipe store: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to serialize recipe store: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ShopError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        ShopError::Validation(msg.into())
    }

    /// Errors the interactive collector recovers from by asking again.
    pub fn is_recoverable_input(&self) -> bool {
        matches!(
            self,
            ShopError::Validation(_) | ShopError::NotFound(_) | ShopError::Cycle(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
