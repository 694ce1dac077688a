use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid row key: {0}")]
    InvalidRowKey(String),

    #[error("invalid integer id: {0}")]
    InvalidInteger(String),
}
