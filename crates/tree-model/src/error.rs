use thiserror::Error;

use tree_store::StoreError;
use tree_types::TypeError;

/// Errors returned by model actions. A failed action changes nothing.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("row key error: {0}")]
    RowKey(#[from] TypeError),
}

pub type ModelResult<T> = Result<T, ModelError>;
