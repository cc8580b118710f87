use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("invalid record id: {0:?}")]
    InvalidId(String),
}
