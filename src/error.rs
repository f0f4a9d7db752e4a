use std::io;

use thiserror::Error;

/// Errors raised while validating, balancing or processing a segregation.
#[derive(Debug, Error)]
pub enum SegregateError {
    /// An operation ran out of order, e.g. `process` before `analyze`.
    #[error("invalid state: {0}")]
    State(String),
    /// The target set breaks one of its invariants.
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl SegregateError {
    pub(crate) fn state(msg: impl Into<String>) -> Self {
        SegregateError::State(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SegregateError::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SegregateError>;
