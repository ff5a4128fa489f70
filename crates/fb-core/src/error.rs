//! Workspace base error type.
//!
//! Each `fb-*` crate keeps its own error enum for its own contract; this one
//! covers what `fb-core` itself can reject (definition loading, config
//! validation).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unit definition {0:?} defined twice")]
    DuplicateDefinition(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fb-core`.
pub type CoreResult<T> = Result<T, CoreError>;
