//! Error types for skipchain
//!
//! Provides a unified error type for all operations. Failures raised by the
//! external block and tip stores travel through [`StoreError`] untouched.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Result type alias using ChainError
pub type Result<T> = std::result::Result<T, ChainError>;

/// Unified error type for skipchain operations
#[derive(Debug, Error)]
pub enum ChainError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    #[error("{0} requires storage declared as sorted")]
    NotSorted(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Store(#[from] StoreError),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Snapshot corruption detected: {0}")]
    Corruption(String),
}

impl ChainError {
    /// True for errors raised before any store access (bad index name,
    /// missing sorted configuration, invalid construction).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ChainError::UnknownIndex(_) | ChainError::NotSorted(_) | ChainError::Config(_)
        )
    }
}

/// Opaque failure reported by a block or tip store adapter.
///
/// Display and `source()` forward to the adapter's own error, and the
/// original value can be recovered with [`StoreError::downcast_ref`].
pub struct StoreError(Box<dyn StdError + Send + Sync>);

impl StoreError {
    pub fn new(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(error.into())
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync> {
        self.0
    }
}

impl fmt::Debug for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}
