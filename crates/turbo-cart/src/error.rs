//! Cart error types.

use thiserror::Error;
use turbo_cache::CacheError;

use crate::ids::ProductId;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Cart capabilities requested outside an active provider scope.
    ///
    /// This is an integration bug in the caller, not a data error.
    #[error("use_cart must be used within a CartProvider scope")]
    OutsideScope,

    /// Persistence backend failure.
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// Snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// A decoded snapshot that breaks a cart invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Two line items share an id.
    #[error("duplicate line item: {0}")]
    DuplicateId(ProductId),

    /// A line item has quantity zero.
    #[error("line item {0} has zero quantity")]
    ZeroQuantity(ProductId),
}
