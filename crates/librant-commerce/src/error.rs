//! Commerce error types.

use thiserror::Error;

/// Errors from cart operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Quantity below one.
    #[error("Invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Unit price below zero.
    #[error("Invalid price: {0} (must not be negative)")]
    NegativePrice(i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Cart persistence failed.
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<librant_cache::CacheError> for CommerceError {
    fn from(e: librant_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}
