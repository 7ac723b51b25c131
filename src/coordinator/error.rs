//! Error types for checkout.

use thiserror::Error;

/// Why a checkout was refused before anything was persisted. The user can fix and retry.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// There is nothing in the cart.
    #[error("The cart is empty")]
    EmptyCart,

    /// The cart has lines but they add up to nothing.
    #[error("The order total is zero")]
    ZeroTotal,
}
