//! Error types for the order log.

use crate::model::OrderNumber;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or appending to the order log.
#[derive(Debug, Error)]
pub enum OrderLogError {
    /// The log actor is no longer accepting requests.
    #[error("Order log actor closed")]
    ActorClosed,

    /// The log actor went away before answering.
    #[error("Order log actor dropped response channel")]
    ActorDropped,

    /// Reading or writing the durable file failed.
    #[error("Order log I/O failed at {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The durable file exists but is not a JSON array of orders.
    #[error("Order log at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The log could not be encoded for writing.
    #[error("Order log encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// An appended order would break the strictly increasing numbering.
    #[error("Order {number} is not newer than the latest order {latest}")]
    NonMonotonicNumber {
        number: OrderNumber,
        latest: OrderNumber,
    },
}

/// A failed durable append. The order is not placed.
pub type OrderPersistenceError = OrderLogError;
