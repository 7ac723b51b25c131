//! # Order Log
//!
//! The durable, append-only record of every placed order, and the source of order numbers.
//!
//! ## Structure
//!
//! - [`file`] - [`OrderLogFile`], the JSON file on disk
//! - [`actor`] - [`OrderLogActor`], the single writer
//! - [`client`] - [`OrderLogClient`], the cloneable handle used by the coordinator
//! - [`snapshot`] - [`OrderLogSnapshot`], detached read-only projections for reporting
//! - [`error`] - [`OrderLogError`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kiosk_order::order_log::{self, OrderLogFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = order_log::open(OrderLogFile::new("orders.json")).await?;
//!     tokio::spawn(actor.run());
//!
//!     let next = client.next_order_number().await?;
//!     println!("next order will be {next}");
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod client;
pub mod error;
pub mod file;
pub mod snapshot;

pub use actor::*;
pub use client::*;
pub use error::*;
pub use file::*;
pub use snapshot::*;

/// Loads `file` and creates the log actor and its client.
///
/// A missing file starts an empty log. The actor is not running until `run()` is spawned.
pub async fn open(file: OrderLogFile) -> Result<(OrderLogActor, OrderLogClient), OrderLogError> {
    let orders = file.load().await?;
    Ok(OrderLogActor::new(32, file, orders))
}
