//! # Kitchen Dispatch
//!
//! Relays placed orders to the remote kitchen system.
//!
//! ## Structure
//!
//! - [`protocol`] - length-prefixed JSON framing and [`KitchenReply`]
//! - [`dispatcher`] - [`KitchenDispatcher`], one TCP exchange per order, and [`spawn_dispatch`]
//! - [`disposition`] - [`Disposition`] outcomes and the [`KitchenNotices`] channel to the foreground
//! - [`listener`] - [`KitchenListener`], a conformant kitchen-side endpoint
//!
//! ## Delivery policy
//!
//! At most one attempt per checkout. The order is already in the local log before dispatch
//! starts, so no outcome here can undo a checkout; reconciling missed orders is the
//! kitchen's job.

pub mod dispatcher;
pub mod disposition;
pub mod listener;
pub mod protocol;

pub use dispatcher::*;
pub use disposition::*;
pub use listener::*;
pub use protocol::*;
