//! # Kiosk Order
//!
//! > **Order lifecycle and kitchen dispatch for a point-of-sale kiosk.**
//!
//! A customer fills a cart, checks out, and the kitchen hears about it. This crate is the
//! part between those two moments: the cart, the durable order log that hands out order
//! numbers, and the framed TCP client that relays each placed order to the kitchen. Menus,
//! screens and dialogs live elsewhere; they call into the [`coordinator`] and render the
//! notifications it produces.
//!
//! ## 🏗️ Design
//!
//! ### Persist first, dispatch second
//! An order counts as placed once the order log has flushed it to disk. Only then is it
//! handed to the kitchen, on a background task, with a single attempt. Whatever the kitchen
//! says (or fails to say) only changes the notification banner; the order and the cleared
//! cart stay as they are.
//!
//! ### One writer for the log
//! The [`order_log`] actor owns the log and processes requests one at a time. Assigning
//! `max(order_number) + 1` and appending happen in the same request, so two checkouts can
//! never share a number, and no lock is needed.
//!
//! ### No blocking the foreground
//! Kitchen I/O never runs on the caller's task. Outcomes come back as values on a channel
//! ([`kitchen::KitchenNotices`]); the foreground loop drains and renders them.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - [`CartStore`](model::CartStore), [`Order`](model::Order) and friends
//! - [`order_log`] - durable append-only log, order numbering, reporting snapshots
//! - [`kitchen`] - wire protocol, [`KitchenDispatcher`](kitchen::KitchenDispatcher), dispositions, a conformant listener
//! - [`coordinator`] - the checkout state machine
//! - [`lifecycle`] - [`KioskSystem`](lifecycle::KioskSystem) wiring and [`setup_tracing`](lifecycle::setup_tracing)
//! - [`config`] - environment-driven settings
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Terminal 1: a kitchen that accepts everything
//! RUST_LOG=info cargo run --bin kitchen_listener
//!
//! # Terminal 2: place a demo order
//! RUST_LOG=info cargo run --bin kiosk
//! ```

pub mod config;
pub mod coordinator;
pub mod kitchen;
pub mod lifecycle;
pub mod model;
pub mod order_log;
