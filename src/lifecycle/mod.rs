//! # System Lifecycle
//!
//! Starts, wires and stops the pieces of one kiosk terminal.
//!
//! ## Wiring
//!
//! 1. **Order log** - load the durable file and spawn the single-writer actor
//! 2. **Kitchen** - build the TCP dispatcher from config, or none for local-only checkout
//! 3. **Coordinator** - give it a log client and the dispatcher; keep the notice receiver
//!    for the foreground loop
//!
//! ## Graceful Shutdown
//!
//! 1. **Wait for dispatches** - in-flight kitchen sends run to completion or timeout
//! 2. **Drop all log clients** - closes the actor's channel
//! 3. **Await the actor** - it logs its final size and exits
//!
//! The [`setup_tracing`] function initializes structured logging; see the [`tracing`](self::tracing)
//! module for what gets logged.

pub mod kiosk_system;
pub mod tracing;

pub use self::kiosk_system::*;
pub use self::tracing::setup_tracing;
