//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the structured logger for the kiosk and the kitchen listener.
//!
//! ## What Gets Traced
//!
//! - **Order log**: startup and shutdown with the log size, each append with its
//!   `order_number` and `total`, flush failures
//! - **Checkout**: refusals, placed orders, persistence failures, one span per checkout
//! - **Dispatch**: one line per settled dispatch with `disposition` and `elapsed_ms`
//! - **Kitchen listener**: accepted connections and received orders
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run --bin kiosk
//!
//! # Full order drafts and frame sizes
//! RUST_LOG=debug cargo run --bin kiosk
//!
//! # Only the dispatcher
//! RUST_LOG=kiosk_order::kitchen=debug cargo run --bin kiosk
//! ```
//!
//! With `RUST_LOG=info` a checkout against a running kitchen looks like:
//!
//! ```text
//! INFO Order log started path="orders.json" size=41
//! INFO checkout: Appended order_number=#42 total=67000 size=42 order_type=DineIn
//! INFO checkout: Order placed order_number=#42 total=67000 order_type=DineIn
//! INFO dispatch: Dispatch settled disposition="delivered" elapsed_ms=3 order_number=#42 kitchen=localhost:9999
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
