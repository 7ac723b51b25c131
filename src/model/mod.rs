//! Fixed-shape records for carts and orders.

pub mod cart;
pub mod order;

pub use cart::*;
pub use order::*;
