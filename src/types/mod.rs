//! Core data types for the matching core
//!
//! ## Types
//!
//! - [`Order`]: An order event and the record the pool stores for it
//! - [`OrderKind`]: Buy, Sell or Cancel
//! - [`OrderIdentity`]: `(trader_id, order_id)` used for cancel lookup
//! - [`Response`]: A trade or cancel result on the result channel
//!
//! ## Prices
//!
//! Prices are signed `i64` ticks. [`MARKET_PRICE`] is reserved for market sells.

mod order;
mod response;

// Re-export all types at module level
pub use order::{Order, OrderIdentity, OrderKind, MARKET_PRICE};
pub use response::{CancelKind, CancelReport, FillKind, Response, TradeReport};
