//! # Tick Matcher
//!
//! Price-time priority matching core for a single instrument.
//!
//! ## Architecture
//!
//! - **Types**: Order events and the trade/cancel results they produce
//! - **OrderBook**: Fixed-capacity order pool and the two-sided priority book
//! - **Engine**: The matcher that crosses incoming orders and serves cancels
//! - **Channel**: Bounded result channel drained by an external consumer
//!
//! ## Design Principles
//!
//! 1. **Determinism**: The same event sequence yields the same results and book
//! 2. **Integer Prices**: Signed tick prices, no floating point
//! 3. **Pre-allocated Memory**: Slab-backed pool with a hard capacity
//! 4. **Synchronous Execution**: One event runs to completion before the next
//! 5. **Single Ownership**: Pool records move between matcher and book as handles

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Response
pub mod types;

/// Order pool and priority book
pub mod orderbook;

/// Matching engine
pub mod engine;

/// Result channel
pub mod channel;

/// Matcher configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use channel::{result_channel, ResultReceiver, ResultSender};
pub use config::{ConfigError, MatcherConfig};
pub use engine::{Matcher, MatcherStats};
pub use error::MatchError;
pub use orderbook::{OrderBook, OrderHandle, OrderPool};
pub use types::{Order, OrderIdentity, OrderKind, Response, MARKET_PRICE};
