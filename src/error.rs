//! Error types returned by the matcher.
//!
//! Rejections (`IllegalMarketOrder`, `ZeroAmount`, `PoolExhausted`) happen
//! before the book, pool or channel are touched. `ResultChannelClosed` is
//! reported after the event has been applied in full.

use thiserror::Error;

/// Errors reported by [`Matcher::submit`](crate::engine::Matcher::submit)
/// and by decoding an order kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A buy carried the market price sentinel
    #[error("buy order {trader_id}/{order_id} cannot be submitted at market price")]
    IllegalMarketOrder { trader_id: u32, order_id: u32 },

    /// An event carried a kind outside Buy/Sell/Cancel
    #[error("unsupported order kind {0}")]
    UnsupportedOrderKind(u8),

    /// Every pool slot is live
    #[error("order pool exhausted (capacity {capacity})")]
    PoolExhausted { capacity: usize },

    /// A buy or sell asked to trade nothing
    #[error("order {trader_id}/{order_id} has zero amount")]
    ZeroAmount { trader_id: u32, order_id: u32 },

    /// The result consumer has hung up
    #[error("result channel closed by consumer")]
    ResultChannelClosed,
}
