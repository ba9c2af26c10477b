//! Crossing test and execution price.
//!
//! A trade between a bid and an ask executes halfway between the two
//! prices, rounded down toward the ask. A market ask executes at the bid.
//!
//! ```
//! use tick_matcher::engine::price::trade_price;
//! use tick_matcher::types::MARKET_PRICE;
//!
//! assert_eq!(trade_price(101, 100), 100);
//! assert_eq!(trade_price(104, 100), 102);
//! assert_eq!(trade_price(100, MARKET_PRICE), 100);
//! ```

use crate::types::MARKET_PRICE;

/// Whether a bid at `bid` can trade with an ask at `ask`
#[inline]
pub fn crosses(bid: i64, ask: i64) -> bool {
    ask == MARKET_PRICE || bid >= ask
}

/// Execution price for a crossing bid/ask pair.
///
/// `ask + floor((bid - ask) / 2)`, or `bid` when the ask is at market.
#[inline]
pub fn trade_price(bid: i64, ask: i64) -> i64 {
    if ask == MARKET_PRICE {
        return bid;
    }
    // Widen so extreme tick values cannot overflow the spread
    let half_spread = (i128::from(bid) - i128::from(ask)).div_euclid(2);
    (i128::from(ask) + half_spread) as i64
}
