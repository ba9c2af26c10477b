//! Order types for the matching core.
//!
//! ## Price Representation
//!
//! Prices are signed integers in instrument ticks. The reserved value
//! [`MARKET_PRICE`] marks a sell that matches at whatever the resting buyer
//! bids. It sorts below every real price, so market sells sit at the top of
//! the ask side.
//!
//! ## Identity
//!
//! `(trader_id, order_id)` identifies an order for cancellation and for
//! correlating results. See [`OrderIdentity`].

use crate::error::MatchError;

/// Reserved price meaning "match at the counterparty's price".
///
/// Legal only on sells.
pub const MARKET_PRICE: i64 = i64::MIN;

// ============================================================================
// OrderKind enum
// ============================================================================

/// What an incoming event asks the matcher to do.
///
/// Raw kind codes decoded by [`OrderKind::try_from`]:
/// - Buy = 0
/// - Sell = 1
/// - Cancel = 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    /// Bid - wants to purchase the asset
    Buy,
    /// Ask - wants to sell the asset
    Sell,
    /// Remove a resting order with the same identity
    Cancel,
}

impl TryFrom<u8> for OrderKind {
    type Error = MatchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderKind::Buy),
            1 => Ok(OrderKind::Sell),
            2 => Ok(OrderKind::Cancel),
            other => Err(MatchError::UnsupportedOrderKind(other)),
        }
    }
}

// ============================================================================
// OrderIdentity
// ============================================================================

/// The `(trader_id, order_id)` pair a submitter uses to refer to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderIdentity {
    pub trader_id: u32,
    pub order_id: u32,
}

impl OrderIdentity {
    pub fn new(trader_id: u32, order_id: u32) -> Self {
        Self { trader_id, order_id }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A single order event, and the record the pool stores for it.
///
/// `Order` is a plain `Copy` value: the matcher copies the caller's
/// description into pool storage and never keeps a reference to the original.
///
/// ## Example
///
/// ```
/// use tick_matcher::types::{Order, OrderKind};
///
/// let order = Order::buy(7, 1, 10_050, 25);
/// assert_eq!(order.kind, OrderKind::Buy);
/// assert_eq!(order.identity().trader_id, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Buy, Sell or Cancel
    pub kind: OrderKind,

    /// Limit price in ticks, or [`MARKET_PRICE`] for a market sell
    pub price: i64,

    /// Remaining quantity
    /// Decremented as the order is matched
    pub amount: u32,

    /// Submitting trader
    pub trader_id: u32,

    /// Trader-assigned order number
    pub order_id: u32,
}

impl Order {
    /// Create an order of any kind
    pub fn new(kind: OrderKind, price: i64, amount: u32, trader_id: u32, order_id: u32) -> Self {
        Self {
            kind,
            price,
            amount,
            trader_id,
            order_id,
        }
    }

    /// Limit buy
    pub fn buy(trader_id: u32, order_id: u32, price: i64, amount: u32) -> Self {
        Self::new(OrderKind::Buy, price, amount, trader_id, order_id)
    }

    /// Limit sell
    pub fn sell(trader_id: u32, order_id: u32, price: i64, amount: u32) -> Self {
        Self::new(OrderKind::Sell, price, amount, trader_id, order_id)
    }

    /// Sell that trades at the resting buyer's price
    pub fn market_sell(trader_id: u32, order_id: u32, amount: u32) -> Self {
        Self::new(OrderKind::Sell, MARKET_PRICE, amount, trader_id, order_id)
    }

    /// Cancel request for `(trader_id, order_id)`
    pub fn cancel(trader_id: u32, order_id: u32) -> Self {
        Self::new(OrderKind::Cancel, 0, 0, trader_id, order_id)
    }

    #[inline]
    pub fn identity(&self) -> OrderIdentity {
        OrderIdentity::new(self.trader_id, self.order_id)
    }

    /// Check if the price is the market sentinel
    #[inline]
    pub fn is_market(&self) -> bool {
        self.price == MARKET_PRICE
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        assert_eq!(OrderKind::try_from(0), Ok(OrderKind::Buy));
        assert_eq!(OrderKind::try_from(1), Ok(OrderKind::Sell));
        assert_eq!(OrderKind::try_from(2), Ok(OrderKind::Cancel));
    }

    #[test]
    fn test_kind_unsupported() {
        assert_eq!(
            OrderKind::try_from(9),
            Err(MatchError::UnsupportedOrderKind(9))
        );
    }

    #[test]
    fn test_order_constructors() {
        let buy = Order::buy(1, 2, 100, 5);
        assert_eq!(buy.kind, OrderKind::Buy);
        assert_eq!(buy.price, 100);
        assert_eq!(buy.amount, 5);
        assert_eq!(buy.identity(), OrderIdentity::new(1, 2));
        assert!(!buy.is_market());

        let sell = Order::market_sell(3, 4, 10);
        assert_eq!(sell.kind, OrderKind::Sell);
        assert!(sell.is_market());

        let cancel = Order::cancel(3, 4);
        assert_eq!(cancel.kind, OrderKind::Cancel);
        assert_eq!(cancel.identity(), sell.identity());
    }

    #[test]
    fn test_market_price_sorts_lowest() {
        assert!(MARKET_PRICE < -1_000_000);
        assert!(MARKET_PRICE < 0);
    }
}
