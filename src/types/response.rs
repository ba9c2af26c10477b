//! Results published by the matcher.
//!
//! ## Trades
//!
//! Every match produces two [`TradeReport`]s, one per side, published as an
//! adjacent pair with the buyer's report first. The price is signed by cash
//! flow: the buyer's report carries `-price`, the seller's `+price`. Tick
//! prices may themselves be zero or negative, so the side of a report is its
//! position in the pair, never the sign of its price.
//!
//! ## Cancels
//!
//! Every cancel request produces exactly one [`CancelReport`].

use crate::types::Order;

/// How much of one side's order a trade consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillKind {
    /// The order is gone; nothing remains
    FullyFilled,
    /// The order still has amount left
    PartiallyFilled,
}

/// Outcome of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelKind {
    /// A resting order was taken off the book
    Removed,
    /// No resting order carried the requested identity
    NotFound,
}

/// One side of an executed trade.
///
/// ## Example
///
/// ```
/// use tick_matcher::types::{FillKind, Order, TradeReport};
///
/// let buyer = Order::buy(1, 10, 101, 5);
/// let seller = Order::sell(2, 20, 100, 5);
/// let (b, s) = TradeReport::pair(FillKind::FullyFilled, FillKind::FullyFilled, &buyer, &seller, 100, 5);
///
/// assert_eq!(b.price, -100);
/// assert_eq!(s.price, 100);
/// assert_eq!(b.counterparty_id, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeReport {
    /// Fill outcome for this side
    pub kind: FillKind,

    /// Execution price, negative for the buyer and positive for the seller
    pub price: i64,

    /// Executed quantity, identical on both sides
    pub amount: u32,

    /// This side's trader
    pub trader_id: u32,

    /// This side's order number
    pub order_id: u32,

    /// The other side's trader
    pub counterparty_id: u32,
}

impl TradeReport {
    /// Build the buyer and seller reports for one match
    pub fn pair(
        buyer_kind: FillKind,
        seller_kind: FillKind,
        buyer: &Order,
        seller: &Order,
        price: i64,
        amount: u32,
    ) -> (TradeReport, TradeReport) {
        let buy_side = TradeReport {
            kind: buyer_kind,
            price: -price,
            amount,
            trader_id: buyer.trader_id,
            order_id: buyer.order_id,
            counterparty_id: seller.trader_id,
        };
        let sell_side = TradeReport {
            kind: seller_kind,
            price,
            amount,
            trader_id: seller.trader_id,
            order_id: seller.order_id,
            counterparty_id: buyer.trader_id,
        };
        (buy_side, sell_side)
    }
}

/// Result of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelReport {
    pub kind: CancelKind,
    pub trader_id: u32,
    pub order_id: u32,
}

impl CancelReport {
    pub fn new(kind: CancelKind, order: &Order) -> Self {
        Self {
            kind,
            trader_id: order.trader_id,
            order_id: order.order_id,
        }
    }
}

/// A single entry on the result channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Trade(TradeReport),
    Cancel(CancelReport),
}

impl Response {
    /// The trade report, if this is one
    pub fn as_trade(&self) -> Option<&TradeReport> {
        match self {
            Response::Trade(report) => Some(report),
            Response::Cancel(_) => None,
        }
    }

    /// The cancel report, if this is one
    pub fn as_cancel(&self) -> Option<&CancelReport> {
        match self {
            Response::Cancel(report) => Some(report),
            Response::Trade(_) => None,
        }
    }
}

impl From<TradeReport> for Response {
    fn from(report: TradeReport) -> Self {
        Response::Trade(report)
    }
}

impl From<CancelReport> for Response {
    fn from(report: CancelReport) -> Self {
        Response::Cancel(report)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_pair_signs_and_ids() {
        let buyer = Order::buy(1, 11, 105, 8);
        let seller = Order::sell(2, 22, 100, 3);

        let (b, s) = TradeReport::pair(
            FillKind::PartiallyFilled,
            FillKind::FullyFilled,
            &buyer,
            &seller,
            102,
            3,
        );

        assert_eq!(b.kind, FillKind::PartiallyFilled);
        assert_eq!(b.price, -102);
        assert_eq!(b.amount, 3);
        assert_eq!((b.trader_id, b.order_id, b.counterparty_id), (1, 11, 2));

        assert_eq!(s.kind, FillKind::FullyFilled);
        assert_eq!(s.price, 102);
        assert_eq!(s.amount, 3);
        assert_eq!((s.trader_id, s.order_id, s.counterparty_id), (2, 22, 1));
    }

    #[test]
    fn test_trade_pair_non_positive_price() {
        let buyer = Order::buy(3, 1, -6, 2);
        let seller = Order::sell(4, 1, -10, 2);

        // Sides come from position in the pair, not from the price sign
        let (b, s) = TradeReport::pair(FillKind::FullyFilled, FillKind::FullyFilled, &buyer, &seller, -8, 2);
        assert_eq!((b.trader_id, b.price), (3, 8));
        assert_eq!((s.trader_id, s.price), (4, -8));

        let (b, s) = TradeReport::pair(FillKind::FullyFilled, FillKind::FullyFilled, &buyer, &seller, 0, 2);
        assert_eq!((b.trader_id, b.price), (3, 0));
        assert_eq!((s.trader_id, s.price), (4, 0));
    }

    #[test]
    fn test_cancel_report() {
        let order = Order::cancel(7, 99);
        let report = CancelReport::new(CancelKind::NotFound, &order);

        assert_eq!(report.kind, CancelKind::NotFound);
        assert_eq!(report.trader_id, 7);
        assert_eq!(report.order_id, 99);
    }

    #[test]
    fn test_response_accessors() {
        let cancel: Response = CancelReport::new(CancelKind::Removed, &Order::cancel(1, 1)).into();
        assert!(cancel.as_cancel().is_some());
        assert!(cancel.as_trade().is_none());

        let (b, _) = TradeReport::pair(
            FillKind::FullyFilled,
            FillKind::FullyFilled,
            &Order::buy(1, 1, 10, 1),
            &Order::sell(2, 2, 10, 1),
            10,
            1,
        );
        let trade: Response = b.into();
        assert_eq!(trade.as_trade(), Some(&b));
        assert!(trade.as_cancel().is_none());
    }
}
