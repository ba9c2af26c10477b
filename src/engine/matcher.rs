//! The matcher: validation, crossing, cancellation and result publication.
//!
//! One [`Matcher::submit`] call handles one event from start to finish. Every
//! trade and cancel result it produces is published before it returns, so
//! results for event N always precede results for event N+1.

use std::cmp::Ordering;

use tracing::{debug, error, info, trace, warn};

use crate::channel::{result_channel, ResultReceiver, ResultSender};
use crate::config::{ConfigError, MatcherConfig};
use crate::engine::price::{crosses, trade_price};
use crate::error::MatchError;
use crate::orderbook::{OrderBook, OrderHandle, OrderPool};
use crate::types::{CancelKind, CancelReport, FillKind, Order, OrderKind, Response, TradeReport};

/// Running totals since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatcherStats {
    /// Events that passed validation and got a pool record
    pub orders_accepted: u64,
    /// Events rejected by validation or pool exhaustion
    pub orders_rejected: u64,
    /// Matches executed (each publishes two results)
    pub trades_executed: u64,
    /// Cancels that removed a resting order
    pub cancels_removed: u64,
    /// Cancels that found nothing
    pub cancels_not_found: u64,
}

/// Single-instrument price-time matching core.
///
/// Owns the order pool and the book outright; nothing else may touch them
/// while it runs. Feed it from one thread.
///
/// ## Example
///
/// ```
/// use tick_matcher::config::MatcherConfig;
/// use tick_matcher::engine::Matcher;
/// use tick_matcher::types::{FillKind, Order};
///
/// let (mut matcher, results) = Matcher::with_config(&MatcherConfig::default()).unwrap();
///
/// matcher.submit(Order::sell(1, 1, 100, 10)).unwrap();
/// matcher.submit(Order::buy(2, 1, 101, 10)).unwrap();
///
/// let trades = results.drain();
/// assert_eq!(trades.len(), 2);
/// assert_eq!(trades[0].as_trade().unwrap().kind, FillKind::FullyFilled);
/// assert!(matcher.book().is_empty());
/// ```
#[derive(Debug)]
pub struct Matcher {
    pool: OrderPool,
    book: OrderBook,
    results: ResultSender,
    /// Set once a publish fails; the receiver never comes back
    consumer_gone: bool,
    stats: MatcherStats,
}

impl Matcher {
    /// Create a matcher that publishes into `results`
    pub fn new(config: &MatcherConfig, results: ResultSender) -> Self {
        info!(
            pool_capacity = config.pool_capacity,
            result_capacity = config.result_capacity,
            "matcher initialized"
        );

        Self {
            pool: OrderPool::with_capacity(config.pool_capacity),
            book: OrderBook::with_capacity(config.pool_capacity),
            results,
            consumer_gone: false,
            stats: MatcherStats::default(),
        }
    }

    /// Validate `config`, build the result channel and return its consumer end
    pub fn with_config(config: &MatcherConfig) -> Result<(Self, ResultReceiver), ConfigError> {
        config.validate()?;
        let (tx, rx) = result_channel(config.result_capacity);
        Ok((Self::new(config, tx), rx))
    }

    /// Apply one order event.
    ///
    /// # Errors
    ///
    /// - [`MatchError::IllegalMarketOrder`] / [`MatchError::ZeroAmount`]:
    ///   rejected before anything changes
    /// - [`MatchError::PoolExhausted`]: no free record; nothing changes
    /// - [`MatchError::ResultChannelClosed`]: the event was applied but its
    ///   results had nowhere to go
    pub fn submit(&mut self, order: Order) -> Result<(), MatchError> {
        if let Err(err) = Self::validate(&order) {
            warn!(trader_id = order.trader_id, order_id = order.order_id, %err, "order rejected");
            self.stats.orders_rejected += 1;
            return Err(err);
        }
        let handle = match self.pool.acquire(order) {
            Ok(handle) => handle,
            Err(err) => {
                self.stats.orders_rejected += 1;
                return Err(err);
            }
        };
        self.stats.orders_accepted += 1;

        debug!(
            kind = ?order.kind,
            price = order.price,
            amount = order.amount,
            trader_id = order.trader_id,
            order_id = order.order_id,
            "order accepted"
        );

        match order.kind {
            OrderKind::Buy => {
                if let Some(remaining) = self.cross_buy(handle) {
                    self.book.push_bid(remaining, &mut self.pool);
                }
            }
            OrderKind::Sell => {
                if let Some(remaining) = self.cross_sell(handle) {
                    self.book.push_ask(remaining, &mut self.pool);
                }
            }
            OrderKind::Cancel => self.cancel(handle),
        }

        if self.consumer_gone {
            Err(MatchError::ResultChannelClosed)
        } else {
            Ok(())
        }
    }

    fn validate(order: &Order) -> Result<(), MatchError> {
        match order.kind {
            OrderKind::Buy if order.is_market() => Err(MatchError::IllegalMarketOrder {
                trader_id: order.trader_id,
                order_id: order.order_id,
            }),
            OrderKind::Buy | OrderKind::Sell if order.amount == 0 => Err(MatchError::ZeroAmount {
                trader_id: order.trader_id,
                order_id: order.order_id,
            }),
            _ => Ok(()),
        }
    }

    // ========================================================================
    // Crossing
    // ========================================================================

    /// Trade an incoming buy against the asks.
    ///
    /// Returns the buy's handle if some amount is left to rest, `None` if it
    /// was used up.
    fn cross_buy(&mut self, buy: OrderHandle) -> Option<OrderHandle> {
        loop {
            let b = *self.pool.get(&buy);
            let Some(&s) = self.book.peek_best_ask(&self.pool) else {
                return Some(buy);
            };
            if !crosses(b.price, s.price) {
                return Some(buy);
            }
            let price = trade_price(b.price, s.price);

            match b.amount.cmp(&s.amount) {
                Ordering::Greater => {
                    let amount = s.amount;
                    self.pool.get_mut(&buy).amount -= amount;
                    self.emit_trade(FillKind::PartiallyFilled, FillKind::FullyFilled, &b, &s, price, amount);
                    self.release_best_ask();
                }
                Ordering::Less => {
                    let amount = b.amount;
                    self.book.fill_best_ask(amount, &mut self.pool);
                    self.emit_trade(FillKind::FullyFilled, FillKind::PartiallyFilled, &b, &s, price, amount);
                    self.pool.release(buy);
                    return None;
                }
                Ordering::Equal => {
                    self.emit_trade(FillKind::FullyFilled, FillKind::FullyFilled, &b, &s, price, b.amount);
                    self.release_best_ask();
                    self.pool.release(buy);
                    return None;
                }
            }
        }
    }

    /// Trade an incoming sell against the bids. Mirror of [`Self::cross_buy`].
    fn cross_sell(&mut self, sell: OrderHandle) -> Option<OrderHandle> {
        loop {
            let s = *self.pool.get(&sell);
            let Some(&b) = self.book.peek_best_bid(&self.pool) else {
                return Some(sell);
            };
            if !crosses(b.price, s.price) {
                return Some(sell);
            }
            let price = trade_price(b.price, s.price);

            match s.amount.cmp(&b.amount) {
                Ordering::Greater => {
                    let amount = b.amount;
                    self.pool.get_mut(&sell).amount -= amount;
                    self.emit_trade(FillKind::FullyFilled, FillKind::PartiallyFilled, &b, &s, price, amount);
                    self.release_best_bid();
                }
                Ordering::Less => {
                    let amount = s.amount;
                    self.book.fill_best_bid(amount, &mut self.pool);
                    self.emit_trade(FillKind::PartiallyFilled, FillKind::FullyFilled, &b, &s, price, amount);
                    self.pool.release(sell);
                    return None;
                }
                Ordering::Equal => {
                    self.emit_trade(FillKind::FullyFilled, FillKind::FullyFilled, &b, &s, price, s.amount);
                    self.release_best_bid();
                    self.pool.release(sell);
                    return None;
                }
            }
        }
    }

    fn release_best_ask(&mut self) {
        if let Some(filled) = self.book.pop_best_ask(&mut self.pool) {
            self.pool.release(filled);
        }
    }

    fn release_best_bid(&mut self) {
        if let Some(filled) = self.book.pop_best_bid(&mut self.pool) {
            self.pool.release(filled);
        }
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Serve a cancel request and release its transient record
    fn cancel(&mut self, request: OrderHandle) {
        let identity = self.pool.get(&request).identity();

        let report = match self.book.remove(identity, &mut self.pool) {
            Some(resting) => {
                let resting = self.pool.release(resting);
                self.stats.cancels_removed += 1;
                CancelReport::new(CancelKind::Removed, &resting)
            }
            None => {
                self.stats.cancels_not_found += 1;
                CancelReport::new(CancelKind::NotFound, self.pool.get(&request))
            }
        };
        self.pool.release(request);

        debug!(
            trader_id = report.trader_id,
            order_id = report.order_id,
            outcome = ?report.kind,
            "cancel served"
        );
        self.emit(Response::Cancel(report));
    }

    // ========================================================================
    // Result publication
    // ========================================================================

    fn emit_trade(
        &mut self,
        buyer_kind: FillKind,
        seller_kind: FillKind,
        buyer: &Order,
        seller: &Order,
        price: i64,
        amount: u32,
    ) {
        self.stats.trades_executed += 1;
        trace!(
            price,
            amount,
            buyer = buyer.trader_id,
            seller = seller.trader_id,
            "trade"
        );

        if self.consumer_gone {
            return;
        }
        let (buy_side, sell_side) = TradeReport::pair(buyer_kind, seller_kind, buyer, seller, price, amount);
        if let Err(err) = self.results.publish_trade(buy_side, sell_side) {
            self.consumer_lost(err);
        }
    }

    fn emit(&mut self, response: Response) {
        if self.consumer_gone {
            return;
        }
        if let Err(err) = self.results.publish(response) {
            self.consumer_lost(err);
        }
    }

    fn consumer_lost(&mut self, err: MatchError) {
        error!(%err, "result consumer gone, discarding results");
        self.consumer_gone = true;
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Read-only view of the book
    #[inline]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Read-only view of the pool
    #[inline]
    pub fn pool(&self) -> &OrderPool {
        &self.pool
    }

    #[inline]
    pub fn stats(&self) -> MatcherStats {
        self.stats
    }

    /// SHA-256 of the resting orders, see [`OrderBook::state_root`]
    pub fn state_root(&self) -> [u8; 32] {
        self.book.state_root(&self.pool)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
