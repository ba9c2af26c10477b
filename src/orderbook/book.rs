//! Two-sided priority book.
//!
//! ## Architecture
//!
//! - **BTreeMap**: Sorted price levels for best bid/ask lookup
//! - **PriceLevel**: FIFO queue per price, linked through the pool's slab keys
//! - **HashMap**: `(trader_id, order_id)` to slab key mapping for cancel
//!
//! ## Price Ordering
//!
//! - **Bids**: keyed by `Reverse(price)`, so the first level is the highest price
//! - **Asks**: keyed by `price`, so the first level is the lowest price
//!
//! Within a level, earlier arrivals sit nearer the head. A partial fill
//! reduces the head order in place and leaves its position alone.
//!
//! ## Ownership
//!
//! `push_*` consumes an [`OrderHandle`]; `pop_*` and [`OrderBook::remove`]
//! return one. While an order rests, the book is the only owner of its slot.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::orderbook::{OrderHandle, OrderPool, PriceLevel};
use crate::types::{Order, OrderIdentity, OrderKind};

/// BTreeMap key that puts the best price first.
trait LevelKey: Ord + Copy {
    fn from_price(price: i64) -> Self;
}

impl LevelKey for i64 {
    #[inline]
    fn from_price(price: i64) -> Self {
        price
    }
}

impl LevelKey for Reverse<i64> {
    #[inline]
    fn from_price(price: i64) -> Self {
        Reverse(price)
    }
}

/// One side of the book.
#[derive(Debug)]
struct BookSide<K> {
    levels: BTreeMap<K, PriceLevel>,
    count: usize,
}

impl<K: LevelKey> BookSide<K> {
    fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            count: 0,
        }
    }

    fn push(&mut self, key: usize, pool: &mut OrderPool) {
        let price = pool.node(key).price();
        self.levels
            .entry(K::from_price(price))
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(key, pool);
        self.count += 1;
    }

    #[inline]
    fn best_key(&self) -> Option<usize> {
        self.levels.values().next()?.peek_head()
    }

    #[inline]
    fn best_price(&self) -> Option<i64> {
        self.levels.values().next().map(|level| level.price)
    }

    fn pop_best(&mut self, pool: &mut OrderPool) -> Option<usize> {
        let mut entry = self.levels.first_entry()?;
        let key = entry.get().peek_head()?;
        entry.get_mut().remove(key, pool);
        if entry.get().is_empty() {
            entry.remove();
        }
        self.count -= 1;
        Some(key)
    }

    /// Reduce the head order in place. Refuses fills that would use it up.
    fn fill_best(&mut self, amount: u32, pool: &mut OrderPool) -> Option<u32> {
        let level = self.levels.values_mut().next()?;
        let key = level.peek_head()?;
        let order = &mut pool.node_mut(key).order;
        if amount >= order.amount {
            return None;
        }
        order.amount -= amount;
        level.reduce_quantity(amount);
        Some(order.amount)
    }

    fn unlink(&mut self, key: usize, pool: &mut OrderPool) {
        let price = pool.node(key).price();
        let level_key = K::from_price(price);
        if let Some(level) = self.levels.get_mut(&level_key) {
            level.remove(key, pool);
            self.count -= 1;
            if level.is_empty() {
                self.levels.remove(&level_key);
            }
        }
    }

    fn depth_at(&self, price: i64) -> u64 {
        self.levels
            .get(&K::from_price(price))
            .map_or(0, |level| level.total_quantity)
    }

    fn total_quantity(&self) -> u64 {
        self.levels.values().map(|level| level.total_quantity).sum()
    }

    fn orders<'a>(&'a self, pool: &'a OrderPool) -> impl Iterator<Item = &'a Order> + 'a {
        self.levels
            .values()
            .flat_map(move |level| level.keys(pool))
            .map(move |key| &pool.node(key).order)
    }
}

/// Bids and asks for a single instrument.
///
/// ## Example
///
/// ```
/// use tick_matcher::orderbook::{OrderBook, OrderPool};
/// use tick_matcher::types::Order;
///
/// let mut pool = OrderPool::with_capacity(16);
/// let mut book = OrderBook::new();
///
/// let bid = pool.acquire(Order::buy(1, 1, 100, 5)).unwrap();
/// book.push_bid(bid, &mut pool);
///
/// assert_eq!(book.best_bid(), Some(100));
/// let top = book.pop_best_bid(&mut pool).unwrap();
/// assert_eq!(pool.release(top).order_id, 1);
/// assert!(book.is_empty());
/// ```
#[derive(Debug)]
pub struct OrderBook {
    bids: BookSide<Reverse<i64>>,
    asks: BookSide<i64>,

    /// Identity to slab keys, oldest first
    index: HashMap<OrderIdentity, Vec<usize>>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BookSide::new(),
            asks: BookSide::new(),
            index: HashMap::new(),
        }
    }

    /// Create a book whose identity index is pre-sized
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            bids: BookSide::new(),
            asks: BookSide::new(),
            index: HashMap::with_capacity(order_capacity),
        }
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Rest a buy order behind every bid already at its price
    pub fn push_bid(&mut self, handle: OrderHandle, pool: &mut OrderPool) {
        debug_assert_eq!(pool.get(&handle).kind, OrderKind::Buy);
        let key = handle.key();
        self.index_insert(key, pool);
        self.bids.push(key, pool);
        debug!(price = pool.node(key).price(), amount = pool.node(key).amount(), "bid resting");
    }

    /// Rest a sell order behind every ask already at its price
    pub fn push_ask(&mut self, handle: OrderHandle, pool: &mut OrderPool) {
        debug_assert_eq!(pool.get(&handle).kind, OrderKind::Sell);
        let key = handle.key();
        self.index_insert(key, pool);
        self.asks.push(key, pool);
        debug!(price = pool.node(key).price(), amount = pool.node(key).amount(), "ask resting");
    }

    // ========================================================================
    // Top of book
    // ========================================================================

    pub fn peek_best_bid<'a>(&self, pool: &'a OrderPool) -> Option<&'a Order> {
        self.bids.best_key().map(|key| &pool.node(key).order)
    }

    pub fn peek_best_ask<'a>(&self, pool: &'a OrderPool) -> Option<&'a Order> {
        self.asks.best_key().map(|key| &pool.node(key).order)
    }

    /// Take the highest-priority bid off the book
    pub fn pop_best_bid(&mut self, pool: &mut OrderPool) -> Option<OrderHandle> {
        let key = self.bids.pop_best(pool)?;
        self.index_remove(key, pool);
        Some(OrderHandle::from_key(key))
    }

    /// Take the highest-priority ask off the book
    pub fn pop_best_ask(&mut self, pool: &mut OrderPool) -> Option<OrderHandle> {
        let key = self.asks.pop_best(pool)?;
        self.index_remove(key, pool);
        Some(OrderHandle::from_key(key))
    }

    /// Partially fill the best bid in place.
    ///
    /// Returns what is left, or `None` with the book untouched if there are
    /// no bids or `amount` would use up the best bid. Fills that consume an
    /// order go through [`OrderBook::pop_best_bid`].
    pub fn fill_best_bid(&mut self, amount: u32, pool: &mut OrderPool) -> Option<u32> {
        self.bids.fill_best(amount, pool)
    }

    /// Partially fill the best ask in place. See [`OrderBook::fill_best_bid`].
    pub fn fill_best_ask(&mut self, amount: u32, pool: &mut OrderPool) -> Option<u32> {
        self.asks.fill_best(amount, pool)
    }

    // ========================================================================
    // Removal by identity
    // ========================================================================

    /// Take the resting order with this identity off whichever side holds it.
    ///
    /// When several resting orders share an identity, the oldest goes first.
    pub fn remove(&mut self, identity: OrderIdentity, pool: &mut OrderPool) -> Option<OrderHandle> {
        let keys = self.index.get_mut(&identity)?;
        let key = keys.remove(0);
        if keys.is_empty() {
            self.index.remove(&identity);
        }

        // Only buys and sells are ever pushed
        if pool.node(key).order.kind == OrderKind::Buy {
            self.bids.unlink(key, pool);
        } else {
            self.asks.unlink(key, pool);
        }
        Some(OrderHandle::from_key(key))
    }

    #[inline]
    pub fn contains(&self, identity: OrderIdentity) -> bool {
        self.index.contains_key(&identity)
    }

    fn index_insert(&mut self, key: usize, pool: &OrderPool) {
        let identity = pool.node(key).order.identity();
        self.index.entry(identity).or_default().push(key);
    }

    fn index_remove(&mut self, key: usize, pool: &OrderPool) {
        let identity = pool.node(key).order.identity();
        if let Some(keys) = self.index.get_mut(&identity) {
            keys.retain(|&k| k != key);
            if keys.is_empty() {
                self.index.remove(&identity);
            }
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Highest resting bid price
    #[inline]
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.best_price()
    }

    /// Lowest resting ask price (`MARKET_PRICE` if a market sell is resting)
    #[inline]
    pub fn best_ask(&self) -> Option<i64> {
        self.asks.best_price()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.count
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.count
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.bids.count + self.asks.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count() == 0
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.levels.len()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.levels.len()
    }

    /// Total resting bid amount at `price`
    pub fn depth_at_bid(&self, price: i64) -> u64 {
        self.bids.depth_at(price)
    }

    /// Total resting ask amount at `price`
    pub fn depth_at_ask(&self, price: i64) -> u64 {
        self.asks.depth_at(price)
    }

    /// Total resting amount on both sides
    pub fn resting_quantity(&self) -> u64 {
        self.bids.total_quantity() + self.asks.total_quantity()
    }

    /// Bids in matching priority order
    pub fn bids<'a>(&'a self, pool: &'a OrderPool) -> impl Iterator<Item = &'a Order> + 'a {
        self.bids.orders(pool)
    }

    /// Asks in matching priority order
    pub fn asks<'a>(&'a self, pool: &'a OrderPool) -> impl Iterator<Item = &'a Order> + 'a {
        self.asks.orders(pool)
    }

    /// SHA-256 over every resting order in priority order, bids then asks.
    ///
    /// Two books built from the same event sequence have the same root.
    pub fn state_root(&self, pool: &OrderPool) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hash_orders(&mut hasher, b'B', self.bids(pool));
        hash_orders(&mut hasher, b'A', self.asks(pool));
        hasher.finalize().into()
    }
}

fn hash_orders<'a>(hasher: &mut Sha256, tag: u8, orders: impl Iterator<Item = &'a Order>) {
    for order in orders {
        hasher.update([tag]);
        hasher.update(order.price.to_le_bytes());
        hasher.update(order.amount.to_le_bytes());
        hasher.update(order.trader_id.to_le_bytes());
        hasher.update(order.order_id.to_le_bytes());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
