//! Price level management for orders at the same price.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any order can be unlinked in O(1) using its slab key
//!
//! The order records live in the [`OrderPool`]; a level only holds the
//! queue metadata.

use crate::orderbook::OrderPool;

/// A FIFO queue of resting orders at one price.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (ticks)
    pub price: i64,

    /// Total remaining amount at this level
    /// Updated when orders are added/removed/filled
    pub total_quantity: u64,

    /// Head of the order queue (oldest order, slab key)
    /// This is the first order to be matched
    pub head: Option<usize>,

    /// Tail of the order queue (newest order, slab key)
    /// New orders are appended here
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    pub fn new(price: i64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an order at the tail of the queue
    ///
    /// This maintains FIFO ordering - oldest orders are matched first.
    pub fn push_back(&mut self, key: usize, pool: &mut OrderPool) {
        let node = pool.node_mut(key);
        debug_assert!(node.is_unlinked(), "order {key} is already queued");
        let quantity = u64::from(node.amount());

        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            pool.node_mut(tail_key).next = Some(key);
        } else {
            // Empty list - this is also the head
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
    }

    /// Unlink an order from the queue by slab key
    ///
    /// # Returns
    ///
    /// The remaining amount of the unlinked order
    pub fn remove(&mut self, key: usize, pool: &mut OrderPool) -> u32 {
        let node = pool.node(key);
        let quantity = node.amount();
        let prev_key = node.prev;
        let next_key = node.next;

        if let Some(prev) = prev_key {
            pool.node_mut(prev).next = next_key;
        } else {
            // This was the head
            self.head = next_key;
        }

        if let Some(next) = next_key {
            pool.node_mut(next).prev = prev_key;
        } else {
            // This was the tail
            self.tail = prev_key;
        }

        let node = pool.node_mut(key);
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_quantity = self.total_quantity.saturating_sub(u64::from(quantity));

        quantity
    }

    /// Slab key of the oldest order at this level
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Update the total quantity after a partial fill
    pub fn reduce_quantity(&mut self, filled_quantity: u32) {
        self.total_quantity = self.total_quantity.saturating_sub(u64::from(filled_quantity));
    }

    /// Slab keys from head to tail
    pub fn keys<'a>(&self, pool: &'a OrderPool) -> LevelKeys<'a> {
        LevelKeys {
            pool,
            cursor: self.head,
        }
    }
}

/// Iterator over the slab keys of a level in priority order.
pub struct LevelKeys<'a> {
    pool: &'a OrderPool,
    cursor: Option<usize>,
}

impl Iterator for LevelKeys<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let key = self.cursor?;
        self.cursor = self.pool.node(key).next;
        Some(key)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
