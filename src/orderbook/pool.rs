//! Fixed-capacity order pool.
//!
//! ## Ownership
//!
//! [`OrderPool::acquire`] copies an order into a free slot and returns an
//! [`OrderHandle`]. The handle is the only way to reach that slot and it is
//! neither `Clone` nor `Copy`. [`OrderPool::release`] consumes it, so a
//! released record cannot be named again and cannot be released twice.
//!
//! The book takes handles by value when an order starts resting and gives
//! them back from `pop_*`/`remove`, so ownership always has exactly one home.
//!
//! ## Slab Integration
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - `Slab::with_capacity(n)` pre-allocates n slots
//! - Keys are reused after removal
//! - O(1) insert, remove, and lookup
//!
//! The slab may reserve more than requested; the pool enforces its own
//! `capacity` so exhaustion happens at the configured bound.

use slab::Slab;
use tracing::warn;

use crate::error::MatchError;
use crate::orderbook::OrderNode;
use crate::types::Order;

/// Exclusive ownership of one live pool slot.
#[must_use = "dropping a handle without releasing it leaks its pool slot"]
#[derive(Debug, PartialEq, Eq)]
pub struct OrderHandle {
    key: usize,
}

impl OrderHandle {
    /// Only the pool and the book mint handles.
    #[inline]
    pub(crate) fn from_key(key: usize) -> Self {
        Self { key }
    }

    #[inline]
    pub(crate) fn key(&self) -> usize {
        self.key
    }
}

/// Pre-allocated order storage with a hard capacity.
///
/// ## Example
///
/// ```
/// use tick_matcher::orderbook::OrderPool;
/// use tick_matcher::types::Order;
///
/// let mut pool = OrderPool::with_capacity(1);
/// let handle = pool.acquire(Order::buy(1, 1, 100, 5)).unwrap();
/// assert!(pool.acquire(Order::buy(1, 2, 100, 5)).is_err());
///
/// let order = pool.release(handle);
/// assert_eq!(order.order_id, 1);
/// assert_eq!(pool.available(), 1);
/// ```
#[derive(Debug)]
pub struct OrderPool {
    slots: Slab<OrderNode>,
    capacity: usize,
}

impl OrderPool {
    /// Create a pool holding at most `capacity` live records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Slab::with_capacity(capacity),
            capacity,
        }
    }

    /// Copy `order` into a free slot.
    ///
    /// # Errors
    ///
    /// [`MatchError::PoolExhausted`] when every slot is live. The pool is
    /// unchanged in that case.
    pub fn acquire(&mut self, order: Order) -> Result<OrderHandle, MatchError> {
        if self.slots.len() >= self.capacity {
            warn!(capacity = self.capacity, "order pool exhausted");
            return Err(MatchError::PoolExhausted {
                capacity: self.capacity,
            });
        }
        let key = self.slots.insert(OrderNode::new(order));
        Ok(OrderHandle::from_key(key))
    }

    /// Return the slot to the free set and hand back the record's last value
    pub fn release(&mut self, handle: OrderHandle) -> Order {
        self.slots.remove(handle.key).order
    }

    #[inline]
    pub fn get(&self, handle: &OrderHandle) -> &Order {
        &self.slots[handle.key].order
    }

    #[inline]
    pub fn get_mut(&mut self, handle: &OrderHandle) -> &mut Order {
        &mut self.slots[handle.key].order
    }

    /// Number of live records
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Configured maximum number of live records
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left before exhaustion
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.slots.len())
    }

    // ========================================================================
    // Node access (for price levels)
    // ========================================================================

    #[inline]
    pub(crate) fn node(&self, key: usize) -> &OrderNode {
        &self.slots[key]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, key: usize) -> &mut OrderNode {
        &mut self.slots[key]
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_new() {
        let pool = OrderPool::with_capacity(8);

        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.available(), 8);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_acquire_copies_order() {
        let mut pool = OrderPool::with_capacity(4);
        let mut source = Order::sell(1, 2, 300, 40);

        let handle = pool.acquire(source).unwrap();
        source.amount = 0;

        // The pooled copy is independent of the caller's value
        assert_eq!(pool.get(&handle).amount, 40);
        assert_eq!(pool.len(), 1);
        assert!(pool.node(handle.key()).is_unlinked());
    }

    #[test]
    fn test_pool_get_mut() {
        let mut pool = OrderPool::with_capacity(4);
        let handle = pool.acquire(Order::buy(1, 1, 10, 9)).unwrap();

        pool.get_mut(&handle).amount -= 4;
        assert_eq!(pool.get(&handle).amount, 5);
    }

    #[test]
    fn test_pool_exhaustion() {
        let mut pool = OrderPool::with_capacity(2);
        let _a = pool.acquire(Order::buy(1, 1, 10, 1)).unwrap();
        let _b = pool.acquire(Order::buy(1, 2, 10, 1)).unwrap();

        let err = pool.acquire(Order::buy(1, 3, 10, 1)).unwrap_err();
        assert_eq!(err, MatchError::PoolExhausted { capacity: 2 });
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_pool_release_frees_slot() {
        let mut pool = OrderPool::with_capacity(1);
        let handle = pool.acquire(Order::buy(1, 1, 10, 1)).unwrap();

        let released = pool.release(handle);
        assert_eq!(released.order_id, 1);
        assert!(pool.is_empty());

        // Slot is reusable
        let handle = pool.acquire(Order::buy(1, 2, 10, 1)).unwrap();
        assert_eq!(pool.get(&handle).order_id, 2);
    }

    #[test]
    fn test_pool_zero_capacity() {
        let mut pool = OrderPool::with_capacity(0);
        assert!(pool.acquire(Order::buy(1, 1, 10, 1)).is_err());
    }
}
