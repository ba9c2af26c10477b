//! Bounded result channel between the matcher and its consumer.
//!
//! ## Model
//!
//! Single producer (the matcher), single consumer (whatever turns results
//! into acknowledgements or wire messages). Backed by
//! `crossbeam_channel::bounded`:
//!
//! - the producer blocks while the buffer is full
//! - the consumer blocks while it is empty
//! - a received [`Response`] is fully initialized; the channel provides the
//!   happens-before edge between send and receive
//!
//! Results are delivered in the order they were published. The two sides of a
//! trade are published back to back, and since there is only one producer
//! nothing can land between them.
//!
//! ## Example
//!
//! ```
//! use tick_matcher::channel::result_channel;
//! use tick_matcher::types::{CancelKind, CancelReport, Order, Response};
//!
//! let (tx, rx) = result_channel(4);
//! tx.publish(CancelReport::new(CancelKind::NotFound, &Order::cancel(7, 99)).into()).unwrap();
//!
//! let response = rx.try_recv().unwrap();
//! assert_eq!(response.as_cancel().map(|c| c.order_id), Some(99));
//! ```

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::error::MatchError;
use crate::types::{Response, TradeReport};

/// Create a result channel holding at most `capacity` undelivered results.
///
/// A trade publishes two results, so a capacity of at least 2 keeps a
/// single trade from waiting on the consumer halfway through.
pub fn result_channel(capacity: usize) -> (ResultSender, ResultReceiver) {
    let (tx, rx) = bounded(capacity);
    (ResultSender { tx }, ResultReceiver { rx })
}

/// Producer end, owned by the matcher.
#[derive(Debug)]
pub struct ResultSender {
    tx: Sender<Response>,
}

impl ResultSender {
    /// Publish one result, waiting while the buffer is full.
    ///
    /// # Errors
    ///
    /// [`MatchError::ResultChannelClosed`] once the receiver has been dropped.
    pub fn publish(&self, response: Response) -> Result<(), MatchError> {
        self.tx
            .send(response)
            .map_err(|_| MatchError::ResultChannelClosed)
    }

    /// Publish both sides of a trade, buyer first.
    pub fn publish_trade(&self, buy_side: TradeReport, sell_side: TradeReport) -> Result<(), MatchError> {
        self.publish(Response::Trade(buy_side))?;
        self.publish(Response::Trade(sell_side))
    }
}

/// Consumer end.
#[derive(Debug)]
pub struct ResultReceiver {
    rx: Receiver<Response>,
}

impl ResultReceiver {
    /// Wait for the next result. `None` once the matcher is gone and the
    /// buffer is drained.
    pub fn recv(&self) -> Option<Response> {
        self.rx.recv().ok()
    }

    /// Next result if one is ready
    pub fn try_recv(&self) -> Option<Response> {
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next result
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        match self.rx.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Everything currently buffered, in publication order
    pub fn drain(&self) -> Vec<Response> {
        self.rx.try_iter().collect()
    }

    /// Blocking iterator that ends when the matcher is dropped
    pub fn iter(&self) -> impl Iterator<Item = Response> + '_ {
        self.rx.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CancelKind, CancelReport, FillKind, Order};
    use std::thread;

    fn cancel(order_id: u32) -> Response {
        CancelReport::new(CancelKind::NotFound, &Order::cancel(1, order_id)).into()
    }

    #[test]
    fn test_channel_preserves_order() {
        let (tx, rx) = result_channel(8);
        for id in 0..5 {
            tx.publish(cancel(id)).unwrap();
        }

        let ids: Vec<u32> = rx
            .drain()
            .iter()
            .filter_map(|r| r.as_cancel().map(|c| c.order_id))
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_trade_pair_adjacent_buyer_first() {
        let (tx, rx) = result_channel(8);
        let (b, s) = TradeReport::pair(
            FillKind::FullyFilled,
            FillKind::PartiallyFilled,
            &Order::buy(1, 1, 100, 5),
            &Order::sell(2, 2, 100, 9),
            100,
            5,
        );
        tx.publish_trade(b, s).unwrap();

        assert_eq!(rx.len(), 2);
        assert_eq!(rx.try_recv(), Some(Response::Trade(b)));
        assert_eq!(rx.try_recv(), Some(Response::Trade(s)));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_publish_after_consumer_dropped() {
        let (tx, rx) = result_channel(2);
        drop(rx);

        assert_eq!(tx.publish(cancel(1)), Err(MatchError::ResultChannelClosed));
    }

    #[test]
    fn test_recv_after_producer_dropped() {
        let (tx, rx) = result_channel(2);
        tx.publish(cancel(1)).unwrap();
        drop(tx);

        // Buffered results are still delivered
        assert!(rx.recv().is_some());
        assert!(rx.recv().is_none());
    }

    #[test]
    fn test_producer_waits_on_full() {
        let (tx, rx) = result_channel(1);

        let producer = thread::spawn(move || {
            for id in 0..100 {
                tx.publish(cancel(id)).unwrap();
            }
        });

        let received: Vec<u32> = rx
            .iter()
            .filter_map(|r| r.as_cancel().map(|c| c.order_id))
            .collect();
        producer.join().unwrap();

        assert_eq!(received, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_recv_timeout_empty() {
        let (_tx, rx) = result_channel(1);
        assert!(rx.recv_timeout(Duration::from_millis(5)).is_none());
        assert_eq!(rx.len(), 0);
    }
}
