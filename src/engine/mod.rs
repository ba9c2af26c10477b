//! Matching engine module.
//!
//! ## Matching Rules
//!
//! - **Buy orders** cross against asks (lowest price first)
//! - **Sell orders** cross against bids (highest price first)
//! - Equal prices fill in arrival order
//! - Execution price is the midpoint, rounded down toward the ask; a market
//!   ask executes at the bid
//! - **Partial fills** are supported; the unfilled remainder rests on the book
//! - **Cancels** remove a resting order by `(trader_id, order_id)`
//!
//! ## Example
//!
//! ```
//! use tick_matcher::channel::result_channel;
//! use tick_matcher::config::MatcherConfig;
//! use tick_matcher::engine::Matcher;
//! use tick_matcher::types::Order;
//!
//! let (tx, rx) = result_channel(64);
//! let mut matcher = Matcher::new(&MatcherConfig::default(), tx);
//!
//! matcher.submit(Order::buy(1, 1, 100, 10)).unwrap();
//! matcher.submit(Order::sell(2, 1, 99, 4)).unwrap();
//!
//! let results = rx.drain();
//! assert_eq!(results.len(), 2);
//! assert_eq!(matcher.book().depth_at_bid(100), 6);
//! ```

pub mod matcher;
pub mod price;

pub use matcher::{Matcher, MatcherStats};
