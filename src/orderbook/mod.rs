//! Order storage and the priority book.
//!
//! ## Components
//!
//! - [`OrderPool`]: fixed-capacity slab of order records, handed out as [`OrderHandle`]s
//! - [`OrderNode`]: an order plus its price-level links, as stored in the pool
//! - [`PriceLevel`]: FIFO queue of orders at one price
//! - [`OrderBook`]: bid and ask levels plus the cancel index
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Push order | O(log n) |
//! | Peek best bid/ask | O(log n) |
//! | Pop best bid/ask | O(log n) |
//! | Remove by identity | O(log n) |
//! | Acquire/release record | O(1) |

pub mod book;
pub mod level;
pub mod node;
pub mod pool;

pub use book::OrderBook;
pub use level::PriceLevel;
pub use node::OrderNode;
pub use pool::{OrderHandle, OrderPool};
