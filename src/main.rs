//! Tick Matcher - demo session
//!
//! Runs a short scripted session through the matcher with a consumer thread
//! draining the result channel. Set `RUST_LOG=debug` to see per-event logs.

use std::thread;

use tick_matcher::types::{Order, Response};
use tick_matcher::{Matcher, MatcherConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = MatcherConfig::default().with_pool_capacity(1_024).with_result_capacity(64);
    let (mut matcher, results) = match Matcher::with_config(&config) {
        Ok(pair) => pair,
        Err(err) => {
            error!(%err, "invalid matcher configuration");
            std::process::exit(1);
        }
    };

    let consumer = thread::spawn(move || {
        let mut count = 0usize;
        for response in results.iter() {
            match response {
                Response::Trade(t) => info!(
                    trader = t.trader_id,
                    order = t.order_id,
                    counterparty = t.counterparty_id,
                    price = t.price,
                    amount = t.amount,
                    outcome = ?t.kind,
                    "trade"
                ),
                Response::Cancel(c) => info!(
                    trader = c.trader_id,
                    order = c.order_id,
                    outcome = ?c.kind,
                    "cancel"
                ),
            }
            count += 1;
        }
        count
    });

    let session = [
        Order::sell(1, 1, 10_100, 50),
        Order::sell(2, 1, 10_050, 30),
        Order::buy(3, 1, 10_000, 40),
        Order::buy(4, 1, 10_075, 60),
        Order::market_sell(5, 1, 25),
        Order::cancel(1, 1),
        Order::cancel(9, 9),
        Order::buy(6, 1, tick_matcher::MARKET_PRICE, 10),
    ];

    for order in session {
        if let Err(err) = matcher.submit(order) {
            error!(trader = order.trader_id, order = order.order_id, %err, "order rejected");
        }
    }

    let stats = matcher.stats();
    info!(
        state_root = %hex::encode(matcher.state_root()),
        bids = matcher.book().bid_count(),
        asks = matcher.book().ask_count(),
        trades = stats.trades_executed,
        "session complete"
    );

    // Dropping the matcher closes the channel and ends the consumer loop
    drop(matcher);
    match consumer.join() {
        Ok(count) => info!(results = count, "consumer finished"),
        Err(_) => error!("consumer thread panicked"),
    }
}
