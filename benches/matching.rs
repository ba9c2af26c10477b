//! Benchmarks for the matching core.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- single_match
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.
//!
//! The result channel is bounded and the matcher waits when it is full, so
//! every benchmark drains it after each submit, the way a consumer would.

use criterion::{
    black_box, criterion_group, criterion_main,
    BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::time::Duration;

use tick_matcher::{Matcher, MatcherConfig, Order, ResultReceiver};

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

/// A matcher plus the consumer end of its result channel.
struct Session {
    matcher: Matcher,
    results: ResultReceiver,
}

impl Session {
    fn new(pool_capacity: usize) -> Self {
        let config = MatcherConfig::default()
            .with_pool_capacity(pool_capacity)
            .with_result_capacity(4_096);
        let (matcher, results) = Matcher::with_config(&config).expect("valid config");
        Self { matcher, results }
    }

    /// Submit and drain, returning the number of results produced
    fn submit(&mut self, order: Order) -> usize {
        self.matcher.submit(order).expect("submit");
        self.results.drain().len()
    }
}

/// Rest `count` asks starting at `base_price`, one level per order
fn populate_asks(session: &mut Session, count: u32, base_price: i64, price_step: i64, amount: u32) {
    for i in 0..count {
        let price = base_price + i64::from(i) * price_step;
        session.submit(Order::sell(1, i, price, amount));
    }
}

/// Rest `count` bids starting at `base_price`, one level per order
fn populate_bids(session: &mut Session, count: u32, base_price: i64, price_step: i64, amount: u32) {
    for i in 0..count {
        let price = base_price - i64::from(i) * price_step;
        session.submit(Order::buy(2, i, price, amount));
    }
}

/// Generate a batch of buys and sells around a base price.
fn generate_order_batch(count: usize, seed: u64) -> Vec<Order> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base_price: i64 = 50_000;

    (0..count)
        .map(|i| {
            let price = base_price + rng.gen_range(-500i64..=500);
            let amount = rng.gen_range(1u32..=100);
            let trader = rng.gen_range(1u32..=1_000);
            if rng.gen_bool(0.5) {
                Order::buy(trader, i as u32, price, amount)
            } else {
                Order::sell(trader, i as u32, price, amount)
            }
        })
        .collect()
}

// ============================================================================
// BENCHMARK: Single Match Latency
// ============================================================================

fn bench_single_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_match");

    group.measurement_time(Duration::from_secs(10));
    group.sample_size(1000);

    // Match one buy against the best of 1,000 resting asks, replenishing it
    group.bench_function("against_1k_orders", |b| {
        let mut session = Session::new(4_000);
        populate_asks(&mut session, 1_000, 50_000, 1, 100);

        b.iter(|| {
            black_box(session.submit(Order::buy(9, 0, 50_000, 100)));
            session.submit(Order::sell(1, 0, 50_000, 100));
        });
    });

    // Match that sweeps multiple price levels
    group.bench_function("multi_level_sweep", |b| {
        b.iter_batched(
            || {
                let mut session = Session::new(256);
                populate_asks(&mut session, 100, 50_000, 1, 10);
                session
            },
            |mut session| black_box(session.submit(Order::buy(9, 0, 50_010, 100))),
            BatchSize::SmallInput,
        );
    });

    // No match, order rests on book
    group.bench_function("no_match_rest_on_book", |b| {
        b.iter_batched(
            || {
                let mut session = Session::new(2_048);
                populate_asks(&mut session, 1_000, 50_000, 1, 100);
                session
            },
            |mut session| black_box(session.submit(Order::buy(9, 0, 49_000, 100))),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Cancel
// ============================================================================

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel");

    group.measurement_time(Duration::from_secs(5));

    group.bench_function("cancel_mid_book", |b| {
        b.iter_batched(
            || {
                let mut session = Session::new(2_048);
                populate_bids(&mut session, 1_000, 50_000, 1, 100);
                session
            },
            |mut session| black_box(session.submit(Order::cancel(2, 500))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("cancel_missing", |b| {
        b.iter_batched(
            || {
                let mut session = Session::new(2_048);
                populate_bids(&mut session, 1_000, 50_000, 1, 100);
                session
            },
            |mut session| black_box(session.submit(Order::cancel(7, 99_999))),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("orders", batch_size),
            &batch_size,
            |b, &size| {
                let orders = generate_order_batch(size, 42);

                b.iter_batched(
                    || (Session::new(size * 2), orders.clone()),
                    |(mut session, orders)| {
                        for order in orders {
                            black_box(session.submit(order));
                        }
                        session.matcher.book().order_count()
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Large Book
// ============================================================================

fn bench_large_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_book");

    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    group.bench_function("match_in_100k_book", |b| {
        let mut session = Session::new(120_000);
        populate_asks(&mut session, 50_000, 100_000, 1, 10);
        populate_bids(&mut session, 50_000, 99_999, 1, 10);

        b.iter(|| {
            black_box(session.submit(Order::buy(9, 0, 100_000, 10)));
            session.submit(Order::sell(1, 0, 100_000, 10));
        });
    });

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(
    benches,
    bench_single_match,
    bench_cancel,
    bench_throughput,
    bench_large_book
);

criterion_main!(benches);
