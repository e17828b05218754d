//! Increment-strategy overhead benchmarks.
//!
//! Each benchmark performs 1,000,000 logical increments of a freshly zeroed
//! counter on a single thread. No contention is present; what is measured
//! is the per-operation cost of the synchronization primitive itself.
//!
//! The atomic-add and fetch-add benchmarks lower to the same hardware RMW;
//! they are kept separate to check whether keeping the returned prior value
//! live costs anything.
//!
//! Run with: `cargo bench --bench increment_strategy`
//! With mimalloc: `cargo bench --bench increment_strategy --features mimalloc`

use contend::strategy::{
    DEFAULT_OPS, count_atomic, count_cas_strong, count_cas_weak, count_fetch_add, count_locked,
};
use divan::black_box;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    divan::main();
}

#[divan::bench]
fn atomic_add() -> u64 {
    black_box(count_atomic(DEFAULT_OPS))
}

#[divan::bench]
fn cas_add_weak() -> u64 {
    black_box(count_cas_weak(DEFAULT_OPS))
}

#[divan::bench]
fn cas_add_strong() -> u64 {
    black_box(count_cas_strong(DEFAULT_OPS))
}

#[divan::bench]
fn fetch_add() -> u64 {
    black_box(count_fetch_add(DEFAULT_OPS))
}

#[divan::bench]
fn lock_add() -> u64 {
    black_box(count_locked(DEFAULT_OPS))
}
