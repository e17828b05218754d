//! # contend
//!
//! Microbenchmarks comparing the cost of shared-counter synchronization
//! strategies and of memory-layout choices under concurrent access.
//!
//! Two suites:
//!
//! | Suite | Question it answers |
//! |-------|---------------------|
//! | Increment strategies ([`strategy`]) | What does one increment cost under atomic add, a mutex, or a CAS retry loop — with no contention present? |
//! | False sharing ([`filter`], [`contention`]) | How much does it cost when four independent counters share a cache line, and how much does padding or local accumulation buy back? |
//!
//! Every measured workload is an ordinary function that returns the final
//! logical counter value(s). The benchmark harness (divan, under `benches/`)
//! only times them; the tests assert the invariant that makes the comparison
//! meaningful in the first place: **every variant converges to the same
//! counts. Layout and synchronization strategy affect timing, never the
//! result.**
//!
//! ## Concurrency model
//!
//! Workloads spawn a small fixed number of OS threads per measured iteration
//! and block on a join barrier ([`std::thread::scope`]). Threads are never
//! pooled or reused across iterations; pooling would change the measurement.
//! The plain-field variants in [`contention`] rely on a one-writer-per-field
//! discipline, which the borrow checker enforces by handing each worker a
//! distinct `&mut` field.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench increment_strategy
//! cargo bench --bench false_sharing --features mimalloc
//! cargo run --release --bin contention_profile
//! ```

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod cache;
pub mod contention;
pub mod filter;
pub mod ordering;
pub mod strategy;
pub mod table;

mod tracing_helpers;

// Re-export main types for convenience
pub use cache::{CACHE_LINE_SIZE, CacheAligned};
pub use filter::{PaddedCounters, SharedCounters};
pub use strategy::{CasCounter, StrongCas, WeakCas};
pub use table::{Table, expected_matches};
