//! Filter-and-count workloads: layout of four shared counters under scan.
//!
//! Four workers each scan their own column of the [`Table`] and bump their
//! own counter once per value matching the column's modulus filter. Columns
//! are disjoint and read-only, so the only shared mutable state is the
//! counter block — which is exactly the independent variable: the four
//! variants differ only in how the counters are laid out and fed.
//!
//! | Variant | Threads | Counter layout | Hot-loop writes go to |
//! |---------|---------|----------------|-----------------------|
//! | [`scan_sequential`] | 1 | packed | shared block |
//! | [`scan_shared`] | 4 | packed | shared block (false sharing) |
//! | [`scan_local_merge`] | 4 | packed | worker-local accumulator |
//! | [`scan_padded`] | 4 | one line each | shared block (no sharing) |
//!
//! Every variant returns the final `[u64; 4]` so callers can assert the
//! counts are identical regardless of layout.

use std::sync::atomic::AtomicU64;
use std::thread;

use crate::cache::CacheAligned;
use crate::ordering::{FINAL_ORD, INC_ORD, PUBLISH_ORD};
use crate::table::{FILTER_MODULI, NUM_COLUMNS, Table};
use crate::tracing_helpers::debug_log;

// ============================================================================
//  Counter blocks
// ============================================================================

/// Four counters in default (packed) layout: 32 contiguous bytes, a prime
/// candidate for sharing one cache line.
#[derive(Debug, Default)]
pub struct SharedCounters {
    counters: [AtomicU64; NUM_COLUMNS],
}

impl SharedCounters {
    /// Counter for column `idx`.
    ///
    /// # Panics
    /// If `idx >= NUM_COLUMNS`.
    #[must_use]
    pub const fn counter(&self, idx: usize) -> &AtomicU64 {
        &self.counters[idx]
    }

    /// Read all four counters. Callers must only do this after the join
    /// barrier; there is no snapshot atomicity across counters.
    #[must_use]
    pub fn snapshot(&self) -> [u64; NUM_COLUMNS] {
        std::array::from_fn(|i| self.counters[i].load(FINAL_ORD))
    }
}

/// Four counters forced onto separate cache lines. Identical semantics to
/// [`SharedCounters`]; only the physical layout differs.
#[derive(Debug, Default)]
pub struct PaddedCounters {
    counters: [CacheAligned<AtomicU64>; NUM_COLUMNS],
}

impl PaddedCounters {
    /// Counter for column `idx`.
    ///
    /// # Panics
    /// If `idx >= NUM_COLUMNS`.
    #[must_use]
    pub fn counter(&self, idx: usize) -> &AtomicU64 {
        &self.counters[idx]
    }

    /// Read all four counters (post-join only, as for [`SharedCounters`]).
    #[must_use]
    pub fn snapshot(&self) -> [u64; NUM_COLUMNS] {
        std::array::from_fn(|i| self.counters[i].load(FINAL_ORD))
    }
}

// ============================================================================
//  Worker
// ============================================================================

/// Scan `column` in order, bumping `counter` once per value accepted by
/// `filter`. This is the hot loop of the shared-block variants: one atomic
/// write per match, straight into the counter block.
pub fn filter_and_count<F>(column: &[u64], counter: &AtomicU64, filter: F)
where
    F: Fn(u64) -> bool,
{
    for &value in column {
        if filter(value) {
            counter.fetch_add(1, INC_ORD);
        }
    }
}

/// Scan `column` into a plain local accumulator, touching no shared memory.
/// The local-merge variants run this and publish the total once at the end.
#[must_use]
pub fn count_matching<F>(column: &[u64], filter: F) -> u64
where
    F: Fn(u64) -> bool,
{
    let mut matches = 0_u64;
    for &value in column {
        if filter(value) {
            matches += 1;
        }
    }
    matches
}

// ============================================================================
//  Variants
// ============================================================================

/// One thread runs all four scans back-to-back against one packed counter
/// block. Baseline: no concurrency, no coherence traffic.
#[must_use]
pub fn scan_sequential(table: &Table) -> [u64; NUM_COLUMNS] {
    let state = SharedCounters::default();

    for (idx, modulus) in FILTER_MODULI.iter().copied().enumerate() {
        filter_and_count(table.column(idx), state.counter(idx), |v| v % modulus == 0);
    }

    let totals = state.snapshot();
    debug_log!(variant = "sequential", ?totals, "scan complete");
    totals
}

/// Four threads, one per column, each writing its own counter in a packed
/// block. The counters are logically independent but physically co-located,
/// so every match forces coherence traffic with the neighbors.
#[must_use]
pub fn scan_shared(table: &Table) -> [u64; NUM_COLUMNS] {
    let state = SharedCounters::default();

    thread::scope(|s| {
        for (idx, modulus) in FILTER_MODULI.iter().copied().enumerate() {
            let column = table.column(idx);
            let counter = state.counter(idx);
            s.spawn(move || {
                filter_and_count(column, counter, |v| v % modulus == 0);
            });
        }
    });

    let totals = state.snapshot();
    debug_log!(variant = "shared", ?totals, "scan complete");
    totals
}

/// Four threads, each accumulating into a private local counter and merging
/// the total into the packed block once, after its scan completes.
///
/// The merge is a `fetch_add` rather than a store, so the variant stays
/// lossless even if several workers are ever pointed at the same counter.
#[must_use]
pub fn scan_local_merge(table: &Table) -> [u64; NUM_COLUMNS] {
    let state = SharedCounters::default();

    thread::scope(|s| {
        for (idx, modulus) in FILTER_MODULI.iter().copied().enumerate() {
            let column = table.column(idx);
            let counter = state.counter(idx);
            s.spawn(move || {
                let matches = count_matching(column, |v| v % modulus == 0);
                counter.fetch_add(matches, PUBLISH_ORD);
            });
        }
    });

    let totals = state.snapshot();
    debug_log!(variant = "local_merge", ?totals, "scan complete");
    totals
}

/// Identical to [`scan_shared`] except each counter sits on its own cache
/// line, eliminating the coherence traffic between independent counters.
#[must_use]
pub fn scan_padded(table: &Table) -> [u64; NUM_COLUMNS] {
    let state = PaddedCounters::default();

    thread::scope(|s| {
        for (idx, modulus) in FILTER_MODULI.iter().copied().enumerate() {
            let column = table.column(idx);
            let counter = state.counter(idx);
            s.spawn(move || {
                filter_and_count(column, counter, |v| v % modulus == 0);
            });
        }
    });

    let totals = state.snapshot();
    debug_log!(variant = "padded", ?totals, "scan complete");
    totals
}
