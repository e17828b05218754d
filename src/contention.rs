//! Pure-contention workloads: cache-line sharing with no real computation.
//!
//! Four workers each increment a dedicated counter a fixed number of times.
//! There is no data dependency between workers at all — any slowdown
//! relative to the fully-isolated variants is pure coherence traffic from
//! the counters' placement, or pure synchronization cost from the
//! primitive used.
//!
//! | Variant | Counter | Layout | Hot-loop writes go to |
//! |---------|---------|--------|-----------------------|
//! | [`adjacent_atomics`] | atomic | packed | shared block (false sharing) |
//! | [`adjacent_plain`] | plain `u64` | packed | shared block (false sharing, no atomics) |
//! | [`adjacent_plain_local`] | plain `u64` | packed | worker-local accumulator |
//! | [`local_atomics`] | atomic | worker-owned | worker-local atomic |
//! | [`padded_atomics`] | atomic | one line each | shared block (no sharing) |
//!
//! The plain-field variants are only sound because each field has exactly
//! one writer. That discipline is not a comment here — it is enforced by
//! the compiler: each worker receives a distinct `&mut u64`, and a second
//! writer to the same field would not borrow-check.

use std::sync::atomic::AtomicU64;
use std::thread;

use crate::cache::CacheAligned;
use crate::ordering::INC_ORD;
use crate::tracing_helpers::debug_log;

/// Workers (and counters) per run.
pub const NUM_WORKERS: usize = 4;

/// Increments per worker per measured invocation.
pub const OPS_PER_WORKER: usize = 100_000;

/// Four atomic counters in default layout, one worker hammering each.
/// The canonical false-sharing case.
#[must_use]
pub fn adjacent_atomics(ops: usize) -> [u64; NUM_WORKERS] {
    let counters: [AtomicU64; NUM_WORKERS] = Default::default();

    thread::scope(|s| {
        for counter in &counters {
            s.spawn(move || {
                for _ in 0..ops {
                    counter.fetch_add(1, INC_ORD);
                }
            });
        }
    });

    let totals = counters.map(AtomicU64::into_inner);
    debug_log!(variant = "adjacent_atomics", ?totals, "run complete");
    totals
}

/// Four plain integer fields in default layout, each incremented in place
/// by its owning thread. No atomics, no merge step: each field is already
/// in its final location, and disjoint `&mut` borrows guarantee the single
/// writer. The cost measured is coherence traffic alone.
#[must_use]
pub fn adjacent_plain(ops: usize) -> [u64; NUM_WORKERS] {
    let mut fields = [0_u64; NUM_WORKERS];

    thread::scope(|s| {
        for field in &mut fields {
            s.spawn(move || {
                for _ in 0..ops {
                    *field += 1;
                }
            });
        }
    });

    debug_log!(variant = "adjacent_plain", totals = ?fields, "run complete");
    fields
}

/// Same layout as [`adjacent_plain`], but each worker accumulates into a
/// local variable and writes its field exactly once at the end, keeping the
/// shared block out of the hot loop entirely.
#[must_use]
pub fn adjacent_plain_local(ops: usize) -> [u64; NUM_WORKERS] {
    let mut fields = [0_u64; NUM_WORKERS];

    thread::scope(|s| {
        for field in &mut fields {
            s.spawn(move || {
                let mut local = 0_u64;
                for _ in 0..ops {
                    local += 1;
                }
                *field = local;
            });
        }
    });

    debug_log!(variant = "adjacent_plain_local", totals = ?fields, "run complete");
    fields
}

/// Each worker constructs and increments its own atomic with no shared
/// container at all. Isolates the synchronization cost of the atomic
/// read-modify-write from any layout effect.
#[must_use]
pub fn local_atomics(ops: usize) -> [u64; NUM_WORKERS] {
    thread::scope(|s| {
        let handles: [_; NUM_WORKERS] = std::array::from_fn(|_| {
            s.spawn(move || {
                let counter = AtomicU64::new(0);
                for _ in 0..ops {
                    counter.fetch_add(1, INC_ORD);
                }
                counter.into_inner()
            })
        });

        let totals = handles.map(|h| h.join().expect("contention worker panicked"));
        debug_log!(variant = "local_atomics", ?totals, "run complete");
        totals
    })
}

/// Four atomic counters, each padded onto its own cache line. Same
/// synchronization cost as [`adjacent_atomics`]; only the layout changes.
#[must_use]
pub fn padded_atomics(ops: usize) -> [u64; NUM_WORKERS] {
    let counters: [CacheAligned<AtomicU64>; NUM_WORKERS] = Default::default();

    thread::scope(|s| {
        for counter in &counters {
            s.spawn(move || {
                for _ in 0..ops {
                    counter.fetch_add(1, INC_ORD);
                }
            });
        }
    });

    let totals = counters.map(|c| c.into_inner().into_inner());
    debug_log!(variant = "padded_atomics", ?totals, "run complete");
    totals
}
