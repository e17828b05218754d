//! Increment-strategy workloads: per-operation overhead, no contention.
//!
//! Each workload constructs a fresh zeroed counter, performs exactly `n`
//! logical increments on a single thread, and returns the final value. The
//! comparison isolates the cost of the synchronization primitive itself —
//! atomic add, mutex acquire/release, CAS retry loop — rather than any
//! contention effect, since no second thread ever touches the counter.
//!
//! The CAS loops go through the [`CasCounter`] seam so tests can substitute
//! a cell that fails spuriously and verify the loop converges anyway.

use std::hint::black_box;
use std::sync::atomic::AtomicU64;
use std::sync::{Mutex, PoisonError};

use crate::ordering::{CAS_FAILURE, CAS_SUCCESS, FINAL_ORD, INC_ORD};

/// Increments per measured invocation.
pub const DEFAULT_OPS: usize = 1_000_000;

// ============================================================================
//  Direct atomic strategies
// ============================================================================

/// Increment a fresh atomic counter `n` times with `fetch_add`, discarding
/// the returned prior value.
#[must_use]
pub fn count_atomic(n: usize) -> u64 {
    let counter = AtomicU64::new(0);
    for _ in 0..n {
        counter.fetch_add(1, INC_ORD);
    }
    counter.load(FINAL_ORD)
}

/// Increment a fresh atomic counter `n` times, keeping the prior value
/// returned by `fetch_add` live through [`black_box`].
///
/// Rust has a single fetch-add primitive, so this and [`count_atomic`] lower
/// to the same read-modify-write; the separate workload checks whether
/// observing the returned value costs anything.
#[must_use]
pub fn count_fetch_add(n: usize) -> u64 {
    let counter = AtomicU64::new(0);
    for _ in 0..n {
        let prior = counter.fetch_add(1, INC_ORD);
        black_box(prior);
    }
    counter.load(FINAL_ORD)
}

/// Increment a plain integer `n` times, taking and releasing a [`Mutex`]
/// around each single increment.
#[must_use]
pub fn count_locked(n: usize) -> u64 {
    let counter = Mutex::new(0_u64);
    for _ in 0..n {
        let mut guard = counter.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += 1;
    }
    counter.into_inner().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
//  CAS retry loop
// ============================================================================

/// A counter updated through a compare-and-swap retry loop.
///
/// The two production implementations wrap an [`AtomicU64`] and differ only
/// in which hardware CAS they issue: [`WeakCas`] may fail spuriously even
/// without a concurrent modification, [`StrongCas`] fails only on a genuine
/// value mismatch.
pub trait CasCounter {
    /// Current value.
    fn load(&self) -> u64;

    /// Replace `current` with `new` if the counter still holds `current`.
    ///
    /// On failure returns the value actually observed. Implementations may
    /// fail spuriously (returning `Err` even when the counter held
    /// `current`); callers must retry.
    fn compare_exchange(&self, current: u64, new: u64) -> Result<u64, u64>;
}

/// Apply one logical increment via the load/CAS/retry loop.
///
/// A failed attempt — spurious or genuine — is ordinary control flow, not an
/// error: reload and try again until the swap lands.
pub fn cas_increment<C: CasCounter + ?Sized>(counter: &C) {
    loop {
        let seen = counter.load();
        if counter.compare_exchange(seen, seen + 1).is_ok() {
            break;
        }
    }
}

/// Counter performing CAS with `compare_exchange_weak` (spurious failure
/// permitted).
#[derive(Debug, Default)]
pub struct WeakCas(AtomicU64);

impl WeakCas {
    /// Fresh zeroed counter.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }
}

impl CasCounter for WeakCas {
    fn load(&self) -> u64 {
        self.0.load(CAS_FAILURE)
    }

    fn compare_exchange(&self, current: u64, new: u64) -> Result<u64, u64> {
        self.0
            .compare_exchange_weak(current, new, CAS_SUCCESS, CAS_FAILURE)
    }
}

/// Counter performing CAS with `compare_exchange` (fails only on genuine
/// mismatch).
#[derive(Debug, Default)]
pub struct StrongCas(AtomicU64);

impl StrongCas {
    /// Fresh zeroed counter.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }
}

impl CasCounter for StrongCas {
    fn load(&self) -> u64 {
        self.0.load(CAS_FAILURE)
    }

    fn compare_exchange(&self, current: u64, new: u64) -> Result<u64, u64> {
        self.0.compare_exchange(current, new, CAS_SUCCESS, CAS_FAILURE)
    }
}

fn count_cas<C: CasCounter>(counter: &C, n: usize) -> u64 {
    for _ in 0..n {
        cas_increment(counter);
    }
    counter.load()
}

/// Increment a fresh counter `n` times via the weak-CAS retry loop.
///
/// With no concurrency present, any retry taken here is a spurious failure.
#[must_use]
pub fn count_cas_weak(n: usize) -> u64 {
    count_cas(&WeakCas::new(), n)
}

/// Increment a fresh counter `n` times via the strong-CAS retry loop.
///
/// With no concurrency present, no retry is ever expected.
#[must_use]
pub fn count_cas_strong(n: usize) -> u64 {
    count_cas(&StrongCas::new(), n)
}

// ============================================================================
//  Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Test double: a strong CAS cell whose first attempt always fails, as a
    /// weak CAS is allowed to do spuriously.
    struct FlakyCas {
        inner: StrongCas,
        attempted: Cell<bool>,
    }

    impl FlakyCas {
        fn new() -> Self {
            Self {
                inner: StrongCas::new(),
                attempted: Cell::new(false),
            }
        }
    }

    impl CasCounter for FlakyCas {
        fn load(&self) -> u64 {
            self.inner.load()
        }

        fn compare_exchange(&self, current: u64, new: u64) -> Result<u64, u64> {
            if self.attempted.replace(true) {
                self.inner.compare_exchange(current, new)
            } else {
                Err(self.inner.load())
            }
        }
    }

    #[test]
    fn every_strategy_reaches_exact_total() {
        for n in [0, 1, 10, 1_000] {
            assert_eq!(count_atomic(n), n as u64);
            assert_eq!(count_fetch_add(n), n as u64);
            assert_eq!(count_locked(n), n as u64);
            assert_eq!(count_cas_weak(n), n as u64);
            assert_eq!(count_cas_strong(n), n as u64);
        }
    }

    #[test]
    fn lock_guarded_reaches_ten() {
        assert_eq!(count_locked(10), 10);
    }

    #[test]
    fn spurious_cas_failure_still_converges() {
        let counter = FlakyCas::new();
        for _ in 0..10 {
            counter.attempted.set(false);
            cas_increment(&counter);
        }
        assert_eq!(counter.load(), 10);
    }

    #[test]
    fn cas_increment_bumps_by_one() {
        let counter = StrongCas::new();
        cas_increment(&counter);
        cas_increment(&counter);
        assert_eq!(counter.load(), 2);
    }
}

// ============================================================================
//  Loom Tests
// ============================================================================

/// Loom tests for the CAS retry loop.
///
/// Loom explores every interleaving of the threads, so a lost update in the
/// retry loop would be found deterministically rather than by luck.
///
/// Run with: `RUSTFLAGS="--cfg loom" cargo test --lib strategy::loom_tests`
#[cfg(loom)]
mod loom_tests {
    use loom::sync::Arc;
    use loom::sync::atomic::{AtomicU64, Ordering};
    use loom::thread;

    /// Simplified CAS counter over loom atomics, mirroring the retry loop in
    /// [`super::cas_increment`].
    struct LoomCas(AtomicU64);

    impl LoomCas {
        fn increment_strong(&self) {
            loop {
                let seen = self.0.load(Ordering::SeqCst);
                if self
                    .0
                    .compare_exchange(seen, seen + 1, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    break;
                }
            }
        }

        fn increment_weak(&self) {
            loop {
                let seen = self.0.load(Ordering::SeqCst);
                if self
                    .0
                    .compare_exchange_weak(seen, seen + 1, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    break;
                }
            }
        }
    }

    #[test]
    fn strong_cas_loop_never_loses_updates() {
        loom::model(|| {
            let counter = Arc::new(LoomCas(AtomicU64::new(0)));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let counter = Arc::clone(&counter);
                    thread::spawn(move || {
                        counter.increment_strong();
                        counter.increment_strong();
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap();
            }

            assert_eq!(counter.0.load(Ordering::SeqCst), 4);
        });
    }

    #[test]
    fn weak_cas_loop_never_loses_updates() {
        loom::model(|| {
            let counter = Arc::new(LoomCas(AtomicU64::new(0)));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let counter = Arc::clone(&counter);
                    thread::spawn(move || {
                        counter.increment_weak();
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap();
            }

            assert_eq!(counter.0.load(Ordering::SeqCst), 2);
        });
    }
}
