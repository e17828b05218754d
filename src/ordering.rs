//! Standard memory orderings for counter access.
//!
//! These constants ensure consistent ordering usage across the workloads
//! and make the intent clear at each access point.

use std::sync::atomic::Ordering;

/// Ordering for measured atomic increments.
///
/// `SeqCst` keeps the five increment strategies on equal footing; on x86-64
/// the read-modify-write lowers to `lock xadd` regardless of ordering.
pub const INC_ORD: Ordering = Ordering::SeqCst;

/// Ordering for a successful compare-and-swap in the retry loop.
pub const CAS_SUCCESS: Ordering = Ordering::SeqCst;

/// Ordering for a failed compare-and-swap and for the load that seeds the
/// next retry. Only needs to observe the current value.
pub const CAS_FAILURE: Ordering = Ordering::SeqCst;

/// Ordering for publishing a locally accumulated total into shared state.
/// Pairs with the join barrier's synchronization on the reader side.
pub const PUBLISH_ORD: Ordering = Ordering::Release;

/// Ordering for reading a counter after the join barrier.
/// Safe because joining a thread provides the happens-before edge.
pub const FINAL_ORD: Ordering = Ordering::Relaxed;
