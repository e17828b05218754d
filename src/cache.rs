//! Cache-line layout control.
//!
//! The false-sharing experiments compare counters packed into one cache line
//! against counters forced onto separate lines. [`CacheAligned`] is the
//! isolation half of that comparison: it aligns its contents to a cache-line
//! boundary, so adjacent instances never share a line.
//!
//! # Line size
//!
//! 64 bytes on `x86_64` and most other targets. Recent aarch64 parts
//! (Apple M-series in particular) pair 64-byte lines with a 128-byte
//! coherence granule, so we align to 128 there.

use std::ops::{Deref, DerefMut};

/// Size in bytes of the alignment boundary used by [`CacheAligned`].
#[cfg(target_arch = "aarch64")]
pub const CACHE_LINE_SIZE: usize = 128;

/// Size in bytes of the alignment boundary used by [`CacheAligned`].
#[cfg(not(target_arch = "aarch64"))]
pub const CACHE_LINE_SIZE: usize = 64;

/// Pads and aligns a value to a cache-line boundary.
///
/// Alignment implies the size is rounded up to a multiple of the line size,
/// so a `[CacheAligned<T>; 4]` places each element on its own line.
///
/// # Example
///
/// ```rust
/// use contend::cache::{CACHE_LINE_SIZE, CacheAligned};
/// use std::sync::atomic::AtomicU64;
///
/// let counters: [CacheAligned<AtomicU64>; 4] = Default::default();
/// assert_eq!(size_of_val(&counters), 4 * CACHE_LINE_SIZE);
/// ```
#[cfg_attr(target_arch = "aarch64", repr(C, align(128)))]
#[cfg_attr(not(target_arch = "aarch64"), repr(C, align(64)))]
#[derive(Debug, Default)]
pub struct CacheAligned<T> {
    value: T,
}

impl<T> CacheAligned<T> {
    /// Wrap `value`, forcing it onto its own cache line.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Unwrap, returning the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Exclusive access to the inner value.
    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Deref for CacheAligned<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for CacheAligned<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> From<T> for CacheAligned<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    #[test]
    fn alignment_matches_line_size() {
        assert_eq!(align_of::<CacheAligned<AtomicU64>>(), CACHE_LINE_SIZE);
        assert_eq!(align_of::<CacheAligned<u8>>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn size_is_rounded_to_full_lines() {
        assert_eq!(size_of::<CacheAligned<AtomicU64>>(), CACHE_LINE_SIZE);
        // A value larger than one line occupies a whole number of lines.
        assert_eq!(
            size_of::<CacheAligned<[u8; 65]>>() % CACHE_LINE_SIZE,
            0
        );
    }

    #[test]
    fn adjacent_elements_never_share_a_line() {
        let counters: [CacheAligned<AtomicU64>; 4] = Default::default();
        let base = std::ptr::from_ref(&counters[0]) as usize;
        for (i, counter) in counters.iter().enumerate() {
            let addr = std::ptr::from_ref(counter) as usize;
            assert_eq!(addr % CACHE_LINE_SIZE, 0);
            assert_eq!(addr - base, i * CACHE_LINE_SIZE);
        }
    }

    #[test]
    fn deref_and_into_inner_round_trip() {
        let mut cell = CacheAligned::new(41_u64);
        *cell.get_mut() += 1;
        assert_eq!(*cell, 42);
        assert_eq!(cell.into_inner(), 42);
    }
}
