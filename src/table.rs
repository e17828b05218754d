//! Read-only column fixture for the filter-and-count experiments.
//!
//! A [`Table`] holds four columns of consecutive integers. It is built once
//! before measurement begins and shared read-only across every iteration and
//! worker — no writer exists after construction, so no synchronization is
//! needed to scan it.

/// Number of columns, counters, and workers in the filter experiments.
pub const NUM_COLUMNS: usize = 4;

/// Elements per column in the full-size fixture.
pub const COLUMN_LEN: usize = 1_000_000;

/// Filter modulus applied to each column: column `i` counts the values
/// divisible by `FILTER_MODULI[i]`.
pub const FILTER_MODULI: [u64; NUM_COLUMNS] = [2, 3, 4, 5];

/// Four immutable columns, column `i` holding the values `0..len`.
#[derive(Debug, Clone)]
pub struct Table {
    columns: [Vec<u64>; NUM_COLUMNS],
}

impl Table {
    /// Build the full-size fixture ([`COLUMN_LEN`] elements per column).
    #[must_use]
    pub fn new() -> Self {
        Self::with_len(COLUMN_LEN)
    }

    /// Build a fixture with `len` elements per column. Tests use small
    /// lengths; the benchmarks use [`Self::new`].
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            columns: std::array::from_fn(|_| (0..len as u64).collect()),
        }
    }

    /// All four columns.
    #[must_use]
    pub const fn columns(&self) -> &[Vec<u64>; NUM_COLUMNS] {
        &self.columns
    }

    /// One column as a slice.
    ///
    /// # Panics
    /// If `idx >= NUM_COLUMNS`.
    #[must_use]
    pub fn column(&self, idx: usize) -> &[u64] {
        &self.columns[idx]
    }

    /// Elements per column.
    #[must_use]
    pub fn column_len(&self) -> usize {
        self.columns[0].len()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// Count of `i in [0, len)` divisible by `modulus` — the oracle every filter
/// variant must reproduce.
///
/// # Panics
/// If `modulus` is zero.
#[must_use]
pub fn expected_matches(len: usize, modulus: u64) -> u64 {
    assert!(modulus > 0, "filter modulus must be non-zero");
    (len as u64).div_ceil(modulus)
}
