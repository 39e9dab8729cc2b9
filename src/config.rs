//! Construction parameters for `HashTable`

use crate::error::{HashTableError, Result};

/// Default number of buckets, must be a power of 2
pub const DEFAULT_INITIAL_CAPACITY: usize = 4;

/// Largest bucket count a table may ever reach (2^30)
pub const MAXIMUM_CAPACITY: usize = 1 << 30;

/// Default ratio of entries to buckets before the table grows
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Parameters a `HashTable` is built from.
///
/// Values are checked and normalized by [`TableConfig::validate`], which every
/// table constructor calls, so an invalid configuration is rejected before the
/// table exists rather than on first use.
///
/// ```rust
/// use chainmap::{HashTable, TableConfig};
///
/// let config = TableConfig::new().with_initial_capacity(10).with_load_factor_threshold(0.5);
/// let map: HashTable<String, u32> = HashTable::from_config(config).unwrap();
/// assert_eq!(map.capacity(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Requested bucket count, rounded up to a power of two on validation
    initial_capacity: usize,
    /// Fraction in `(0, 1]` of entries per bucket that triggers growth
    load_factor_threshold: f64,
    /// Ceiling on the bucket count
    max_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TableConfig {
    /// Creates a configuration holding the default parameters
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor_threshold: DEFAULT_LOAD_FACTOR,
            max_capacity: MAXIMUM_CAPACITY,
        }
    }

    /// Sets the requested initial bucket count
    #[must_use]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the load factor threshold
    #[must_use]
    pub const fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// Lowers the capacity ceiling below `MAXIMUM_CAPACITY`
    #[must_use]
    pub const fn with_max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// Requested initial bucket count
    #[must_use]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Load factor threshold
    #[must_use]
    pub const fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Capacity ceiling
    #[must_use]
    pub const fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Checks the parameters and returns the normalized configuration.
    ///
    /// The initial capacity is rounded up to the smallest power of two that is
    /// at least as large (zero becomes one) and capped at the ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`HashTableError::InvalidLoadFactor`] when the threshold is NaN
    /// or outside `(0, 1]`, and [`HashTableError::InvalidMaxCapacity`] when the
    /// ceiling is not a power of two in `1..=MAXIMUM_CAPACITY`.
    pub fn validate(self) -> Result<Self> {
        let threshold = self.load_factor_threshold;
        if threshold.is_nan() || threshold <= 0.0 || threshold > 1.0 {
            return Err(HashTableError::InvalidLoadFactor(threshold));
        }

        let max = self.max_capacity;
        if !max.is_power_of_two() || max > MAXIMUM_CAPACITY {
            return Err(HashTableError::InvalidMaxCapacity(max));
        }

        Ok(Self {
            initial_capacity: normalize_capacity(self.initial_capacity, max),
            load_factor_threshold: threshold,
            max_capacity: max,
        })
    }
}

/// Rounds `requested` up to a power of two no larger than `max`.
///
/// `max` must itself be a power of two.
pub(crate) const fn normalize_capacity(requested: usize, max: usize) -> usize {
    // Clamping first keeps next_power_of_two from overflowing
    let clamped = if requested == 0 {
        1
    } else if requested > max {
        max
    } else {
        requested
    };
    clamped.next_power_of_two()
}
