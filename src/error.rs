//! Error type shared by every fallible `HashTable` operation

use thiserror::Error;

/// Errors surfaced by table construction and insertion.
///
/// Lookups and removals of absent keys are not errors; they report absence
/// through `Option` or `bool`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum HashTableError {
    /// A new key could not be inserted because the table is at its capacity
    /// ceiling and already holds as many entries as the load factor allows.
    #[error("exceeding maximum capacity of {capacity} buckets")]
    CapacityExceeded {
        /// The bucket count the table is stuck at
        capacity: usize,
    },
    /// The load factor threshold is not a fraction in `(0, 1]`.
    #[error("load factor threshold must be in (0, 1], got {0}")]
    InvalidLoadFactor(f64),
    /// The capacity ceiling is zero, not a power of two, or above `MAXIMUM_CAPACITY`.
    #[error("maximum capacity must be a power of two no larger than 2^30, got {0}")]
    InvalidMaxCapacity(usize),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HashTableError>;
