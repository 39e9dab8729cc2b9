//! # Chained Hash Map
//!
//! A Rust implementation of a resizable hash table resolving collisions by
//! separate chaining.
//!
//! `HashTable` keeps a power-of-two array of buckets. A key's hash code is
//! passed through a supplemental spread function before being masked down to a
//! bucket index, so codes that differ only in their upper bits still land in
//! different buckets. The table doubles its bucket count whenever an insertion
//! would reach the load factor threshold, up to a ceiling of 2^30 buckets.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chainmap::{HashTable, SnapshotViews};
//!
//! // Create a new hash map
//! let mut map = HashTable::new();
//!
//! // Insert values
//! map.insert("Smith".to_string(), 54).unwrap();
//! map.insert("Lewis".to_string(), 18).unwrap();
//!
//! // Retrieve values
//! assert_eq!(map.get("Lewis"), Some(&18));
//!
//! // Update values, getting the old one back
//! assert_eq!(map.put("Smith".to_string(), 43).unwrap(), 54);
//! assert_eq!(map.get("Smith"), Some(&43));
//!
//! // Take a snapshot of the keys
//! assert_eq!(map.key_set().len(), 2);
//!
//! // Remove values
//! map.remove("Smith");
//! assert!(!map.contains_key("Smith"));
//! ```
//!
//! ## Capacity Limits
//!
//! Insertion is fallible: once the table sits at its capacity ceiling and is
//! full, new keys are rejected with `HashTableError::CapacityExceeded`.
//!
//! ```rust
//! use chainmap::{HashTable, HashTableError, TableConfig};
//!
//! let config = TableConfig::new().with_initial_capacity(2).with_max_capacity(2);
//! let mut map = HashTable::from_config(config).unwrap();
//!
//! map.insert(1, "one").unwrap();
//! map.insert(2, "two").unwrap();
//! assert_eq!(map.insert(3, "three"), Err(HashTableError::CapacityExceeded { capacity: 2 }));
//! assert_eq!(map.len(), 2);
//! ```

/// Module holding construction parameters and capacity constants
mod config;
/// Module defining the crate error type
mod error;
/// Module implementing the chained hash table
mod hash_table;
/// Hash code derivation and bucket indexing
mod hashing;
/// Bucket distribution statistics
mod stats;
/// Snapshot views over table contents
mod views;

pub use config::{DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY, TableConfig};
pub use error::{HashTableError, Result};
pub use hash_table::{Entry, HashTable, Iter};
pub use stats::BucketStats;
pub use views::SnapshotViews;
