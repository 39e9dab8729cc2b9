//! Bucket distribution statistics

use std::fmt;

use crate::HashTable;

/// Snapshot of how entries are spread over the buckets of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    /// Number of buckets
    pub capacity: usize,
    /// Number of entries
    pub len: usize,
    /// Buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Entries in the most crowded bucket
    pub longest_chain: usize,
    /// Entries per bucket
    pub load_factor: f64,
}

impl BucketStats {
    /// Average chain length over the occupied buckets, 0 for an empty table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn mean_chain(&self) -> f64 {
        if self.occupied_buckets == 0 {
            0.0
        } else {
            self.len as f64 / self.occupied_buckets as f64
        }
    }

    /// Fraction of buckets holding at least one entry
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn occupancy(&self) -> f64 {
        self.occupied_buckets as f64 / self.capacity as f64
    }
}

impl fmt::Display for BucketStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries in {}/{} buckets, longest chain {}, load factor {:.3}",
            self.len, self.occupied_buckets, self.capacity, self.longest_chain, self.load_factor
        )
    }
}

impl<K, V> HashTable<K, V> {
    /// Collects distribution statistics by walking every bucket once
    #[must_use]
    pub fn bucket_stats(&self) -> BucketStats {
        let (occupied_buckets, longest_chain) = self
            .bucket_lengths()
            .filter(|&len| len > 0)
            .fold((0_usize, 0_usize), |(occupied, longest), len| {
                (occupied.saturating_add(1), longest.max(len))
            });

        BucketStats {
            capacity: self.capacity(),
            len: self.len(),
            occupied_buckets,
            longest_chain,
            load_factor: self.load_factor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableConfig;

    #[test]
    fn test_empty_table() {
        let map: HashTable<u32, u32> = HashTable::new();
        let stats = map.bucket_stats();

        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.len, 0);
        assert_eq!(stats.occupied_buckets, 0);
        assert_eq!(stats.longest_chain, 0);
        assert!(stats.mean_chain().abs() < f64::EPSILON);
    }

    #[test]
    fn test_counts_match_table() {
        let mut map = HashTable::new();
        for i in 0..500_u32 {
            map.insert(i, ()).unwrap();
        }
        let stats = map.bucket_stats();

        assert_eq!(stats.len, 500);
        assert_eq!(stats.capacity, map.capacity());
        assert!(stats.occupied_buckets <= stats.len);
        assert!(stats.longest_chain >= 1);
        assert!(stats.mean_chain() >= 1.0);
        assert!(stats.occupancy() > 0.0 && stats.occupancy() <= 1.0);
    }

    #[test]
    fn test_single_bucket_holds_the_chain() {
        let config = TableConfig::new()
            .with_initial_capacity(1)
            .with_load_factor_threshold(1.0)
            .with_max_capacity(1);
        let mut map = HashTable::from_config(config).unwrap();
        map.insert("x", 1).unwrap();

        let stats = map.bucket_stats();
        assert_eq!(stats.occupied_buckets, 1);
        assert_eq!(stats.longest_chain, 1);
        assert_eq!(stats.to_string(), "1 entries in 1/1 buckets, longest chain 1, load factor 1.000");
    }
}
