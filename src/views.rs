//! Snapshot views over the contents of a `HashTable`

use std::{collections::HashSet, hash::Hash};

use crate::{Entry, HashTable};

/// Extension trait producing owned, deduplicated snapshots of a table.
///
/// Each view is built by a single pass over every bucket. Later changes to
/// the table do not affect a view already returned. Each view only asks for
/// the bounds of the parts it copies, so `key_set` works whatever the value
/// type.
pub trait SnapshotViews<K, V> {
    /// Returns the set of keys
    fn key_set(&self) -> HashSet<K>
    where
        K: Clone;

    /// Returns the set of distinct values
    fn values(&self) -> HashSet<V>
    where
        V: Eq + Hash + Clone;

    /// Returns the set of entries
    fn entry_set(&self) -> HashSet<Entry<K, V>>
    where
        K: Clone,
        V: Eq + Hash + Clone;
}

impl<K, V> SnapshotViews<K, V> for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn key_set(&self) -> HashSet<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> HashSet<V>
    where
        V: Eq + Hash + Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn entry_set(&self) -> HashSet<Entry<K, V>>
    where
        K: Clone,
        V: Eq + Hash + Clone,
    {
        self.iter().map(|(k, v)| Entry::new(k.clone(), v.clone())).collect()
    }
}
