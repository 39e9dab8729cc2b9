use std::{
    borrow::Borrow,
    fmt,
    hash::Hash,
    iter::{Flatten, FusedIterator},
    mem, slice,
};

use log::{debug, trace, warn};

use crate::{
    config::{DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY, TableConfig, normalize_capacity},
    error::{HashTableError, Result},
    hashing::{bucket_index, hash_code},
};

/// A key-value pair stored in the table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    /// The key, fixed once the entry exists
    key: K,
    /// The value associated with the key
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry from its parts
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the value for in-place modification
    pub const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Splits the entry into its key and value
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.key, self.value)
    }
}

/// Entries whose keys landed on the same slot, in insertion order.
///
/// An empty `Vec` does not allocate, so a bucket that never received an entry
/// and one whose entries were all removed look the same.
type Bucket<K, V> = Vec<Entry<K, V>>;

/// A hash map resolving collisions by separate chaining.
///
/// Each slot of the table holds a bucket of entries. The bucket count is
/// always a power of two, and the table doubles it whenever an insertion
/// would bring the number of entries to the load factor threshold. It never
/// shrinks.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock for
/// shared mutable access.
#[derive(Debug, Clone)]
pub struct HashTable<K, V> {
    /// The buckets storing the key-value pairs
    buckets: Vec<Bucket<K, V>>,
    /// Current number of elements in the hash table
    size: usize,
    /// Fraction of entries per bucket that triggers growth
    load_factor_threshold: f64,
    /// Bucket count the table may not grow past
    max_capacity: usize,
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty table with 4 buckets and a load factor threshold of 0.75
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty table with the default load factor threshold.
    ///
    /// The capacity is rounded up to a power of two and capped at
    /// `MAXIMUM_CAPACITY`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::allocate(normalize_capacity(capacity, MAXIMUM_CAPACITY), DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY)
    }

    /// Creates an empty table with the given capacity and load factor threshold
    ///
    /// # Errors
    ///
    /// Returns [`HashTableError::InvalidLoadFactor`] if the threshold is not in `(0, 1]`.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor_threshold: f64) -> Result<Self> {
        Self::from_config(
            TableConfig::new()
                .with_initial_capacity(capacity)
                .with_load_factor_threshold(load_factor_threshold),
        )
    }

    /// Creates an empty table from a configuration
    ///
    /// # Errors
    ///
    /// Returns the validation error of the configuration, see [`TableConfig::validate`].
    pub fn from_config(config: TableConfig) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self::allocate(config.initial_capacity(), config.load_factor_threshold(), config.max_capacity()))
    }

    /// Builds a table from already-normalized parameters
    fn allocate(capacity: usize, load_factor_threshold: f64, max_capacity: usize) -> Self {
        Self { buckets: Self::empty_buckets(capacity), size: 0, load_factor_threshold, max_capacity }
    }

    /// Allocates `capacity` empty buckets
    fn empty_buckets(capacity: usize) -> Vec<Bucket<K, V>> {
        (0..capacity).map(|_| Vec::new()).collect()
    }

    /// Gets the index in the buckets for a key
    fn get_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        bucket_index(hash_code(key), self.buckets.len())
    }

    /// Whether holding `entries` entries in `capacity` buckets reaches the threshold
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn reaches_threshold(&self, entries: usize, capacity: usize) -> bool {
        entries as f64 >= capacity as f64 * self.load_factor_threshold
    }

    /// Insert a key-value pair into the hash table.
    ///
    /// Returns the replaced value if the key was already present, and `None`
    /// if a new entry was added. Replacing a value never grows the table.
    ///
    /// # Errors
    ///
    /// Returns [`HashTableError::CapacityExceeded`] if the key is new and the
    /// table is full at its capacity ceiling. The table is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if let Some(existing) = self.get_mut(&key) {
            return Ok(Some(mem::replace(existing, value)));
        }

        self.reserve_one()?;

        let index = self.get_index(&key);
        // The index is masked by the bucket count, so the lookup cannot miss
        if let Some(bucket) = self.buckets.get_mut(index) {
            bucket.push(Entry::new(key, value));
            self.size = self.size.saturating_add(1);
        }

        Ok(None)
    }

    /// Makes room for one more entry, growing the table if needed
    fn reserve_one(&mut self) -> Result<()> {
        let capacity = self.capacity();
        let needed = self.size.saturating_add(1);
        if !self.reaches_threshold(needed, capacity) {
            return Ok(());
        }

        if capacity >= self.max_capacity {
            // At the ceiling one entry past the threshold is tolerated, no more.
            if self.reaches_threshold(self.size, capacity) {
                warn!("rejecting insertion: {} entries already fill {} buckets", self.size, capacity);
                return Err(HashTableError::CapacityExceeded { capacity });
            }
            return Ok(());
        }

        let mut new_capacity = capacity;
        while new_capacity < self.max_capacity && self.reaches_threshold(needed, new_capacity) {
            new_capacity = new_capacity.saturating_mul(2);
        }
        self.resize(new_capacity);

        Ok(())
    }

    /// Moves every entry into a fresh array of `new_capacity` buckets
    fn resize(&mut self, new_capacity: usize) {
        debug!(
            "resizing hash table from {} to {} buckets with {} entries",
            self.capacity(),
            new_capacity,
            self.size
        );

        let old_buckets = mem::replace(&mut self.buckets, Self::empty_buckets(new_capacity));
        for entry in old_buckets.into_iter().flatten() {
            let index = bucket_index(hash_code(&entry.key), new_capacity);
            if let Some(bucket) = self.buckets.get_mut(index) {
                bucket.push(entry);
            }
        }
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Retrieve the stored key and its value
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.get_index(key);
        self.buckets
            .get(index)?
            .iter()
            .find(|entry| entry.key.borrow() == key)
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.get_index(key);
        self.buckets
            .get_mut(index)?
            .iter_mut()
            .find(|entry| entry.key.borrow() == key)
            .map(|entry| &mut entry.value)
    }

    /// Returns true if an entry with the given key exists, whatever its value
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Returns true if any entry holds a value equal to `value`.
    ///
    /// Scans the whole table.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, candidate)| candidate == value)
    }

    /// Removes a key-value pair from the hash table.
    ///
    /// Returns `None` and leaves the table untouched when the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.get_index(key);
        let bucket = self.buckets.get_mut(index)?;
        let position = bucket.iter().position(|entry| entry.key.borrow() == key)?;
        let entry = bucket.remove(position);
        self.size = self.size.saturating_sub(1);
        Some(entry.value)
    }

    /// Inserts every pair of `iter`, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns [`HashTableError::CapacityExceeded`] once the table is full.
    /// Pairs inserted before the failure stay in the table.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Creates a default table holding the pairs of `iter`
    ///
    /// # Errors
    ///
    /// Returns [`HashTableError::CapacityExceeded`] if the pairs do not fit.
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut table = Self::new();
        table.try_extend(iter)?;
        Ok(table)
    }
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Adds or updates an entry, returning the replaced value on update and
    /// the value just stored on insertion.
    ///
    /// Use [`HashTable::insert`] to tell the two cases apart.
    ///
    /// # Errors
    ///
    /// Same as [`HashTable::insert`].
    pub fn put(&mut self, key: K, value: V) -> Result<V> {
        let stored = value.clone();
        Ok(self.insert(key, value)?.unwrap_or(stored))
    }
}

impl<K, V> HashTable<K, V> {
    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets in the hash table
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the bucket count the table will not grow past
    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Returns the load factor threshold the table was built with
    #[must_use]
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Returns the current load factor of the hash table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Clears the hash table, removing all key-value pairs.
    ///
    /// The bucket count is kept.
    pub fn clear(&mut self) {
        trace!("clearing {} entries from {} buckets", self.size, self.buckets.len());
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.size = 0;
    }

    /// Returns an iterator over the key-value pairs in bucket order, then
    /// insertion order within a bucket
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.buckets.iter().flatten(), remaining: self.size }
    }

    /// Number of entries held by each bucket, in bucket order
    pub(crate) fn bucket_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for bucket in &self.buckets {
            for entry in bucket {
                write!(f, "{entry}")?;
            }
        }
        f.write_str("]")
    }
}

/// Iterator over the key-value pairs of the hash table
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Entries of every bucket, chained
    inner: Flatten<slice::Iter<'a, Bucket<K, V>>>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts the bound every successful insertion must leave behind
    fn assert_within_threshold<K: Eq + Hash, V>(map: &HashTable<K, V>) {
        assert!(map.capacity().is_power_of_two());
        assert!(
            map.load_factor() < map.load_factor_threshold() || map.capacity() == map.max_capacity(),
            "{} entries in {} buckets",
            map.len(),
            map.capacity()
        );
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashTable::new();
        assert_eq!(map.insert("key1".to_string(), 1), Ok(None));
        assert_eq!(map.insert("key2".to_string(), 2), Ok(None));
        assert_eq!(map.insert("key3".to_string(), 3), Ok(None));

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_update() {
        let mut map = HashTable::new();
        assert_eq!(map.insert("key1".to_string(), 1), Ok(None));
        assert_eq!(map.insert("key1".to_string(), 10), Ok(Some(1)));
        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_put_returns_old_or_stored_value() {
        let mut map = HashTable::new();
        assert_eq!(map.put("Smith", 54), Ok(54));
        assert_eq!(map.put("Smith", 43), Ok(54));
        assert_eq!(map.get("Smith"), Some(&43));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = HashTable::new();
        map.insert("key1".to_string(), 1).unwrap();
        map.insert("key2".to_string(), 2).unwrap();

        assert_eq!(map.remove("key1"), Some(1));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.remove("key1"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_targets_the_given_key_only() {
        let mut map = HashTable::new();
        for i in 0..50 {
            map.insert(i, i * 10).unwrap();
        }

        for i in (0..50).step_by(2) {
            assert_eq!(map.remove(&i), Some(i * 10));
        }

        assert_eq!(map.len(), 25);
        for i in 0..50 {
            let expected = if i % 2 == 0 { None } else { Some(i * 10) };
            assert_eq!(map.get(&i).copied(), expected);
        }
    }

    #[test]
    fn test_resize() {
        let mut map = HashTable::with_capacity_and_load_factor(4, 0.5).unwrap();

        // Two entries in four buckets reach 50%, so the second insert doubles the table
        map.insert("key1".to_string(), 1).unwrap();
        assert_eq!(map.capacity(), 4);
        map.insert("key2".to_string(), 2).unwrap();
        map.insert("key3".to_string(), 3).unwrap();

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.capacity(), 8);
    }

    #[test]
    fn test_resize_keeps_every_pair() {
        let mut map = HashTable::with_capacity(1);
        let mut last_capacity = map.capacity();

        for i in 0..2000_u32 {
            map.insert(i, i.to_string()).unwrap();
            assert_within_threshold(&map);

            if map.capacity() != last_capacity {
                last_capacity = map.capacity();
                for j in 0..=i {
                    assert_eq!(map.get(&j), Some(&j.to_string()));
                }
            }
        }

        assert_eq!(map.len(), 2000);
    }

    #[test]
    fn test_small_threshold_grows_several_times_at_once() {
        let mut map = HashTable::with_capacity_and_load_factor(1, 0.1).unwrap();
        map.insert('a', 1).unwrap();

        // One entry needs at least 16 buckets to stay below 10%
        assert_eq!(map.capacity(), 16);
        assert_within_threshold(&map);
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut map = HashTable::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);

        map.insert("key1".to_string(), 1).unwrap();
        assert!(!map.is_empty());
        assert_eq!(map.len(), 1);

        map.insert("key2".to_string(), 2).unwrap();
        assert_eq!(map.len(), 2);

        map.remove("key1");
        assert_eq!(map.len(), 1);

        map.remove("key2");
        assert!(map.is_empty());
    }

    #[test]
    fn test_iter() {
        let mut map = HashTable::new();
        map.insert("key1".to_string(), 1).unwrap();
        map.insert("key2".to_string(), 2).unwrap();
        map.insert("key3".to_string(), 3).unwrap();

        let iter = map.iter();
        assert_eq!(iter.len(), 3);

        let mut count = 0;
        let mut sum = 0;
        for (_, &value) in &map {
            count += 1;
            sum += value;
        }

        assert_eq!(count, 3);
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashTable::new();
        map.insert("key1".to_string(), 1).unwrap();

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
    }

    #[test]
    fn test_clear() {
        let mut map = HashTable::new();
        for i in 0..20 {
            map.insert(i, i).unwrap();
        }
        let capacity = map.capacity();

        map.clear();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.get(&1), None);
        assert_eq!(map.iter().count(), 0);

        map.insert(1, 100).unwrap();
        assert_eq!(map.get(&1), Some(&100));
    }

    #[test]
    fn test_with_high_load_factor() {
        let mut map = HashTable::with_capacity_and_load_factor(16, 0.9).unwrap();

        for i in 0..14 {
            map.insert(i.to_string(), i).unwrap();
        }

        for i in 0..14 {
            assert_eq!(map.get(&i.to_string()), Some(&i));
        }

        assert_eq!(map.capacity(), 16);
        assert!((map.load_factor() - 14.0 / 16.0).abs() < 0.01);
    }

    #[test]
    fn test_contains_key_with_empty_value() {
        let mut map: HashTable<&str, Option<u32>> = HashTable::new();
        map.insert("present", None).unwrap();

        assert!(map.contains_key("present"));
        assert!(!map.contains_key("absent"));
        assert_eq!(map.get("present"), Some(&None));
    }

    #[test]
    fn test_contains_value() {
        let mut map = HashTable::new();
        map.insert("Lewis", 18).unwrap();
        map.insert("Cook", 31).unwrap();

        assert!(map.contains_value(&18));
        assert!(!map.contains_value(&54));

        map.remove("Lewis");
        assert!(!map.contains_value(&18));
    }

    #[test]
    fn test_capacity_exceeded() {
        let config = TableConfig::new()
            .with_initial_capacity(1)
            .with_load_factor_threshold(1.0)
            .with_max_capacity(4);
        let mut map = HashTable::from_config(config).unwrap();

        for i in 0..4 {
            map.insert(i, i).unwrap();
        }
        assert_eq!(map.capacity(), 4);
        assert_eq!(map.len(), 4);

        assert_eq!(map.insert(4, 4), Err(HashTableError::CapacityExceeded { capacity: 4 }));
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(&4), None);

        // Updates never need room
        assert_eq!(map.insert(2, 20), Ok(Some(2)));

        // Removing frees a slot again
        map.remove(&0);
        assert_eq!(map.insert(4, 4), Ok(None));
    }

    #[test]
    fn test_single_bucket_chain() {
        let config = TableConfig::new()
            .with_initial_capacity(1)
            .with_load_factor_threshold(1.0)
            .with_max_capacity(1);
        let mut map = HashTable::from_config(config).unwrap();

        map.insert("only", 1).unwrap();
        assert!(map.insert("second", 2).is_err());
        assert_eq!(map.to_string(), "[[only, 1]]");
    }

    #[test]
    fn test_display() {
        let mut map = HashTable::new();
        assert_eq!(map.to_string(), "[]");

        map.insert("Smith", 54).unwrap();
        map.insert("Anderson", 44).unwrap();
        map.insert("Lewis", 18).unwrap();

        let expected: String = map.iter().map(|(k, v)| format!("[{k}, {v}]")).collect();
        assert_eq!(map.to_string(), format!("[{expected}]"));
        assert!(map.to_string().contains("[Anderson, 44]"));
    }

    #[test]
    fn test_try_from_iter() {
        let map = HashTable::try_from_iter(vec![("a", 1), ("b", 2), ("a", 3)]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_entry_accessors() {
        let mut entry = Entry::new("Cook", 31);
        *entry.value_mut() += 1;

        assert_eq!(entry.key(), &"Cook");
        assert_eq!(entry.value(), &32);
        assert_eq!(entry.to_string(), "[Cook, 32]");
        assert_eq!(entry.into_parts(), ("Cook", 32));
    }
}
