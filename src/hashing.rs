//! Hash code derivation and bucket index computation

use std::hash::{DefaultHasher, Hash, Hasher};

/// Computes the 32-bit hash code of a key.
///
/// The key is fed to a `DefaultHasher` built with fixed keys, so the same key
/// always produces the same code. The 64-bit digest is folded by XOR-ing its
/// two halves.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn hash_code<Q: ?Sized + Hash>(key: &Q) -> u32 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();
    (hash ^ (hash >> 32)) as u32
}

/// Supplemental hash that mixes high bits into the low ones.
///
/// Bucket indices keep only the low bits of a hash code, so codes that differ
/// only in their upper bits would otherwise all collide.
pub(crate) const fn spread(h: u32) -> u32 {
    let h = h ^ (h >> 20) ^ (h >> 12);
    h ^ (h >> 7) ^ (h >> 4)
}

/// Maps a hash code onto a table of `capacity` buckets.
///
/// `capacity` must be a power of two, which makes the mask equivalent to a
/// modulo.
pub(crate) const fn bucket_index(code: u32, capacity: usize) -> usize {
    (spread(code) as usize) & capacity.saturating_sub(1)
}
