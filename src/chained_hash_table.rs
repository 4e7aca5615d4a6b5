//! ChainedHashTable: public map API and growth policy over `BucketArray`.

use crate::bucket_array::BucketArray;
use crate::config::TableConfig;
use crate::cursor::{BucketCursor, BucketIter, Iter};
use crate::error::{ConfigError, TableError};
use crate::reentrancy::ReentryCheck;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// A separate-chaining hash table with observable bucket internals.
///
/// Keys map to bucket `hash(key) % bucket_count()`. Each bucket holds a
/// chain with the newest entry first. A new key grows the table to twice
/// its bucket count when the share of non-empty buckets reaches the fill
/// factor threshold, or when its chain becomes longer than the collision
/// threshold. The bucket count never shrinks.
pub struct ChainedHashTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    config: TableConfig,
    buckets: BucketArray<K, V>,
    reentrancy: ReentryCheck,
}

impl<K, V> ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Starts with `capacity` buckets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(
            TableConfig::new().initial_capacity(capacity.max(1)),
            Default::default(),
        )
    }

    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<K, V, S> Default for ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

// Accessors that never touch user `Hash`/`Eq` code.
impl<K, V, S> ChainedHashTable<K, V, S> {
    fn build(config: TableConfig, hasher: S) -> Self {
        Self {
            hasher,
            buckets: BucketArray::new(config.initial_capacity),
            config,
            reentrancy: ReentryCheck::new(),
        }
    }

    pub(crate) fn buckets(&self) -> &BucketArray<K, V> {
        &self.buckets
    }

    pub(crate) fn buckets_mut(&mut self) -> &mut BucketArray<K, V> {
        &mut self.buckets
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Same as [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.capacity()
    }

    /// Length of the chain in bucket `index`.
    pub fn bucket_size(&self, index: usize) -> Result<usize, TableError> {
        self.buckets
            .bucket_len(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Number of non-empty buckets.
    pub fn used_buckets(&self) -> usize {
        self.buckets.used()
    }

    /// `used_buckets() / bucket_count()`.
    pub fn fill_factor(&self) -> f64 {
        self.buckets.used() as f64 / self.buckets.capacity() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Iterates over the chain of bucket `index`, newest entry first.
    pub fn bucket_iter(&self, index: usize) -> Result<BucketIter<'_, K, V>, TableError> {
        self.check_index(index)?;
        Ok(BucketIter::new(&self.buckets, index))
    }

    /// Cursor at the head of bucket `index`.
    pub fn begin(&self, index: usize) -> Result<BucketCursor, TableError> {
        self.check_index(index)?;
        Ok(BucketCursor::begin(&self.buckets, index))
    }

    /// Cursor one past the tail of bucket `index`.
    pub fn end(&self, index: usize) -> Result<BucketCursor, TableError> {
        self.check_index(index)?;
        Ok(BucketCursor::end(&self.buckets, index))
    }

    /// Iterates over all entries in bucket order, then chain order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets)
    }

    /// Drops every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    fn check_index(&self, index: usize) -> Result<(), TableError> {
        if index < self.bucket_count() {
            Ok(())
        } else {
            Err(self.out_of_range(index))
        }
    }

    fn out_of_range(&self, index: usize) -> TableError {
        TableError::IndexOutOfRange {
            index,
            bucket_count: self.bucket_count(),
        }
    }
}

impl<K, V, S> ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::build(TableConfig::new(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Bucket that `q` maps to under the current bucket count.
    pub fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        let _s = self.reentrancy.enter("bucket_index");
        self.buckets.index_of(self.make_hash(q))
    }

    pub fn get<Q>(&self, q: &Q) -> Result<&V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _s = self.reentrancy.enter("get");
        let hash = self.make_hash(q);
        self.buckets
            .find(hash, q)
            .map(|e| &e.value)
            .ok_or(TableError::NotFound)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _s = self.reentrancy.enter("get_mut");
        let hash = self.make_hash(q);
        self.buckets
            .find_mut(hash, q)
            .map(|e| &mut e.value)
            .ok_or(TableError::NotFound)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _s = self.reentrancy.enter("contains");
        let hash = self.make_hash(q);
        self.buckets.contains(hash, q)
    }

    /// Maps `key` to `value` and returns the value it replaced, if any.
    ///
    /// Overwriting an existing key changes nothing structural. A new key is
    /// linked at the head of its chain and may trigger a rehash; allocation
    /// failure during that rehash aborts, as it does for `Vec`. Use
    /// [`try_set`](Self::try_set) to observe it instead.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let _s = self.reentrancy.enter("set");
        let hash = self.make_hash(&key);
        if let Some(e) = self.buckets.find_mut(hash, &key) {
            return Some(core::mem::replace(&mut e.value, value));
        }
        let index = self.buckets.insert_new(hash, key, value);
        if self.needs_growth(index) {
            if let Some(capacity) = self.bucket_count().checked_mul(2) {
                self.buckets.rehash(capacity);
            }
        }
        None
    }

    /// Like [`set`](Self::set), but reports a failed rehash.
    ///
    /// On error the entry has still been stored and the table keeps its
    /// previous, consistent bucket array; no entry has been relocated.
    pub fn try_set(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let _s = self.reentrancy.enter("try_set");
        let hash = self.make_hash(&key);
        if let Some(e) = self.buckets.find_mut(hash, &key) {
            return Ok(Some(core::mem::replace(&mut e.value, value)));
        }
        let index = self.buckets.insert_new(hash, key, value);
        if self.needs_growth(index) {
            let current = self.bucket_count();
            let capacity = current
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow(current))?;
            self.buckets
                .try_rehash(capacity)
                .map_err(|source| TableError::AllocationFailed {
                    requested: capacity,
                    source,
                })?;
        }
        Ok(None)
    }

    /// Removes `q`; true if an entry was removed. Never shrinks the table.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }

    /// Removes `q` and hands back the owned key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _s = self.reentrancy.enter("remove");
        let hash = self.make_hash(q);
        let entry = self.buckets.unlink(hash, q)?;
        Some((entry.key, entry.value))
    }

    /// Growth check after a new entry landed in bucket `index`.
    fn needs_growth(&self, index: usize) -> bool {
        let crowded = self.buckets.bucket_len(index).unwrap_or(0) > self.config.collision_threshold
            && !self.buckets.chain_shares_hash(index);
        crowded || self.fill_factor() >= self.config.fill_factor_threshold
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V, S> fmt::Debug for ChainedHashTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
