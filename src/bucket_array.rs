//! BucketArray: chain heads, per-bucket counters and the entry arena.
//!
//! Owns every entry and keeps the bookkeeping consistent on each
//! structural path:
//! - `sizes[i]` equals the length of the chain at `heads[i]`;
//! - `used` equals the number of non-empty chains;
//! - `arena.len()` equals the sum of `sizes`.
//!
//! Growth policy lives in the table; this layer only knows how to relocate
//! every entry into a bucket array of a given capacity.

use crate::chain::{self, Arena, Entry, EntryKey, Links};
use core::borrow::Borrow;
use std::collections::TryReserveError;

pub(crate) struct BucketArray<K, V> {
    arena: Arena<K, V>,
    heads: Vec<Option<EntryKey>>,
    sizes: Vec<usize>,
    used: usize,
    /// Bumped by every structural mutation; cursors compare against it.
    generation: u64,
}

impl<K, V> BucketArray<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            arena: Arena::with_key(),
            heads: vec![None; capacity],
            sizes: vec![0; capacity],
            used: 0,
            generation: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub(crate) fn index_of(&self, hash: u64) -> usize {
        (hash % self.capacity() as u64) as usize
    }

    pub(crate) fn bucket_len(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    pub(crate) fn head(&self, index: usize) -> Option<EntryKey> {
        self.heads.get(index).copied().flatten()
    }

    pub(crate) fn entry(&self, k: EntryKey) -> Option<&Entry<K, V>> {
        self.arena.get(k)
    }

    pub(crate) fn entry_mut(&mut self, k: EntryKey) -> Option<&mut Entry<K, V>> {
        self.arena.get_mut(k)
    }

    pub(crate) fn chain(&self, index: usize) -> Links<'_, K, V> {
        Links::new(&self.arena, self.head(index))
    }

    pub(crate) fn find<Q>(&self, hash: u64, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let head = self.heads[self.index_of(hash)];
        chain::find(&self.arena, head, hash, q).map(|k| &self.arena[k])
    }

    pub(crate) fn find_mut<Q>(&mut self, hash: u64, q: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let head = self.heads[self.index_of(hash)];
        let k = chain::find(&self.arena, head, hash, q)?;
        self.arena.get_mut(k)
    }

    pub(crate) fn contains<Q>(&self, hash: u64, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        chain::exists(&self.arena, self.heads[self.index_of(hash)], hash, q)
    }

    /// Links a new entry at the head of its bucket and returns the bucket
    /// index. The caller guarantees `key` is not already present.
    pub(crate) fn insert_new(&mut self, hash: u64, key: K, value: V) -> usize {
        let index = self.index_of(hash);
        let head = &mut self.heads[index];
        if head.is_none() {
            self.used += 1;
        }
        chain::insert_front(&mut self.arena, head, key, value, hash);
        self.sizes[index] += 1;
        self.generation = self.generation.wrapping_add(1);
        debug_assert!(self.used <= self.capacity());
        index
    }

    /// Splices out and returns the entry whose key equals `q`.
    pub(crate) fn unlink<Q>(&mut self, hash: u64, q: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let index = self.index_of(hash);
        let head = &mut self.heads[index];
        if head.is_none() {
            return None;
        }
        let entry = chain::unlink(&mut self.arena, head, hash, q)?;
        self.sizes[index] -= 1;
        if head.is_none() {
            debug_assert_eq!(self.sizes[index], 0);
            self.used -= 1;
        }
        self.generation = self.generation.wrapping_add(1);
        Some(entry)
    }

    /// True when every entry of the chain at `index` carries the same hash.
    /// No capacity can spread such a chain over more than one bucket.
    pub(crate) fn chain_shares_hash(&self, index: usize) -> bool {
        let mut links = self.chain(index);
        match links.next() {
            None => true,
            Some((_, first)) => links.all(|(_, e)| e.hash == first.hash),
        }
    }

    /// Relocates every entry into `capacity` buckets; aborts on allocation
    /// failure like the standard collections.
    pub(crate) fn rehash(&mut self, capacity: usize) {
        self.relink_into(vec![None; capacity], vec![0; capacity]);
    }

    /// Like `rehash`, but reports allocation failure. The new arrays are
    /// fully allocated before the first entry moves, so on error nothing
    /// has changed.
    pub(crate) fn try_rehash(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        let mut heads = Vec::new();
        heads.try_reserve_exact(capacity)?;
        heads.resize(capacity, None);
        let mut sizes = Vec::new();
        sizes.try_reserve_exact(capacity)?;
        sizes.resize(capacity, 0);
        self.relink_into(heads, sizes);
        Ok(())
    }

    fn relink_into(&mut self, mut heads: Vec<Option<EntryKey>>, mut sizes: Vec<usize>) {
        debug_assert_eq!(heads.len(), sizes.len());
        let capacity = heads.len() as u64;
        let mut used = 0;
        for old in self.heads.iter_mut() {
            while let Some(k) = chain::pop_front(&mut self.arena, old) {
                let index = (self.arena[k].hash % capacity) as usize;
                if heads[index].is_none() {
                    used += 1;
                }
                chain::push_front(&mut self.arena, &mut heads[index], k);
                sizes[index] += 1;
            }
        }
        self.heads = heads;
        self.sizes = sizes;
        self.used = used;
        self.generation = self.generation.wrapping_add(1);
        debug_assert_eq!(self.sizes.iter().sum::<usize>(), self.arena.len());
        debug_assert_eq!(self.sizes.iter().filter(|&&n| n > 0).count(), self.used);
    }

    /// Drops every entry; the bucket count is kept.
    pub(crate) fn clear(&mut self) {
        self.heads.fill(None);
        self.sizes.fill(0);
        self.used = 0;
        self.generation = self.generation.wrapping_add(1);
        self.arena.clear();
    }

    /// Walks the whole structure and reports the first broken invariant.
    #[cfg(test)]
    pub(crate) fn audit(&self) -> Result<(), String> {
        let mut total = 0;
        let mut used = 0;
        for (index, &head) in self.heads.iter().enumerate() {
            let mut len = 0;
            for (_, e) in Links::new(&self.arena, head) {
                if self.index_of(e.hash) != index {
                    return Err(format!("entry with hash {} filed under bucket {index}", e.hash));
                }
                len += 1;
                if len > self.arena.len() {
                    return Err(format!("chain at bucket {index} loops"));
                }
            }
            if len != self.sizes[index] {
                return Err(format!(
                    "bucket {index} holds {len} entries but counts {}",
                    self.sizes[index]
                ));
            }
            if len > 0 {
                used += 1;
            }
            total += len;
        }
        if total != self.arena.len() {
            return Err(format!("{} entries stored, {total} reachable", self.arena.len()));
        }
        if used != self.used {
            return Err(format!("{used} non-empty buckets, {} counted", self.used));
        }
        Ok(())
    }
}
