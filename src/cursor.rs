//! Iteration over a table: per-bucket iterators, whole-table iterators and
//! detached bucket cursors.

use crate::bucket_array::BucketArray;
use crate::chain::{Entry, EntryKey, Links};
use crate::chained_hash_table::ChainedHashTable;
use crate::error::TableError;
use core::iter::FusedIterator;

/// Iterator over the chain of a single bucket, head to tail.
///
/// Entries come out newest first. Borrowing the table rules out structural
/// mutation for the iterator's lifetime.
pub struct BucketIter<'a, K, V> {
    links: Links<'a, K, V>,
}

impl<'a, K, V> BucketIter<'a, K, V> {
    pub(crate) fn new(buckets: &'a BucketArray<K, V>, index: usize) -> Self {
        Self {
            links: buckets.chain(index),
        }
    }
}

impl<'a, K, V> Iterator for BucketIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.links.next().map(|(_, e)| (&e.key, &e.value))
    }
}

impl<K, V> FusedIterator for BucketIter<'_, K, V> {}

/// Iterator over every entry: bucket 0 first, each chain head to tail.
pub struct Iter<'a, K, V> {
    buckets: &'a BucketArray<K, V>,
    next_bucket: usize,
    chain: BucketIter<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(buckets: &'a BucketArray<K, V>) -> Self {
        Self {
            buckets,
            next_bucket: 1,
            chain: BucketIter::new(buckets, 0),
            remaining: buckets.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.next() {
                self.remaining -= 1;
                return Some(item);
            }
            if self.remaining == 0 || self.next_bucket >= self.buckets.capacity() {
                return None;
            }
            self.chain = BucketIter::new(self.buckets, self.next_bucket);
            self.next_bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Detached position inside one bucket's chain.
///
/// Obtained from `ChainedHashTable::begin` and `ChainedHashTable::end`; a
/// walk compares against the `end` cursor of the same bucket. Cursors do
/// not borrow the table, so every access takes the table explicitly and a
/// cursor used after a structural mutation (new key, removal, rehash,
/// clear) fails with `TableError::StaleCursor`. Overwriting the value of an
/// existing key is not structural. A cursor must only be used with the
/// table that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BucketCursor {
    bucket: usize,
    at: Option<EntryKey>,
    generation: u64,
}

impl BucketCursor {
    pub(crate) fn begin<K, V>(buckets: &BucketArray<K, V>, bucket: usize) -> Self {
        Self {
            bucket,
            at: buckets.head(bucket),
            generation: buckets.generation(),
        }
    }

    pub(crate) fn end<K, V>(buckets: &BucketArray<K, V>, bucket: usize) -> Self {
        Self {
            bucket,
            at: None,
            generation: buckets.generation(),
        }
    }

    /// Bucket whose chain this cursor walks.
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    /// True once the cursor has moved past the chain tail.
    pub fn is_end(&self) -> bool {
        self.at.is_none()
    }

    fn position<K, V>(&self, buckets: &BucketArray<K, V>) -> Result<EntryKey, TableError> {
        if self.generation != buckets.generation() {
            return Err(TableError::StaleCursor);
        }
        self.at.ok_or(TableError::CursorExhausted)
    }

    fn resolve<'a, K, V>(&self, buckets: &'a BucketArray<K, V>) -> Result<&'a Entry<K, V>, TableError> {
        let k = self.position(buckets)?;
        buckets.entry(k).ok_or(TableError::StaleCursor)
    }

    pub fn key<'a, K, V, S>(&self, table: &'a ChainedHashTable<K, V, S>) -> Result<&'a K, TableError> {
        self.resolve(table.buckets()).map(|e| &e.key)
    }

    pub fn value<'a, K, V, S>(&self, table: &'a ChainedHashTable<K, V, S>) -> Result<&'a V, TableError> {
        self.resolve(table.buckets()).map(|e| &e.value)
    }

    pub fn entry<'a, K, V, S>(
        &self,
        table: &'a ChainedHashTable<K, V, S>,
    ) -> Result<(&'a K, &'a V), TableError> {
        self.resolve(table.buckets()).map(|e| (&e.key, &e.value))
    }

    pub fn value_mut<'a, K, V, S>(
        &self,
        table: &'a mut ChainedHashTable<K, V, S>,
    ) -> Result<&'a mut V, TableError> {
        let k = self.position(table.buckets())?;
        table
            .buckets_mut()
            .entry_mut(k)
            .map(|e| &mut e.value)
            .ok_or(TableError::StaleCursor)
    }

    /// Moves to the next link of the chain.
    pub fn advance<K, V, S>(&mut self, table: &ChainedHashTable<K, V, S>) -> Result<(), TableError> {
        let next = self.resolve(table.buckets())?.next;
        self.at = next;
        Ok(())
    }
}
