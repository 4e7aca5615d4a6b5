//! Entry nodes and singly-linked chain operations over the entry arena.
//!
//! Entries live in a `SlotMap`; a chain is the sequence reached from a
//! bucket head by following `next` keys. Every function here takes the
//! arena plus the head slot it should operate on, so the same code serves
//! both the live bucket array and the fresh one built during a rehash.

use core::borrow::Borrow;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena slot of one entry; also the link stored in `Entry::next`.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Cached `hash_one(key)`; bucket selection never re-hashes a stored key.
    pub(crate) hash: u64,
    pub(crate) next: Option<EntryKey>,
}

pub(crate) type Arena<K, V> = SlotMap<EntryKey, Entry<K, V>>;

/// Head-to-tail walk over one chain.
pub(crate) struct Links<'a, K, V> {
    arena: &'a Arena<K, V>,
    at: Option<EntryKey>,
}

impl<'a, K, V> Links<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, head: Option<EntryKey>) -> Self {
        Self { arena, at: head }
    }
}

impl<'a, K, V> Iterator for Links<'a, K, V> {
    type Item = (EntryKey, &'a Entry<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.at?;
        let e = &self.arena[k];
        self.at = e.next;
        Some((k, e))
    }
}

/// First entry of the chain whose key equals `q`.
pub(crate) fn find<K, V, Q>(
    arena: &Arena<K, V>,
    head: Option<EntryKey>,
    hash: u64,
    q: &Q,
) -> Option<EntryKey>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    Links::new(arena, head)
        .find(|(_, e)| e.hash == hash && e.key.borrow() == q)
        .map(|(k, _)| k)
}

pub(crate) fn exists<K, V, Q>(arena: &Arena<K, V>, head: Option<EntryKey>, hash: u64, q: &Q) -> bool
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    find(arena, head, hash, q).is_some()
}

/// Stores a new entry and makes it the chain head.
pub(crate) fn insert_front<K, V>(
    arena: &mut Arena<K, V>,
    head: &mut Option<EntryKey>,
    key: K,
    value: V,
    hash: u64,
) -> EntryKey {
    let k = arena.insert(Entry {
        key,
        value,
        hash,
        next: *head,
    });
    *head = Some(k);
    k
}

/// Detaches the chain head without releasing it from the arena.
pub(crate) fn pop_front<K, V>(
    arena: &mut Arena<K, V>,
    head: &mut Option<EntryKey>,
) -> Option<EntryKey> {
    let k = (*head)?;
    *head = arena[k].next.take();
    Some(k)
}

/// Makes an already stored, detached entry the chain head.
pub(crate) fn push_front<K, V>(arena: &mut Arena<K, V>, head: &mut Option<EntryKey>, k: EntryKey) {
    debug_assert!(arena[k].next.is_none(), "entry still linked elsewhere");
    arena[k].next = *head;
    *head = Some(k);
}

/// Splices the entry whose key equals `q` out of the chain and releases it.
///
/// Walks `(prev, current)` pairs: a match at the head rewires `head`, an
/// interior match links `prev` directly to the successor.
pub(crate) fn unlink<K, V, Q>(
    arena: &mut Arena<K, V>,
    head: &mut Option<EntryKey>,
    hash: u64,
    q: &Q,
) -> Option<Entry<K, V>>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    let mut prev: Option<EntryKey> = None;
    let mut cur = *head;
    while let Some(k) = cur {
        let e = &arena[k];
        if e.hash == hash && e.key.borrow() == q {
            let next = e.next;
            match prev {
                None => *head = next,
                Some(p) => arena[p].next = next,
            }
            return arena.remove(k);
        }
        prev = cur;
        cur = e.next;
    }
    None
}
