//! chain-hashtable: a single-threaded separate-chaining hash table whose
//! bucket layout is part of its public contract.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map with amortized O(1) `get`/`set`/`remove`/`contains` that
//!   also exposes its internals (bucket count, per-bucket chain length,
//!   non-empty bucket count) and lets callers walk one bucket's chain.
//! - Layers:
//!   - `chain`: entry nodes stored in a `SlotMap` arena; a chain is the
//!     walk from a bucket head through `next` keys. Find, insert-at-head
//!     and `(prev, current)` unlinking live here.
//!   - `BucketArray<K, V>`: bucket heads, the parallel per-bucket counters,
//!     the used-bucket count and a structural generation counter. Knows how
//!     to relocate every entry into a larger head array.
//!   - `ChainedHashTable<K, V, S>`: public API, hashing through the
//!     injected `BuildHasher`, and the growth policy.
//!
//! Growth policy
//! - Evaluated only when `set` adds a new key, never on overwrites.
//! - Grows to twice the bucket count when `used / bucket_count` reaches the
//!   fill factor threshold (default 0.8), or when the chain that received
//!   the key is longer than the collision threshold (default 3) and holds
//!   at least two distinct hash values.
//! - A rehash allocates the new arrays first, then moves every entry to
//!   the head of its new bucket. Entries stay in their arena slots; only
//!   links change. The bucket count never shrinks.
//!
//! Hashing
//! - Each entry caches its `u64` hash; relocation and chain comparisons use
//!   the cached value, so `K: Hash` only runs on the probe key.
//!
//! Error contract
//! - `get`/`get_mut` report a missing key as `TableError::NotFound`;
//!   `remove`/`contains` answer with `bool`.
//! - Bucket-indexed calls report `TableError::IndexOutOfRange`.
//!
//! Iteration
//! - `bucket_iter` and `iter` borrow the table.
//! - `begin`/`end` hand out detached `BucketCursor`s; any structural
//!   mutation bumps the generation and turns outstanding cursors stale.
//!
//! Constraints
//! - Single-threaded: the table is `Send` but `!Sync`; share it across
//!   threads only behind external locking.
//! - Reentrancy: debug builds panic when user `Hash`/`Eq` code re-enters
//!   the table during an operation. `Drop` of keys and values handed back
//!   by `remove_entry` runs after the table is consistent again.

mod bucket_array;
mod chain;
pub mod chained_hash_table;
mod chained_hash_table_proptest;
pub mod config;
mod cursor;
pub mod error;
mod reentrancy;

// Public surface
pub use chained_hash_table::ChainedHashTable;
pub use config::TableConfig;
pub use cursor::{BucketCursor, BucketIter, Iter};
pub use error::{ConfigError, TableError};
