//! Error types returned by the table and its configuration.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failures reported by `ChainedHashTable` operations.
///
/// Absence on `remove`/`contains` is reported through `bool`, not through
/// this type; only `get`-style lookups fail with `NotFound`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The requested key has no entry in the table.
    #[error("key not found")]
    NotFound,
    /// A bucket index was outside `0..bucket_count`.
    #[error("bucket index {index} out of range for {bucket_count} buckets")]
    IndexOutOfRange { index: usize, bucket_count: usize },
    /// A cursor was used after the table was structurally modified.
    #[error("bucket cursor invalidated by a structural mutation")]
    StaleCursor,
    /// A cursor positioned at the end of its chain was dereferenced or advanced.
    #[error("bucket cursor is past the end of its chain")]
    CursorExhausted,
    /// Doubling the bucket array would overflow `usize`.
    #[error("bucket count overflow while growing from {0} buckets")]
    CapacityOverflow(usize),
    /// The grown bucket arrays could not be allocated; the table is unchanged.
    #[error("failed to allocate {requested} buckets: {source}")]
    AllocationFailed {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Rejected `TableConfig` values.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,
    #[error("collision threshold must be at least 1")]
    ZeroCollisionThreshold,
    #[error("fill factor threshold {0} must lie in (0.0, 1.0]")]
    FillFactorOutOfRange(f64),
}
