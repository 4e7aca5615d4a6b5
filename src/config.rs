//! Growth and sizing parameters for `ChainedHashTable`.

use crate::error::ConfigError;

/// Bucket count of a table built without an explicit capacity.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;
/// Longest chain tolerated before an insertion forces a rehash.
pub const DEFAULT_COLLISION_THRESHOLD: usize = 3;
/// Share of non-empty buckets at which an insertion forces a rehash.
pub const DEFAULT_FILL_FACTOR_THRESHOLD: f64 = 0.8;

/// Per-table tuning knobs.
///
/// Built with chained setters and checked by [`TableConfig::validate`]
/// when handed to `ChainedHashTable::with_config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub collision_threshold: usize,
    pub fill_factor_threshold: f64,
}

impl TableConfig {
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            collision_threshold: DEFAULT_COLLISION_THRESHOLD,
            fill_factor_threshold: DEFAULT_FILL_FACTOR_THRESHOLD,
        }
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn collision_threshold(mut self, threshold: usize) -> Self {
        self.collision_threshold = threshold;
        self
    }

    pub fn fill_factor_threshold(mut self, threshold: f64) -> Self {
        self.fill_factor_threshold = threshold;
        self
    }

    /// Checks that the table can be built and grown with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.collision_threshold == 0 {
            return Err(ConfigError::ZeroCollisionThreshold);
        }
        // NaN fails both comparisons.
        if !(self.fill_factor_threshold > 0.0 && self.fill_factor_threshold <= 1.0) {
            return Err(ConfigError::FillFactorOutOfRange(
                self.fill_factor_threshold,
            ));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = TableConfig::default();
        assert_eq!(c.initial_capacity, 10);
        assert_eq!(c.collision_threshold, 3);
        assert_eq!(c.fill_factor_threshold, 0.8);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn setters_chain() {
        let c = TableConfig::new()
            .initial_capacity(4)
            .collision_threshold(8)
            .fill_factor_threshold(0.5);
        assert_eq!(c.initial_capacity, 4);
        assert_eq!(c.collision_threshold, 8);
        assert_eq!(c.fill_factor_threshold, 0.5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        assert_eq!(
            TableConfig::new().initial_capacity(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
        assert_eq!(
            TableConfig::new().collision_threshold(0).validate(),
            Err(ConfigError::ZeroCollisionThreshold)
        );
        assert_eq!(
            TableConfig::new().fill_factor_threshold(0.0).validate(),
            Err(ConfigError::FillFactorOutOfRange(0.0))
        );
        assert_eq!(
            TableConfig::new().fill_factor_threshold(1.5).validate(),
            Err(ConfigError::FillFactorOutOfRange(1.5))
        );
        assert!(TableConfig::new()
            .fill_factor_threshold(f64::NAN)
            .validate()
            .is_err());
        assert!(TableConfig::new().fill_factor_threshold(1.0).validate().is_ok());
    }
}
