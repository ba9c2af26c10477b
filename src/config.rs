//! Matcher configuration.

use thiserror::Error;

/// Sizing for the order pool and the result channel.
///
/// `pool_capacity` must cover the largest number of orders that can be
/// resting or in flight at once. Nothing enforces that beyond returning
/// `PoolExhausted` when it is exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Maximum number of live order records.
    pub pool_capacity: usize,
    /// Maximum number of undelivered results.
    pub result_capacity: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 100_000,
            result_capacity: 65_536,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pool capacity must be at least 1")]
    ZeroPoolCapacity,

    /// A trade publishes two results back to back
    #[error("result capacity must be at least 2, got {0}")]
    ResultCapacityTooSmall(usize),
}

impl MatcherConfig {
    pub fn with_pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }

    pub fn with_result_capacity(mut self, result_capacity: usize) -> Self {
        self.result_capacity = result_capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == 0 {
            return Err(ConfigError::ZeroPoolCapacity);
        }
        if self.result_capacity < 2 {
            return Err(ConfigError::ResultCapacityTooSmall(self.result_capacity));
        }
        Ok(())
    }
}
