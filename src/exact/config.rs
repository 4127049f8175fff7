//! Exact solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MtspError, Result};

/// Largest `max_exhaustive_cities` accepted: the exhaustive tables hold
/// `salesmen × 2^(n-1)` entries.
pub const MAX_EXHAUSTIVE_CITIES: usize = 20;

/// How the exact solver distributes cities among salesmen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// City `c` (c ≥ 1) belongs to salesman `c mod m`; only the tours are optimized.
    #[default]
    Modulo,
    /// Searches every assignment of cities to salesmen for the minimal total.
    Exhaustive,
}

/// Configuration for [`ExactSolver`](super::ExactSolver).
///
/// # Examples
///
/// ```
/// use u_mtsp::exact::{ExactConfig, PartitionStrategy};
///
/// let config = ExactConfig::default().with_strategy(PartitionStrategy::Exhaustive);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Partitioning rule.
    pub strategy: PartitionStrategy,
    /// Largest city count (depot included) accepted by the exhaustive strategy.
    pub max_exhaustive_cities: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            strategy: PartitionStrategy::Modulo,
            max_exhaustive_cities: 14,
        }
    }
}

impl ExactConfig {
    /// Sets the partitioning rule.
    pub fn with_strategy(mut self, strategy: PartitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the exhaustive strategy's city ceiling.
    pub fn with_max_exhaustive_cities(mut self, max: usize) -> Self {
        self.max_exhaustive_cities = max;
        self
    }

    /// Checks that the configuration can be used.
    pub fn validate(&self) -> Result<()> {
        if self.max_exhaustive_cities == 0 || self.max_exhaustive_cities > MAX_EXHAUSTIVE_CITIES {
            return Err(MtspError::invalid(format!(
                "max_exhaustive_cities must be in 1..={MAX_EXHAUSTIVE_CITIES}, got {}",
                self.max_exhaustive_cities
            )));
        }
        Ok(())
    }
}
