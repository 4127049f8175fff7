//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MtspError, Result};

/// Movement parameters of a [`GreedyDispatcher`](super::GreedyDispatcher).
///
/// # Examples
///
/// ```
/// use u_mtsp::dispatch::DispatchConfig;
///
/// let config = DispatchConfig::default().with_step_fraction(0.5);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.proximity, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Share of the remaining distance covered per step, in (0, 1].
    pub step_fraction: f64,
    /// A target is reached once an agent ends a step closer than this.
    pub proximity: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            step_fraction: 0.2,
            proximity: 0.2,
        }
    }
}

impl DispatchConfig {
    /// Sets the per-step movement fraction.
    pub fn with_step_fraction(mut self, fraction: f64) -> Self {
        self.step_fraction = fraction;
        self
    }

    /// Sets the proximity threshold.
    pub fn with_proximity(mut self, proximity: f64) -> Self {
        self.proximity = proximity;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        let f = self.step_fraction;
        if !f.is_finite() || f <= 0.0 || f > 1.0 {
            return Err(MtspError::invalid(format!(
                "step_fraction must lie in (0, 1], got {f}"
            )));
        }
        if !self.proximity.is_finite() || self.proximity <= 0.0 {
            return Err(MtspError::invalid(format!(
                "proximity must be finite and positive, got {}",
                self.proximity
            )));
        }
        Ok(())
    }
}
