//! Ant colony configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MtspError, Result};

/// Parameters of an [`AntColonyOptimizer`](super::AntColonyOptimizer) run.
///
/// # Examples
///
/// ```
/// use u_mtsp::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_num_ants(20)
///     .with_evaporation_rate(0.3)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.num_iterations, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    /// Ants per iteration.
    pub num_ants: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Pheromone evaporation rate (rho), in (0, 1).
    pub evaporation_rate: f64,
    /// Pheromone importance (alpha).
    pub alpha: f64,
    /// Inverse-distance importance (beta).
    pub beta: f64,
    /// Seed used by [`run_seeded`](super::AntColonyOptimizer::run_seeded).
    pub seed: u64,
    /// Return the best tour over all iterations instead of the best tour of
    /// the final iteration.
    pub retain_global_best: bool,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_ants: 10,
            num_iterations: 50,
            evaporation_rate: 0.5,
            alpha: 1.0,
            beta: 1.0,
            seed: 42,
            retain_global_best: false,
        }
    }
}

impl AcoConfig {
    /// Sets the number of ants per iteration.
    pub fn with_num_ants(mut self, num_ants: usize) -> Self {
        self.num_ants = num_ants;
        self
    }

    /// Sets the number of iterations.
    pub fn with_num_iterations(mut self, num_iterations: usize) -> Self {
        self.num_iterations = num_iterations;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    /// Sets the pheromone and heuristic exponents.
    pub fn with_weights(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keeps the best tour across all iterations.
    pub fn with_global_best(mut self, retain: bool) -> Self {
        self.retain_global_best = retain;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.num_ants == 0 {
            return Err(MtspError::invalid("num_ants must be at least 1"));
        }
        if self.num_iterations == 0 {
            return Err(MtspError::invalid("num_iterations must be at least 1"));
        }
        let rho = self.evaporation_rate;
        if !rho.is_finite() || rho <= 0.0 || rho >= 1.0 {
            return Err(MtspError::invalid(format!(
                "evaporation_rate must lie in (0, 1), got {rho}"
            )));
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MtspError::invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
