//! Ant Colony Optimization.
//!
//! An Ant System with roulette-wheel construction, global evaporation and
//! length-proportional deposit. [`solve_partitioned`] extends it to several
//! salesmen by running an independent colony on each city group, typically
//! produced by [`partition_by_x_range`](crate::models::partition_by_x_range).
//!
//! # Reference
//!
//! Dorigo, M., Maniezzo, V. & Colorni, A. (1996). "Ant System: Optimization
//! by a Colony of Cooperating Agents", *IEEE Trans. SMC-B* 26(1), 29-41.

mod config;
mod multi;
mod optimizer;
mod pheromone;

pub use config::AcoConfig;
pub use multi::{solve_partitioned, PartitionedOutcome};
pub use optimizer::{AcoOutcome, AntColonyOptimizer};
pub use pheromone::PheromoneMatrix;
