//! Exact MTSP solving for small instances.
//!
//! - [`ExactSolver`] — splits cities among salesmen and returns the optimal
//!   depot-rooted route for each one
//! - [`optimal_route`] — Held-Karp for one fixed subset
//! - [`PathTable`] — forward Held-Karp shared across all subsets
//!
//! By default cities are split with the fixed `city mod m` rule
//! ([`PartitionStrategy::Modulo`]); [`PartitionStrategy::Exhaustive`]
//! searches the partition as well and returns the true optimum.
//!
//! # Complexity
//!
//! Modulo: O(2^k · k²) per salesman with k cities. Exhaustive:
//! O(2^(n-1) · n²) to price every subset plus O(3^(n-1) · m) for the
//! partition search.

mod config;
mod held_karp;
mod solver;

pub use config::{ExactConfig, PartitionStrategy, MAX_EXHAUSTIVE_CITIES};
pub use held_karp::{optimal_route, PathTable, SubsetRoute, MAX_CITIES};
pub use solver::{ExactSolver, DEPOT};
