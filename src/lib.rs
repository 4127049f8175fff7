//! # u-mtsp
//!
//! Multiple traveling salesman optimization: split a set of cities among
//! several salesmen and find short tours for each of them.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Point, City, Tour, Assignment) and x-range partitioning
//! - [`distance`] — Validated distance matrix
//! - [`evaluation`] — Cyclic tour and depot route lengths
//! - [`exact`] — Held-Karp solver with modulo or exhaustive partitioning
//! - [`aco`] — Ant colony optimization, single and per-partition
//! - [`dispatch`] — Greedy step-wise agent dispatcher
//!
//! ## Example
//!
//! ```
//! use u_mtsp::distance::DistanceMatrix;
//! use u_mtsp::exact::ExactSolver;
//! use u_mtsp::models::City;
//!
//! let cities = City::from_coordinates(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (1.0, 3.0)]);
//! let dm = DistanceMatrix::from_cities(&cities).unwrap();
//! let assignment = ExactSolver::new(&dm).solve(2).unwrap();
//! assert!(assignment.is_partition_of(5));
//! ```
//!
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod aco;
pub mod dispatch;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod exact;
pub mod models;

pub use error::{MtspError, Result};
