//! Domain model types for multiple traveling salesman problems.
//!
//! Provides the core abstractions: cities on the plane, cyclic tours,
//! salesman assignments, and the coordinate-range partitioning used to split
//! cities among salesmen ahead of a per-salesman heuristic.

mod assignment;
mod city;
mod partition;
mod tour;

pub use assignment::{Assignment, SalesmanRoute};
pub use city::{City, Point};
pub use partition::partition_by_x_range;
pub use tour::Tour;
