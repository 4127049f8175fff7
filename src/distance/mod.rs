//! Distance matrices.
//!
//! Provides a dense, validated distance matrix shared read-only by every solver.

mod matrix;

pub use matrix::{DistanceMatrix, SYMMETRY_TOLERANCE};
