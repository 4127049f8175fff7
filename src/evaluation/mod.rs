//! Tour length evaluation.
//!
//! Shared by the exact solver and the ant colony optimizer.

mod evaluator;

pub use evaluator::{tour_length, TourEvaluator};
