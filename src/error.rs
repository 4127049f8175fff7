//! Error type shared by every solver in the crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MtspError>;

/// Errors raised by the MTSP solvers.
///
/// Every error is terminal for the solve call that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MtspError {
    /// Malformed matrix, out-of-range index, zero counts or bad configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// More salesmen than cities.
    #[error("cannot split {cities} cities among {salesmen} salesmen")]
    InfeasiblePartition {
        /// Requested salesman count.
        salesmen: usize,
        /// Number of cities available.
        cities: usize,
    },

    /// Every candidate weight of an ant's selection step was zero or non-finite.
    #[error(
        "degenerate selection weights at iteration {iteration}, ant {ant}, step {step} (leaving city {city})"
    )]
    DegenerateProbability {
        /// Zero-based iteration index.
        iteration: usize,
        /// Zero-based ant index within the iteration.
        ant: usize,
        /// Zero-based construction step within the tour.
        step: usize,
        /// City the ant was leaving.
        city: usize,
    },

    /// A length accumulation stopped being finite.
    #[error("numeric overflow while computing {context}")]
    NumericOverflow {
        /// What was being computed (tour, subset, salesman).
        context: String,
    },
}

impl MtspError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        Self::NumericOverflow {
            context: context.into(),
        }
    }
}
