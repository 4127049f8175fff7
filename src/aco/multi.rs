//! Multi-salesman ant colony: one independent colony per city group.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{MtspError, Result};

use super::config::AcoConfig;
use super::optimizer::{AcoOutcome, AntColonyOptimizer};

/// Per-salesman colony results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionedOutcome {
    /// One outcome per partition, in input order, with global city indices.
    pub routes: Vec<AcoOutcome>,
    /// Sum of the route lengths.
    pub total_length: f64,
}

/// Runs a fresh [`AntColonyOptimizer`] on each partition's sub-matrix.
///
/// Every partition is solved as its own closed tour; tours are mapped back
/// to the global indices of `distances`. No pheromone is shared between
/// partitions.
///
/// # Errors
///
/// - [`MtspError::InvalidInput`] if `partitions` is empty, a partition is
///   empty, or a city is out of range or appears twice
/// - [`MtspError::NumericOverflow`] if the summed length stops being finite
/// - any error of [`AntColonyOptimizer::run`]
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use u_mtsp::aco::{solve_partitioned, AcoConfig};
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::models::{partition_by_x_range, City};
///
/// let cities = City::from_coordinates(&[
///     (0.0, 0.0), (0.0, 1.0), (1.0, 0.5),
///     (9.0, 0.0), (9.0, 1.0), (10.0, 0.5),
/// ]);
/// let dm = DistanceMatrix::from_cities(&cities).unwrap();
/// let groups = partition_by_x_range(&cities, 2).unwrap();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let result = solve_partitioned(&dm, &groups, &AcoConfig::default(), &mut rng).unwrap();
/// assert_eq!(result.routes.len(), 2);
/// ```
pub fn solve_partitioned<R: Rng>(
    distances: &DistanceMatrix,
    partitions: &[Vec<usize>],
    config: &AcoConfig,
    rng: &mut R,
) -> Result<PartitionedOutcome> {
    if partitions.is_empty() {
        return Err(MtspError::invalid("no partitions given"));
    }
    let mut owner: Vec<Option<usize>> = vec![None; distances.size()];
    for (s, part) in partitions.iter().enumerate() {
        if part.is_empty() {
            return Err(MtspError::invalid(format!("partition {s} is empty")));
        }
        for &city in part {
            let slot = owner.get_mut(city).ok_or_else(|| {
                MtspError::invalid(format!(
                    "city {city} is out of range for {} cities",
                    distances.size()
                ))
            })?;
            if let Some(other) = slot.replace(s) {
                return Err(MtspError::invalid(format!(
                    "city {city} appears in partitions {other} and {s}"
                )));
            }
        }
    }

    log::debug!("aco: solving {} partitions independently", partitions.len());
    let mut routes = Vec::with_capacity(partitions.len());
    for part in partitions {
        let sub = distances.submatrix(part)?;
        let mut outcome = AntColonyOptimizer::new(&sub, config.clone())?.run(rng)?;
        outcome.tour = outcome.tour.remap(part);
        routes.push(outcome);
    }

    let total_length: f64 = routes.iter().map(AcoOutcome::length).sum();
    if !total_length.is_finite() {
        return Err(MtspError::overflow(format!(
            "total of {} routes",
            routes.len()
        )));
    }
    Ok(PartitionedOutcome {
        routes,
        total_length,
    })
}
