//! Tour evaluator computing cyclic lengths with overflow detection.

use crate::distance::DistanceMatrix;
use crate::error::{MtspError, Result};
use crate::models::Tour;

/// Computes the cyclic length of `tour`: consecutive distances plus the
/// closing edge from the last city back to the first.
///
/// # Errors
///
/// - [`MtspError::InvalidInput`] if the tour is empty or holds an out-of-range index
/// - [`MtspError::NumericOverflow`] if the sum stops being finite
///
/// # Examples
///
/// ```
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::evaluation::tour_length;
/// use u_mtsp::models::City;
///
/// let cities = City::from_coordinates(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
/// let dm = DistanceMatrix::from_cities(&cities).unwrap();
/// assert!((tour_length(&dm, &[0, 1, 2, 3]).unwrap() - 4.0).abs() < 1e-10);
/// ```
pub fn tour_length(distances: &DistanceMatrix, tour: &[usize]) -> Result<f64> {
    if tour.is_empty() {
        return Err(MtspError::invalid("tour is empty"));
    }
    check_indices(distances, tour)?;

    let n = tour.len();
    let mut length = 0.0;
    for i in 0..n {
        length += distances.get(tour[i], tour[(i + 1) % n]);
        if !length.is_finite() {
            return Err(MtspError::overflow(format!("tour of {n} cities")));
        }
    }
    Ok(length)
}

fn check_indices(distances: &DistanceMatrix, cities: &[usize]) -> Result<()> {
    match cities.iter().find(|&&c| !distances.contains(c)) {
        Some(c) => Err(MtspError::invalid(format!(
            "city {c} is out of range for {} cities",
            distances.size()
        ))),
        None => Ok(()),
    }
}

/// Evaluates tours and depot-rooted routes against one distance matrix.
///
/// # Examples
///
/// ```
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::evaluation::TourEvaluator;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 2.0, 3.0],
///     vec![2.0, 0.0, 4.0],
///     vec![3.0, 4.0, 0.0],
/// ]).unwrap();
/// let evaluator = TourEvaluator::new(&dm);
///
/// let tour = evaluator.evaluate(vec![0, 1, 2]).unwrap();
/// assert_eq!(tour.length(), 9.0);
/// assert_eq!(evaluator.route_length(0, &[2]).unwrap(), 6.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TourEvaluator<'a> {
    distances: &'a DistanceMatrix,
}

impl<'a> TourEvaluator<'a> {
    /// Creates an evaluator over the given matrix.
    pub fn new(distances: &'a DistanceMatrix) -> Self {
        Self { distances }
    }

    /// Cyclic length of `tour`, see [`tour_length`].
    pub fn length(&self, tour: &[usize]) -> Result<f64> {
        tour_length(self.distances, tour)
    }

    /// Builds a [`Tour`] carrying its evaluated length.
    pub fn evaluate(&self, cities: Vec<usize>) -> Result<Tour> {
        let length = self.length(&cities)?;
        Ok(Tour::new(cities, length))
    }

    /// Length of `depot → order[0] → … → order[k-1] → depot`.
    ///
    /// An empty `order` is a salesman who never leaves the depot (length 0).
    pub fn route_length(&self, depot: usize, order: &[usize]) -> Result<f64> {
        if order.is_empty() {
            check_indices(self.distances, &[depot])?;
            return Ok(0.0);
        }
        let mut cycle = Vec::with_capacity(order.len() + 1);
        cycle.push(depot);
        cycle.extend_from_slice(order);
        tour_length(self.distances, &cycle)
    }

    /// Returns `true` if `tour` visits every city of `expected` exactly once
    /// and nothing else.
    pub fn is_permutation_of(tour: &[usize], expected: &[usize]) -> bool {
        let mut a = tour.to_vec();
        let mut b = expected.to_vec();
        a.sort_unstable();
        b.sort_unstable();
        a == b && a.windows(2).all(|w| w[0] != w[1])
    }
}
