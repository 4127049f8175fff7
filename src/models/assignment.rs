//! Salesman assignment types.

use serde::{Deserialize, Serialize};

use crate::error::{MtspError, Result};

/// The cities one salesman is responsible for, with the route found for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesmanRoute {
    /// Salesman index.
    pub salesman: usize,
    /// Cities owned by this salesman, ascending. Salesman 0 also owns the depot.
    pub cities: Vec<usize>,
    /// Visiting order of the non-depot cities; the route leaves from and
    /// returns to the depot.
    pub order: Vec<usize>,
    /// Length of `depot → order… → depot`.
    pub length: f64,
}

/// A partition of all cities among the salesmen, plus the total route length.
///
/// # Examples
///
/// ```
/// use u_mtsp::models::{Assignment, SalesmanRoute};
///
/// let assignment = Assignment::new(vec![
///     SalesmanRoute { salesman: 0, cities: vec![0, 2], order: vec![2], length: 2.0 },
///     SalesmanRoute { salesman: 1, cities: vec![1], order: vec![1], length: 3.0 },
/// ]).unwrap();
/// assert_eq!(assignment.num_salesmen(), 2);
/// assert!((assignment.total_length() - 5.0).abs() < 1e-12);
/// assert!(assignment.is_partition_of(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    routes: Vec<SalesmanRoute>,
    total_length: f64,
}

impl Assignment {
    /// Creates an assignment; the total is the sum of route lengths.
    ///
    /// # Errors
    ///
    /// [`MtspError::NumericOverflow`] if the total stops being finite.
    pub fn new(routes: Vec<SalesmanRoute>) -> Result<Self> {
        let total_length: f64 = routes.iter().map(|r| r.length).sum();
        if !total_length.is_finite() {
            return Err(MtspError::overflow(format!(
                "total of {} routes",
                routes.len()
            )));
        }
        Ok(Self {
            routes,
            total_length,
        })
    }

    /// Per-salesman routes, ordered by salesman index.
    pub fn routes(&self) -> &[SalesmanRoute] {
        &self.routes
    }

    /// City subsets, one per salesman.
    pub fn subsets(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|r| r.cities.clone()).collect()
    }

    /// Number of salesmen.
    pub fn num_salesmen(&self) -> usize {
        self.routes.len()
    }

    /// Sum of all salesmen's route lengths.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Returns `true` if every city `0..n` appears in exactly one non-empty subset.
    pub fn is_partition_of(&self, n: usize) -> bool {
        let mut seen = vec![false; n];
        for route in &self.routes {
            if route.cities.is_empty() {
                return false;
            }
            for &c in &route.cities {
                if c >= n || seen[c] {
                    return false;
                }
                seen[c] = true;
            }
        }
        seen.iter().all(|&s| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(salesman: usize, cities: Vec<usize>, length: f64) -> SalesmanRoute {
        let order = cities.iter().copied().filter(|&c| c != 0).collect();
        SalesmanRoute {
            salesman,
            cities,
            order,
            length,
        }
    }

    #[test]
    fn test_total_length() {
        let a = Assignment::new(vec![route(0, vec![0, 1], 2.0), route(1, vec![2, 3], 4.5)])
            .expect("valid");
        assert!((a.total_length() - 6.5).abs() < 1e-12);
        assert_eq!(a.subsets(), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_total_overflow_rejected() {
        let big = f64::MAX / 1.5;
        let err = Assignment::new(vec![route(0, vec![0, 1], big), route(1, vec![2], big)])
            .unwrap_err();
        assert_eq!(err, MtspError::overflow("total of 2 routes"));
    }

    #[test]
    fn test_partition_detects_duplicates() {
        let a = Assignment::new(vec![route(0, vec![0, 1], 0.0), route(1, vec![1, 2], 0.0)])
            .expect("valid");
        assert!(!a.is_partition_of(3));
    }

    #[test]
    fn test_partition_detects_missing_city() {
        let a = Assignment::new(vec![route(0, vec![0], 0.0), route(1, vec![2], 0.0)])
            .expect("valid");
        assert!(!a.is_partition_of(3));
    }

    #[test]
    fn test_partition_rejects_empty_subset() {
        let a = Assignment::new(vec![route(0, vec![0, 1], 0.0), route(1, vec![], 0.0)])
            .expect("valid");
        assert!(!a.is_partition_of(2));
    }

    #[test]
    fn test_partition_out_of_range() {
        let a = Assignment::new(vec![route(0, vec![0, 5], 0.0)]).expect("valid");
        assert!(!a.is_partition_of(2));
    }
}
