//! Coordinate-range partitioning of cities among salesmen.
//!
//! Used ahead of the multi-salesman ant colony run: each salesman receives a
//! contiguous band of x-coordinates, so the bands are disjoint and none is
//! empty.

use crate::error::{MtspError, Result};

use super::City;

/// Splits cities into `salesmen` disjoint x-coordinate ranges.
///
/// Cities are ordered by x (ties by y, then id) and cut into contiguous runs
/// whose sizes differ by at most one. Each returned group holds city ids in
/// ascending x order.
///
/// # Errors
///
/// - [`MtspError::InvalidInput`] if `salesmen == 0` or a coordinate is not finite
/// - [`MtspError::InfeasiblePartition`] if `salesmen > cities.len()`
///
/// # Examples
///
/// ```
/// use u_mtsp::models::{City, partition_by_x_range};
///
/// let cities = City::from_coordinates(&[(5.0, 0.0), (0.0, 0.0), (9.0, 1.0), (1.0, 2.0)]);
/// let groups = partition_by_x_range(&cities, 2).unwrap();
/// assert_eq!(groups, vec![vec![1, 3], vec![0, 2]]);
/// ```
pub fn partition_by_x_range(cities: &[City], salesmen: usize) -> Result<Vec<Vec<usize>>> {
    if salesmen == 0 {
        return Err(MtspError::invalid("salesman count must be positive"));
    }
    if salesmen > cities.len() {
        return Err(MtspError::InfeasiblePartition {
            salesmen,
            cities: cities.len(),
        });
    }
    if let Some(c) = cities.iter().find(|c| !c.position().is_finite()) {
        return Err(MtspError::invalid(format!(
            "city {} has a non-finite coordinate",
            c.id()
        )));
    }

    let mut sorted: Vec<&City> = cities.iter().collect();
    sorted.sort_by(|a, b| {
        a.x()
            .total_cmp(&b.x())
            .then(a.y().total_cmp(&b.y()))
            .then(a.id().cmp(&b.id()))
    });

    let base = sorted.len() / salesmen;
    let extra = sorted.len() % salesmen;
    let mut groups = Vec::with_capacity(salesmen);
    let mut start = 0;
    for s in 0..salesmen {
        let size = base + usize::from(s < extra);
        groups.push(sorted[start..start + size].iter().map(|c| c.id()).collect());
        start += size;
    }

    log::debug!(
        "partitioned {} cities into {} x-ranges",
        cities.len(),
        salesmen
    );
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uneven_split_sizes() {
        let cities = City::from_coordinates(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
        ]);
        let groups = partition_by_x_range(&cities, 3).expect("valid");
        assert_eq!(groups, vec![vec![0, 1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_ranges_are_disjoint() {
        let cities = City::from_coordinates(&[(3.0, 1.0), (0.5, 4.0), (2.0, 2.0), (7.0, 0.0)]);
        let groups = partition_by_x_range(&cities, 2).expect("valid");
        let max_first = groups[0]
            .iter()
            .map(|&c| cities[c].x())
            .fold(f64::NEG_INFINITY, f64::max);
        let min_second = groups[1]
            .iter()
            .map(|&c| cities[c].x())
            .fold(f64::INFINITY, f64::min);
        assert!(max_first <= min_second);
    }

    #[test]
    fn test_ties_broken_by_y() {
        let cities = City::from_coordinates(&[(1.0, 5.0), (1.0, 0.0)]);
        let groups = partition_by_x_range(&cities, 2).expect("valid");
        assert_eq!(groups, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_too_many_salesmen() {
        let cities = City::from_coordinates(&[(0.0, 0.0)]);
        assert_eq!(
            partition_by_x_range(&cities, 2),
            Err(MtspError::InfeasiblePartition {
                salesmen: 2,
                cities: 1
            })
        );
    }

    #[test]
    fn test_zero_salesmen() {
        let cities = City::from_coordinates(&[(0.0, 0.0)]);
        assert!(matches!(
            partition_by_x_range(&cities, 0),
            Err(MtspError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let cities = City::from_coordinates(&[(0.0, 0.0), (f64::NAN, 1.0)]);
        assert!(matches!(
            partition_by_x_range(&cities, 1),
            Err(MtspError::InvalidInput(_))
        ));
    }
}
