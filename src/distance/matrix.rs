//! Dense distance matrix.

use crate::error::{MtspError, Result};
use crate::models::City;

/// Tolerance used when checking `d[i][j] == d[j][i]`.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A dense n×n distance matrix stored in row-major order.
///
/// Every constructor validates the matrix: entries are finite and
/// non-negative, the diagonal is zero and the matrix is symmetric. Solvers
/// can therefore index it without further checks once city indices are
/// known to be in range.
///
/// # Examples
///
/// ```
/// use u_mtsp::models::City;
/// use u_mtsp::distance::DistanceMatrix;
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 3.0, 4.0),
///     City::new(2, 6.0, 8.0),
/// ];
/// let dm = DistanceMatrix::from_cities(&cities).unwrap();
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from city coordinates.
    ///
    /// City `i` of the slice becomes row `i`; the cities' own ids are not used.
    pub fn from_cities(cities: &[City]) -> Result<Self> {
        if let Some(c) = cities.iter().find(|c| !c.position().is_finite()) {
            return Err(MtspError::invalid(format!(
                "city {} has a non-finite coordinate",
                c.id()
            )));
        }
        let n = cities.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cities[i].distance_to(&cities[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm.validate()?;
        Ok(dm)
    }

    /// Creates a distance matrix from an explicit n×n grid in row-major order.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(MtspError::invalid(format!(
                "expected {} entries for a {size}x{size} matrix, got {}",
                size * size,
                data.len()
            )));
        }
        let dm = Self { data, size };
        dm.validate()?;
        Ok(dm)
    }

    /// Creates a distance matrix from nested rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(MtspError::invalid(format!(
                "row {i} has {} entries, expected {size}",
                row.len()
            )));
        }
        Self::from_data(size, rows.concat())
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Checks the matrix invariants.
    pub fn validate(&self) -> Result<()> {
        for i in 0..self.size {
            for j in 0..self.size {
                let d = self.get(i, j);
                if !d.is_finite() || d < 0.0 {
                    return Err(MtspError::invalid(format!(
                        "distance [{i}][{j}] = {d} is not a finite non-negative value"
                    )));
                }
            }
            if self.get(i, i) != 0.0 {
                return Err(MtspError::invalid(format!(
                    "diagonal entry [{i}][{i}] must be zero"
                )));
            }
        }
        if !self.is_symmetric(SYMMETRY_TOLERANCE) {
            return Err(MtspError::invalid("distance matrix is not symmetric"));
        }
        Ok(())
    }

    /// Returns `true` if `city` indexes a row of this matrix.
    pub fn contains(&self, city: usize) -> bool {
        city < self.size
    }

    /// Extracts the matrix restricted to `cities`, re-indexed `0..cities.len()`.
    ///
    /// Local index `k` of the result corresponds to `cities[k]`.
    pub fn submatrix(&self, cities: &[usize]) -> Result<Self> {
        if let Some(&c) = cities.iter().find(|&&c| !self.contains(c)) {
            return Err(MtspError::invalid(format!(
                "city {c} is out of range for {} cities",
                self.size
            )));
        }
        let mut seen = vec![false; self.size];
        for &c in cities {
            if seen[c] {
                return Err(MtspError::invalid(format!("city {c} listed twice")));
            }
            seen[c] = true;
        }
        let k = cities.len();
        let mut sub = Self::new(k);
        for (a, &i) in cities.iter().enumerate() {
            for (b, &j) in cities.iter().enumerate() {
                sub.set(a, b, self.get(i, j));
            }
        }
        Ok(sub)
    }
}
