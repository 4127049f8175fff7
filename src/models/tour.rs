//! Tour type.

use serde::{Deserialize, Serialize};

/// An ordered, implicitly cyclic sequence of distinct city indices.
///
/// The last city connects back to the first.
///
/// # Examples
///
/// ```
/// use u_mtsp::models::Tour;
///
/// let tour = Tour::new(vec![2, 0, 1], 12.5);
/// assert_eq!(tour.len(), 3);
/// assert_eq!(tour.edges().last(), Some(&(1, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    cities: Vec<usize>,
    length: f64,
}

impl Tour {
    /// Creates a tour with an already evaluated length.
    pub fn new(cities: Vec<usize>, length: f64) -> Self {
        Self { cities, length }
    }

    /// City indices in visiting order.
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// Number of cities on the tour.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` if the tour visits no city.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Cyclic tour length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// First city of the tour.
    pub fn start(&self) -> Option<usize> {
        self.cities.first().copied()
    }

    /// Consecutive edges including the closing edge back to the start.
    ///
    /// A single-city tour yields the self-loop `(c, c)`.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let n = self.cities.len();
        (0..n)
            .map(|i| (self.cities[i], self.cities[(i + 1) % n]))
            .collect()
    }

    /// Replaces every city index through `map` (local → global).
    pub(crate) fn remap(self, map: &[usize]) -> Tour {
        Tour {
            cities: self.cities.iter().map(|&c| map[c]).collect(),
            length: self.length,
        }
    }
}
