//! Pheromone field.

/// Symmetric n×n pheromone matrix, strictly positive at all times.
///
/// Starts at 1 everywhere. Owned by a single optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
}

impl PheromoneMatrix {
    /// Creates an all-ones matrix.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![1.0; size * size],
            size,
        }
    }

    /// Pheromone on edge `(from, to)`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Multiplies every entry by `1 - rate`, never going below
    /// `f64::MIN_POSITIVE`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        for tau in &mut self.data {
            *tau = (*tau * keep).max(f64::MIN_POSITIVE);
        }
    }

    /// Adds `amount` to both directions of every edge of the cyclic `tour`,
    /// closing edge included.
    pub fn deposit(&mut self, tour: &[usize], amount: f64) {
        let n = tour.len();
        if n < 2 {
            return;
        }
        for i in 0..n {
            let (a, b) = (tour[i], tour[(i + 1) % n]);
            self.data[a * self.size + b] += amount;
            self.data[b * self.size + a] += amount;
        }
    }

    /// Smallest entry, or `None` for an empty matrix.
    pub fn min_value(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::min)
    }
}
