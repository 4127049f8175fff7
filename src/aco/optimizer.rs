//! Ant System over a single city set.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{MtspError, Result};
use crate::evaluation::TourEvaluator;
use crate::models::Tour;

use super::config::AcoConfig;
use super::pheromone::PheromoneMatrix;

/// Result of one optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoOutcome {
    /// Best tour found, starting at the city its ant started from.
    pub tour: Tour,
    /// Iteration (zero-based) in which `tour` was built.
    pub best_iteration: usize,
    /// Iterations actually executed; 0 when a single city made the run trivial.
    pub iterations: usize,
}

impl AcoOutcome {
    /// Length of the returned tour.
    pub fn length(&self) -> f64 {
        self.tour.length()
    }
}

/// Ant colony optimizer for one TSP instance.
///
/// Each iteration sends `num_ants` ants from uniformly random start cities.
/// An ant leaving city `i` picks unvisited `j` with probability proportional
/// to `τ[i][j]^α · (1/d[i][j])^β`. After all ants have built their tours the
/// pheromone field evaporates once and every ant deposits `1/length` on each
/// edge of its tour.
///
/// The optimizer owns its pheromone field and is consumed by [`run`](Self::run).
///
/// # Examples
///
/// ```
/// use u_mtsp::aco::{AcoConfig, AntColonyOptimizer};
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::models::City;
///
/// let cities = City::from_coordinates(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
/// let dm = DistanceMatrix::from_cities(&cities).unwrap();
///
/// let config = AcoConfig::default().with_seed(3);
/// let outcome = AntColonyOptimizer::new(&dm, config).unwrap().run_seeded().unwrap();
/// assert_eq!(outcome.tour.len(), 4);
/// assert!(outcome.length() >= 4.0 - 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct AntColonyOptimizer<'a> {
    distances: &'a DistanceMatrix,
    config: AcoConfig,
    pheromone: PheromoneMatrix,
}

impl<'a> AntColonyOptimizer<'a> {
    /// Creates an optimizer with a fresh all-ones pheromone field.
    ///
    /// # Errors
    ///
    /// [`MtspError::InvalidInput`] for an empty matrix or an invalid configuration.
    pub fn new(distances: &'a DistanceMatrix, config: AcoConfig) -> Result<Self> {
        config.validate()?;
        if distances.size() == 0 {
            return Err(MtspError::invalid("distance matrix has no cities"));
        }
        Ok(Self {
            distances,
            pheromone: PheromoneMatrix::new(distances.size()),
            config,
        })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Returns the current pheromone field.
    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    /// Runs with a `ChaCha8Rng` seeded from `config.seed`.
    pub fn run_seeded(self) -> Result<AcoOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.run(&mut rng)
    }

    /// Runs all iterations and returns the best tour.
    ///
    /// Unless `retain_global_best` is set, only the ants of the final
    /// iteration compete for the result.
    ///
    /// # Errors
    ///
    /// - [`MtspError::DegenerateProbability`] if an ant's candidate weights
    ///   are non-finite or sum to zero (coincident cities)
    /// - [`MtspError::NumericOverflow`] if a tour length stops being finite
    pub fn run<R: Rng>(mut self, rng: &mut R) -> Result<AcoOutcome> {
        let n = self.distances.size();
        let evaluator = TourEvaluator::new(self.distances);
        if n == 1 {
            return Ok(AcoOutcome {
                tour: evaluator.evaluate(vec![0])?,
                best_iteration: 0,
                iterations: 0,
            });
        }

        log::debug!(
            "aco: {n} cities, {} ants, {} iterations",
            self.config.num_ants,
            self.config.num_iterations
        );
        let mut best: Option<(Tour, usize)> = None;
        for iteration in 0..self.config.num_iterations {
            let mut tours = Vec::with_capacity(self.config.num_ants);
            for ant in 0..self.config.num_ants {
                let cities = self.construct(rng, iteration, ant)?;
                tours.push(evaluator.evaluate(cities)?);
            }

            self.pheromone.evaporate(self.config.evaporation_rate);
            for tour in &tours {
                // A zero-length tour (all cities coincide) carries no preference.
                if tour.length() > 0.0 {
                    self.pheromone.deposit(tour.cities(), 1.0 / tour.length());
                }
            }

            let Some(iteration_best) = tours
                .into_iter()
                .min_by(|a, b| a.length().total_cmp(&b.length()))
            else {
                continue;
            };
            log::trace!(
                "aco iteration {iteration}: best {:.4}",
                iteration_best.length()
            );
            let replace = match &best {
                Some((current, _)) if self.config.retain_global_best => {
                    iteration_best.length() < current.length()
                }
                _ => true,
            };
            if replace {
                best = Some((iteration_best, iteration));
            }
        }

        let (tour, best_iteration) =
            best.ok_or_else(|| MtspError::invalid("no iteration produced a tour"))?;
        log::debug!(
            "aco done: length {:.4} from iteration {best_iteration}",
            tour.length()
        );
        Ok(AcoOutcome {
            tour,
            best_iteration,
            iterations: self.config.num_iterations,
        })
    }

    /// Builds one ant's tour by roulette-wheel selection.
    fn construct<R: Rng>(&self, rng: &mut R, iteration: usize, ant: usize) -> Result<Vec<usize>> {
        let n = self.distances.size();
        let mut visited = vec![false; n];
        let mut tour = Vec::with_capacity(n);
        let mut current = rng.random_range(0..n);
        visited[current] = true;
        tour.push(current);

        let mut candidates: Vec<(usize, f64)> = Vec::with_capacity(n);
        for step in 0..n - 1 {
            candidates.clear();
            for city in (0..n).filter(|&c| !visited[c]) {
                let tau = self.pheromone.get(current, city).powf(self.config.alpha);
                let eta = (1.0 / self.distances.get(current, city)).powf(self.config.beta);
                candidates.push((city, tau * eta));
            }

            let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
            if candidates.iter().any(|&(_, w)| !w.is_finite()) || !total.is_finite() || total <= 0.0
            {
                return Err(MtspError::DegenerateProbability {
                    iteration,
                    ant,
                    step,
                    city: current,
                });
            }

            let pick = rng.random::<f64>() * total;
            let next = roulette(&candidates, pick).ok_or(MtspError::DegenerateProbability {
                iteration,
                ant,
                step,
                city: current,
            })?;

            visited[next] = true;
            tour.push(next);
            current = next;
        }
        Ok(tour)
    }
}

/// Returns the candidate whose cumulative weight first covers `pick`.
///
/// Zero-weight candidates are never chosen; if rounding leaves `pick`
/// uncovered the last positive-weight candidate wins.
fn roulette(candidates: &[(usize, f64)], mut pick: f64) -> Option<usize> {
    let mut chosen = None;
    for &(city, weight) in candidates {
        if weight <= 0.0 {
            continue;
        }
        chosen = Some(city);
        pick -= weight;
        if pick <= 0.0 {
            break;
        }
    }
    chosen
}
