//! Exact MTSP solver built on the Held-Karp recursion.
//!
//! City 0 is the depot shared by all salesmen: every salesman's route leaves
//! from and returns to it. In the returned [`Assignment`] the depot is listed
//! in salesman 0's subset so that the subsets partition `0..n`.

use crate::distance::DistanceMatrix;
use crate::error::{MtspError, Result};
use crate::models::{Assignment, SalesmanRoute};

use super::config::{ExactConfig, PartitionStrategy};
use super::held_karp::{bit, members, optimal_route, PathTable, SubsetRoute, MAX_CITIES};

/// Index of the shared depot.
pub const DEPOT: usize = 0;

/// Exact solver for small MTSP instances.
///
/// # Examples
///
/// ```
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::exact::ExactSolver;
/// use u_mtsp::models::City;
///
/// let cities = City::from_coordinates(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
/// let dm = DistanceMatrix::from_cities(&cities).unwrap();
///
/// let assignment = ExactSolver::new(&dm).solve(2).unwrap();
/// assert_eq!(assignment.subsets(), vec![vec![0, 2], vec![1, 3]]);
/// assert!(assignment.is_partition_of(4));
/// ```
#[derive(Debug, Clone)]
pub struct ExactSolver<'a> {
    distances: &'a DistanceMatrix,
    config: ExactConfig,
}

impl<'a> ExactSolver<'a> {
    /// Creates a solver using the default (modulo) partition strategy.
    pub fn new(distances: &'a DistanceMatrix) -> Self {
        Self::with_config(distances, ExactConfig::default())
    }

    /// Creates a solver with an explicit configuration.
    pub fn with_config(distances: &'a DistanceMatrix, config: ExactConfig) -> Self {
        Self { distances, config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ExactConfig {
        &self.config
    }

    /// Distributes all cities among `salesmen` and optimizes every route.
    ///
    /// # Errors
    ///
    /// - [`MtspError::InvalidInput`] for an empty matrix, zero salesmen, more
    ///   than 64 cities, or (exhaustive strategy) more cities than
    ///   `max_exhaustive_cities`
    /// - [`MtspError::InfeasiblePartition`] if `salesmen` exceeds the city count
    /// - [`MtspError::NumericOverflow`] if a route length stops being finite
    pub fn solve(&self, salesmen: usize) -> Result<Assignment> {
        self.config.validate()?;
        let n = self.distances.size();
        if n == 0 {
            return Err(MtspError::invalid("distance matrix has no cities"));
        }
        if salesmen == 0 {
            return Err(MtspError::invalid("salesman count must be positive"));
        }
        if salesmen > n {
            return Err(MtspError::InfeasiblePartition {
                salesmen,
                cities: n,
            });
        }
        if n > MAX_CITIES {
            return Err(MtspError::invalid(format!(
                "exact solver supports at most {MAX_CITIES} cities, got {n}"
            )));
        }

        log::debug!(
            "exact solve: {n} cities, {salesmen} salesmen, {:?} strategy",
            self.config.strategy
        );
        let assignment = match self.config.strategy {
            PartitionStrategy::Modulo => self.solve_modulo(n, salesmen)?,
            PartitionStrategy::Exhaustive => self.solve_exhaustive(n, salesmen)?,
        };
        log::debug!("exact solve done: total {:.4}", assignment.total_length());
        Ok(assignment)
    }

    /// City `c ≥ 1` goes to salesman `c mod m`; each class gets its optimal route.
    fn solve_modulo(&self, n: usize, salesmen: usize) -> Result<Assignment> {
        let mut classes = vec![0u64; salesmen];
        for city in 1..n {
            classes[city % salesmen] |= bit(city);
        }

        let routes = classes
            .iter()
            .enumerate()
            .map(|(s, &class)| -> Result<SalesmanRoute> {
                let route = optimal_route(self.distances, DEPOT, class)
                    .map_err(|e| with_salesman(e, s))?;
                log::trace!("salesman {s}: {} cities, cost {:.4}", class.count_ones(), route.cost);
                Ok(salesman_route(s, class, route))
            })
            .collect::<Result<Vec<_>>>()?;

        Assignment::new(routes)
    }

    /// Prices every non-empty customer subset, then picks the cheapest way to
    /// split the customers into one group per salesman.
    fn solve_exhaustive(&self, n: usize, salesmen: usize) -> Result<Assignment> {
        if n > self.config.max_exhaustive_cities {
            return Err(MtspError::invalid(format!(
                "exhaustive partition search is limited to {} cities, got {n}",
                self.config.max_exhaustive_cities
            )));
        }

        // Local bit i stands for customer city i + 1.
        let customers = n - 1;
        let full = (1usize << customers) - 1;
        let mut table = PathTable::new(self.distances, DEPOT);
        let mut cost = vec![0.0; full + 1];
        for local in 1..=full {
            cost[local] = table.route_cost(to_global(local))?;
        }
        log::trace!(
            "priced {full} customer subsets ({} memo entries)",
            table.memo_len()
        );

        // Salesman 0 keeps only the depot when there are fewer customers than salesmen.
        let working = salesmen.min(customers);
        let groups = if working == 0 {
            Vec::new()
        } else {
            split_groups(&cost, full, working)?
        };

        let mut masks = vec![0u64; salesmen];
        let offset = salesmen - working;
        for (i, local) in groups.into_iter().enumerate() {
            masks[offset + i] = to_global(local);
        }

        let routes = masks
            .iter()
            .enumerate()
            .map(|(s, &mask)| -> Result<SalesmanRoute> {
                let route = table.route(mask).map_err(|e| with_salesman(e, s))?;
                Ok(salesman_route(s, mask, route))
            })
            .collect::<Result<Vec<_>>>()?;

        Assignment::new(routes)
    }
}

/// Splits `full` into exactly `groups` non-empty subsets minimizing the sum
/// of `cost`. Subsets are returned in order of their lowest member.
///
/// `best[j][mask]` is the cheapest cover of `mask` by `j + 1` groups; the
/// group holding the lowest bit of `mask` is enumerated explicitly so each
/// unordered split is visited once.
fn split_groups(cost: &[f64], full: usize, groups: usize) -> Result<Vec<usize>> {
    let size = full + 1;
    let mut best = vec![vec![f64::INFINITY; size]; groups];
    let mut choice = vec![vec![0usize; size]; groups];
    best[0][1..].copy_from_slice(&cost[1..]);
    for (mask, c) in choice[0].iter_mut().enumerate() {
        *c = mask;
    }

    for j in 1..groups {
        for mask in 1..size {
            if (mask.count_ones() as usize) <= j {
                continue;
            }
            let low = mask & mask.wrapping_neg();
            let others = mask ^ low;
            // `sub` ranges over subsets of `others`; the group is `sub | low`.
            let mut sub = others;
            loop {
                let group = sub | low;
                if group != mask {
                    let total = cost[group] + best[j - 1][mask ^ group];
                    if total < best[j][mask] {
                        best[j][mask] = total;
                        choice[j][mask] = group;
                    }
                }
                if sub == 0 {
                    break;
                }
                sub = (sub - 1) & others;
            }
        }
    }

    if !best[groups - 1][full].is_finite() {
        return Err(MtspError::overflow(format!(
            "total of {groups} routes over {} customers",
            full.count_ones()
        )));
    }

    let mut result = Vec::with_capacity(groups);
    let mut mask = full;
    for j in (0..groups).rev() {
        let group = choice[j][mask];
        result.push(group);
        mask ^= group;
    }
    result.sort_by_key(|g| g.trailing_zeros());
    Ok(result)
}

fn to_global(local: usize) -> u64 {
    (local as u64) << 1
}

fn salesman_route(salesman: usize, mask: u64, route: SubsetRoute) -> SalesmanRoute {
    let mut cities: Vec<usize> = members(mask).collect();
    if salesman == 0 {
        cities.insert(0, DEPOT);
    }
    SalesmanRoute {
        salesman,
        cities,
        order: route.order,
        length: route.cost,
    }
}

fn with_salesman(err: MtspError, salesman: usize) -> MtspError {
    match err {
        MtspError::NumericOverflow { context } => MtspError::NumericOverflow {
            context: format!("{context} (salesman {salesman})"),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::TourEvaluator;
    use crate::models::City;
    use proptest::prelude::*;

    const SQRT2: f64 = std::f64::consts::SQRT_2;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn square() -> DistanceMatrix {
        let cities = City::from_coordinates(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        DistanceMatrix::from_cities(&cities).expect("valid")
    }

    fn matrix(points: &[(f64, f64)]) -> DistanceMatrix {
        DistanceMatrix::from_cities(&City::from_coordinates(points)).expect("valid")
    }

    fn exhaustive() -> ExactConfig {
        ExactConfig::default().with_strategy(PartitionStrategy::Exhaustive)
    }

    /// Cheapest depot-rooted route through `group`, by trying every permutation.
    fn brute_route(dm: &DistanceMatrix, group: &[usize]) -> f64 {
        fn permute(dm: &DistanceMatrix, rest: &mut Vec<usize>, prefix: &mut Vec<usize>, best: &mut f64) {
            if rest.is_empty() {
                let len = TourEvaluator::new(dm)
                    .route_length(DEPOT, prefix)
                    .expect("valid");
                *best = best.min(len);
                return;
            }
            for i in 0..rest.len() {
                let c = rest.remove(i);
                prefix.push(c);
                permute(dm, rest, prefix, best);
                prefix.pop();
                rest.insert(i, c);
            }
        }
        let mut best = f64::INFINITY;
        permute(dm, &mut group.to_vec(), &mut Vec::new(), &mut best);
        best
    }

    /// Minimum over every labelled assignment of customers to salesmen where
    /// each salesman gets a customer whenever there are enough of them.
    fn brute_force_optimum(dm: &DistanceMatrix, salesmen: usize) -> f64 {
        let customers: Vec<usize> = (1..dm.size()).collect();
        let need_all = customers.len() >= salesmen;
        let mut labels = vec![0usize; customers.len()];
        let mut best = f64::INFINITY;
        loop {
            let groups: Vec<Vec<usize>> = (0..salesmen)
                .map(|s| {
                    customers
                        .iter()
                        .zip(&labels)
                        .filter(|&(_, &l)| l == s)
                        .map(|(&c, _)| c)
                        .collect()
                })
                .collect();
            let valid = groups
                .iter()
                .enumerate()
                .all(|(s, g)| !g.is_empty() || (s == 0 && !need_all));
            if valid {
                let total: f64 = groups.iter().map(|g| brute_route(dm, g)).sum();
                best = best.min(total);
            }
            // Next labelling in base `salesmen`
            let mut i = 0;
            while i < labels.len() && labels[i] == salesmen - 1 {
                labels[i] = 0;
                i += 1;
            }
            if i == labels.len() {
                break;
            }
            labels[i] += 1;
        }
        best
    }

    #[test]
    fn test_square_modulo_partition() {
        init_logging();
        let dm = square();
        let a = ExactSolver::new(&dm).solve(2).expect("valid");
        assert_eq!(a.subsets(), vec![vec![0, 2], vec![1, 3]]);
        assert!(a.subsets().iter().all(|s| s.len() == 2));
        // Salesman 0: depot → 2 → depot; salesman 1: depot → 1 → 3 → depot
        assert!((a.routes()[0].length - 2.0 * SQRT2).abs() < 1e-10);
        assert!((a.routes()[1].length - (2.0 + SQRT2)).abs() < 1e-10);
        assert!((a.total_length() - (2.0 + 3.0 * SQRT2)).abs() < 1e-10);
    }

    #[test]
    fn test_square_exhaustive_partition() {
        let dm = square();
        let a = ExactSolver::with_config(&dm, exhaustive())
            .solve(2)
            .expect("valid");
        assert!(a.is_partition_of(4));
        assert!(a.subsets().iter().all(|s| s.len() == 2));
        assert!((a.total_length() - (4.0 + SQRT2)).abs() < 1e-10);
    }

    #[test]
    fn test_single_salesman_is_plain_tsp() {
        let dm = square();
        for config in [ExactConfig::default(), exhaustive()] {
            let a = ExactSolver::with_config(&dm, config).solve(1).expect("valid");
            assert_eq!(a.subsets(), vec![vec![0, 1, 2, 3]]);
            assert!((a.total_length() - 4.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_one_salesman_per_city() {
        let dm = square();
        for config in [ExactConfig::default(), exhaustive()] {
            let a = ExactSolver::with_config(&dm, config).solve(4).expect("valid");
            assert!(a.is_partition_of(4));
            assert_eq!(a.routes()[0].cities, vec![0]);
            assert_eq!(a.routes()[0].length, 0.0);
            // Three out-and-back trips: 1 + sqrt(2) + 1, doubled
            assert!((a.total_length() - 2.0 * (2.0 + SQRT2)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_single_city() {
        let dm = matrix(&[(3.0, 3.0)]);
        let a = ExactSolver::new(&dm).solve(1).expect("valid");
        assert_eq!(a.subsets(), vec![vec![0]]);
        assert_eq!(a.total_length(), 0.0);
    }

    #[test]
    fn test_routes_match_evaluator() {
        let dm = matrix(&[(0.0, 0.0), (2.0, 1.0), (5.0, 3.0), (-1.0, 4.0), (3.0, -2.0), (0.5, 0.5)]);
        let a = ExactSolver::new(&dm).solve(3).expect("valid");
        let ev = TourEvaluator::new(&dm);
        for r in a.routes() {
            let len = ev.route_length(DEPOT, &r.order).expect("valid");
            assert!((len - r.length).abs() < 1e-9);
        }
    }

    #[test]
    fn test_modulo_matches_brute_force_per_class() {
        let dm = matrix(&[
            (0.0, 0.0),
            (4.0, 1.0),
            (-2.0, 3.0),
            (1.0, -5.0),
            (3.0, 3.0),
            (-1.0, -1.0),
            (6.0, -2.0),
            (-4.0, -4.0),
        ]);
        let a = ExactSolver::new(&dm).solve(3).expect("valid");
        for r in a.routes() {
            let brute = brute_route(&dm, &r.order);
            assert!((brute - r.length).abs() < 1e-9);
        }
    }

    #[test]
    fn test_exhaustive_matches_brute_force_oracle() {
        let dm = matrix(&[
            (0.0, 0.0),
            (4.0, 1.0),
            (-2.0, 3.0),
            (1.0, -5.0),
            (3.0, 3.0),
            (-1.0, -1.0),
            (6.0, -2.0),
            (-4.0, -4.0),
        ]);
        for salesmen in 1..=3 {
            let a = ExactSolver::with_config(&dm, exhaustive())
                .solve(salesmen)
                .expect("valid");
            let oracle = brute_force_optimum(&dm, salesmen);
            assert!(
                (a.total_length() - oracle).abs() < 1e-9,
                "m={salesmen}: solver {} vs oracle {oracle}",
                a.total_length()
            );
        }
    }

    #[test]
    fn test_too_many_salesmen() {
        let dm = square();
        assert_eq!(
            ExactSolver::new(&dm).solve(5).unwrap_err(),
            MtspError::InfeasiblePartition {
                salesmen: 5,
                cities: 4
            }
        );
    }

    #[test]
    fn test_invalid_counts() {
        let dm = square();
        assert!(matches!(
            ExactSolver::new(&dm).solve(0),
            Err(MtspError::InvalidInput(_))
        ));
        let empty = DistanceMatrix::new(0);
        assert!(matches!(
            ExactSolver::new(&empty).solve(1),
            Err(MtspError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_city_ceiling() {
        let dm = DistanceMatrix::new(65);
        assert!(matches!(
            ExactSolver::new(&dm).solve(65),
            Err(MtspError::InvalidInput(_))
        ));
        let dm = DistanceMatrix::new(6);
        let config = exhaustive().with_max_exhaustive_cities(5);
        assert!(matches!(
            ExactSolver::with_config(&dm, config).solve(2),
            Err(MtspError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_overflow_reports_salesman() {
        let big = f64::MAX / 2.0;
        let dm = DistanceMatrix::from_rows(&[
            vec![0.0, big, big],
            vec![big, 0.0, big],
            vec![big, big, 0.0],
        ])
        .expect("finite entries are valid");
        match ExactSolver::new(&dm).solve(1) {
            Err(MtspError::NumericOverflow { context }) => {
                assert!(context.contains("salesman 0"), "{context}")
            }
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_modulo_total_overflow() {
        // Each out-and-back trip is finite, their sum is not
        let far = f64::MAX / 2.5;
        let dm = DistanceMatrix::from_rows(&[
            vec![0.0, far, far],
            vec![far, 0.0, 1.0],
            vec![far, 1.0, 0.0],
        ])
        .expect("finite entries are valid");
        assert_eq!(
            ExactSolver::new(&dm).solve(2).unwrap_err(),
            MtspError::overflow("total of 2 routes")
        );
    }

    #[test]
    fn test_split_groups_canonical_order() {
        // Three customers, each alone costs 1, pairs cost 10, all three cost 100
        let cost = vec![0.0, 1.0, 1.0, 10.0, 1.0, 10.0, 10.0, 100.0];
        let groups = split_groups(&cost, 0b111, 3).expect("valid");
        assert_eq!(groups, vec![0b001, 0b010, 0b100]);
        let groups = split_groups(&cost, 0b111, 1).expect("valid");
        assert_eq!(groups, vec![0b111]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn prop_assignment_is_partition(
            points in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..=8),
            salesmen_seed in 0usize..8,
        ) {
            let n = points.len();
            let salesmen = salesmen_seed % n + 1;
            let dm = matrix(&points);
            let modulo = ExactSolver::new(&dm).solve(salesmen).expect("valid");
            let full = ExactSolver::with_config(&dm, exhaustive()).solve(salesmen).expect("valid");
            prop_assert!(modulo.is_partition_of(n));
            prop_assert!(full.is_partition_of(n));
            prop_assert_eq!(modulo.num_salesmen(), salesmen);
            prop_assert_eq!(full.num_salesmen(), salesmen);
            prop_assert!(full.total_length() <= modulo.total_length() + 1e-9);
        }
    }
}
