//! Memoized Held-Karp recursion over city bitmasks.
//!
//! Visited sets are `u64` masks indexed by global city id, which caps every
//! exact computation at [`MAX_CITIES`] cities.
//!
//! Two forms are provided:
//!
//! - [`optimal_route`] — backward completion search for one fixed subset:
//!   `cost(current, visited)` is the cheapest way to visit the rest of the
//!   subset and return to the depot. The memo table lives for that one call.
//! - [`PathTable`] — forward search `path(last, mask)`: cheapest walk leaving
//!   the depot, visiting exactly `mask` and stopping at `last`. Its memo does
//!   not depend on a target subset, so one table prices every subset.
//!
//! # Complexity
//!
//! O(2^k · k²) time and O(2^k · k) memory for a subset of size k.
//!
//! # Reference
//!
//! Held, M. & Karp, R.M. (1962). "A dynamic programming approach to
//! sequencing problems", *Journal of SIAM* 10(1), 196-210.

use std::collections::HashMap;

use crate::distance::DistanceMatrix;
use crate::error::{MtspError, Result};

/// Largest city count representable by the `u64` visited masks.
pub const MAX_CITIES: usize = 64;

#[inline]
pub(crate) fn bit(city: usize) -> u64 {
    1u64 << city
}

/// Iterates the city ids set in `mask`, ascending.
pub(crate) fn members(mut mask: u64) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let city = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(city)
    })
}

#[derive(Debug, Clone, Copy)]
struct MemoEntry {
    cost: f64,
    /// Next city (backward search) or predecessor (forward search).
    link: Option<usize>,
}

/// Minimal costs keyed by `(city, visited mask)`.
///
/// Append-only: a key is written once and never overwritten.
#[derive(Debug, Default)]
struct MemoTable {
    entries: HashMap<(usize, u64), MemoEntry>,
}

impl MemoTable {
    fn get(&self, city: usize, mask: u64) -> Option<MemoEntry> {
        self.entries.get(&(city, mask)).copied()
    }

    fn record(&mut self, city: usize, mask: u64, entry: MemoEntry) {
        self.entries.entry((city, mask)).or_insert(entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The cheapest depot-rooted route through one subset.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetRoute {
    /// Length of `depot → order… → depot`.
    pub cost: f64,
    /// Visiting order, depot excluded.
    pub order: Vec<usize>,
}

/// Finds the cheapest route that leaves `depot`, visits every city in
/// `subset` exactly once and returns to `depot`.
///
/// `subset` must not contain the depot and every member must index
/// `distances`. An empty subset costs 0.
pub fn optimal_route(distances: &DistanceMatrix, depot: usize, subset: u64) -> Result<SubsetRoute> {
    let mut search = Completion {
        distances,
        depot,
        target: subset,
        memo: MemoTable::default(),
    };
    let cost = search.complete(depot, 0)?;

    let mut order = Vec::with_capacity(subset.count_ones() as usize);
    let (mut current, mut visited) = (depot, 0u64);
    while visited != subset {
        let next = search
            .memo
            .get(current, visited)
            .and_then(|e| e.link)
            .ok_or_else(|| MtspError::invalid("incomplete memo table during reconstruction"))?;
        order.push(next);
        visited |= bit(next);
        current = next;
    }

    log::trace!(
        "held-karp subset {subset:#b}: cost {cost:.4}, {} memo entries",
        search.memo.len()
    );
    Ok(SubsetRoute { cost, order })
}

struct Completion<'a> {
    distances: &'a DistanceMatrix,
    depot: usize,
    target: u64,
    memo: MemoTable,
}

impl Completion<'_> {
    fn complete(&mut self, current: usize, visited: u64) -> Result<f64> {
        if visited == self.target {
            return Ok(self.distances.get(current, self.depot));
        }
        if let Some(entry) = self.memo.get(current, visited) {
            return Ok(entry.cost);
        }

        let mut best = MemoEntry {
            cost: f64::INFINITY,
            link: None,
        };
        for city in members(self.target & !visited) {
            let cost = self.distances.get(current, city) + self.complete(city, visited | bit(city))?;
            if !cost.is_finite() {
                return Err(MtspError::overflow(format!(
                    "completion cost of subset {:#b}",
                    self.target
                )));
            }
            if cost < best.cost {
                best = MemoEntry {
                    cost,
                    link: Some(city),
                };
            }
        }

        self.memo.record(current, visited, best);
        Ok(best.cost)
    }
}

/// Forward Held-Karp table shared across every subset of one city set.
pub struct PathTable<'a> {
    distances: &'a DistanceMatrix,
    depot: usize,
    memo: MemoTable,
}

impl<'a> PathTable<'a> {
    /// Creates an empty table rooted at `depot`.
    pub fn new(distances: &'a DistanceMatrix, depot: usize) -> Self {
        Self {
            distances,
            depot,
            memo: MemoTable::default(),
        }
    }

    /// Cheapest depot-rooted cycle through exactly the cities of `subset`.
    pub fn route_cost(&mut self, subset: u64) -> Result<f64> {
        Ok(self.best_last(subset)?.0)
    }

    /// Cheapest route through `subset`, with its visiting order.
    pub fn route(&mut self, subset: u64) -> Result<SubsetRoute> {
        let (cost, last) = self.best_last(subset)?;
        let mut order = Vec::with_capacity(subset.count_ones() as usize);
        let (mut current, mut mask) = (last, subset);
        while let Some(city) = current {
            order.push(city);
            let prev = self.memo.get(city, mask).and_then(|e| e.link);
            mask &= !bit(city);
            current = prev;
        }
        order.reverse();
        Ok(SubsetRoute { cost, order })
    }

    /// Number of memoized `(city, mask)` states.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    fn best_last(&mut self, subset: u64) -> Result<(f64, Option<usize>)> {
        if subset == 0 {
            return Ok((0.0, None));
        }
        let mut best = (f64::INFINITY, None);
        for last in members(subset) {
            let cost = self.path(last, subset)? + self.distances.get(last, self.depot);
            if !cost.is_finite() {
                return Err(MtspError::overflow(format!("route of subset {subset:#b}")));
            }
            if cost < best.0 {
                best = (cost, Some(last));
            }
        }
        Ok(best)
    }

    /// Cheapest walk `depot → … → last` visiting exactly `mask` (`last ∈ mask`).
    fn path(&mut self, last: usize, mask: u64) -> Result<f64> {
        let rest = mask & !bit(last);
        if rest == 0 {
            return Ok(self.distances.get(self.depot, last));
        }
        if let Some(entry) = self.memo.get(last, mask) {
            return Ok(entry.cost);
        }

        let mut best = MemoEntry {
            cost: f64::INFINITY,
            link: None,
        };
        for prev in members(rest) {
            let cost = self.path(prev, rest)? + self.distances.get(prev, last);
            if !cost.is_finite() {
                return Err(MtspError::overflow(format!("path through {mask:#b}")));
            }
            if cost < best.cost {
                best = MemoEntry {
                    cost,
                    link: Some(prev),
                };
            }
        }

        self.memo.record(last, mask, best);
        Ok(best.cost)
    }
}
