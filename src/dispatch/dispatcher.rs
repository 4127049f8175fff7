//! Step-wise greedy dispatcher.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Point;

use super::config::DispatchConfig;
use super::state::{DispatchState, DispatchStatus};

/// What the dispatcher looks like after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSnapshot {
    /// Step index, starting at 1.
    pub step: usize,
    /// Agent positions in input order.
    pub agents: Vec<Point>,
    /// Target committed to each agent this step.
    pub assignments: Vec<Option<usize>>,
    /// Reached target indices, ascending.
    pub reached: Vec<usize>,
    /// Unreached target indices, ascending.
    pub unreached: Vec<usize>,
    /// Status after the step.
    pub status: DispatchStatus,
}

impl DispatchSnapshot {
    fn capture(state: &DispatchState) -> Self {
        Self {
            step: state.step(),
            agents: state.agents().iter().map(|a| a.position()).collect(),
            assignments: state.agents().iter().map(|a| a.target()).collect(),
            reached: state.reached(),
            unreached: state.unreached(),
            status: state.status(),
        }
    }
}

/// Online nearest-target dispatcher.
///
/// Iterating yields one [`DispatchSnapshot`] per step. The last snapshot
/// reports [`DispatchStatus::Complete`]; after it the iterator is exhausted.
/// A step whose movement overflows yields
/// [`MtspError::NumericOverflow`](crate::MtspError::NumericOverflow) and ends
/// the iteration.
///
/// # Examples
///
/// ```
/// use u_mtsp::dispatch::{DispatchConfig, DispatchStatus, GreedyDispatcher};
/// use u_mtsp::models::Point;
///
/// let agents = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
/// let targets = [Point::new(1.0, 1.0), Point::new(9.0, 9.0), Point::new(5.0, 5.0)];
/// let dispatcher = GreedyDispatcher::new(&agents, &targets, DispatchConfig::default()).unwrap();
///
/// let snapshots = dispatcher.collect::<Result<Vec<_>, _>>().unwrap();
/// let last = snapshots.last().unwrap();
/// assert_eq!(last.status, DispatchStatus::Complete);
/// assert_eq!(last.reached, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyDispatcher {
    state: DispatchState,
    config: DispatchConfig,
    finished: bool,
}

impl GreedyDispatcher {
    /// Places agents and targets; no step is taken yet.
    ///
    /// # Errors
    ///
    /// [`MtspError::InvalidInput`](crate::MtspError::InvalidInput) for an
    /// invalid configuration, no agents, or non-finite coordinates.
    pub fn new(agents: &[Point], targets: &[Point], config: DispatchConfig) -> Result<Self> {
        config.validate()?;
        let state = DispatchState::new(agents, targets)?;
        if targets.is_empty() {
            log::warn!("dispatcher created without targets; it completes on the first step");
        }
        log::debug!(
            "dispatch: {} agents, {} targets",
            agents.len(),
            targets.len()
        );
        Ok(Self {
            state,
            config,
            finished: false,
        })
    }

    /// Current state.
    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Steps until every target is reached and returns the final state.
    ///
    /// # Errors
    ///
    /// The first [`MtspError::NumericOverflow`](crate::MtspError::NumericOverflow)
    /// raised by a step.
    pub fn run_to_completion(mut self) -> Result<DispatchState> {
        let mut steps = 0;
        for snapshot in self.by_ref() {
            snapshot?;
            steps += 1;
        }
        log::debug!("dispatch complete after {steps} steps");
        Ok(self.state)
    }
}

impl Iterator for GreedyDispatcher {
    type Item = Result<DispatchSnapshot>;

    fn next(&mut self) -> Option<Result<DispatchSnapshot>> {
        if self.finished {
            return None;
        }
        // The last good state stays in place if the step fails.
        let state = match self.state.clone().advance(&self.config) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("dispatch stopped: {e}");
                self.finished = true;
                return Some(Err(e));
            }
        };
        let snapshot = DispatchSnapshot::capture(&state);
        self.finished = state.is_complete();
        self.state = state;
        Some(Ok(snapshot))
    }
}

impl std::iter::FusedIterator for GreedyDispatcher {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MtspError;
    use proptest::prelude::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_empty_targets_complete_on_first_step() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut d = GreedyDispatcher::new(&pts(&[(0.0, 0.0)]), &[], DispatchConfig::default())
            .expect("valid");
        let first = d.next().expect("one snapshot").expect("valid");
        assert_eq!(first.step, 1);
        assert_eq!(first.status, DispatchStatus::Complete);
        assert!(d.next().is_none());
        assert!(d.next().is_none());
    }

    #[test]
    fn test_single_agent_reaches_all_targets() {
        let d = GreedyDispatcher::new(
            &pts(&[(0.0, 0.0)]),
            &pts(&[(3.0, 0.0), (0.0, 4.0), (6.0, 6.0)]),
            DispatchConfig::default(),
        )
        .expect("valid");
        let end = d.run_to_completion().expect("valid");
        assert!(end.is_complete());
        assert!(end.unreached().is_empty());
        assert_eq!(end.reached(), vec![0, 1, 2]);
    }

    #[test]
    fn test_full_step_reaches_immediately() {
        let config = DispatchConfig::default().with_step_fraction(1.0);
        let d = GreedyDispatcher::new(
            &pts(&[(0.0, 0.0), (10.0, 0.0)]),
            &pts(&[(1.0, 0.0), (9.0, 0.0)]),
            config,
        )
        .expect("valid");
        let snapshots = d.collect::<Result<Vec<_>>>().expect("valid");
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].reached, vec![0, 1]);
        assert_eq!(snapshots[0].assignments, vec![Some(0), Some(1)]);
        assert_eq!(snapshots[0].status, DispatchStatus::Running);
        assert_eq!(snapshots[1].status, DispatchStatus::Complete);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let t = pts(&[(1.0, 1.0)]);
        assert!(GreedyDispatcher::new(&[], &t, DispatchConfig::default()).is_err());
        let bad = DispatchConfig::default().with_proximity(-1.0);
        assert!(GreedyDispatcher::new(&pts(&[(0.0, 0.0)]), &t, bad).is_err());
    }

    #[test]
    fn test_overflowing_step_ends_iteration() {
        let mut d = GreedyDispatcher::new(
            &pts(&[(-1e308, 0.0)]),
            &pts(&[(1e308, 0.0)]),
            DispatchConfig::default(),
        )
        .expect("valid");
        assert!(matches!(
            d.next(),
            Some(Err(MtspError::NumericOverflow { .. }))
        ));
        assert!(d.next().is_none());
        assert_eq!(d.state().step(), 0);
        assert_eq!(d.state().agents()[0].position(), Point::new(-1e308, 0.0));
    }

    #[test]
    fn test_run_to_completion_reports_overflow() {
        let d = GreedyDispatcher::new(
            &pts(&[(0.0, -1e308)]),
            &pts(&[(0.0, 1e308), (1.0, 1.0)]),
            DispatchConfig::default(),
        )
        .expect("valid");
        assert!(matches!(
            d.run_to_completion(),
            Err(MtspError::NumericOverflow { .. })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_no_shared_targets_and_terminates(
            agents in prop::collection::vec((-20.0f64..20.0, -20.0f64..20.0), 1..4),
            targets in prop::collection::vec((-20.0f64..20.0, -20.0f64..20.0), 0..8),
        ) {
            let d = GreedyDispatcher::new(&pts(&agents), &pts(&targets), DispatchConfig::default())
                .expect("valid");
            let mut last = None;
            for snapshot in d.take(10_000) {
                let snapshot = snapshot.expect("valid");
                let mut committed: Vec<usize> = snapshot.assignments.iter().flatten().copied().collect();
                let count = committed.len();
                committed.sort_unstable();
                committed.dedup();
                prop_assert_eq!(committed.len(), count);
                last = Some(snapshot);
            }
            let last = last.expect("at least one step");
            prop_assert_eq!(last.status, DispatchStatus::Complete);
            prop_assert_eq!(last.reached.len(), targets.len());
        }
    }
}
