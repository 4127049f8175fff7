//! Dispatch state and its step transition.

use serde::{Deserialize, Serialize};

use crate::error::{MtspError, Result};
use crate::models::Point;

use super::config::DispatchConfig;

/// A moving agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    position: Point,
    target: Option<usize>,
}

impl Agent {
    /// Creates an idle agent at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            target: None,
        }
    }

    /// Current position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Target committed in the last step, if any.
    pub fn target(&self) -> Option<usize> {
        self.target
    }
}

/// A location to be visited by some agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    position: Point,
    reached: bool,
}

impl Target {
    /// Creates an unreached target.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            reached: false,
        }
    }

    /// Target location.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns `true` once an agent has come within the proximity threshold.
    pub fn is_reached(&self) -> bool {
        self.reached
    }
}

/// Whether the dispatcher still has work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DispatchStatus {
    /// Some target may still be unreached.
    #[default]
    Running,
    /// Every target has been reached.
    Complete,
}

/// Positions and progress of one dispatch run at a given step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchState {
    agents: Vec<Agent>,
    targets: Vec<Target>,
    status: DispatchStatus,
    step: usize,
}

impl DispatchState {
    /// Creates the initial state: idle agents, all targets unreached.
    ///
    /// # Errors
    ///
    /// [`MtspError::InvalidInput`] if there are no agents or a coordinate is not finite.
    pub fn new(agents: &[Point], targets: &[Point]) -> Result<Self> {
        if agents.is_empty() {
            return Err(MtspError::invalid("at least one agent is required"));
        }
        if let Some(i) = agents.iter().position(|p| !p.is_finite()) {
            return Err(MtspError::invalid(format!("agent {i} has a non-finite position")));
        }
        if let Some(i) = targets.iter().position(|p| !p.is_finite()) {
            return Err(MtspError::invalid(format!("target {i} has a non-finite position")));
        }
        Ok(Self {
            agents: agents.iter().copied().map(Agent::new).collect(),
            targets: targets.iter().copied().map(Target::new).collect(),
            status: DispatchStatus::Running,
            step: 0,
        })
    }

    /// Agents in input order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Targets in input order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Current status.
    pub fn status(&self) -> DispatchStatus {
        self.status
    }

    /// Number of steps taken so far.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns `true` once every target has been reached.
    pub fn is_complete(&self) -> bool {
        self.status == DispatchStatus::Complete
    }

    /// Indices of targets not yet reached.
    pub fn unreached(&self) -> Vec<usize> {
        (0..self.targets.len())
            .filter(|&t| !self.targets[t].reached)
            .collect()
    }

    /// Indices of reached targets.
    pub fn reached(&self) -> Vec<usize> {
        (0..self.targets.len())
            .filter(|&t| self.targets[t].reached)
            .collect()
    }

    /// Performs one dispatch step and returns the next state.
    ///
    /// The closest (agent, unreached target) pairs are committed first-fit,
    /// each agent and each target at most once; ties go to the lower agent
    /// index, then the lower target index. Committed agents move
    /// `step_fraction` of the way toward their target and reach it if they
    /// end closer than `proximity`. Uncommitted agents become idle.
    ///
    /// A complete state is returned unchanged.
    ///
    /// # Errors
    ///
    /// [`MtspError::NumericOverflow`] if a distance or a new position stops
    /// being finite (coordinates too far apart to subtract).
    pub fn advance(mut self, config: &DispatchConfig) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        self.step += 1;

        let unreached = self.unreached();
        if unreached.is_empty() {
            self.status = DispatchStatus::Complete;
            return Ok(self);
        }

        let mut pairs = Vec::with_capacity(self.agents.len() * unreached.len());
        for (a, agent) in self.agents.iter().enumerate() {
            for &t in &unreached {
                let d = agent.position.distance_to(&self.targets[t].position);
                if !d.is_finite() {
                    return Err(self.overflow(a, t));
                }
                pairs.push((a, t, d));
            }
        }
        pairs.sort_by(|x, y| x.2.total_cmp(&y.2).then(x.0.cmp(&y.0)).then(x.1.cmp(&y.1)));

        let mut agent_busy = vec![false; self.agents.len()];
        let mut target_taken = vec![false; self.targets.len()];
        for agent in &mut self.agents {
            agent.target = None;
        }
        for (a, t, _) in pairs {
            if agent_busy[a] || target_taken[t] {
                continue;
            }
            agent_busy[a] = true;
            target_taken[t] = true;

            let goal = self.targets[t].position;
            let moved = self.agents[a].position.toward(&goal, config.step_fraction);
            let remaining = moved.distance_to(&goal);
            if !moved.is_finite() || !remaining.is_finite() {
                return Err(self.overflow(a, t));
            }
            self.agents[a].position = moved;
            self.agents[a].target = Some(t);
            if remaining < config.proximity {
                self.targets[t].reached = true;
                log::trace!("step {}: agent {a} reached target {t}", self.step);
            }
        }
        Ok(self)
    }

    fn overflow(&self, agent: usize, target: usize) -> MtspError {
        MtspError::overflow(format!(
            "step {}, agent {agent} toward target {target}",
            self.step
        ))
    }
}
