//! Offline value iteration over the pose space.
//!
//! The value function is indexed by position and orientation only. The
//! observation is a pure function of the pose and the layout, so dropping
//! it from the domain loses nothing while shrinking each sweep 27-fold.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Result,
    gridworld::{Action, AgentState, Dynamics, GridGeometry, Gridworld, NUM_ACTIONS, Pose, StateSpace},
    policy::{PolicyDomain, PolicyTable},
    ports::ValueModel,
    utils::choose_maximizer,
};

/// How a sweep reads the values it is replacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// Gauss-Seidel: later states in a sweep see values updated earlier in it
    #[default]
    InPlace,
    /// Jacobi: every backup reads a snapshot taken before the sweep
    Synchronous,
}

/// Value iteration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    /// Stop once the largest per-sweep change is at most this
    pub residual_threshold: f64,
    /// Stop after this many sweeps regardless of the residual
    pub max_iterations: usize,
    pub sweep: SweepMode,
    /// Treat the destination as absorbing with value zero
    pub terminal_destination: bool,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            residual_threshold: 1e-4,
            max_iterations: 1000,
            sweep: SweepMode::default(),
            terminal_destination: true,
        }
    }
}

/// Why value iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Termination {
    /// The residual fell to or below the threshold
    Converged { sweeps: usize, residual: f64 },
    /// `max_iterations` sweeps ran without meeting the threshold; the
    /// value table is usable but only partially converged
    IterationBudgetExhausted { sweeps: usize, residual: f64 },
}

impl Termination {
    pub fn converged(&self) -> bool {
        matches!(self, Termination::Converged { .. })
    }

    pub fn sweeps(&self) -> usize {
        match *self {
            Termination::Converged { sweeps, .. }
            | Termination::IterationBudgetExhausted { sweeps, .. } => sweeps,
        }
    }

    pub fn residual(&self) -> f64 {
        match *self {
            Termination::Converged { residual, .. }
            | Termination::IterationBudgetExhausted { residual, .. } => residual,
        }
    }
}

/// Value iteration planner over a snapshot of one layout
#[derive(Debug, Clone)]
pub struct ValueIteration {
    geometry: GridGeometry,
    dynamics: Dynamics,
    space: StateSpace,
    config: ValueIterationConfig,
    values: Vec<f64>,
}

impl ValueIteration {
    /// Snapshot the layout and dynamics of `world`; the world itself is never touched
    pub fn new(world: &Gridworld, config: ValueIterationConfig) -> Self {
        Self::from_parts(world.geometry().clone(), *world.dynamics(), config)
    }

    pub fn from_parts(geometry: GridGeometry, dynamics: Dynamics, config: ValueIterationConfig) -> Self {
        let space = StateSpace::new(geometry.length(), geometry.width());
        Self {
            values: vec![0.0; space.num_poses()],
            geometry,
            dynamics,
            space,
            config,
        }
    }

    pub fn config(&self) -> &ValueIterationConfig {
        &self.config
    }

    pub fn space(&self) -> StateSpace {
        self.space
    }

    /// Value table in pose index order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, pose: Pose) -> Result<f64> {
        Ok(self.values[self.space.encode_pose(pose)?.get()])
    }

    fn is_terminal(&self, pose: Pose) -> bool {
        self.config.terminal_destination && pose.position == self.geometry.destination()
    }

    /// One-step lookahead reading `values`:
    /// `r(s,a) + γ (p_fail U[s] + (1 - p_fail) U[s'])`
    fn backup_with(&self, values: &[f64], pose: Pose, action: Action) -> Result<f64> {
        let (next, reward, _) = self.dynamics.act(&self.geometry, pose, action);
        let stay = values[self.space.encode_pose(pose)?.get()];
        let moved = values[self.space.encode_pose(next)?.get()];
        let fail = self.dynamics.fail_chance;
        Ok(reward + self.dynamics.discount * (fail * stay + (1.0 - fail) * moved))
    }

    /// Backed-up value of every action from `pose` under the current table
    pub fn action_values(&self, pose: Pose) -> Result<[f64; NUM_ACTIONS]> {
        let mut out = [0.0; NUM_ACTIONS];
        for action in Action::ALL {
            out[action.index()] = self.backup_with(&self.values, pose, action)?;
        }
        Ok(out)
    }

    fn best_backup(&self, values: &[f64], pose: Pose) -> Result<f64> {
        let mut best = f64::NEG_INFINITY;
        for action in Action::ALL {
            best = best.max(self.backup_with(values, pose, action)?);
        }
        Ok(best)
    }

    /// Run a single sweep over every pose and return the largest change
    pub fn sweep(&mut self) -> Result<f64> {
        let mut max_residual: f64 = 0.0;
        match self.config.sweep {
            SweepMode::InPlace => {
                for (index, pose) in self.space.poses() {
                    if self.is_terminal(pose) {
                        continue;
                    }
                    let updated = self.best_backup(&self.values, pose)?;
                    let slot = &mut self.values[index.get()];
                    max_residual = max_residual.max((updated - *slot).abs());
                    *slot = updated;
                }
            }
            SweepMode::Synchronous => {
                let snapshot = self.values.clone();
                for (index, pose) in self.space.poses() {
                    if self.is_terminal(pose) {
                        continue;
                    }
                    let updated = self.best_backup(&snapshot, pose)?;
                    max_residual = max_residual.max((updated - snapshot[index.get()]).abs());
                    self.values[index.get()] = updated;
                }
            }
        }
        Ok(max_residual)
    }

    /// Sweep until the residual threshold or the iteration budget is reached
    pub fn solve(&mut self) -> Result<Termination> {
        let mut residual = f64::INFINITY;
        for sweep in 1..=self.config.max_iterations {
            residual = self.sweep()?;
            debug!(sweep, residual, "value iteration sweep");
            if residual <= self.config.residual_threshold {
                info!(sweeps = sweep, residual, "value iteration converged");
                return Ok(Termination::Converged {
                    sweeps: sweep,
                    residual,
                });
            }
        }
        warn!(
            sweeps = self.config.max_iterations,
            residual,
            threshold = self.config.residual_threshold,
            "value iteration stopped at its iteration budget"
        );
        Ok(Termination::IterationBudgetExhausted {
            sweeps: self.config.max_iterations,
            residual,
        })
    }

    /// Greedy policy over poses, ties broken uniformly among all maximizers
    pub fn extract_policy<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PolicyTable> {
        let actions = self
            .space
            .poses()
            .map(|(_, pose)| {
                let values = self.action_values(pose)?;
                let best = choose_maximizer(&values, rng).unwrap_or(0);
                Ok(Action::ALL[best])
            })
            .collect::<Result<Vec<_>>>()?;
        PolicyTable::new(self.space, PolicyDomain::Pose, actions)
    }
}

impl ValueModel for ValueIteration {
    fn lookahead(&self, state: &AgentState, action: Action) -> Result<f64> {
        self.backup_with(&self.values, state.pose(), action)
    }

    fn name(&self) -> &str {
        "Value-Iteration"
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        config::RewardConfig,
        gridworld::{Orientation, Position},
    };

    fn corridor(fail_chance: f64) -> ValueIteration {
        // D - - -
        let geometry = GridGeometry::new(1, 4, &[], Position::new(0, 0)).unwrap();
        let dynamics = Dynamics::new(RewardConfig::default(), fail_chance, 0.9);
        ValueIteration::from_parts(geometry, dynamics, ValueIterationConfig::default())
    }

    fn value_at(planner: &ValueIteration, col: usize) -> f64 {
        planner
            .value(Pose::new(Position::new(0, col), Orientation::North))
            .unwrap()
    }

    #[test]
    fn corridor_values_decay_with_distance() {
        let mut planner = corridor(0.0);
        let termination = planner.solve().unwrap();
        assert!(termination.converged());

        assert_eq!(value_at(&planner, 0), 0.0);
        assert!((value_at(&planner, 1) - 10.0).abs() < 1e-6);
        assert!((value_at(&planner, 2) - 9.0).abs() < 1e-6);
        assert!((value_at(&planner, 3) - 8.1).abs() < 1e-6);
    }

    #[test]
    fn slip_weighs_staying_put() {
        let mut planner = corridor(0.5);
        planner.solve().unwrap();
        // U = 10 + 0.9 * (0.5 U + 0.5 * 0)
        let expected = 10.0 / (1.0 - 0.45);
        assert!((value_at(&planner, 1) - expected).abs() < 1e-3);
    }

    #[test]
    fn synchronous_sweeps_agree_with_in_place() {
        let mut in_place = corridor(0.1);
        let mut synchronous = corridor(0.1);
        synchronous.config.sweep = SweepMode::Synchronous;

        let a = in_place.solve().unwrap();
        let b = synchronous.solve().unwrap();
        assert!(a.converged() && b.converged());
        for (x, y) in in_place.values().iter().zip(synchronous.values()) {
            assert!((x - y).abs() < 1e-2);
        }
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let mut planner = corridor(0.0);
        planner.config.max_iterations = 1;
        planner.config.residual_threshold = 0.0;
        let termination = planner.solve().unwrap();
        assert_eq!(
            termination,
            Termination::IterationBudgetExhausted {
                sweeps: 1,
                residual: termination.residual()
            }
        );
        assert!(!termination.converged());
        assert!(termination.residual() > 0.0);
    }

    #[test]
    fn extracted_policy_heads_for_destination() {
        let mut planner = corridor(0.0);
        planner.solve().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let policy = planner.extract_policy(&mut rng).unwrap();
        for col in 1..4 {
            for orientation in Orientation::ALL {
                let pose = Pose::new(Position::new(0, col), orientation);
                let index = planner.space().encode_pose(pose).unwrap().get();
                assert_eq!(policy.actions()[index], Action::Left);
            }
        }
    }
}
