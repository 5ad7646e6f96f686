//! The online environment an episode driver steps through

use rand::{Rng, seq::IndexedRandom};

use super::{
    action::{Action, NUM_ACTIONS, NUM_ORIENTATIONS, Orientation},
    dynamics::{Dynamics, Transition},
    encoding::StateSpace,
    geometry::{GridGeometry, Position},
    state::{AgentState, Observation, Pose},
};
use crate::{Error, Result, config::GridworldConfig};

/// A gridworld episode: a layout, the transition parameters and the agent.
///
/// The environment owns no random source; every operation that needs
/// randomness borrows the caller's generator.
#[derive(Debug, Clone)]
pub struct Gridworld {
    geometry: GridGeometry,
    dynamics: Dynamics,
    source: Position,
    state: AgentState,
}

impl Gridworld {
    /// Lay out a random grid from `config` and place the agent on its source
    pub fn new<R: Rng + ?Sized>(config: &GridworldConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let (geometry, source) =
            GridGeometry::generate(config.length, config.width(), config.obstacle_count(), rng)?;
        let geometry = geometry.with_sense_walls(config.sense_walls);
        let orientation = Orientation::ALL[rng.random_range(0..NUM_ORIENTATIONS)];
        Ok(Self::from_parts(
            geometry,
            Dynamics::from_config(config),
            Pose::new(source, orientation),
        ))
    }

    /// Assemble an environment from a known layout and starting pose
    pub fn from_parts(geometry: GridGeometry, dynamics: Dynamics, start: Pose) -> Self {
        let state = AgentState::observe(&geometry, start);
        Self {
            geometry,
            dynamics,
            source: start.position,
            state,
        }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }

    pub fn discount(&self) -> f64 {
        self.dynamics.discount
    }

    pub fn state_space(&self) -> StateSpace {
        StateSpace::new(self.geometry.length(), self.geometry.width())
    }

    pub fn num_states(&self) -> usize {
        self.state_space().num_states()
    }

    pub fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    /// Cell the agent started from when the layout was generated
    pub fn source(&self) -> Position {
        self.source
    }

    pub fn destination(&self) -> Position {
        self.geometry.destination()
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn coords(&self) -> Position {
        self.state.position()
    }

    pub fn orientation(&self) -> Orientation {
        self.state.orientation()
    }

    pub fn observation(&self) -> Observation {
        self.state.observation()
    }

    pub fn at_destination(&self) -> bool {
        self.state.position() == self.geometry.destination()
    }

    /// Apply an action with an explicit slip draw in `[0, 1)`
    pub fn apply(&mut self, action: Action, draw: f64) -> Transition {
        let transition = self
            .dynamics
            .step(&self.geometry, &self.state, action, draw);
        self.state = transition.state;
        transition
    }

    /// Apply an action, drawing the slip from `rng`, and return the reward
    pub fn take_action<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> f64 {
        self.step(action, rng).reward
    }

    /// Like [`Gridworld::take_action`] but returns the whole transition
    pub fn step<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> Transition {
        let draw = rng.random::<f64>();
        self.apply(action, draw)
    }

    /// Place the agent on a uniformly drawn free cell with a random heading
    pub fn reset_agent<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let position = *self
            .geometry
            .free_cells(None)
            .choose(rng)
            .ok_or(Error::NoFreeCell { what: "agent" })?;
        let orientation = Orientation::ALL[rng.random_range(0..NUM_ORIENTATIONS)];
        self.state = AgentState::observe(&self.geometry, Pose::new(position, orientation));
        Ok(())
    }

    /// Redraw the destination uniformly over non-obstacle cells away from the agent
    pub fn reset_destination<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let agent = self.state.position();
        let destination = *self
            .geometry
            .open_cells(Some(agent))
            .choose(rng)
            .ok_or(Error::NoFreeCell {
                what: "destination",
            })?;
        self.geometry.relocate_destination(destination)?;
        self.state = AgentState::observe(&self.geometry, self.state.pose());
        Ok(())
    }

    /// Force the agent into `pose`, re-deriving its observation
    pub fn place_agent(&mut self, pose: Pose) -> Result<()> {
        if !self.geometry.contains(pose.position) || self.geometry.is_obstacle(pose.position) {
            let space = self.state_space();
            return Err(Error::StateOutOfRange {
                row: pose.position.row,
                col: pose.position.col,
                orientation: pose.orientation.index(),
                length: space.length(),
                width: space.width(),
            });
        }
        self.state = AgentState::observe(&self.geometry, pose);
        Ok(())
    }

    /// One character per cell: `-` free, `A` agent, `O` obstacle, `D` destination
    pub fn char_grid(&self) -> Vec<Vec<char>> {
        self.geometry.char_grid(self.state.position())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn new_places_agent_on_source() {
        let mut rng = StdRng::seed_from_u64(3);
        let world = Gridworld::new(&GridworldConfig::new(5), &mut rng).unwrap();
        assert_eq!(world.coords(), world.source());
        assert_ne!(world.source(), world.destination());
        assert_eq!(world.geometry().obstacles().len(), 5);
        assert_eq!(world.num_states(), 5 * 5 * 4 * 27);
        assert_eq!(world.num_actions(), 6);
    }

    #[test]
    fn resets_keep_roles_disjoint() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = Gridworld::new(&GridworldConfig::new(4), &mut rng).unwrap();
        for _ in 0..100 {
            world.reset_agent(&mut rng).unwrap();
            assert!(!world.geometry().is_obstacle(world.coords()));
            assert!(!world.at_destination());

            world.reset_destination(&mut rng).unwrap();
            assert!(!world.geometry().is_obstacle(world.destination()));
            assert_ne!(world.destination(), world.coords());
            assert_eq!(
                *world.state(),
                AgentState::observe(world.geometry(), world.state().pose())
            );
        }
    }

    #[test]
    fn reset_destination_may_redraw_the_same_cell() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = GridworldConfig::new(2).with_width(1).with_obstacle_count(0);
        let mut world = Gridworld::new(&config, &mut rng).unwrap();
        let destination = world.destination();
        world.reset_destination(&mut rng).unwrap();
        assert_eq!(world.destination(), destination);
    }

    #[test]
    fn char_grid_marks_every_role() {
        let mut rng = StdRng::seed_from_u64(9);
        let world = Gridworld::new(&GridworldConfig::new(6), &mut rng).unwrap();
        let grid = world.char_grid();
        let count = |c: char| grid.iter().flatten().filter(|&&x| x == c).count();
        assert_eq!(count('A'), 1);
        assert_eq!(count('D'), 1);
        assert_eq!(count('O'), 6);
        assert_eq!(count('-'), 36 - 8);
    }
}
