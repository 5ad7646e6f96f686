//! Bijective maps between agent states and flat table indices.
//!
//! The full state space is laid out row-major over
//! `[length, width, 4, 3, 3, 3]`; the pose space over `[length, width, 4]`.
//! Index newtypes can only be produced by a [`StateSpace`], so a table
//! built for the same space can index them without further checks.

use serde::{Deserialize, Serialize};

use super::{
    action::{NUM_ORIENTATIONS, Orientation},
    geometry::{Marker, NUM_MARKERS, Position},
    state::{AgentState, Observation, Pose},
};
use crate::{Error, Result};

/// Number of distinct observations (3 markers over 3 probed cells)
pub const NUM_OBSERVATIONS: usize = NUM_MARKERS * NUM_MARKERS * NUM_MARKERS;

/// Flat index of a full 6-tuple state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateIndex(usize);

impl StateIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Flat index of a pose (position and orientation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoseIndex(usize);

impl PoseIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Shape of the enumerated state space of one grid size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateSpace {
    length: usize,
    width: usize,
}

impl StateSpace {
    pub fn new(length: usize, width: usize) -> Self {
        Self { length, width }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of full states: `length * width * 4 * 27`
    pub fn num_states(&self) -> usize {
        self.num_poses() * NUM_OBSERVATIONS
    }

    /// Number of poses: `length * width * 4`
    pub fn num_poses(&self) -> usize {
        self.length * self.width * NUM_ORIENTATIONS
    }

    /// Dimensions of a state-value table over full states
    pub fn shape(&self) -> [usize; 6] {
        [
            self.length,
            self.width,
            NUM_ORIENTATIONS,
            NUM_MARKERS,
            NUM_MARKERS,
            NUM_MARKERS,
        ]
    }

    pub fn describe(&self) -> String {
        format!("{}x{}", self.length, self.width)
    }

    fn check_position(&self, pose: Pose) -> Result<()> {
        let Position { row, col } = pose.position;
        if row < self.length && col < self.width {
            Ok(())
        } else {
            Err(Error::StateOutOfRange {
                row,
                col,
                orientation: pose.orientation.index(),
                length: self.length,
                width: self.width,
            })
        }
    }

    pub fn encode_pose(&self, pose: Pose) -> Result<PoseIndex> {
        self.check_position(pose)?;
        let Position { row, col } = pose.position;
        Ok(PoseIndex(
            (row * self.width + col) * NUM_ORIENTATIONS + pose.orientation.index(),
        ))
    }

    pub fn decode_pose(&self, index: usize) -> Result<Pose> {
        if index >= self.num_poses() {
            return Err(Error::IndexOutOfRange {
                kind: "pose",
                index,
                bound: self.num_poses(),
            });
        }
        let orientation = Orientation::from_index(index % NUM_ORIENTATIONS)?;
        let cell = index / NUM_ORIENTATIONS;
        Ok(Pose::new(
            Position::new(cell / self.width, cell % self.width),
            orientation,
        ))
    }

    /// Wrap a raw index after range-checking it
    pub fn pose_index(&self, index: usize) -> Result<PoseIndex> {
        self.decode_pose(index).map(|_| PoseIndex(index))
    }

    /// Iterate over every pose in index order
    pub fn poses(&self) -> impl Iterator<Item = (PoseIndex, Pose)> + '_ {
        (0..self.num_poses()).map(move |i| {
            let orientation = Orientation::ALL[i % NUM_ORIENTATIONS];
            let cell = i / NUM_ORIENTATIONS;
            (
                PoseIndex(i),
                Pose::new(
                    Position::new(cell / self.width, cell % self.width),
                    orientation,
                ),
            )
        })
    }

    pub fn encode(&self, state: &AgentState) -> Result<StateIndex> {
        let pose = self.encode_pose(state.pose())?.get();
        let observation = state
            .observation()
            .codes()
            .iter()
            .fold(0, |acc, code| acc * NUM_MARKERS + code);
        Ok(StateIndex(pose * NUM_OBSERVATIONS + observation))
    }

    pub fn decode(&self, index: usize) -> Result<AgentState> {
        if index >= self.num_states() {
            return Err(Error::IndexOutOfRange {
                kind: "state",
                index,
                bound: self.num_states(),
            });
        }
        let pose = self.decode_pose(index / NUM_OBSERVATIONS)?;
        let mut rest = index % NUM_OBSERVATIONS;
        let mut markers = [Marker::Free; 3];
        for slot in markers.iter_mut().rev() {
            *slot = Marker::from_code(rest % NUM_MARKERS)?;
            rest /= NUM_MARKERS;
        }
        Ok(AgentState::from_parts(pose, Observation(markers)))
    }

    /// Wrap a raw index after range-checking it
    pub fn state_index(&self, index: usize) -> Result<StateIndex> {
        self.decode(index).map(|_| StateIndex(index))
    }
}
