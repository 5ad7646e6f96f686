//! Agent state and local sensing

use serde::{Deserialize, Serialize};

use super::{
    action::Orientation,
    geometry::{GridGeometry, Marker, Position},
};

/// Position and heading: the part of the agent state that the agent controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub orientation: Orientation,
}

impl Pose {
    pub const fn new(position: Position, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// Markers of the three cells in front of the agent.
///
/// The probed cells are the row (or column) directly ahead, spanning
/// offsets -1, 0, +1 along the axis perpendicular to the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation(pub [Marker; 3]);

impl Observation {
    /// Sense the surroundings of `pose` on `geometry`
    pub fn sense(geometry: &GridGeometry, pose: Pose) -> Self {
        let (dr, dc) = pose.orientation.heading();
        let (ahead_row, ahead_col) = pose.position.offset((dr, dc));
        // Perpendicular axis: sweep columns when heading vertically, rows otherwise.
        let (pr, pc) = if dc == 0 { (0, 1) } else { (1, 0) };
        let probe = |k: isize| geometry.probe(ahead_row + k * pr, ahead_col + k * pc);
        Observation([probe(-1), probe(0), probe(1)])
    }

    pub fn markers(&self) -> [Marker; 3] {
        self.0
    }

    /// Marker codes as used for table indexing
    pub fn codes(&self) -> [usize; 3] {
        self.0.map(Marker::code)
    }
}

/// Full agent state: the 6-tuple (row, col, orientation, obs0, obs1, obs2).
///
/// The observation is a cache derived from the pose and the geometry; it is
/// only ever produced by [`AgentState::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentState {
    pose: Pose,
    observation: Observation,
}

impl AgentState {
    /// Build the state for `pose`, deriving its observation from `geometry`
    pub fn observe(geometry: &GridGeometry, pose: Pose) -> Self {
        Self {
            pose,
            observation: Observation::sense(geometry, pose),
        }
    }

    /// Rebuild a state from its raw tuple without consulting a geometry.
    ///
    /// Used when decoding table indices; the caller is responsible for the
    /// observation matching the pose if the state is fed back to a grid.
    pub(crate) fn from_parts(pose: Pose, observation: Observation) -> Self {
        Self { pose, observation }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn position(&self) -> Position {
        self.pose.position
    }

    pub fn orientation(&self) -> Orientation {
        self.pose.orientation
    }

    pub fn observation(&self) -> Observation {
        self.observation
    }

    /// The state as a flat tuple of integers
    pub fn as_tuple(&self) -> [usize; 6] {
        let [o0, o1, o2] = self.observation.codes();
        [
            self.pose.position.row,
            self.pose.position.col,
            self.pose.orientation.index(),
            o0,
            o1,
            o2,
        ]
    }
}
