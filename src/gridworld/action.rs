//! Actions, headings and their index encodings

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of actions available in every state
pub const NUM_ACTIONS: usize = 6;

/// Number of distinct headings
pub const NUM_ORIENTATIONS: usize = 4;

/// An action the agent can command.
///
/// The four translations are grid-relative (they do not depend on the
/// heading); the two turns rotate the heading in place. The declaration
/// order is the fixed action ordering used to index value tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
    TurnRight,
    TurnLeft,
}

impl Action {
    /// All actions in index order
    pub const ALL: [Action; NUM_ACTIONS] = [
        Action::Up,
        Action::Right,
        Action::Down,
        Action::Left,
        Action::TurnRight,
        Action::TurnLeft,
    ];

    /// Position of this action in [`Action::ALL`]
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
            Action::TurnRight => 4,
            Action::TurnLeft => 5,
        }
    }

    /// Inverse of [`Action::index`]
    pub fn from_index(index: usize) -> Result<Action> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                kind: "action",
                index,
                bound: NUM_ACTIONS,
            })
    }

    /// Short symbol (`u`, `r`, `d`, `l`, `tr`, `tl`)
    pub fn symbol(self) -> &'static str {
        match self {
            Action::Up => "u",
            Action::Right => "r",
            Action::Down => "d",
            Action::Left => "l",
            Action::TurnRight => "tr",
            Action::TurnLeft => "tl",
        }
    }

    /// Row/column offset of a translation, `None` for turns
    pub fn delta(self) -> Option<(isize, isize)> {
        match self {
            Action::Up => Some((-1, 0)),
            Action::Right => Some((0, 1)),
            Action::Down => Some((1, 0)),
            Action::Left => Some((0, -1)),
            Action::TurnRight | Action::TurnLeft => None,
        }
    }

    pub fn is_turn(self) -> bool {
        matches!(self, Action::TurnRight | Action::TurnLeft)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.symbol() == s)
            .ok_or_else(|| Error::UnknownAction {
                symbol: s.to_string(),
            })
    }
}

/// Heading of the agent.
///
/// Orientation `i` faces the direction of the `i`-th translation action,
/// so North/East/South/West map to 0/1/2/3 and turning right adds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; NUM_ORIENTATIONS] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Orientation::North => 0,
            Orientation::East => 1,
            Orientation::South => 2,
            Orientation::West => 3,
        }
    }

    pub fn from_index(index: usize) -> Result<Orientation> {
        Orientation::ALL
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                kind: "orientation",
                index,
                bound: NUM_ORIENTATIONS,
            })
    }

    /// Rotate clockwise by one step
    pub fn turned_right(self) -> Orientation {
        Orientation::ALL[(self.index() + 1) % NUM_ORIENTATIONS]
    }

    /// Rotate counter-clockwise by one step
    pub fn turned_left(self) -> Orientation {
        Orientation::ALL[(self.index() + NUM_ORIENTATIONS - 1) % NUM_ORIENTATIONS]
    }

    /// Row/column offset of the cell directly ahead
    pub fn heading(self) -> (isize, isize) {
        match self {
            Orientation::North => (-1, 0),
            Orientation::East => (0, 1),
            Orientation::South => (1, 0),
            Orientation::West => (0, -1),
        }
    }
}
