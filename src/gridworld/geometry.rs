//! Static grid layout: dimensions, obstacles and the destination

use std::fmt;

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// A cell on the grid, addressed by row then column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset this position, returning signed coordinates that may fall off the grid
    pub fn offset(self, (dr, dc): (isize, isize)) -> (isize, isize) {
        (self.row as isize + dr, self.col as isize + dc)
    }

    /// Manhattan distance to another cell
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Semantic type of a cell as seen by the agent's sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    Free,
    Obstacle,
    Destination,
}

/// Number of distinct marker codes
pub const NUM_MARKERS: usize = 3;

impl Marker {
    pub const ALL: [Marker; NUM_MARKERS] = [Marker::Free, Marker::Obstacle, Marker::Destination];

    /// Integer marker code (0 free, 1 obstacle, 2 destination)
    pub fn code(self) -> usize {
        match self {
            Marker::Free => 0,
            Marker::Obstacle => 1,
            Marker::Destination => 2,
        }
    }

    pub fn from_code(code: usize) -> Result<Marker> {
        Marker::ALL.get(code).copied().ok_or(Error::IndexOutOfRange {
            kind: "marker",
            index: code,
            bound: NUM_MARKERS,
        })
    }
}

/// Character used for a free cell in [`GridGeometry::char_grid`]
pub const FREE_CHAR: char = '-';
/// Character used for the agent
pub const AGENT_CHAR: char = 'A';
/// Character used for an obstacle
pub const OBSTACLE_CHAR: char = 'O';
/// Character used for the destination
pub const DESTINATION_CHAR: char = 'D';

/// Immutable grid layout.
///
/// Invariants: the destination is in bounds and is not an obstacle, every
/// obstacle is in bounds, and obstacles are pairwise distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGeometry {
    length: usize,
    width: usize,
    /// Row-major obstacle mask
    blocked: Vec<bool>,
    obstacles: Vec<Position>,
    destination: Position,
    sense_walls: bool,
}

impl GridGeometry {
    /// Build a layout from explicit cells, validating the invariants
    pub fn new(
        length: usize,
        width: usize,
        obstacles: &[Position],
        destination: Position,
    ) -> Result<Self> {
        if length == 0 || width == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid dimensions must be positive, got {length}x{width}"),
            });
        }

        let in_bounds = |p: Position| p.row < length && p.col < width;
        if !in_bounds(destination) {
            return Err(Error::InvalidConfiguration {
                message: format!("destination {destination} lies outside a {length}x{width} grid"),
            });
        }

        let mut blocked = vec![false; length * width];
        let mut unique = Vec::with_capacity(obstacles.len());
        for &obstacle in obstacles {
            if !in_bounds(obstacle) {
                return Err(Error::InvalidConfiguration {
                    message: format!("obstacle {obstacle} lies outside a {length}x{width} grid"),
                });
            }
            if obstacle == destination {
                return Err(Error::InvalidConfiguration {
                    message: format!("obstacle {obstacle} coincides with the destination"),
                });
            }
            let slot = &mut blocked[obstacle.row * width + obstacle.col];
            if !*slot {
                *slot = true;
                unique.push(obstacle);
            }
        }

        Ok(Self {
            length,
            width,
            blocked,
            obstacles: unique,
            destination,
            sense_walls: false,
        })
    }

    /// Randomly lay out a grid.
    ///
    /// Returns the geometry together with the agent's source cell. Every
    /// cell is shuffled once and the source, destination and obstacles are
    /// taken from the front of the permutation, so the three roles are
    /// pairwise distinct and no retry loop is involved.
    pub fn generate<R: Rng + ?Sized>(
        length: usize,
        width: usize,
        obstacle_count: usize,
        rng: &mut R,
    ) -> Result<(Self, Position)> {
        let cells = length * width;
        if cells < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "a {length}x{width} grid cannot hold distinct source and destination cells"
                ),
            });
        }
        let capacity = cells - 2;
        if obstacle_count > capacity {
            return Err(Error::TooManyObstacles {
                requested: obstacle_count,
                capacity,
            });
        }

        let mut order: Vec<Position> = (0..length)
            .flat_map(|row| (0..width).map(move |col| Position::new(row, col)))
            .collect();
        order.shuffle(rng);

        let source = order[0];
        let destination = order[1];
        let obstacles = &order[2..2 + obstacle_count];
        debug!(
            %source,
            %destination,
            obstacles = obstacle_count,
            "generated {length}x{width} layout"
        );

        Ok((Self::new(length, width, obstacles, destination)?, source))
    }

    /// Enable or disable reading off-grid probes as obstacles
    pub fn with_sense_walls(mut self, sense_walls: bool) -> Self {
        self.sense_walls = sense_walls;
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell_count(&self) -> usize {
        self.length * self.width
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn obstacles(&self) -> &[Position] {
        &self.obstacles
    }

    pub fn sense_walls(&self) -> bool {
        self.sense_walls
    }

    /// Convert signed coordinates to a position if they fall on the grid
    pub fn cell_at(&self, row: isize, col: isize) -> Option<Position> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.length && col < self.width).then_some(Position::new(row, col))
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.length && position.col < self.width
    }

    pub fn is_obstacle(&self, position: Position) -> bool {
        self.contains(position) && self.blocked[position.row * self.width + position.col]
    }

    /// Marker of an on-grid cell, with priority destination > obstacle > free
    pub fn marker_at(&self, position: Position) -> Marker {
        if position == self.destination {
            Marker::Destination
        } else if self.is_obstacle(position) {
            Marker::Obstacle
        } else {
            Marker::Free
        }
    }

    /// Marker seen by a sensor probing signed coordinates.
    ///
    /// Off-grid probes read as free unless wall sensing is enabled, in
    /// which case they read as obstacles.
    pub fn probe(&self, row: isize, col: isize) -> Marker {
        match self.cell_at(row, col) {
            Some(position) => self.marker_at(position),
            None if self.sense_walls => Marker::Obstacle,
            None => Marker::Free,
        }
    }

    /// Non-obstacle cells other than `exclude`
    pub fn open_cells(&self, exclude: Option<Position>) -> Vec<Position> {
        (0..self.length)
            .flat_map(|row| (0..self.width).map(move |col| Position::new(row, col)))
            .filter(|&p| !self.is_obstacle(p) && Some(p) != exclude)
            .collect()
    }

    /// Cells that are neither obstacles, the destination, nor `exclude`
    pub fn free_cells(&self, exclude: Option<Position>) -> Vec<Position> {
        let mut cells = self.open_cells(exclude);
        cells.retain(|&p| p != self.destination);
        cells
    }

    /// Move the destination to another on-grid, non-obstacle cell
    pub fn relocate_destination(&mut self, destination: Position) -> Result<()> {
        if !self.contains(destination) || self.is_obstacle(destination) {
            return Err(Error::InvalidConfiguration {
                message: format!("destination {destination} must be a free on-grid cell"),
            });
        }
        self.destination = destination;
        Ok(())
    }

    /// Character rendering of the layout with the agent at `agent`.
    ///
    /// Exactly one character per cell, with precedence
    /// destination > obstacle > agent > free.
    pub fn char_grid(&self, agent: Position) -> Vec<Vec<char>> {
        (0..self.length)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        let position = Position::new(row, col);
                        match self.marker_at(position) {
                            Marker::Destination => DESTINATION_CHAR,
                            Marker::Obstacle => OBSTACLE_CHAR,
                            Marker::Free if position == agent => AGENT_CHAR,
                            Marker::Free => FREE_CHAR,
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
