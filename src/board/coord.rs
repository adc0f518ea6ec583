//! Grid coordinates and movement directions.
//!
//! A coordinate is an `(x, y)` pair where `x` indexes columns and `y`
//! indexes rows. Directions are the four orthogonal steps an agent can take
//! in one turn.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    /// Returns the neighbouring cell in `dir`, or `None` if it would leave a
    /// `width` x `height` grid.
    pub fn step(self, dir: Direction, width: usize, height: usize) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        if x < width && y < height {
            Some(Coord { x, y })
        } else {
            None
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One orthogonal step.
///
/// The declaration order is the canonical legal-action order; tie-breaking
/// in every policy depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

/// All directions in canonical order.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

impl Direction {
    /// Returns the `(dx, dy)` offset. `y` grows downwards.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_grid() {
        let c = Coord::new(0, 0);
        assert_eq!(c.step(Direction::Right, 2, 2), Some(Coord::new(1, 0)));
        assert_eq!(c.step(Direction::Down, 2, 2), Some(Coord::new(0, 1)));
        assert_eq!(c.step(Direction::Left, 2, 2), None);
        assert_eq!(c.step(Direction::Up, 2, 2), None);
    }

    #[test]
    fn step_rejects_far_edge() {
        let c = Coord::new(1, 1);
        assert_eq!(c.step(Direction::Right, 2, 2), None);
        assert_eq!(c.step(Direction::Down, 2, 2), None);
    }

    #[test]
    fn display_is_lowercase() {
        let names: Vec<String> = ALL_DIRECTIONS.iter().map(|d| d.to_string()).collect();
        assert_eq!(names, ["right", "left", "down", "up"]);
    }
}
