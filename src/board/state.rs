//! Game state representation.
//!
//! Holds the complete snapshot of a match at a given turn: point values,
//! tile ownership, agent positions, collected score and turn counters.
//! Every grid is stored row-major (`y * width + x`) in an owned `Vec`, so
//! `Clone` is always a deep copy and two clones never share storage.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coord::{Coord, Direction, ALL_DIRECTIONS};
use super::tile::Tile;
use crate::eval::Heuristic;

/// Errors raised when building or advancing a state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("grid of {width}x{height} cells is too large")]
    GridTooLarge { width: usize, height: usize },

    #[error("{grid} grid has {actual} cells, expected {expected}")]
    GridSizeMismatch {
        grid: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("turn {turn} exceeds total turns {total_turns}")]
    TurnOutOfRange { turn: u32, total_turns: u32 },

    #[error("agent {agent} at {coord} lies outside the {width}x{height} grid")]
    AgentOutOfBounds {
        agent: usize,
        coord: Coord,
        width: usize,
        height: usize,
    },

    #[error("no agent with index {0}")]
    UnknownAgent(usize),

    #[error("agent {0} has not been placed")]
    UnplacedAgent(usize),

    #[error("agent {agent} cannot move {dir} from {from}")]
    OffBoard {
        agent: usize,
        dir: Direction,
        from: Coord,
    },

    #[error("game is over at turn {0}")]
    GameOver(u32),
}

/// Parameters for a seeded, self-contained board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardParams {
    pub width: usize,
    pub height: usize,
    pub total_turns: u32,
    pub agents: usize,
}

impl Default for BoardParams {
    fn default() -> Self {
        BoardParams {
            width: 4,
            height: 3,
            total_turns: 4,
            agents: 1,
        }
    }
}

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    width: usize,
    height: usize,
    total_turns: u32,
    turn: u32,
    /// Remaining pickup value per tile; zeroed once collected.
    points: Vec<u32>,
    tiles: Vec<Tile>,
    /// Agent positions by id; `None` until the agent is placed.
    agents: Vec<Option<Coord>>,
    /// Player whose territory the enclosure heuristic evaluates.
    owner: usize,
    score: i64,
    evaluated_score: i64,
    first_action: Option<Direction>,
}

impl GameState {
    /// Creates a state with the given point grid, empty tiles and no agents.
    pub fn new(
        width: usize,
        height: usize,
        total_turns: u32,
        points: Vec<u32>,
    ) -> Result<Self, StateError> {
        let cells = cell_count(width, height)?;
        if points.len() != cells {
            return Err(StateError::GridSizeMismatch {
                grid: "point",
                expected: cells,
                actual: points.len(),
            });
        }
        Ok(GameState {
            width,
            height,
            total_turns,
            turn: 0,
            points,
            tiles: vec![Tile::EMPTY; cells],
            agents: Vec::new(),
            owner: 0,
            score: 0,
            evaluated_score: 0,
            first_action: None,
        })
    }

    /// Builds a random board: each agent lands on a random cell and every
    /// other cell gets a value in `0..10`.
    pub fn from_seed(seed: u64, params: &BoardParams) -> Result<Self, StateError> {
        let BoardParams {
            width,
            height,
            total_turns,
            agents,
        } = *params;
        let cells = cell_count(width, height)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let positions: Vec<Option<Coord>> = (0..agents)
            .map(|_| {
                let y = rng.gen_range(0..height);
                let x = rng.gen_range(0..width);
                Some(Coord::new(x, y))
            })
            .collect();

        let mut points = vec![0u32; cells];
        for y in 0..height {
            for x in 0..width {
                let c = Coord::new(x, y);
                if positions.contains(&Some(c)) {
                    continue;
                }
                points[y * width + x] = rng.gen_range(0..10);
            }
        }

        GameState::new(width, height, total_turns, points)?.with_agents(positions)
    }

    /// Replaces the tile grid.
    pub fn with_tiles(mut self, tiles: Vec<Tile>) -> Result<Self, StateError> {
        if tiles.len() != self.cells() {
            return Err(StateError::GridSizeMismatch {
                grid: "tile",
                expected: self.cells(),
                actual: tiles.len(),
            });
        }
        self.tiles = tiles;
        Ok(self)
    }

    /// Replaces the agent list. Every placed agent must be inside the grid.
    pub fn with_agents(mut self, agents: Vec<Option<Coord>>) -> Result<Self, StateError> {
        for (agent, pos) in agents.iter().enumerate() {
            if let Some(c) = *pos {
                if c.x >= self.width || c.y >= self.height {
                    return Err(StateError::AgentOutOfBounds {
                        agent,
                        coord: c,
                        width: self.width,
                        height: self.height,
                    });
                }
            }
        }
        self.agents = agents;
        Ok(self)
    }

    /// Sets the current turn.
    pub fn with_turn(mut self, turn: u32) -> Result<Self, StateError> {
        if turn > self.total_turns {
            return Err(StateError::TurnOutOfRange {
                turn,
                total_turns: self.total_turns,
            });
        }
        self.turn = turn;
        Ok(self)
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub fn with_owner(mut self, owner: usize) -> Self {
        self.owner = owner;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn total_turns(&self) -> u32 {
        self.total_turns
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    /// Heuristic value from the last `evaluate_score` call.
    pub fn evaluated_score(&self) -> i64 {
        self.evaluated_score
    }

    /// Root action that led to this state inside a beam search.
    pub fn first_action(&self) -> Option<Direction> {
        self.first_action
    }

    pub(crate) fn set_first_action(&mut self, action: Direction) {
        self.first_action = Some(action);
    }

    pub fn agents(&self) -> &[Option<Coord>] {
        &self.agents
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Returns the agent's position, or `None` if unknown or unplaced.
    pub fn agent_position(&self, agent: usize) -> Option<Coord> {
        self.agents.get(agent).copied().flatten()
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn point_at(&self, c: Coord) -> u32 {
        self.points[self.index(c)]
    }

    pub fn tile_at(&self, c: Coord) -> Tile {
        self.tiles[self.index(c)]
    }

    /// Returns true if any placed agent stands on `c`.
    pub fn is_occupied(&self, c: Coord) -> bool {
        self.agents.iter().any(|a| *a == Some(c))
    }

    #[inline]
    fn index(&self, c: Coord) -> usize {
        c.y * self.width + c.x
    }

    #[inline]
    fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Returns true once the turn bound is reached.
    pub fn is_terminal(&self) -> bool {
        self.turn == self.total_turns
    }

    /// Returns the directions the agent can move this turn, in canonical
    /// order. Empty for a terminal state, an unplaced or unknown agent, and
    /// a 1x1 grid.
    pub fn legal_actions(&self, agent: usize) -> Vec<Direction> {
        if self.is_terminal() {
            return Vec::new();
        }
        let Some(pos) = self.agent_position(agent) else {
            return Vec::new();
        };
        ALL_DIRECTIONS
            .iter()
            .copied()
            .filter(|&d| pos.step(d, self.width, self.height).is_some())
            .collect()
    }

    /// Moves the agent one cell, collects the destination's points and ends
    /// the turn. The state is left untouched on error.
    pub fn advance(&mut self, dir: Direction, agent: usize) -> Result<(), StateError> {
        if self.is_terminal() {
            return Err(StateError::GameOver(self.turn));
        }
        let from = match self.agents.get(agent) {
            None => return Err(StateError::UnknownAgent(agent)),
            Some(None) => return Err(StateError::UnplacedAgent(agent)),
            Some(Some(c)) => *c,
        };
        let to = from
            .step(dir, self.width, self.height)
            .ok_or(StateError::OffBoard { agent, dir, from })?;

        self.agents[agent] = Some(to);
        let i = self.index(to);
        self.score += i64::from(self.points[i]);
        self.points[i] = 0;
        self.turn += 1;
        Ok(())
    }

    /// Scores the state with `heuristic` and stores the result in
    /// `evaluated_score`. Nothing else changes.
    pub fn evaluate_score(&mut self, heuristic: Heuristic) {
        self.evaluated_score = heuristic.evaluate(self);
    }
}

/// Number of cells in a `width` x `height` grid.
fn cell_count(width: usize, height: usize) -> Result<usize, StateError> {
    if width == 0 || height == 0 {
        return Err(StateError::EmptyGrid { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(StateError::GridTooLarge { width, height })
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "turn:\t {}", self.turn)?;
        writeln!(f, "score:\t {}", self.score)?;
        for y in 0..self.height {
            for x in 0..self.width {
                let c = Coord::new(x, y);
                if self.is_occupied(c) {
                    write!(f, "{:>3}", '@')?;
                } else if self.point_at(c) > 0 {
                    write!(f, "{:>3}", self.point_at(c))?;
                } else {
                    write!(f, "{:>3}", '.')?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
