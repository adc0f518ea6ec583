//! Turn snapshots.
//!
//! A snapshot is the flat, point-in-time description of a match that the
//! transport hands to the engine. `Snapshot::into_state` validates it and
//! builds a `GameState`; nothing is clamped or repaired.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Coord, GameState, StateError, Tile, TileKind};

/// Errors that can occur while converting a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("point value {value} at cell {index} is out of range")]
    InvalidPoint { index: usize, value: i64 },

    #[error("invalid tile type {code} at cell {index}")]
    InvalidTileKind { index: usize, code: u8 },

    #[error("player index {index} out of range ({players} players)")]
    PlayerOutOfRange { index: usize, players: usize },

    #[error(transparent)]
    State(#[from] StateError),

    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A tile as sent on the wire: `type` 0 = position, 1 = wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    #[serde(rename = "type")]
    pub kind: u8,
    pub player: Option<usize>,
}

/// An agent position as sent on the wire. A negative coordinate marks an
/// agent that has not been placed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub x: i64,
    pub y: i64,
}

impl AgentSnapshot {
    pub const UNPLACED: AgentSnapshot = AgentSnapshot { x: -1, y: -1 };

    pub fn is_placed(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

/// Everything the engine needs to decide one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major point values.
    pub points: Vec<i64>,
    /// Row-major tiles; empty means an unclaimed board.
    #[serde(default)]
    pub tiles: Vec<TileSnapshot>,
    pub agents: Vec<AgentSnapshot>,
    pub turn: u32,
    pub total_turn: u32,
    /// The evaluating player's running score.
    #[serde(default)]
    pub score: i64,
    /// The evaluating player's id, as used in tile ownership.
    #[serde(default)]
    pub owner: usize,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the snapshot and builds the equivalent state.
    pub fn into_state(&self) -> Result<GameState, SnapshotError> {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                u32::try_from(value).map_err(|_| SnapshotError::InvalidPoint { index, value })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        let mut state = GameState::new(self.width, self.height, self.total_turn, points)?;

        if !self.tiles.is_empty() {
            let tiles = self
                .tiles
                .iter()
                .enumerate()
                .map(|(index, t)| {
                    let kind = TileKind::from_code(t.kind)
                        .ok_or(SnapshotError::InvalidTileKind { index, code: t.kind })?;
                    Ok(Tile {
                        kind,
                        owner: t.player,
                    })
                })
                .collect::<Result<Vec<Tile>, SnapshotError>>()?;
            state = state.with_tiles(tiles)?;
        }

        let agents = self
            .agents
            .iter()
            .map(|a| {
                a.is_placed()
                    .then(|| Coord::new(a.x as usize, a.y as usize))
            })
            .collect();

        Ok(state
            .with_agents(agents)?
            .with_turn(self.turn)?
            .with_score(self.score)
            .with_owner(self.owner))
    }
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Snapshot {
            width: state.width(),
            height: state.height(),
            points: state.points().iter().map(|&p| i64::from(p)).collect(),
            tiles: state
                .tiles()
                .iter()
                .map(|t| TileSnapshot {
                    kind: t.kind.code(),
                    player: t.owner,
                })
                .collect(),
            agents: state
                .agents()
                .iter()
                .map(|a| match a {
                    Some(c) => AgentSnapshot {
                        x: c.x as i64,
                        y: c.y as i64,
                    },
                    None => AgentSnapshot::UNPLACED,
                })
                .collect(),
            turn: state.turn(),
            total_turn: state.total_turns(),
            score: state.score(),
            owner: state.owner(),
        }
    }
}
