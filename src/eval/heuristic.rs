//! State evaluation heuristics.
//!
//! A heuristic maps a state to an `i64` used only for ranking during search.
//! It never mutates the state.

use serde::{Deserialize, Serialize};

use super::enclosure::enclosed_points;
use crate::board::GameState;

/// Which evaluation a search ranks states by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// The collected game score.
    #[default]
    GameScore,
    /// Points of the state owner's tiles enclosed by its own walls.
    Enclosure,
}

impl Heuristic {
    /// Evaluates `state` from the perspective of its owner.
    pub fn evaluate(self, state: &GameState) -> i64 {
        match self {
            Heuristic::GameScore => state.score(),
            Heuristic::Enclosure => enclosed_points(state, state.owner()),
        }
    }
}

impl std::str::FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "game_score" | "score" => Ok(Heuristic::GameScore),
            "enclosure" => Ok(Heuristic::Enclosure),
            other => Err(format!("unknown heuristic '{}'", other)),
        }
    }
}

/// Evaluates `state` with `heuristic`.
#[inline]
pub fn evaluate(heuristic: Heuristic, state: &GameState) -> i64 {
    heuristic.evaluate(state)
}
