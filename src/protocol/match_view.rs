//! Live match documents.
//!
//! The match server describes a game as one JSON document covering every
//! player. `MatchView::snapshot_for` flattens it into the single-player
//! `Snapshot` the engine consumes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::snapshot::{AgentSnapshot, Snapshot, SnapshotError, TileSnapshot};

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Free,
    Ready,
    Gaming,
    Ended,
}

/// Board description inside a match document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub width: usize,
    pub height: usize,
    pub points: Vec<i64>,
    #[serde(default)]
    pub tiles: Vec<TileSnapshot>,
}

/// A player's score split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPoint {
    pub area_point: i64,
    pub wall_point: i64,
}

impl PlayerPoint {
    pub fn total(&self) -> i64 {
        self.area_point + self.wall_point
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: String,
    pub agents: Vec<AgentSnapshot>,
    #[serde(default)]
    pub point: PlayerPoint,
}

/// The full match document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub status: GameStatus,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub turn: u32,
    pub total_turn: u32,
    #[serde(default)]
    pub operation_sec: u64,
    #[serde(default)]
    pub transition_sec: u64,
    /// Zero or absent until the match has a start time.
    #[serde(default)]
    pub started_at_unix_time: Option<i64>,
    pub field: Field,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl MatchView {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns true once the server has scheduled a start time.
    pub fn is_started(&self) -> bool {
        self.started_at_unix_time.is_some_and(|t| t != 0)
    }

    pub fn is_ended(&self) -> bool {
        self.status == GameStatus::Ended
    }

    /// Wall-clock length of one turn: the operation step plus the
    /// transition step.
    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(self.operation_sec + self.transition_sec)
    }

    /// Builds the snapshot seen by `player` (an index into `players`).
    pub fn snapshot_for(&self, player: usize) -> Result<Snapshot, SnapshotError> {
        let me = self
            .players
            .get(player)
            .ok_or(SnapshotError::PlayerOutOfRange {
                index: player,
                players: self.players.len(),
            })?;
        Ok(Snapshot {
            width: self.field.width,
            height: self.field.height,
            points: self.field.points.clone(),
            tiles: self.field.tiles.clone(),
            agents: me.agents.clone(),
            turn: self.turn,
            total_turn: self.total_turn,
            score: me.point.total(),
            owner: player,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, Tile};

    const MATCH_JSON: &str = r#"{
        "status": "gaming",
        "id": "m-1",
        "turn": 3,
        "totalTurn": 30,
        "operationSec": 2,
        "transitionSec": 1,
        "startedAtUnixTime": 1700000000,
        "field": {
            "width": 2, "height": 2,
            "points": [1, 2, 3, 4],
            "tiles": [
                {"type": 1, "player": 0}, {"type": 0, "player": null},
                {"type": 0, "player": null}, {"type": 1, "player": 1}
            ]
        },
        "players": [
            {"id": "a", "agents": [{"x": 0, "y": 0}, {"x": -1, "y": -1}],
             "point": {"areaPoint": 3, "wallPoint": 1}},
            {"id": "b", "agents": [{"x": 1, "y": 1}, {"x": -1, "y": -1}],
             "point": {"areaPoint": 0, "wallPoint": 4}}
        ]
    }"#;

    #[test]
    fn parses_match_document() {
        let view = MatchView::from_json(MATCH_JSON).unwrap();
        assert_eq!(view.status, GameStatus::Gaming);
        assert!(view.is_started());
        assert!(!view.is_ended());
        assert_eq!(view.turn_duration(), Duration::from_secs(3));
        assert_eq!(view.players.len(), 2);
    }

    #[test]
    fn snapshot_for_second_player() {
        let view = MatchView::from_json(MATCH_JSON).unwrap();
        let snapshot = view.snapshot_for(1).unwrap();
        assert_eq!(snapshot.owner, 1);
        assert_eq!(snapshot.score, 4);
        assert_eq!(snapshot.turn, 3);

        let state = snapshot.into_state().unwrap();
        assert_eq!(state.agents(), &[Some(Coord::new(1, 1)), None]);
        assert_eq!(state.tile_at(Coord::new(1, 1)), Tile::wall(1));
    }

    #[test]
    fn unknown_player_is_an_error() {
        let view = MatchView::from_json(MATCH_JSON).unwrap();
        assert!(matches!(
            view.snapshot_for(2),
            Err(SnapshotError::PlayerOutOfRange { index: 2, players: 2 })
        ));
    }

    #[test]
    fn waiting_match_is_not_started() {
        let json = r#"{"status":"free","totalTurn":30,"startedAtUnixTime":0,
            "field":{"width":1,"height":1,"points":[0]}}"#;
        let view = MatchView::from_json(json).unwrap();
        assert!(!view.is_started());
        assert!(view.players.is_empty());
    }
}
