//! Action commands sent back to the match server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What an agent does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Put an unplaced agent on the board.
    #[serde(rename = "PUT")]
    Place,
    #[serde(rename = "MOVE")]
    Move,
    /// Clear a wall from the target cell.
    #[serde(rename = "REMOVE")]
    Remove,
}

/// One agent's action for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCommand {
    pub agent_id: usize,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub x: usize,
    pub y: usize,
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            ActionKind::Place => "put",
            ActionKind::Move => "move",
            ActionKind::Remove => "remove",
        };
        write!(f, "agent {} {} ({}, {})", self.agent_id, verb, self.x, self.y)
    }
}

/// The body submitted for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSubmission {
    pub actions: Vec<ActionCommand>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl ActionSubmission {
    pub fn new(actions: Vec<ActionCommand>) -> Self {
        ActionSubmission {
            actions,
            dry_run: false,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
