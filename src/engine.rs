//! Turn orchestration.
//!
//! Holds the configured policy and the per-match history, and turns one
//! game state into one action command per agent. Every agent is searched
//! against the same turn-start state; decisions made earlier in the turn
//! are not folded back before the next agent searches.
//!
//! The transport may poll the same turn more than once. A repeated turn is
//! decided against the same history as its first decision; a turn lower
//! than the last one decided starts a new match.

use tracing::{debug, info, trace, warn};

use crate::board::{Coord, GameState};
use crate::config::SearchConfig;
use crate::protocol::{ActionCommand, ActionKind, ActionSubmission, Snapshot, SnapshotError};
use crate::search::{build_policy, Policy};

/// Drives one decision per agent per turn.
pub struct Orchestrator {
    policy: Box<dyn Policy>,
    /// Agent positions at the start of the turn before the current one.
    previous: Vec<Option<Coord>>,
    /// Last decided turn and the agent positions it started from.
    last: Option<(u32, Vec<Option<Coord>>)>,
}

impl Orchestrator {
    /// Creates an orchestrator using the policy described by `config`.
    pub fn new(config: &SearchConfig) -> Self {
        Orchestrator::with_policy(build_policy(config))
    }

    /// Creates an orchestrator around an explicit policy.
    pub fn with_policy(policy: Box<dyn Policy>) -> Self {
        Orchestrator {
            policy,
            previous: Vec::new(),
            last: None,
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Forgets all turn history, for a new match.
    pub fn new_match(&mut self) {
        self.previous.clear();
        self.last = None;
    }

    /// Rolls the turn history forward to `turn`.
    fn enter_turn(&mut self, turn: u32) {
        match self.last.take() {
            Some((last, positions)) if turn > last => self.previous = positions,
            Some((last, positions)) if turn == last => {
                debug!(turn, "turn repeated, reusing its history");
                self.last = Some((last, positions));
            }
            Some((last, _)) => {
                info!(turn, last, "turn went backwards, starting a new match");
                self.previous.clear();
            }
            None => {}
        }
    }

    /// Decides every agent's action for this turn, in agent order.
    ///
    /// Unplaced agents are placed on the best free cell. Placed agents run
    /// the policy; an agent stays put (no command) when it has no move,
    /// when its move would step straight back onto the cell it held at the
    /// start of the previous turn, or when an earlier agent already claimed
    /// the same target this turn.
    pub fn decide_turn(&mut self, state: &GameState) -> Vec<ActionCommand> {
        trace!(turn = state.turn(), board = %state, "deciding turn");
        self.enter_turn(state.turn());
        let mut claimed: Vec<Coord> = Vec::new();
        let mut commands = Vec::with_capacity(state.agent_count());

        for agent in 0..state.agent_count() {
            let Some(pos) = state.agent_position(agent) else {
                match initial_placement(state, &claimed) {
                    Some(c) => {
                        claimed.push(c);
                        commands.push(ActionCommand {
                            agent_id: agent,
                            kind: ActionKind::Place,
                            x: c.x,
                            y: c.y,
                        });
                    }
                    None => warn!(agent, "no free cell to place agent"),
                }
                continue;
            };

            let Some(dir) = self.policy.select(state, agent) else {
                debug!(agent, "no legal move, staying");
                continue;
            };
            let Some(target) = pos.step(dir, state.width(), state.height()) else {
                warn!(agent, %dir, "policy chose a move off the board");
                continue;
            };

            let kind = if state.tile_at(target).is_foreign_wall(state.owner()) {
                ActionKind::Remove
            } else {
                ActionKind::Move
            };

            if kind == ActionKind::Move
                && self.previous.get(agent).copied().flatten() == Some(target)
            {
                debug!(agent, %target, "move reverses last turn, staying");
                continue;
            }
            if claimed.contains(&target) {
                debug!(agent, %target, "target already claimed this turn, staying");
                continue;
            }

            claimed.push(target);
            let cmd = ActionCommand {
                agent_id: agent,
                kind,
                x: target.x,
                y: target.y,
            };
            debug!(%cmd, policy = self.policy.name(), "decided");
            commands.push(cmd);
        }

        self.last = Some((state.turn(), state.agents().to_vec()));
        commands
    }

    /// Validates a snapshot and decides the turn it describes.
    pub fn handle_snapshot(
        &mut self,
        snapshot: &Snapshot,
    ) -> Result<ActionSubmission, SnapshotError> {
        let state = snapshot.into_state()?;
        Ok(ActionSubmission::new(self.decide_turn(&state)))
    }
}

/// Picks the highest-valued cell that is unowned, unoccupied and not yet
/// claimed this turn. Ties go to the first cell in row-major order.
fn initial_placement(state: &GameState, claimed: &[Coord]) -> Option<Coord> {
    let mut best: Option<(Coord, u32)> = None;
    for y in 0..state.height() {
        for x in 0..state.width() {
            let c = Coord::new(x, y);
            if state.tile_at(c).owner.is_some() || state.is_occupied(c) || claimed.contains(&c) {
                continue;
            }
            let value = state.point_at(c);
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((c, value));
            }
        }
    }
    best.map(|(c, _)| c)
}
