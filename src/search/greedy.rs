//! One-ply greedy policy.

use crate::board::{Direction, GameState};
use crate::eval::Heuristic;
use crate::search::Policy;

/// Picks the action whose resulting state evaluates highest.
///
/// Only a strictly greater score replaces the current best, so the first
/// action in canonical order wins ties.
#[derive(Debug, Clone, Default)]
pub struct GreedyPolicy {
    pub heuristic: Heuristic,
}

impl GreedyPolicy {
    pub fn new() -> Self {
        GreedyPolicy::default()
    }

    pub fn with_heuristic(heuristic: Heuristic) -> Self {
        GreedyPolicy { heuristic }
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn select(&mut self, state: &GameState, agent: usize) -> Option<Direction> {
        let mut best: Option<(Direction, i64)> = None;
        for action in state.legal_actions(agent) {
            let mut child = state.clone();
            if child.advance(action, agent).is_err() {
                continue;
            }
            child.evaluate_score(self.heuristic);
            let score = child.evaluated_score();
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((action, score));
            }
        }
        best.map(|(action, _)| action)
    }
}
