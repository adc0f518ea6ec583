//! Search and planning.
//!
//! Every policy maps a game state and an agent index to a direction without
//! touching the input state; expansions always work on owned clones.
//! `None` means the agent has no move this turn.

pub mod beam;
pub mod greedy;
pub mod random;

use serde::{Deserialize, Serialize};

use crate::board::{Direction, GameState};
use crate::config::SearchConfig;

pub use beam::{beam_search, BeamSearchPolicy};
pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;

/// Result of a search: the chosen root action and associated info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub action: Option<Direction>,
    /// Evaluated score of the best state found.
    pub score: i64,
    /// Child states generated.
    pub nodes: u64,
    /// Depth levels actually expanded.
    pub depth: usize,
}

/// An action-selection strategy.
pub trait Policy: Send {
    fn name(&self) -> &'static str;

    /// Chooses a direction for `agent`, or `None` if it cannot move.
    fn select(&mut self, state: &GameState, agent: usize) -> Option<Direction>;
}

/// Which policy a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    Greedy,
    #[default]
    Beam,
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(PolicyKind::Random),
            "greedy" => Ok(PolicyKind::Greedy),
            "beam" => Ok(PolicyKind::Beam),
            other => Err(format!("unknown policy '{}'", other)),
        }
    }
}

/// Builds the policy described by `config`. A zero seed draws the random
/// policy's generator from entropy.
pub fn build_policy(config: &SearchConfig) -> Box<dyn Policy> {
    match config.policy {
        PolicyKind::Random => {
            if config.seed != 0 {
                Box::new(RandomPolicy::new(config.seed))
            } else {
                Box::new(RandomPolicy::from_entropy())
            }
        }
        PolicyKind::Greedy => Box::new(GreedyPolicy::with_heuristic(config.heuristic)),
        PolicyKind::Beam => Box::new(
            BeamSearchPolicy::new(config.beam_width, config.beam_depth)
                .with_heuristic(config.heuristic)
                .with_parallel(config.parallel),
        ),
    }
}
