//! Uniform random policy.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{Direction, GameState};
use crate::search::Policy;

/// Samples uniformly among the legal actions.
///
/// The generator is owned by the policy and advances on every call, so
/// successive decisions differ while a fixed seed stays reproducible.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        RandomPolicy {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomPolicy {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(&mut self, state: &GameState, agent: usize) -> Option<Direction> {
        let legal = state.legal_actions(agent);
        if legal.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..legal.len());
        Some(legal[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Coord;

    fn open_state() -> GameState {
        GameState::new(3, 3, 50, vec![0; 9])
            .unwrap()
            .with_agents(vec![Some(Coord::new(1, 1))])
            .unwrap()
    }

    #[test]
    fn same_seed_same_sequence() {
        let state = open_state();
        let mut a = RandomPolicy::new(42);
        let mut b = RandomPolicy::new(42);
        let xs: Vec<_> = (0..32).map(|_| a.select(&state, 0)).collect();
        let ys: Vec<_> = (0..32).map(|_| b.select(&state, 0)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn repeated_calls_vary() {
        let state = open_state();
        let mut policy = RandomPolicy::new(7);
        let picks: Vec<_> = (0..64).filter_map(|_| policy.select(&state, 0)).collect();
        assert!(picks.iter().any(|d| *d != picks[0]));
    }

    #[test]
    fn only_returns_legal_actions() {
        let state = GameState::new(2, 2, 1, vec![0, 1, 2, 3])
            .unwrap()
            .with_agents(vec![Some(Coord::new(0, 0))])
            .unwrap();
        let legal = state.legal_actions(0);
        let mut policy = RandomPolicy::new(3);
        for _ in 0..50 {
            let d = policy.select(&state, 0).unwrap();
            assert!(legal.contains(&d));
        }
    }

    #[test]
    fn no_legal_actions_is_no_move() {
        let state = GameState::new(1, 1, 2, vec![0])
            .unwrap()
            .with_agents(vec![Some(Coord::new(0, 0))])
            .unwrap();
        assert_eq!(RandomPolicy::new(1).select(&state, 0), None);
    }
}
