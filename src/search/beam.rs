//! Beam search.
//!
//! Keeps a generation of states ranked by evaluated score, expands the top
//! `width` of them one ply per depth level, and returns the root action that
//! leads to the best state found. Ranking is an explicit max-heap on
//! `(evaluated_score, earliest insertion)`, so ties always resolve to the
//! state pushed first.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;
use tracing::{trace, warn};

use crate::board::{Direction, GameState};
use crate::eval::Heuristic;
use crate::search::{Policy, SearchResult};

/// A state together with its rank key.
struct Ranked {
    score: i64,
    seq: u64,
    state: GameState,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// An ordered multiset of states, best first.
struct Generation {
    heap: BinaryHeap<Ranked>,
    next_seq: u64,
}

impl Generation {
    fn new() -> Self {
        Generation {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, state: GameState) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Ranked {
            score: state.evaluated_score(),
            seq,
            state,
        });
    }

    /// Re-inserts an entry popped earlier, keeping its original rank.
    fn restore(&mut self, entry: Ranked) {
        self.heap.push(entry);
    }

    fn pop(&mut self) -> Option<Ranked> {
        self.heap.pop()
    }

    fn best(&self) -> Option<&GameState> {
        self.heap.peek().map(|r| &r.state)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Expands `parent` over every legal action of `agent`.
fn expand(parent: &GameState, agent: usize, root: bool, heuristic: Heuristic) -> Vec<GameState> {
    let actions = parent.legal_actions(agent);
    let mut children = Vec::with_capacity(actions.len());
    for action in actions {
        let mut child = parent.clone();
        if let Err(err) = child.advance(action, agent) {
            warn!(%err, "skipping expansion");
            continue;
        }
        child.evaluate_score(heuristic);
        if root {
            child.set_first_action(action);
        }
        children.push(child);
    }
    children
}

/// Runs a beam search for `agent` from `state`.
///
/// `action` is `None` when the root could not be expanded (terminal state,
/// unplaced agent, no legal moves, or a zero width/depth).
pub fn beam_search(
    state: &GameState,
    agent: usize,
    width: usize,
    depth: usize,
    heuristic: Heuristic,
    parallel: bool,
) -> SearchResult {
    let mut current = Generation::new();
    current.push(state.clone());
    let mut nodes: u64 = 0;
    let mut reached = 0;

    for t in 0..depth {
        let mut parents: Vec<Ranked> = Vec::with_capacity(width);
        while parents.len() < width {
            match current.pop() {
                Some(r) => parents.push(r),
                None => break,
            }
        }

        let root = t == 0;
        let children: Vec<Vec<GameState>> = if parallel {
            parents
                .par_iter()
                .map(|p| expand(&p.state, agent, root, heuristic))
                .collect()
        } else {
            parents
                .iter()
                .map(|p| expand(&p.state, agent, root, heuristic))
                .collect()
        };

        let mut next = Generation::new();
        for child in children.into_iter().flatten() {
            nodes += 1;
            next.push(child);
        }

        if next.is_empty() {
            for p in parents {
                current.restore(p);
            }
            break;
        }

        current = next;
        reached = t + 1;
        trace!(
            depth = reached,
            generation = current.len(),
            best = current.best().map(|s| s.evaluated_score()),
            "beam level expanded"
        );

        if current.best().is_some_and(|s| s.is_terminal()) {
            break;
        }
    }

    let best = current.best();
    SearchResult {
        action: best.and_then(|s| s.first_action()),
        score: best.map_or(0, |s| s.evaluated_score()),
        nodes,
        depth: reached,
    }
}

/// Bounded-width, bounded-depth tree search policy.
#[derive(Debug, Clone)]
pub struct BeamSearchPolicy {
    pub width: usize,
    pub depth: usize,
    pub heuristic: Heuristic,
    /// Fan out per-state expansion over the rayon pool.
    pub parallel: bool,
}

impl BeamSearchPolicy {
    pub fn new(width: usize, depth: usize) -> Self {
        BeamSearchPolicy {
            width,
            depth,
            heuristic: Heuristic::default(),
            parallel: false,
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn search(&self, state: &GameState, agent: usize) -> SearchResult {
        beam_search(
            state,
            agent,
            self.width,
            self.depth,
            self.heuristic,
            self.parallel,
        )
    }
}

impl Policy for BeamSearchPolicy {
    fn name(&self) -> &'static str {
        "beam"
    }

    fn select(&mut self, state: &GameState, agent: usize) -> Option<Direction> {
        self.search(state, agent).action
    }
}
