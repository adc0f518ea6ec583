//! Position evaluation.
//!
//! Scores a game state for ranking during search: either the collected
//! score or the points of territory enclosed by the owner's walls.

pub mod enclosure;
pub(crate) mod heuristic;

pub use enclosure::{enclosed_points, enclosure_mask};
pub use heuristic::{evaluate, Heuristic};
