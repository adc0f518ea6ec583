//! Match protocol handling.
//!
//! Wire types exchanged with the match transport: turn snapshots, the full
//! match document, and the per-turn action submission. The transport itself
//! (HTTP, polling, authentication) lives outside this crate.

pub mod command;
pub mod match_view;
pub mod snapshot;

pub use command::{ActionCommand, ActionKind, ActionSubmission};
pub use match_view::{Field, GameStatus, MatchView, Player, PlayerPoint};
pub use snapshot::{AgentSnapshot, Snapshot, SnapshotError, TileSnapshot};
