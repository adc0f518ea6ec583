//! Board representation and game-state types.
//!
//! Contains the grid coordinates, movement directions, tiles and the overall
//! game state with its transition and terminal-check operations.

pub mod coord;
pub mod state;
pub mod tile;

pub use coord::{Coord, Direction, ALL_DIRECTIONS};
pub use state::{BoardParams, GameState, StateError};
pub use tile::{Tile, TileKind};
