//! Gridsearch engine library.
//!
//! Exposes the board state, evaluation, search policies, turn orchestration,
//! match protocol types, and seeded playouts for use by integration tests
//! and the binary entry points.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod logger;
pub mod playout;
pub mod protocol;
pub mod search;
