//! Search configuration.
//!
//! Configuration is passed explicitly to the orchestrator and binaries; it
//! can be loaded from a JSON file where every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::Heuristic;
use crate::search::PolicyKind;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for action selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub policy: PolicyKind,
    /// States kept per beam level.
    pub beam_width: usize,
    /// Beam levels (plies) to expand.
    pub beam_depth: usize,
    pub heuristic: Heuristic,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Expand beam levels on the rayon pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            policy: PolicyKind::Beam,
            beam_width: 3,
            beam_depth: 4,
            heuristic: Heuristic::GameScore,
            seed: 0,
            parallel: false,
        }
    }
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }
}
