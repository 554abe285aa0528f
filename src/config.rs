//! Solver configuration, loaded from TOML.
//!
//! ```
//! use klotski::config::{Memoization, SolverConfig};
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     [search]
//!     random_seed = 7
//!     memoization = "path"
//!
//!     [display]
//!     step_seconds = 0.5
//! "#).unwrap();
//!
//! assert_eq!(config.search.random_seed, Some(7));
//! assert_eq!(config.search.memoization, Memoization::Path);
//! ```

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::KlotskiError;

pub const DEFAULT_CONFIG_PATH: &str = "klotski.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl SolverConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, KlotskiError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Like [`SolverConfig::load`], but a missing file yields the defaults.
    /// A file that exists and does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, KlotskiError> {
        match Self::load(path) {
            Err(KlotskiError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            result => result,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, KlotskiError> {
        Ok(toml::from_str(s)?)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search.random_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_memoization(mut self, memoization: Memoization) -> Self {
        self.search.memoization = memoization;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Seed for the per-level piece shuffles. Drawn from the OS when unset.
    #[serde(default)]
    pub random_seed: Option<u64>,

    #[serde(default)]
    pub memoization: Memoization,
}

/// Which configurations count as dead ends when the search reaches them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Memoization {
    /// Only configurations on the current search path. Marks are cleared on
    /// backtrack.
    Path,

    /// Configurations on the current path, plus every configuration whose
    /// subtree has already been explored without success.
    #[default]
    PathAndExhausted,
}

/// Presentation settings for the binary. None of these touch the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DisplayConfig {
    /// Pause between replayed moves.
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,

    /// Print every intermediate board while replaying the solution.
    #[serde(default = "default_true")]
    pub replay: bool,
}

const fn default_step_seconds() -> f64 {
    2.0
}

const fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            step_seconds: default_step_seconds(),
            replay: true,
        }
    }
}

impl DisplayConfig {
    /// The pause between replayed moves. Negative, NaN, infinite and
    /// overflowing values are rejected.
    pub fn step_delay(&self) -> Result<Duration, KlotskiError> {
        Duration::try_from_secs_f64(self.step_seconds).map_err(|source| KlotskiError::StepDelay {
            seconds: self.step_seconds,
            source,
        })
    }
}
