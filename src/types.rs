//! Run configuration and strategy selection.
//!
//! [`SimulationConfig`] is the only state shared across trials. It is passed
//! by reference into every stage and never mutated during a run.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigurationError, Result};

/// Read-only parameters of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// N: number of prisoners, equal to the number of boxes.
    pub prisoners: usize,
    /// Maximum boxes a single prisoner may inspect.
    pub max_opens: usize,
    /// Number of independent trials.
    pub trials: usize,
    /// Base RNG seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            prisoners: DEFAULT_PRISONERS,
            max_opens: DEFAULT_MAX_OPENS,
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Build and validate a configuration with the default seed.
    pub fn new(prisoners: usize, max_opens: usize, trials: usize) -> Result<Self> {
        let config = Self {
            prisoners,
            max_opens,
            trials,
            seed: DEFAULT_SEED,
        };
        config.validate()?;
        Ok(config)
    }

    /// Same configuration with a different base seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Check N ≥ 1, 0 ≤ max_opens ≤ N, trials ≥ 1.
    pub fn validate(&self) -> Result<()> {
        if self.prisoners < 1 {
            return Err(ConfigurationError::NoPrisoners);
        }
        if self.prisoners > MAX_PRISONERS {
            return Err(ConfigurationError::TooManyPrisoners {
                n: self.prisoners,
                max: MAX_PRISONERS,
            });
        }
        if self.max_opens > self.prisoners {
            return Err(ConfigurationError::MaxOpensExceedsBoxes {
                max_opens: self.max_opens,
                n: self.prisoners,
            });
        }
        if self.trials < 1 {
            return Err(ConfigurationError::NoTrials);
        }
        Ok(())
    }
}

/// Which rule each prisoner follows when choosing boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Open `max_opens` distinct boxes chosen uniformly at random.
    #[value(alias = "naive")]
    Random,
    /// Start at one's own box and follow the chain of slips.
    #[value(alias = "loop", alias = "optimal")]
    Cycle,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Random, StrategyKind::Cycle];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Cycle => "cycle",
        }
    }

    /// Tag byte used in binary dumps.
    pub(crate) fn tag(self) -> u8 {
        match self {
            StrategyKind::Random => 0,
            StrategyKind::Cycle => 1,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(StrategyKind::Random),
            1 => Some(StrategyKind::Cycle),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "naive" => Ok(StrategyKind::Random),
            "cycle" | "loop" | "optimal" => Ok(StrategyKind::Cycle),
            _ => Err(ConfigurationError::UnknownStrategy(s.to_string())),
        }
    }
}
