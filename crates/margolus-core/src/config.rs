use crate::constants::MAX_GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Stencil selected by [`PatternSpec::TiledBoundary`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StencilKind {
    #[default]
    Glider,
    Blinker,
    Toad,
}

/// Declarative seed for the initial grid.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PatternSpec {
    /// Every cell independently alive with the given probability.
    Random { alive_probability: f64 },
    /// All-dead grid with a few randomly placed Bernoulli-filled sub-blocks.
    Sparse { alive_probability: f64 },
    /// A single glider near the top-left corner.
    Glider,
    /// A single blinker at the grid center.
    Blinker,
    /// A toad at the center flanked by two blinkers.
    Oscillator,
    /// Edge-tiled diagonal motif (bounded runs only) with a stencil at the center.
    TiledBoundary { shape: StencilKind },
}

impl Default for PatternSpec {
    fn default() -> Self {
        PatternSpec::Random {
            alive_probability: 0.5,
        }
    }
}

impl PatternSpec {
    /// Alive probability carried by the spec, if the variant uses one.
    pub fn alive_probability(&self) -> Option<f64> {
        match self {
            PatternSpec::Random { alive_probability }
            | PatternSpec::Sparse { alive_probability } => Some(*alive_probability),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible pattern construction.
    pub seed: u64,
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Toroidal edge handling when true; bounded (edge blocks skipped) when false.
    pub wraparound: bool,
    /// Initial grid construction strategy.
    pub pattern: PatternSpec,
    /// Default number of generations for batch runs.
    pub generations: usize,
    /// Sampling interval for batch-run summaries.
    pub sample_every: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid_size: 100,
            wraparound: false,
            pattern: PatternSpec::default(),
            generations: 250,
            sample_every: 50,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall {
                min: 2,
                actual: self.grid_size,
            });
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                max: MAX_GRID_SIZE,
                actual: self.grid_size,
            });
        }
        if let Some(p) = self.pattern.alive_probability() {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidAliveProbability { actual: p });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    GridTooSmall { min: usize, actual: usize },
    GridTooLarge { max: usize, actual: usize },
    InvalidAliveProbability { actual: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::GridTooSmall { min, actual } => {
                write!(f, "grid_size ({actual}) is below the minimum ({min})")
            }
            ConfigError::GridTooLarge { max, actual } => {
                write!(f, "grid_size ({actual}) exceeds supported maximum ({max})")
            }
            ConfigError::InvalidAliveProbability { actual } => {
                write!(f, "alive_probability ({actual}) must be within [0, 1]")
            }
        }
    }
}

impl Error for ConfigError {}
