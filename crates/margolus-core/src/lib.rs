pub mod config;
pub mod constants;
pub mod grid;
pub mod metrics;
pub mod pattern;
pub mod rng;
pub mod sim;
pub mod stepper;

pub use config::{ConfigError, PatternSpec, SimConfig, StencilKind};
pub use constants::MAX_GRID_SIZE;
pub use grid::{AgeGrid, Block, Grid};
pub use metrics::{MetricsSnapshot, RunSummary};
pub use pattern::PatternSizeError;
pub use sim::{SimInitError, SimSnapshot, Simulation};
