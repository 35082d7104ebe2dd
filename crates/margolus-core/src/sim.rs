use crate::config::{ConfigError, SimConfig};
use crate::grid::{AgeGrid, Grid};
use crate::metrics::{self, MetricsSnapshot, RunSummary};
use crate::pattern::{self, PatternSizeError};
use crate::rng::create_rng;
use crate::stepper;
use std::{error::Error, fmt};

/// Owned copy of the controller state for renderers. Mutating a snapshot
/// never affects the simulation it came from.
#[derive(Clone, Debug)]
pub struct SimSnapshot {
    pub grid: Grid,
    pub ages: AgeGrid,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimInitError {
    Config(ConfigError),
    Pattern(PatternSizeError),
}

impl fmt::Display for SimInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimInitError::Config(e) => write!(f, "invalid configuration: {e}"),
            SimInitError::Pattern(e) => write!(f, "pattern does not fit: {e}"),
        }
    }
}

impl Error for SimInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimInitError::Config(e) => Some(e),
            SimInitError::Pattern(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimInitError {
    fn from(e: ConfigError) -> Self {
        SimInitError::Config(e)
    }
}

impl From<PatternSizeError> for SimInitError {
    fn from(e: PatternSizeError) -> Self {
        SimInitError::Pattern(e)
    }
}

/// Drives the automaton: owns the live grid, the age grid, the generation
/// counter, and the running aggregates. Stepping is synchronous and the
/// controller must be driven from a single thread; share state with other
/// threads via [`Simulation::snapshot`] only.
pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    ages: AgeGrid,
    generation: u64,
    latest: MetricsSnapshot,
}

impl Simulation {
    /// Validate the configuration, build the initial grid from its pattern
    /// spec, and compute the initial snapshot (the grid compared against
    /// itself, so stability starts at 100).
    pub fn new(config: SimConfig) -> Result<Self, SimInitError> {
        config.validate()?;
        let mut rng = create_rng(config.seed);
        let grid = pattern::generate(config.grid_size, &config.pattern, config.wraparound, &mut rng)?;
        let ages = AgeGrid::new(config.grid_size);

        let ratio = metrics::alive_ratio(&grid);
        let latest = MetricsSnapshot {
            generation: 1,
            alive_ratio: ratio,
            variance: metrics::variance(&grid),
            stability_pct: metrics::stability(&grid, &grid),
            cluster_count: metrics::cluster_count(&grid),
            running_avg_alive_ratio: ratio,
        };

        Ok(Self {
            config,
            grid,
            ages,
            generation: 1,
            latest,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ages(&self) -> &AgeGrid {
        &self.ages
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn latest_metrics(&self) -> &MetricsSnapshot {
        &self.latest
    }

    /// Advance one generation and return its metrics snapshot. The current
    /// generation's parity selects the block-partition offset; metrics
    /// compare the new grid against the one it replaced.
    pub fn step(&mut self) -> MetricsSnapshot {
        let next = stepper::step(&self.grid, self.generation, self.config.wraparound);
        let stability_pct = metrics::stability(&next, &self.grid);
        self.ages = metrics::age_update(&self.ages, &next);
        self.generation += 1;

        let ratio = metrics::alive_ratio(&next);
        let snapshot = MetricsSnapshot {
            generation: self.generation,
            alive_ratio: ratio,
            variance: metrics::variance(&next),
            stability_pct,
            cluster_count: metrics::cluster_count(&next),
            running_avg_alive_ratio: metrics::running_average(
                self.latest.running_avg_alive_ratio,
                ratio,
                self.generation,
            ),
        };

        self.grid = next;
        self.latest = snapshot;
        snapshot
    }

    /// Apply `k` sequential steps. Metrics are recomputed for every
    /// intermediate generation; all snapshots are returned in order.
    pub fn step_many(&mut self, k: usize) -> Vec<MetricsSnapshot> {
        (0..k).map(|_| self.step()).collect()
    }

    /// Batch run: step `generations` times, sampling the first, every
    /// `sample_every`-th, and the final snapshot.
    pub fn run(&mut self, generations: usize, sample_every: usize) -> RunSummary {
        let sample_every = sample_every.max(1);
        let mut samples = Vec::new();
        let mut final_alive_ratio = metrics::alive_ratio(&self.grid);
        for k in 1..=generations {
            let snapshot = self.step();
            final_alive_ratio = snapshot.alive_ratio;
            if k == 1 || k % sample_every == 0 || k == generations {
                samples.push(snapshot);
            }
        }
        RunSummary {
            generations,
            sample_every,
            final_alive_ratio,
            samples,
        }
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            grid: self.grid.clone(),
            ages: self.ages.clone(),
            metrics: self.latest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PatternSpec, StencilKind};

    fn make_config(grid_size: usize, wraparound: bool, pattern: PatternSpec) -> SimConfig {
        SimConfig {
            grid_size,
            wraparound,
            pattern,
            ..SimConfig::default()
        }
    }

    fn all_dead_config(grid_size: usize, wraparound: bool) -> SimConfig {
        make_config(
            grid_size,
            wraparound,
            PatternSpec::Random {
                alive_probability: 0.0,
            },
        )
    }

    #[test]
    fn initial_snapshot_compares_the_grid_against_itself() {
        let sim = Simulation::new(make_config(
            16,
            true,
            PatternSpec::Random {
                alive_probability: 0.5,
            },
        ))
        .unwrap();
        let m = sim.latest_metrics();
        assert_eq!(m.generation, 1);
        assert!((m.stability_pct - 100.0).abs() < 1e-12);
        assert!((m.running_avg_alive_ratio - m.alive_ratio).abs() < 1e-12);
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let cfg = all_dead_config(1, false);
        assert!(matches!(
            Simulation::new(cfg),
            Err(SimInitError::Config(ConfigError::GridTooSmall { .. }))
        ));
    }

    #[test]
    fn new_surfaces_pattern_size_errors() {
        let cfg = make_config(4, false, PatternSpec::Oscillator);
        assert!(matches!(
            Simulation::new(cfg),
            Err(SimInitError::Pattern(PatternSizeError { min: 12, .. }))
        ));
    }

    #[test]
    fn all_dead_toroidal_grid_oscillates() {
        let mut sim = Simulation::new(all_dead_config(4, true)).unwrap();
        assert_eq!(sim.grid().alive_count(), 0);
        for cycle in 0..4 {
            let up = sim.step();
            assert_eq!(sim.grid().alive_count(), 16, "cycle {cycle}");
            assert!((up.alive_ratio - 1.0).abs() < 1e-12);
            assert!((up.stability_pct - 0.0).abs() < 1e-12);
            let down = sim.step();
            assert_eq!(sim.grid().alive_count(), 0, "cycle {cycle}");
            assert!((down.alive_ratio - 0.0).abs() < 1e-12);
        }
    }

    #[test]
    fn generation_counter_increments_by_one_per_step() {
        let mut sim = Simulation::new(all_dead_config(6, true)).unwrap();
        assert_eq!(sim.generation(), 1);
        sim.step();
        assert_eq!(sim.generation(), 2);
        let snapshots = sim.step_many(3);
        assert_eq!(sim.generation(), 5);
        let generations: Vec<u64> = snapshots.iter().map(|s| s.generation).collect();
        assert_eq!(generations, vec![3, 4, 5]);
    }

    #[test]
    fn running_average_tracks_mean_of_observed_ratios() {
        let mut sim = Simulation::new(all_dead_config(4, true)).unwrap();
        // Ratios: 0.0 (initial), then 1.0, 0.0, 1.0 from the oscillation.
        let m2 = sim.step();
        assert!((m2.running_avg_alive_ratio - 0.5).abs() < 1e-12);
        let m3 = sim.step();
        assert!((m3.running_avg_alive_ratio - 1.0 / 3.0).abs() < 1e-12);
        let m4 = sim.step();
        assert!((m4.running_avg_alive_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ages_follow_cell_lifetimes() {
        let mut sim = Simulation::new(all_dead_config(4, true)).unwrap();
        sim.step(); // all alive
        assert!(sim.ages().cells().iter().all(|&a| a == 1));
        sim.step(); // all dead again
        assert!(sim.ages().cells().iter().all(|&a| a == 0));
    }

    #[test]
    fn bounded_mode_leaves_skipped_edges_untouched() {
        let mut sim = Simulation::new(all_dead_config(5, false)).unwrap();
        sim.step();
        // First step uses the aligned partition; row/col 4 have no block.
        for k in 0..5 {
            assert_eq!(sim.grid().get(4, k), 0);
            assert_eq!(sim.grid().get(k, 4), 0);
        }
        assert_eq!(sim.grid().alive_count(), 16);
    }

    #[test]
    fn snapshot_is_isolated_from_controller_state() {
        let mut sim = Simulation::new(all_dead_config(4, true)).unwrap();
        let mut snap = sim.snapshot();
        snap.grid.set(0, 0, 1);
        snap.ages.set(0, 0, 99);
        assert_eq!(sim.grid().get(0, 0), 0);
        assert_eq!(sim.ages().get(0, 0), 0);
        sim.step();
        assert_eq!(snap.metrics.generation, 1);
    }

    #[test]
    fn run_samples_first_interval_and_final_generations() {
        let mut sim = Simulation::new(all_dead_config(8, true)).unwrap();
        let summary = sim.run(25, 10);
        let sampled: Vec<u64> = summary.samples.iter().map(|s| s.generation).collect();
        // Step k produces generation k + 1; samples at k = 1, 10, 20, 25.
        assert_eq!(sampled, vec![2, 11, 21, 26]);
        assert_eq!(summary.generations, 25);
        assert_eq!(summary.sample_every, 10);
    }

    #[test]
    fn run_matches_repeated_stepping() {
        let cfg = make_config(
            12,
            true,
            PatternSpec::Random {
                alive_probability: 0.4,
            },
        );
        let mut batch = Simulation::new(cfg.clone()).unwrap();
        let summary = batch.run(20, 5);

        let mut manual = Simulation::new(cfg).unwrap();
        let mut last = None;
        for _ in 0..20 {
            last = Some(manual.step());
        }
        assert_eq!(summary.samples.last().copied(), last);
        assert_eq!(batch.grid(), manual.grid());
    }

    #[test]
    fn tiled_boundary_patterns_step_in_both_boundary_modes() {
        for wraparound in [false, true] {
            let cfg = make_config(
                10,
                wraparound,
                PatternSpec::TiledBoundary {
                    shape: StencilKind::Glider,
                },
            );
            let mut sim = Simulation::new(cfg).unwrap();
            sim.step_many(10);
            assert!(sim.grid().cells().iter().all(|&c| c <= 1));
        }
    }

    #[test]
    fn same_seed_reproduces_identical_runs() {
        let cfg = make_config(
            16,
            false,
            PatternSpec::Sparse {
                alive_probability: 0.7,
            },
        );
        let mut a = Simulation::new(cfg.clone()).unwrap();
        let mut b = Simulation::new(cfg).unwrap();
        for _ in 0..10 {
            assert_eq!(a.step(), b.step());
        }
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.ages(), b.ages());
    }
}
