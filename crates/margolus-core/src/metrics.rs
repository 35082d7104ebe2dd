use crate::grid::{AgeGrid, Grid};
use serde::{Deserialize, Serialize};

/// Immutable per-generation statistics record. One is produced per
/// generation and handed to renderers as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub generation: u64,
    pub alive_ratio: f64,
    pub variance: f64,
    pub stability_pct: f64,
    pub cluster_count: usize,
    pub running_avg_alive_ratio: f64,
}

/// Sampled snapshots from a batch run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub generations: usize,
    pub sample_every: usize,
    pub final_alive_ratio: f64,
    pub samples: Vec<MetricsSnapshot>,
}

/// Fraction of alive cells.
pub fn alive_ratio(grid: &Grid) -> f64 {
    let total = grid.size() * grid.size();
    grid.alive_count() as f64 / total as f64
}

/// Variance of the grid treated as a flattened 0/1 population. Computed
/// directly from the data rather than via `p * (1 - p)` so floating-point
/// behavior follows the cells actually present.
pub fn variance(grid: &Grid) -> f64 {
    let total = (grid.size() * grid.size()) as f64;
    let mean = grid.alive_count() as f64 / total;
    let sum_sq: f64 = grid
        .cells()
        .iter()
        .map(|&c| {
            let d = c as f64 - mean;
            d * d
        })
        .sum();
    sum_sq / total
}

/// Percentage of cells unchanged between two consecutive generations.
/// Mismatched dimensions are a programming error, not a runtime condition.
pub fn stability(new_grid: &Grid, old_grid: &Grid) -> f64 {
    assert_eq!(
        new_grid.size(),
        old_grid.size(),
        "stability requires equal grid dimensions"
    );
    let unchanged = new_grid
        .cells()
        .iter()
        .zip(old_grid.cells())
        .filter(|(a, b)| a == b)
        .count();
    let total = new_grid.size() * new_grid.size();
    unchanged as f64 / total as f64 * 100.0
}

/// Number of connected components of alive cells under 8-connectivity.
///
/// Iterative flood fill with an explicit stack and visited buffer, so stack
/// usage stays bounded regardless of grid size. The connectivity search never
/// wraps, even when the automaton itself is toroidal.
pub fn cluster_count(grid: &Grid) -> usize {
    let n = grid.size();
    let mut visited = vec![false; n * n];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut clusters = 0;

    for row in 0..n {
        for col in 0..n {
            if grid.get(row, col) == 0 || visited[row * n + col] {
                continue;
            }
            clusters += 1;
            visited[row * n + col] = true;
            stack.push((row, col));
            while let Some((r, c)) = stack.pop() {
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = r as i64 + dr;
                        let nc = c as i64 + dc;
                        if nr < 0 || nc < 0 || nr >= n as i64 || nc >= n as i64 {
                            continue;
                        }
                        let (nr, nc) = (nr as usize, nc as usize);
                        if grid.get(nr, nc) == 1 && !visited[nr * n + nc] {
                            visited[nr * n + nc] = true;
                            stack.push((nr, nc));
                        }
                    }
                }
            }
        }
    }

    clusters
}

/// Next age grid: alive cells age by one, dead cells reset to zero.
pub fn age_update(ages: &AgeGrid, new_grid: &Grid) -> AgeGrid {
    assert_eq!(
        ages.size(),
        new_grid.size(),
        "age_update requires equal grid dimensions"
    );
    let n = ages.size();
    let mut next = AgeGrid::new(n);
    for row in 0..n {
        for col in 0..n {
            if new_grid.get(row, col) == 1 {
                next.set(row, col, ages.get(row, col) + 1);
            }
        }
    }
    next
}

/// Incremental mean of the alive ratio over a run. `generation_index` is the
/// 1-based index of the generation contributing `new_ratio`; at index 1 the
/// average is the ratio itself.
pub fn running_average(prev_avg: f64, new_ratio: f64, generation_index: u64) -> f64 {
    let t = generation_index as f64;
    (prev_avg * (t - 1.0) + new_ratio) / t
}
