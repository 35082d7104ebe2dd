use crate::config::{PatternSpec, StencilKind};
use crate::constants::{SPARSE_BLOCK_COUNT, SPARSE_BLOCK_SIZE};
use crate::grid::Grid;
use rand::Rng;
use std::{error::Error, fmt};

const GLIDER: &[&[u8]] = &[&[0, 1, 0], &[0, 0, 1], &[1, 1, 1]];
const BLINKER: &[&[u8]] = &[&[0, 0, 0], &[1, 1, 1], &[0, 0, 0]];
const TOAD: &[&[u8]] = &[&[0, 0, 0, 0], &[0, 1, 1, 1], &[1, 1, 1, 0], &[0, 0, 0, 0]];
/// Diagonal 2x2 motif tiled along the edges of bounded grids so boundary
/// blocks have non-trivial content from generation one.
const EDGE_MOTIF: &[&[u8]] = &[&[1, 0], &[0, 1]];

/// The chosen pattern cannot be placed on a grid of the given side length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSizeError {
    pub pattern: &'static str,
    pub min: usize,
    pub actual: usize,
}

impl fmt::Display for PatternSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pattern requires grid_size >= {}, got {}",
            self.pattern, self.min, self.actual
        )
    }
}

impl Error for PatternSizeError {}

fn stencil_for(shape: StencilKind) -> &'static [&'static [u8]] {
    match shape {
        StencilKind::Glider => GLIDER,
        StencilKind::Blinker => BLINKER,
        StencilKind::Toad => TOAD,
    }
}

fn require(size: usize, min: usize, pattern: &'static str) -> Result<(), PatternSizeError> {
    if size < min {
        return Err(PatternSizeError {
            pattern,
            min,
            actual: size,
        });
    }
    Ok(())
}

/// Write a stencil into the grid with its top-left corner at `(row, col)`.
/// Dead stencil cells are written too; placement rules keep stencils from
/// overlapping each other.
fn overlay(grid: &mut Grid, stencil: &[&[u8]], row: usize, col: usize) {
    for (dr, stencil_row) in stencil.iter().enumerate() {
        for (dc, &state) in stencil_row.iter().enumerate() {
            grid.set(row + dr, col + dc, state);
        }
    }
}

fn fill_bernoulli<R: Rng>(grid: &mut Grid, p: f64, rng: &mut R) {
    let n = grid.size();
    for row in 0..n {
        for col in 0..n {
            let state = u8::from(rng.random::<f64>() < p);
            grid.set(row, col, state);
        }
    }
}

fn sparse<R: Rng>(size: usize, p: f64, rng: &mut R) -> Result<Grid, PatternSizeError> {
    require(size, SPARSE_BLOCK_SIZE, "sparse")?;
    let mut grid = Grid::new(size);
    for _ in 0..SPARSE_BLOCK_COUNT {
        let row = rng.random_range(0..=size - SPARSE_BLOCK_SIZE);
        let col = rng.random_range(0..=size - SPARSE_BLOCK_SIZE);
        for dr in 0..SPARSE_BLOCK_SIZE {
            for dc in 0..SPARSE_BLOCK_SIZE {
                if rng.random::<f64>() < p {
                    grid.set(row + dr, col + dc, 1);
                }
            }
        }
    }
    Ok(grid)
}

fn oscillator(size: usize) -> Result<Grid, PatternSizeError> {
    // Center toad plus blinkers toward opposite corners; the minimum keeps
    // all three placements disjoint.
    require(size, 12, "oscillator")?;
    let mut grid = Grid::new(size);
    let center = (size - TOAD.len()) / 2;
    overlay(&mut grid, TOAD, center, center);
    overlay(&mut grid, BLINKER, 1, 1);
    overlay(&mut grid, BLINKER, size - 4, size - 4);
    Ok(grid)
}

fn tiled_boundary(
    size: usize,
    shape: StencilKind,
    wraparound: bool,
) -> Result<Grid, PatternSizeError> {
    let stencil = stencil_for(shape);
    // Two-cell edge band plus a one-cell gap around the center overlay.
    require(size, stencil.len() + 6, "tiled_boundary")?;
    let mut grid = Grid::new(size);
    if !wraparound {
        for k in (0..size - 1).step_by(2) {
            overlay(&mut grid, EDGE_MOTIF, 0, k);
            overlay(&mut grid, EDGE_MOTIF, size - 2, k);
            overlay(&mut grid, EDGE_MOTIF, k, 0);
            overlay(&mut grid, EDGE_MOTIF, k, size - 2);
        }
    }
    let center = (size - stencil.len()) / 2;
    overlay(&mut grid, stencil, center, center);
    Ok(grid)
}

/// Build the initial grid for a pattern spec. Deterministic for a given
/// `(size, spec, wraparound, rng state)`; all randomness comes from the
/// caller-supplied generator.
pub fn generate<R: Rng>(
    size: usize,
    spec: &PatternSpec,
    wraparound: bool,
    rng: &mut R,
) -> Result<Grid, PatternSizeError> {
    match spec {
        PatternSpec::Random { alive_probability } => {
            let mut grid = Grid::new(size);
            fill_bernoulli(&mut grid, *alive_probability, rng);
            Ok(grid)
        }
        PatternSpec::Sparse { alive_probability } => sparse(size, *alive_probability, rng),
        PatternSpec::Glider => {
            // One cell of headroom so the glider can travel before reaching
            // the far edge.
            require(size, 5, "glider")?;
            let mut grid = Grid::new(size);
            overlay(&mut grid, GLIDER, 1, 1);
            Ok(grid)
        }
        PatternSpec::Blinker => {
            require(size, 4, "blinker")?;
            let mut grid = Grid::new(size);
            let center = (size - BLINKER.len()) / 2;
            overlay(&mut grid, BLINKER, center, center);
            Ok(grid)
        }
        PatternSpec::Oscillator => oscillator(size),
        PatternSpec::TiledBoundary { shape } => tiled_boundary(size, *shape, wraparound),
    }
}
