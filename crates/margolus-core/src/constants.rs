/// Largest valid grid side. Keeps cell counts comfortably inside `usize`
/// and bounds per-generation work.
pub const MAX_GRID_SIZE: usize = 4096;

/// Number of random sub-blocks overlaid by the sparse pattern.
pub const SPARSE_BLOCK_COUNT: usize = 5;

/// Side length of each sparse-pattern sub-block.
pub const SPARSE_BLOCK_SIZE: usize = 6;
