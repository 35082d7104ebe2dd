use serde::{Deserialize, Serialize};

/// A 2x2 window of cells, `block[row][col]`.
pub type Block = [[u8; 2]; 2];

/// Square grid of binary cell states, row-major, alive = 1 / dead = 0.
/// Dimensions are fixed for the lifetime of a simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// All-dead grid of the given side length.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "grid size must be at least 2");
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn from_cells(size: usize, cells: Vec<u8>) -> Self {
        assert_eq!(cells.len(), size * size, "cell count must be size * size");
        assert!(
            cells.iter().all(|&c| c <= 1),
            "cell states must be 0 or 1"
        );
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, state: u8) {
        debug_assert!(state <= 1);
        self.cells[row * self.size + col] = state;
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Read the 2x2 block anchored at `(i, j)`.
    ///
    /// Toroidal addressing when `wraparound` is true. Bounded mode returns
    /// `None` for any block whose window would exceed the grid; such origins
    /// are skipped entirely for the generation.
    pub fn read_block(&self, i: usize, j: usize, wraparound: bool) -> Option<Block> {
        let n = self.size;
        if wraparound {
            let (r0, r1) = (i % n, (i + 1) % n);
            let (c0, c1) = (j % n, (j + 1) % n);
            Some([
                [self.get(r0, c0), self.get(r0, c1)],
                [self.get(r1, c0), self.get(r1, c1)],
            ])
        } else {
            if i + 1 >= n || j + 1 >= n {
                return None;
            }
            Some([
                [self.get(i, j), self.get(i, j + 1)],
                [self.get(i + 1, j), self.get(i + 1, j + 1)],
            ])
        }
    }

    /// Write a 2x2 block at `(i, j)`, mirroring [`Grid::read_block`]'s
    /// addressing. Bounded out-of-range writes are a no-op; callers are
    /// expected to have skipped such origins already.
    pub fn write_block(&mut self, block: &Block, i: usize, j: usize, wraparound: bool) {
        let n = self.size;
        if wraparound {
            let (r0, r1) = (i % n, (i + 1) % n);
            let (c0, c1) = (j % n, (j + 1) % n);
            self.set(r0, c0, block[0][0]);
            self.set(r0, c1, block[0][1]);
            self.set(r1, c0, block[1][0]);
            self.set(r1, c1, block[1][1]);
        } else if i + 1 < n && j + 1 < n {
            self.set(i, j, block[0][0]);
            self.set(i, j + 1, block[0][1]);
            self.set(i + 1, j, block[1][0]);
            self.set(i + 1, j + 1, block[1][1]);
        }
    }
}

/// Per-cell count of consecutive generations alive, same shape as its [`Grid`].
/// A cell's age resets to 0 the generation it dies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGrid {
    size: usize,
    cells: Vec<u32>,
}

impl AgeGrid {
    /// All-zero age grid of the given side length.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, age: u32) {
        self.cells[row * self.size + col] = age;
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_rows(rows: &[&[u8]]) -> Grid {
        let size = rows.len();
        let cells = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Grid::from_cells(size, cells)
    }

    #[test]
    fn read_block_wraps_toroidally() {
        let grid = grid_from_rows(&[&[1, 0, 0], &[0, 0, 0], &[0, 0, 1]]);
        let block = grid.read_block(2, 2, true).unwrap();
        assert_eq!(block, [[1, 0], [0, 1]]);
    }

    #[test]
    fn read_block_bounded_returns_none_at_edge() {
        let grid = Grid::new(3);
        assert!(grid.read_block(2, 0, false).is_none());
        assert!(grid.read_block(0, 2, false).is_none());
        assert!(grid.read_block(1, 1, false).is_some());
    }

    #[test]
    fn write_block_wraps_toroidally() {
        let mut grid = Grid::new(3);
        grid.write_block(&[[1, 1], [1, 1]], 2, 2, true);
        assert_eq!(grid.get(2, 2), 1);
        assert_eq!(grid.get(2, 0), 1);
        assert_eq!(grid.get(0, 2), 1);
        assert_eq!(grid.get(0, 0), 1);
        assert_eq!(grid.alive_count(), 4);
    }

    #[test]
    fn write_block_bounded_out_of_range_is_noop() {
        let mut grid = Grid::new(3);
        grid.write_block(&[[1, 1], [1, 1]], 2, 0, false);
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn write_then_read_block_is_identity_in_bounds() {
        let mut grid = Grid::new(4);
        let block = [[1, 0], [0, 1]];
        grid.write_block(&block, 1, 2, false);
        assert_eq!(grid.read_block(1, 2, false).unwrap(), block);
    }

    #[test]
    #[should_panic(expected = "cell count must be size * size")]
    fn from_cells_rejects_mismatched_length() {
        Grid::from_cells(3, vec![0; 8]);
    }

    #[test]
    fn age_grid_starts_at_zero() {
        let ages = AgeGrid::new(4);
        assert!(ages.cells().iter().all(|&a| a == 0));
    }
}
