use crate::grid::{Block, Grid};

/// Block-partition offset for a generation: aligned (0) on odd generations,
/// shifted (1) on even ones. Over two generations every interior 2x2
/// alignment is exercised once.
fn partition_offset(generation: u64) -> usize {
    if generation % 2 == 1 {
        0
    } else {
        1
    }
}

fn count_ones(block: &Block) -> u8 {
    block[0][0] + block[0][1] + block[1][0] + block[1][1]
}

fn invert(block: &mut Block) {
    for row in block.iter_mut() {
        for cell in row.iter_mut() {
            *cell = 1 - *cell;
        }
    }
}

/// Rotate a 2x2 block 180 degrees: (0,0)<->(1,1) and (0,1)<->(1,0).
fn rotate_180(block: &mut Block) {
    block.swap(0, 1);
    block[0].swap(0, 1);
    block[1].swap(0, 1);
}

/// Transition rule on a single block, keyed on the pre-step alive count:
/// 0, 1, 4 invert; 2 is a fixed point; 3 inverts and then rotates 180
/// degrees. The rotation applies only when the original count was 3, not
/// when it was 1. The asymmetry is part of the rule; do not symmetrize it.
fn apply_block_rule(block: &mut Block) {
    let ones = count_ones(block);
    if ones == 2 {
        return;
    }
    invert(block);
    if ones == 3 {
        rotate_180(block);
    }
}

/// One generation of the block automaton. Pure: reads `grid`, returns a new
/// grid of identical dimensions.
///
/// Blocks are anchored at every `(i, j)` with both coordinates in
/// `offset, offset + 2, ...` below `n`. Under wraparound the partition covers
/// every cell exactly once (for even `n`); bounded mode silently skips any
/// origin whose window would exceed the grid, leaving those cells unchanged
/// for the generation. All reads come from the pre-step grid, so block
/// processing order cannot introduce read-after-write effects.
pub fn step(grid: &Grid, generation: u64, wraparound: bool) -> Grid {
    let n = grid.size();
    let offset = partition_offset(generation);
    let mut next = grid.clone();

    for i in (offset..n).step_by(2) {
        for j in (offset..n).step_by(2) {
            let Some(mut block) = grid.read_block(i, j, wraparound) else {
                continue;
            };
            apply_block_rule(&mut block);
            next.write_block(&block, i, j, wraparound);
        }
    }

    next
}
