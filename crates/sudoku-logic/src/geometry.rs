//! Grid geometry: the row/column/block partitions and per-cell neighbor
//! lists, over a flat linear index space.
//!
//! Cells are addressed by `index = row * side + col`. Units and neighbor
//! sets are lists of indices into that flat space, computed once at grid
//! construction and reused for the grid's lifetime.

use serde::{Deserialize, Serialize};

/// The three kinds of unit a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    Row,
    Column,
    Block,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Row => write!(f, "row"),
            UnitKind::Column => write!(f, "column"),
            UnitKind::Block => write!(f, "block"),
        }
    }
}

/// Precomputed geometry for a grid of a given block size.
#[derive(Debug, Clone)]
pub struct Layout {
    block_size: usize,
    side: usize,
    rows: Vec<Vec<usize>>,
    cols: Vec<Vec<usize>>,
    blocks: Vec<Vec<usize>>,
    /// Distinct cells sharing a row, column, or block with each cell,
    /// excluding the cell itself.
    neighbors: Vec<Vec<usize>>,
}

impl Layout {
    pub fn new(block_size: usize) -> Self {
        assert!(block_size >= 1, "block size must be at least 1");
        let side = block_size * block_size;
        let total = side * side;

        let rows: Vec<Vec<usize>> = (0..side)
            .map(|r| (0..side).map(|c| r * side + c).collect())
            .collect();
        let cols: Vec<Vec<usize>> = (0..side)
            .map(|c| (0..side).map(|r| r * side + c).collect())
            .collect();
        let blocks: Vec<Vec<usize>> = (0..side)
            .map(|b| {
                let block_row = (b / block_size) * block_size;
                let block_col = (b % block_size) * block_size;
                (0..side)
                    .map(|i| {
                        let r = block_row + i / block_size;
                        let c = block_col + i % block_size;
                        r * side + c
                    })
                    .collect()
            })
            .collect();

        let neighbors = (0..total)
            .map(|idx| Self::compute_neighbors(block_size, side, idx))
            .collect();

        Layout {
            block_size,
            side,
            rows,
            cols,
            blocks,
            neighbors,
        }
    }

    /// Row neighbors first, then column, then the block cells not already
    /// covered by either.
    fn compute_neighbors(block_size: usize, side: usize, idx: usize) -> Vec<usize> {
        let row = idx / side;
        let col = idx % side;
        let block_row = (row / block_size) * block_size;
        let block_col = (col / block_size) * block_size;

        let mut neighbors = Vec::with_capacity(3 * (side - 1) - 2 * (block_size - 1));
        for c in 0..side {
            if c != col {
                neighbors.push(row * side + c);
            }
        }
        for r in 0..side {
            if r != row {
                neighbors.push(r * side + col);
            }
        }
        for dr in 0..block_size {
            for dc in 0..block_size {
                let r = block_row + dr;
                let c = block_col + dc;
                if r != row && c != col {
                    neighbors.push(r * side + c);
                }
            }
        }
        neighbors
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Grid dimension (`block_size` squared).
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Convert `(row, col)` to a linear cell index.
    #[inline]
    pub fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.side + col
    }

    /// Convert a linear cell index back to `(row, col)`.
    #[inline]
    pub fn cell_pos(&self, idx: usize) -> (usize, usize) {
        (idx / self.side, idx % self.side)
    }

    /// Block identifier for a cell position.
    #[inline]
    pub fn block_of(&self, row: usize, col: usize) -> usize {
        (row / self.block_size) * self.block_size + col / self.block_size
    }

    /// Cell indices of a row, in column order.
    #[inline]
    pub fn row(&self, index: usize) -> &[usize] {
        &self.rows[index]
    }

    /// Cell indices of a column, in row order.
    #[inline]
    pub fn col(&self, index: usize) -> &[usize] {
        &self.cols[index]
    }

    /// Cell indices of a block, in row-major order within the block.
    #[inline]
    pub fn block(&self, index: usize) -> &[usize] {
        &self.blocks[index]
    }

    /// Cell indices of a unit of the given kind.
    #[inline]
    pub fn unit(&self, kind: UnitKind, index: usize) -> &[usize] {
        match kind {
            UnitKind::Row => self.row(index),
            UnitKind::Column => self.col(index),
            UnitKind::Block => self.block(index),
        }
    }

    /// Neighbor indices of a cell (same row, column, or block; self excluded).
    #[inline]
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }
}
