//! The grid model: cell state, accessors, construction, and the 81-character
//! digit codec.
//!
//! Cells live in one flat `Vec` addressed by `row * side + col`; the
//! [`Layout`] provides the row/column/block views and neighbor lists as index
//! slices, so the model carries no reference cycles and clones trivially.

use std::sync::Arc;

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::candidates::CandidateSet;
use crate::error::{GridError, GridResult};
use crate::geometry::Layout;
use crate::notify::{self, CellObserver};
use crate::solver::{self, SweepReport};

const DEFAULT_BLOCK_SIZE: usize = 3;

/// Serialization is defined for the standard 9x9 domain only.
const SERIALIZED_SIDE: usize = 9;

/// One grid position: a value plus the candidate bookkeeping the solver
/// maintains for it.
#[derive(Debug, Clone)]
pub struct Cell {
    row: usize,
    col: usize,
    /// 0 means unset; once nonzero the cell is immutable.
    value: u8,
    /// True when a neighbor gained a value since `cached` was computed.
    dirty: bool,
    /// Last computed candidate set; meaningful only while `dirty` is false.
    cached: CandidateSet,
    /// Values ruled out by unit-intersection eliminations. These are not
    /// recoverable from neighbor values, so they persist across cache
    /// recomputation.
    excluded: CandidateSet,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Cell {
            row,
            col,
            value: 0,
            dirty: true,
            cached: CandidateSet::empty(),
            excluded: CandidateSet::empty(),
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// The cell's value, or `None` while unset.
    pub fn value(&self) -> Option<u8> {
        if self.value == 0 {
            None
        } else {
            Some(self.value)
        }
    }

    pub fn has_value(&self) -> bool {
        self.value != 0
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }
}

/// A Sudoku grid of side `block_size * block_size`.
///
/// Cloning copies the cell state; observer subscriptions are shared handles.
#[derive(Clone)]
pub struct Grid {
    block_size: usize,
    side: usize,
    cells: Vec<Cell>,
    layout: Layout,
    observers: Vec<Arc<dyn CellObserver>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl Grid {
    /// Create an empty grid for the given block size (side = block_size²).
    pub fn new(block_size: usize) -> Self {
        let side = block_size * block_size;
        // All cell slots exist before any neighbor-dependent structure is
        // resolved.
        let mut cells = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                cells.push(Cell::new(row, col));
            }
        }
        let layout = Layout::new(block_size);
        Grid {
            block_size,
            side,
            cells,
            layout,
            observers: Vec::new(),
        }
    }

    /// Build a 9x9 grid from row arrays. Zero marks an empty cell; values
    /// outside `[1, 9]` are rejected, as is any shape other than 9 rows of 9.
    pub fn from_rows(rows: &[Vec<u8>]) -> GridResult<Self> {
        if rows.len() != SERIALIZED_SIDE {
            return Err(GridError::ShapeMismatch {
                expected: SERIALIZED_SIDE,
                actual: rows.len(),
            });
        }
        for row in rows {
            if row.len() != SERIALIZED_SIDE {
                return Err(GridError::ShapeMismatch {
                    expected: SERIALIZED_SIDE,
                    actual: row.len(),
                });
            }
        }

        let mut grid = Grid::new(DEFAULT_BLOCK_SIZE);
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value != 0 {
                    grid.set_value_at(r, c, value)?;
                }
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Grid dimension; also the size of the value domain.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Borrow a cell.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.layout.cell_index(row, col)]
    }

    /// The value at a position, or `None` while unset.
    pub fn value_at(&self, row: usize, col: usize) -> Option<u8> {
        self.cell(row, col).value()
    }

    /// Assign a value to a cell.
    ///
    /// Rejects values outside `[1, side]` and rejects cells that already
    /// hold a value; on error the grid is untouched. A successful assignment
    /// marks still-unset neighbors for candidate recomputation and notifies
    /// subscribed observers.
    pub fn set_value_at(&mut self, row: usize, col: usize, value: u8) -> GridResult<()> {
        if value == 0 || value as usize > self.side {
            return Err(GridError::OutOfDomain { row, col, value });
        }
        let idx = self.layout.cell_index(row, col);
        if self.cells[idx].has_value() {
            return Err(GridError::CellOccupied { row, col });
        }
        self.assign(idx, value);
        Ok(())
    }

    /// Assignment primitive shared by the public setter and the solver:
    /// store the value, drop the cell's own candidate cache, mark unset
    /// neighbors dirty, and emit one notification.
    pub(crate) fn assign(&mut self, idx: usize, value: u8) {
        debug_assert!(self.cells[idx].is_empty());
        let cell = &mut self.cells[idx];
        cell.value = value;
        cell.dirty = false;
        cell.cached = CandidateSet::empty();
        let (row, col) = (cell.row, cell.col);

        for &n in self.layout.neighbors(idx) {
            let neighbor = &mut self.cells[n];
            if neighbor.is_empty() {
                neighbor.dirty = true;
            }
        }

        notify::dispatch(&self.observers, row, col, value);
    }

    // ==================== Candidates ====================

    /// A fresh copy of the full value domain `{1..side}`.
    pub fn all_possible_values(&self) -> CandidateSet {
        CandidateSet::full(self.side)
    }

    fn compute_candidates(&self, idx: usize) -> CandidateSet {
        let mut set = CandidateSet::full(self.side);
        for &n in self.layout.neighbors(idx) {
            if let Some(v) = self.cells[n].value() {
                set.remove(v);
            }
        }
        set.minus(self.cells[idx].excluded)
    }

    /// Candidate set for a cell: the domain minus every neighbor value and
    /// minus persistent eliminations. Empty for a cell that has a value.
    ///
    /// Reads the cache when it is valid; otherwise computes without
    /// memoizing (memoization happens on the solver's mutable path).
    pub fn candidates_at(&self, row: usize, col: usize) -> CandidateSet {
        let idx = self.layout.cell_index(row, col);
        let cell = &self.cells[idx];
        if cell.has_value() {
            return CandidateSet::empty();
        }
        if !cell.dirty {
            return cell.cached;
        }
        self.compute_candidates(idx)
    }

    /// Cache-refreshing candidate lookup used inside the solve loop.
    pub(crate) fn candidates_cached(&mut self, idx: usize) -> CandidateSet {
        if self.cells[idx].has_value() {
            return CandidateSet::empty();
        }
        if self.cells[idx].dirty {
            let fresh = self.compute_candidates(idx);
            let cell = &mut self.cells[idx];
            cell.cached = fresh;
            cell.dirty = false;
        }
        self.cells[idx].cached
    }

    /// Permanently rule out `value` for a cell. Returns true when the value
    /// was actually still a candidate there.
    pub(crate) fn exclude(&mut self, idx: usize, value: u8) -> bool {
        if self.cells[idx].has_value() {
            return false;
        }
        let candidates = self.candidates_cached(idx);
        if !candidates.contains(value) {
            return false;
        }
        let cell = &mut self.cells[idx];
        cell.excluded.insert(value);
        // The cache was just refreshed; removing the value keeps it exact.
        cell.cached.remove(value);
        true
    }

    /// Values a unit (given as cell indices) still needs for completeness.
    pub(crate) fn missing_values_in(&self, indices: &[usize]) -> CandidateSet {
        let mut missing = CandidateSet::full(self.side);
        for &idx in indices {
            if let Some(v) = self.cells[idx].value() {
                missing.remove(v);
            }
        }
        missing
    }

    // ==================== Unit views ====================

    /// Cell indices of a row (live view into the layout).
    pub fn row_indices(&self, index: usize) -> &[usize] {
        self.layout.row(index)
    }

    /// Cell indices of a column.
    pub fn col_indices(&self, index: usize) -> &[usize] {
        self.layout.col(index)
    }

    /// Cell indices of a block.
    pub fn block_indices(&self, index: usize) -> &[usize] {
        self.layout.block(index)
    }

    pub(crate) fn cell_by_index(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    // ==================== Counts ====================

    /// Number of cells holding a value.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_value()).count()
    }

    /// Number of unset cells.
    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.filled_count()
    }

    /// Whether every cell holds a value.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.has_value())
    }

    // ==================== Solving ====================

    /// Run the deduction engine to a fixed point.
    ///
    /// Returns `Ok(true)` when the grid is completely filled, `Ok(false)`
    /// when pure logic stalls first, and `Err(GridError::Inconsistent)` when
    /// the supplied puzzle turns out to be contradictory. On a fault the
    /// grid keeps whatever was filled in before detection; discard it.
    pub fn solve(&mut self) -> GridResult<bool> {
        solver::run(self)
    }

    /// Apply a single deduction sweep (intersection eliminations, hidden
    /// singles, naked singles) and report what it did.
    pub fn sweep(&mut self) -> GridResult<SweepReport> {
        solver::sweep(self)
    }

    // ==================== Observers ====================

    /// Subscribe an observer to cell assignments. Events are delivered
    /// synchronously, one per assignment, in assignment order.
    pub fn subscribe(&mut self, observer: Arc<dyn CellObserver>) {
        self.observers.push(observer);
    }

    // ==================== Serialization ====================

    /// Encode as exactly `side²` ASCII digits, row-major, `'0'` for empty.
    /// Only defined for 9x9 grids.
    pub fn to_serialized_string(&self) -> GridResult<String> {
        if self.side != SERIALIZED_SIDE {
            return Err(GridError::ShapeMismatch {
                expected: SERIALIZED_SIDE,
                actual: self.side,
            });
        }
        Ok(self
            .cells
            .iter()
            .map(|c| (b'0' + c.value) as char)
            .collect())
    }

    /// Decode an 81-character digit string produced by
    /// [`to_serialized_string`](Self::to_serialized_string).
    pub fn from_serialized_string(s: &str) -> GridResult<Self> {
        let expected = SERIALIZED_SIDE * SERIALIZED_SIDE;
        if s.chars().count() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: s.chars().count(),
            });
        }

        let mut grid = Grid::new(DEFAULT_BLOCK_SIZE);
        for (i, ch) in s.chars().enumerate() {
            let digit = ch
                .to_digit(10)
                .ok_or(GridError::InvalidDigit { index: i, found: ch })?;
            if digit != 0 {
                let (row, col) = grid.layout.cell_pos(i);
                grid.set_value_at(row, col, digit as u8)?;
            }
        }
        Ok(grid)
    }

    /// Snapshot the grid as row arrays, zero for empty cells.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.side)
            .map(|r| (0..self.side).map(|c| self.cells[r * self.side + c].value).collect())
            .collect()
    }
}

/// Grids compare by shape and cell values; candidate caches and observers
/// are working state and do not participate.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.block_size == other.block_size
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.value == b.value)
    }
}

impl Eq for Grid {}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("block_size", &self.block_size)
            .field("rows", &self.to_rows())
            .finish()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.side {
            if row > 0 && row % self.block_size == 0 {
                for col in 0..self.side {
                    if col > 0 && col % self.block_size == 0 {
                        write!(f, "+-")?;
                    }
                    write!(f, "--")?;
                }
                writeln!(f)?;
            }
            for col in 0..self.side {
                if col > 0 && col % self.block_size == 0 {
                    write!(f, "| ")?;
                }
                match self.value_at(row, col) {
                    Some(v) => write!(f, "{} ", v)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let s = self.to_serialized_string().map_err(S::Error::custom)?;
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Grid::from_serialized_string(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const EASY: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::default();
        assert_eq!(grid.side(), 9);
        assert_eq!(grid.block_size(), 3);
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(grid.empty_count(), 81);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_from_rows_shape_errors() {
        let too_few: Vec<Vec<u8>> = vec![vec![0; 9]; 8];
        assert_eq!(
            Grid::from_rows(&too_few),
            Err(GridError::ShapeMismatch {
                expected: 9,
                actual: 8
            })
        );

        let mut ragged: Vec<Vec<u8>> = vec![vec![0; 9]; 9];
        ragged[4] = vec![0; 10];
        assert_eq!(
            Grid::from_rows(&ragged),
            Err(GridError::ShapeMismatch {
                expected: 9,
                actual: 10
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_out_of_domain() {
        let mut rows: Vec<Vec<u8>> = vec![vec![0; 9]; 9];
        rows[3][5] = 10;
        assert_eq!(
            Grid::from_rows(&rows),
            Err(GridError::OutOfDomain {
                row: 3,
                col: 5,
                value: 10
            })
        );
    }

    #[test]
    fn test_set_value_at_policies() {
        let mut grid = Grid::default();
        assert_eq!(
            grid.set_value_at(0, 0, 0),
            Err(GridError::OutOfDomain {
                row: 0,
                col: 0,
                value: 0
            })
        );
        grid.set_value_at(0, 0, 5).unwrap();
        assert_eq!(grid.value_at(0, 0), Some(5));
        // Set values are immutable.
        assert_eq!(
            grid.set_value_at(0, 0, 6),
            Err(GridError::CellOccupied { row: 0, col: 0 })
        );
        assert_eq!(grid.value_at(0, 0), Some(5));
    }

    #[test]
    fn test_candidates_reflect_neighbors() {
        let mut grid = Grid::default();
        grid.set_value_at(0, 0, 5).unwrap(); // row neighbor of (0,8)
        grid.set_value_at(8, 8, 3).unwrap(); // column neighbor of (0,8)
        grid.set_value_at(1, 7, 9).unwrap(); // block neighbor of (0,8)

        let candidates = grid.candidates_at(0, 8);
        assert!(!candidates.contains(5));
        assert!(!candidates.contains(3));
        assert!(!candidates.contains(9));
        assert_eq!(candidates.count(), 6);

        // A filled cell has no candidates.
        assert!(grid.candidates_at(0, 0).is_empty());
    }

    #[test]
    fn test_candidate_read_is_idempotent() {
        let mut grid = Grid::from_serialized_string(EASY).unwrap();
        let first = grid.candidates_at(0, 2);
        let second = grid.candidates_at(0, 2);
        assert_eq!(first, second);

        // Same through the caching path.
        let idx = grid.layout().cell_index(0, 2);
        let cached = grid.candidates_cached(idx);
        assert_eq!(cached, first);
        assert_eq!(grid.candidates_cached(idx), first);
    }

    #[test]
    fn test_dirty_propagation_on_assignment() {
        let mut grid = Grid::default();
        let before = grid.candidates_at(4, 0);
        assert_eq!(before.count(), 9);

        // Prime the cache, then assign to a row neighbor.
        let idx = grid.layout().cell_index(4, 0);
        grid.candidates_cached(idx);
        grid.set_value_at(4, 8, 7).unwrap();

        let after = grid.candidates_at(4, 0);
        assert!(!after.contains(7));
        assert_eq!(after.count(), 8);
    }

    #[test]
    fn test_all_possible_values_is_a_copy() {
        let grid = Grid::default();
        let mut domain = grid.all_possible_values();
        domain.remove(1);
        assert_eq!(grid.all_possible_values().count(), 9);
    }

    #[test]
    fn test_serialized_string_roundtrip() {
        let grid = Grid::from_serialized_string(EASY).unwrap();
        assert_eq!(grid.to_serialized_string().unwrap(), EASY);

        let again = Grid::from_serialized_string(&grid.to_serialized_string().unwrap()).unwrap();
        assert_eq!(grid, again);
    }

    #[test]
    fn test_deserialize_shape_and_digit_errors() {
        assert_eq!(
            Grid::from_serialized_string("123"),
            Err(GridError::ShapeMismatch {
                expected: 81,
                actual: 3
            })
        );

        let mut bad = EASY.to_string();
        bad.replace_range(10..11, "x");
        assert_eq!(
            Grid::from_serialized_string(&bad),
            Err(GridError::InvalidDigit {
                index: 10,
                found: 'x'
            })
        );
    }

    #[test]
    fn test_serialize_wrong_size_is_shape_error() {
        let grid = Grid::new(2);
        assert_eq!(
            grid.to_serialized_string(),
            Err(GridError::ShapeMismatch {
                expected: 9,
                actual: 4
            })
        );
    }

    #[test]
    fn test_serde_delegates_to_digit_string() {
        let grid = Grid::from_serialized_string(EASY).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, format!("\"{}\"", EASY));
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid, back);
    }

    #[test]
    fn test_to_rows_matches_values() {
        let grid = Grid::from_serialized_string(EASY).unwrap();
        let rows = grid.to_rows();
        assert_eq!(rows[0], vec![5, 3, 0, 0, 7, 0, 0, 0, 0]);
        assert_eq!(rows[8], vec![0, 0, 0, 0, 8, 0, 0, 7, 9]);
    }

    #[test]
    fn test_observer_sees_manual_assignment() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut grid = Grid::default();
        grid.subscribe(Arc::new(move |row, col, value| {
            sink.lock().unwrap().push((row, col, value));
        }));

        grid.set_value_at(2, 3, 8).unwrap();
        grid.set_value_at(5, 5, 1).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![(2, 3, 8), (5, 5, 1)]);
    }

    #[test]
    fn test_display_renders_blocks() {
        let grid = Grid::from_serialized_string(EASY).unwrap();
        let text = grid.to_string();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, "5 3 . | . 7 . | . . . ");
    }

    #[test]
    fn test_clone_is_independent() {
        let grid = Grid::from_serialized_string(EASY).unwrap();
        let mut copy = grid.clone();
        copy.set_value_at(0, 2, 4).unwrap();
        assert_eq!(grid.value_at(0, 2), None);
        assert_ne!(grid, copy);
    }
}
