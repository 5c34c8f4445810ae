//! Constraint-propagation Sudoku engine.
//!
//! Deduces cell values using only logical elimination — naked singles,
//! hidden singles, and pointing (intersection) reductions — iterated to a
//! fixed point. No guessing, no backtracking: a puzzle either resolves
//! completely by pure logic, stalls (a normal `false` outcome), or turns
//! out to be contradictory (a distinct fault).
//!
//! ```
//! use sudoku_logic::Grid;
//!
//! let mut grid = Grid::from_serialized_string(
//!     "006007300018009050500000064920080000000763000000090075630000008090300520002400600",
//! )?;
//! assert_eq!(grid.solve()?, true);
//! assert!(grid.is_complete());
//! # Ok::<(), sudoku_logic::GridError>(())
//! ```

mod candidates;
mod error;
mod geometry;
mod grid;
mod notify;
mod solver;

pub use candidates::{CandidateIter, CandidateSet};
pub use error::{GridError, GridResult};
pub use geometry::{Layout, UnitKind};
pub use grid::{Cell, Grid};
pub use notify::CellObserver;
pub use solver::SweepReport;
