//! The deduction engine: a fixed-point loop over three techniques, applied
//! in a fixed order for reproducible results.
//!
//! One sweep runs intersection (pointing) eliminations, then hidden singles
//! over blocks, rows, and columns, then naked singles over all cells. The
//! loop repeats sweeps while the filled-cell count grows; it never guesses
//! and never backtracks. Stalling short of a full grid is a normal `false`
//! outcome; a unit that needs a value no cell can hold is a contradiction
//! fault.

use crate::error::{GridError, GridResult};
use crate::geometry::UnitKind;
use crate::grid::Grid;

/// What a single sweep accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Cells assigned by hidden and naked singles.
    pub assigned: usize,
    /// Candidate eliminations made by intersection reductions.
    pub eliminated: usize,
}

/// Run sweeps to a fixed point. `Ok(true)` when the grid fills completely,
/// `Ok(false)` when a sweep makes no progress first.
pub(crate) fn run(grid: &mut Grid) -> GridResult<bool> {
    let total = grid.side() * grid.side();
    let mut filled = grid.filled_count();
    loop {
        sweep(grid)?;
        let now = grid.filled_count();
        if now == total {
            return Ok(true);
        }
        if now == filled {
            return Ok(false);
        }
        filled = now;
    }
}

/// One full sweep: pointing eliminations feed the two single-placement
/// passes that follow.
pub(crate) fn sweep(grid: &mut Grid) -> GridResult<SweepReport> {
    let eliminated = pointing_pass(grid);
    let mut assigned = hidden_single_pass(grid)?;
    assigned += naked_single_pass(grid);
    Ok(SweepReport { assigned, eliminated })
}

/// Pointing reduction: when every cell of a block that can still take a
/// value lies in one row (or one column), the value cannot appear in that
/// row (column) outside the block. Narrows candidates; places nothing.
fn pointing_pass(grid: &mut Grid) -> usize {
    let side = grid.side();
    let mut eliminated = 0;

    for block in 0..side {
        let members: Vec<usize> = grid.block_indices(block).to_vec();
        let needed = grid.missing_values_in(&members);

        for value in needed.iter() {
            let spots: Vec<usize> = members
                .iter()
                .copied()
                .filter(|&idx| {
                    grid.cell_by_index(idx).is_empty() && grid.candidates_cached(idx).contains(value)
                })
                .collect();
            if spots.is_empty() {
                // Contradiction; left for the hidden-single pass to surface.
                continue;
            }

            let (first_row, first_col) = grid.layout().cell_pos(spots[0]);
            let same_row = spots
                .iter()
                .all(|&idx| grid.layout().cell_pos(idx).0 == first_row);
            let same_col = spots
                .iter()
                .all(|&idx| grid.layout().cell_pos(idx).1 == first_col);

            if same_row {
                let line: Vec<usize> = grid.row_indices(first_row).to_vec();
                for idx in line {
                    let (r, c) = grid.layout().cell_pos(idx);
                    if grid.layout().block_of(r, c) != block && grid.exclude(idx, value) {
                        eliminated += 1;
                    }
                }
            }
            if same_col {
                let line: Vec<usize> = grid.col_indices(first_col).to_vec();
                for idx in line {
                    let (r, c) = grid.layout().cell_pos(idx);
                    if grid.layout().block_of(r, c) != block && grid.exclude(idx, value) {
                        eliminated += 1;
                    }
                }
            }
        }
    }

    eliminated
}

/// Hidden singles over blocks, then rows, then columns: a value a unit
/// still needs that fits exactly one of its cells goes there. A needed
/// value with zero candidate cells means the puzzle is contradictory.
fn hidden_single_pass(grid: &mut Grid) -> GridResult<usize> {
    let side = grid.side();
    let mut assigned = 0;

    for kind in [UnitKind::Block, UnitKind::Row, UnitKind::Column] {
        for index in 0..side {
            let members: Vec<usize> = grid.layout().unit(kind, index).to_vec();
            let needed = grid.missing_values_in(&members);

            for value in needed.iter() {
                let mut found = None;
                let mut ambiguous = false;
                for &idx in &members {
                    if grid.cell_by_index(idx).is_empty()
                        && grid.candidates_cached(idx).contains(value)
                    {
                        if found.is_some() {
                            ambiguous = true;
                            break;
                        }
                        found = Some(idx);
                    }
                }

                if ambiguous {
                    continue;
                }
                match found {
                    Some(idx) => {
                        grid.assign(idx, value);
                        assigned += 1;
                    }
                    None => {
                        return Err(GridError::Inconsistent { unit: kind, index, value });
                    }
                }
            }
        }
    }

    Ok(assigned)
}

/// Naked singles: any unset cell whose candidate set has exactly one member
/// takes that value.
fn naked_single_pass(grid: &mut Grid) -> usize {
    let total = grid.side() * grid.side();
    let mut assigned = 0;

    for idx in 0..total {
        if grid.cell_by_index(idx).is_empty() {
            if let Some(value) = grid.candidates_cached(idx).sole() {
                grid.assign(idx, value);
                assigned += 1;
            }
        }
    }

    assigned
}
