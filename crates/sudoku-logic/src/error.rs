//! Error types for grid construction, mutation, and solving.

use crate::geometry::UnitKind;
use serde::{Deserialize, Serialize};

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur while building, mutating, or solving a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridError {
    /// Input does not match the expected `side x side` dimensions.
    ShapeMismatch { expected: usize, actual: usize },
    /// A supplied value is outside `[1, side]`.
    OutOfDomain { row: usize, col: usize, value: u8 },
    /// A non-digit character in a serialized grid string.
    InvalidDigit { index: usize, found: char },
    /// The target cell already holds a value; set values are immutable.
    CellOccupied { row: usize, col: usize },
    /// A unit still needs a value but no cell in it remains a candidate.
    /// The supplied puzzle was contradictory; the grid is left partially
    /// filled and further solving is not possible.
    Inconsistent {
        unit: UnitKind,
        index: usize,
        value: u8,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {}, got {}", expected, actual)
            }
            Self::OutOfDomain { row, col, value } => {
                write!(
                    f,
                    "value {} at ({}, {}) is outside the grid's domain",
                    value, row, col
                )
            }
            Self::InvalidDigit { index, found } => {
                write!(f, "invalid digit {:?} at offset {}", found, index)
            }
            Self::CellOccupied { row, col } => {
                write!(f, "cell ({}, {}) already has a value", row, col)
            }
            Self::Inconsistent { unit, index, value } => {
                write!(
                    f,
                    "inconsistent puzzle: {} {} needs {} but no cell can hold it",
                    unit, index, value
                )
            }
        }
    }
}

impl std::error::Error for GridError {}
