//! Error type shared by the matrix constructors and kernels.

use thiserror::Error;

/// Everything that can go wrong while building a matrix or running a kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("matrix dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("expected {expected} values for a {rows}x{cols} matrix, got {actual}")]
    LengthMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("value {index} ({token:?}) is not a number")]
    Parse { index: usize, token: String },

    /// The columns of the left operand do not match the rows of the right one.
    #[error("cannot multiply: left operand has {left_cols} columns but right operand has {right_rows} rows")]
    DimensionMismatch { left_cols: usize, right_rows: usize },

    /// A caller-supplied output buffer has the wrong shape.
    #[error("output is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
