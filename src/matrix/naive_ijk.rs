use std::ops::Range;

use super::Matrix;
use crate::error::{MatrixError, Result};

/// Matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple-loop implementation. Each output cell is
/// summed over `k` in ascending order by a single pass, which is what
/// makes the threaded version bit-identical to this one.
///
/// # Errors
///
/// [`MatrixError::DimensionMismatch`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_operands(a, b)?;
    let mut c = Matrix::alloc(a.rows(), b.cols());
    multiply_rows(a, b, c.as_mut_slice(), 0..a.rows());
    Ok(c)
}

/// Same as [`multiply`], writing into a pre-allocated `c`.
///
/// Every cell of `c` is overwritten; it does not need to be zeroed first.
pub fn multiply_into(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    check_operands(a, b)?;
    c.expect_shape(a.rows(), b.cols())?;
    multiply_rows(a, b, c.as_mut_slice(), 0..a.rows());
    Ok(())
}

/// Compute rows `range` of `A × B` into `c_rows`.
///
/// `c_rows` holds exactly those output rows, so a worker can be handed its
/// own slice of C and nothing else.
///
/// # Arguments
///
/// * `a` - Matrix A (r1 × c1)
/// * `b` - Matrix B (c1 × c2)
/// * `c_rows` - Output rows `range` of C, row-major, `range.len() × c2`
/// * `range` - Rows of A (and C) to compute
pub fn multiply_rows(a: &Matrix, b: &Matrix, c_rows: &mut [f64], range: Range<usize>) {
    let c1 = a.cols();
    let c2 = b.cols();
    assert_eq!(c1, b.rows(), "A: {} columns but B has {} rows", c1, b.rows());
    assert_eq!(
        c_rows.len(),
        range.len() * c2,
        "C: expected {}x{}={} elements",
        range.len(),
        c2,
        range.len() * c2
    );

    let a = a.as_slice();
    let b = b.as_slice();
    for (local, i) in range.enumerate() {
        for j in 0..c2 {
            let mut sum = 0.0;
            for k in 0..c1 {
                sum += a[i * c1 + k] * b[k * c2 + j];
            }
            c_rows[local * c2 + j] = sum;
        }
    }
}

pub(crate) fn check_operands(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch {
            left_cols: a.cols(),
            right_rows: b.rows(),
        });
    }
    Ok(())
}
