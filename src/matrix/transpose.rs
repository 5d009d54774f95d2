use std::ops::Range;

use super::Matrix;
use crate::error::Result;

/// Transpose a matrix: returns `src^T`.
///
/// Converts from row-major (rows × cols) to row-major (cols × rows).
/// After transpose, what was column j of src becomes row j of the result.
///
/// # Example
///
/// ```
/// use matmul_trans::Matrix;
/// use matmul_trans::matrix::transpose::transpose;
///
/// let src = Matrix::parse("1,2,3,4,5,6", 2, 3).unwrap(); // 2×3
/// let dst = transpose(&src);                             // 3×2
///
/// assert_eq!(dst.as_slice(), &[1.0, 4.0,
///                              2.0, 5.0,
///                              3.0, 6.0]);
/// ```
pub fn transpose(src: &Matrix) -> Matrix {
    let mut dst = Matrix::alloc(src.cols(), src.rows());
    write_all_rows(src, &mut dst);
    dst
}

/// Transpose `src` into a pre-allocated `dst`.
///
/// # Errors
///
/// [`MatrixError::ShapeMismatch`](crate::MatrixError::ShapeMismatch) if `dst`
/// is not `src.cols() × src.rows()`.
pub fn transpose_into(src: &Matrix, dst: &mut Matrix) -> Result<()> {
    dst.expect_shape(src.cols(), src.rows())?;
    write_all_rows(src, dst);
    Ok(())
}

fn write_all_rows(src: &Matrix, dst: &mut Matrix) {
    let stride = src.rows();
    let out = dst.as_mut_slice();
    transpose_rows(src, 0..src.rows(), |row, col, value| out[row * stride + col] = value);
}

/// Copy rows `range` of `src` into the matching columns of the transpose.
///
/// This is the worker body shared by both paths: the sequential kernel runs
/// it over every row, the threaded kernel runs it once per worker over that
/// worker's rows. Each element `src[i][j]` is handed to `put(j, i, value)`,
/// i.e. with its row and column in the transposed matrix.
///
/// # Arguments
///
/// * `src` - Source matrix (rows × cols)
/// * `range` - Rows of src to copy
/// * `put` - Receives `(row, col, value)` of the destination (cols × rows)
///
/// # Panics
///
/// Panics if `range` runs past the last row of `src`.
pub fn transpose_rows<F>(src: &Matrix, range: Range<usize>, mut put: F)
where
    F: FnMut(usize, usize, f64),
{
    assert!(
        range.end <= src.rows(),
        "rows {:?} out of bounds for {} rows",
        range,
        src.rows()
    );

    for i in range {
        for (j, &value) in src.row(i).iter().enumerate() {
            put(j, i, value);
        }
    }
}
