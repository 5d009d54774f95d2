//! Owned, row-major dense matrix.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{MatrixError, Result};

/// A `rows × cols` matrix of `f64` stored in one contiguous row-major buffer.
///
/// The shape is fixed when the matrix is built. Elements can be changed in
/// place but the buffer is never resized, so `data.len() == rows * cols`
/// holds for the lifetime of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocate a zero-filled matrix.
    ///
    /// This is the result buffer every kernel writes into. It is allocated
    /// before any worker starts so that workers only ever write into
    /// disjoint parts of an existing buffer.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidDimensions`] if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        check_dims(rows, cols)?;
        Ok(Self::alloc(rows, cols))
    }

    /// Zero-filled allocation for shapes derived from an existing matrix,
    /// which are positive by construction.
    pub(crate) fn alloc(rows: usize, cols: usize) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidDimensions`] for a zero dimension and
    /// [`MatrixError::LengthMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        check_dims(rows, cols)?;
        if data.len() != rows * cols {
            return Err(MatrixError::LengthMismatch {
                rows,
                cols,
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix by evaluating `f(i, j)` for every cell in row-major order.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        check_dims(rows, cols)?;
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from a slice of rows. Every row must have the length of
    /// the first one.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        check_dims(rows.len(), cols)?;

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Parse a comma-separated list of numbers into a `rows × cols` matrix.
    ///
    /// Values fill the matrix in row-major order. Whitespace around each
    /// value is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use matmul_trans::Matrix;
    ///
    /// let m = Matrix::parse("1, 2, 3, 4, 5, 6", 2, 3).unwrap();
    /// assert_eq!(m[(1, 0)], 4.0);
    /// assert_eq!(m.shape(), (2, 3));
    /// ```
    ///
    /// # Errors
    ///
    /// [`MatrixError::Parse`] for a token that is not a number and
    /// [`MatrixError::LengthMismatch`] if the number of values is not
    /// `rows * cols`.
    pub fn parse(text: &str, rows: usize, cols: usize) -> Result<Self> {
        check_dims(rows, cols)?;
        let data = text
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token.parse::<f64>().map_err(|_| MatrixError::Parse {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::from_vec(rows, cols, data)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Fail with [`MatrixError::ShapeMismatch`] unless `self` is `rows × cols`.
    pub(crate) fn expect_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.shape() == (rows, cols) {
            Ok(())
        } else {
            Err(MatrixError::ShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                actual_rows: self.rows,
                actual_cols: self.cols,
            })
        }
    }
}

fn check_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::InvalidDimensions { rows, cols });
    }
    Ok(())
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        &mut self.data[i * self.cols + j]
    }
}

/// Space-separated rows, each value followed by a space, with a blank line
/// after the last row.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for value in self.row(i) {
                write!(f, "{} ", value)?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_rejects_empty_shapes() {
        assert_eq!(
            Matrix::zeros(0, 3),
            Err(MatrixError::InvalidDimensions { rows: 0, cols: 3 })
        );
        assert_eq!(
            Matrix::zeros(2, 0),
            Err(MatrixError::InvalidDimensions { rows: 2, cols: 0 })
        );

        let m = Matrix::zeros(2, 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert!(m.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_parse_row_major() {
        let m = Matrix::parse("7,9,11,13,15,8,10,12,14,16", 2, 5).unwrap();
        assert_eq!(m.row(0), &[7.0, 9.0, 11.0, 13.0, 15.0]);
        assert_eq!(m.row(1), &[8.0, 10.0, 12.0, 14.0, 16.0]);
    }

    #[test]
    fn test_parse_keeps_double_precision() {
        let m = Matrix::parse("0.1,-2.5e3", 1, 2).unwrap();
        assert_eq!(m[(0, 0)], 0.1);
        assert_eq!(m[(0, 1)], -2500.0);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Matrix::parse("1,2,x,4", 2, 2),
            Err(MatrixError::Parse {
                index: 2,
                token: "x".to_string()
            })
        );
        assert_eq!(
            Matrix::parse("1,2,3", 2, 2),
            Err(MatrixError::LengthMismatch {
                rows: 2,
                cols: 2,
                expected: 4,
                actual: 3
            })
        );
        assert!(matches!(
            Matrix::parse("1,2,3,4,5", 2, 2),
            Err(MatrixError::LengthMismatch { actual: 5, .. })
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_get_and_index() {
        let mut m = Matrix::from_fn(2, 3, |i, j| (i * 3 + j) as f64).unwrap();
        assert_eq!(m.get(1, 2), Some(5.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);

        m[(0, 1)] = 42.0;
        assert_eq!(m[(0, 1)], 42.0);
    }

    #[test]
    fn test_into_vec_returns_row_major_buffer() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = Matrix::from_vec(3, 2, data.clone()).unwrap();
        assert_eq!(m.row(2), &[5.0, 6.0]);
        assert_eq!(m.into_vec(), data);

        let t = crate::matrix::transpose::transpose(&Matrix::from_vec(3, 2, data).unwrap());
        assert_eq!(t.into_vec(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_display_format() {
        let m = Matrix::from_rows(&[[281.0, 295.0], [0.5, -1.0]]).unwrap();
        assert_eq!(m.to_string(), "281 295 \n0.5 -1 \n\n");
    }
}
