//! Multi-threaded transpose.

use std::marker::PhantomData;
use std::ops::Range;
use std::thread;

use tracing::{debug, trace};

use super::join_all;
use super::partition::transpose_chunks;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::matrix::transpose::transpose_rows;

/// Multi-threaded transpose: returns `src^T`.
///
/// Rows of `src` are split with [`transpose_chunks`]; each worker runs
/// [`transpose_rows`] over its rows, writing the matching columns of the
/// result. Output is identical to
/// [`crate::matrix::transpose::transpose`] for any thread count.
pub fn transpose_parallel(src: &Matrix, num_threads: usize) -> Result<Matrix> {
    let mut dst = Matrix::alloc(src.cols(), src.rows());
    transpose_parallel_into(src, &mut dst, num_threads)?;
    Ok(dst)
}

/// Same as [`transpose_parallel`], writing into a pre-allocated `dst`.
///
/// Blocks until every worker has finished.
pub fn transpose_parallel_into(src: &Matrix, dst: &mut Matrix, num_threads: usize) -> Result<()> {
    dst.expect_shape(src.cols(), src.rows())?;

    let (rows, cols) = src.shape();
    let ranges = transpose_chunks(rows, num_threads);
    debug!(rows, cols, num_threads, workers = ranges.len(), "dispatching transpose");

    let blocks = ColumnBlock::split(dst, &ranges);

    thread::scope(|s| -> Result<()> {
        let handles: Vec<_> = blocks
            .into_iter()
            .map(|mut block| {
                s.spawn(move || {
                    trace!(start = block.cols.start, end = block.cols.end, "transpose worker");
                    let rows = block.cols.clone();
                    transpose_rows(src, rows, |row, col, value| block.set(row, col, value));
                })
            })
            .collect();

        join_all(handles)
    })
}

/// Exclusive write access to a set of whole columns of a matrix.
///
/// Rows of the transpose input become columns of the output, so a worker
/// that owns input rows `a..b` writes exactly columns `a..b` of every output
/// row. Those cells are strided, so they cannot be handed out as slices;
/// instead [`ColumnBlock::split`] checks that the column ranges are disjoint
/// and each block only accepts writes inside its own range.
struct ColumnBlock<'a> {
    ptr: *mut f64,
    rows: usize,
    stride: usize,
    cols: Range<usize>,
    _marker: PhantomData<&'a mut [f64]>,
}

// SAFETY: blocks created by one `split` call never share a column, so two
// threads never touch the same element, and the borrow of the matrix keeps
// the buffer alive and unaliased for `'a`.
unsafe impl Send for ColumnBlock<'_> {}

impl<'a> ColumnBlock<'a> {
    /// Carve `dst` into one block per range.
    ///
    /// # Panics
    ///
    /// Panics if the ranges are out of order, overlap, or run past the last
    /// column.
    fn split(dst: &'a mut Matrix, ranges: &[Range<usize>]) -> Vec<Self> {
        let (rows, stride) = dst.shape();
        let mut next = 0;
        for r in ranges {
            assert!(
                next <= r.start && r.start <= r.end && r.end <= stride,
                "column range {:?} overlaps or exceeds {} columns",
                r,
                stride
            );
            next = r.end;
        }

        let ptr = dst.as_mut_slice().as_mut_ptr();
        ranges
            .iter()
            .map(|r| ColumnBlock {
                ptr,
                rows,
                stride,
                cols: r.clone(),
                _marker: PhantomData,
            })
            .collect()
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.rows && self.cols.contains(&col),
            "write to ({}, {}) outside block {:?}",
            row,
            col,
            self.cols
        );
        // SAFETY: in bounds by the check above, and `col` belongs to this
        // block alone.
        unsafe {
            *self.ptr.add(row * self.stride + col) = value;
        }
    }
}
