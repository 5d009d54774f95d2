//! Multi-threaded i-j-k multiply.

use std::ops::Range;
use std::thread;

use tracing::{debug, trace};

use super::join_all;
use super::partition::multiply_ranges;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::matrix::naive_ijk::{check_operands, multiply_rows};

/// One worker's share of the product: a range of rows of A and the matching
/// rows of C, which it owns exclusively.
struct WorkItem<'a> {
    rows: Range<usize>,
    out: &'a mut [f64],
}

/// Multi-threaded matrix multiplication: returns `A × B`.
///
/// Splits the rows of A (and C) with
/// [`multiply_range`](super::partition::multiply_range), spawning exactly
/// `num_threads` workers. Every worker reads all of B. Since each output cell
/// is summed by one worker in one pass, the result is bit-identical to
/// [`crate::matrix::naive_ijk::multiply`].
///
/// # Errors
///
/// [`MatrixError::DimensionMismatch`](crate::MatrixError::DimensionMismatch)
/// if `a.cols() != b.rows()`.
pub fn multiply_parallel(a: &Matrix, b: &Matrix, num_threads: usize) -> Result<Matrix> {
    check_operands(a, b)?;
    let mut c = Matrix::alloc(a.rows(), b.cols());
    multiply_parallel_into(a, b, &mut c, num_threads)?;
    Ok(c)
}

/// Same as [`multiply_parallel`], writing into a pre-allocated `c`.
///
/// Blocks until every worker has finished.
pub fn multiply_parallel_into(a: &Matrix, b: &Matrix, c: &mut Matrix, num_threads: usize) -> Result<()> {
    check_operands(a, b)?;
    c.expect_shape(a.rows(), b.cols())?;

    let r1 = a.rows();
    let c2 = b.cols();
    let ranges = multiply_ranges(r1, num_threads);
    debug!(r1, c1 = a.cols(), c2, num_threads, "dispatching multiply");

    let items = split_rows(c.as_mut_slice(), c2, ranges);

    thread::scope(|s| -> Result<()> {
        let handles: Vec<_> = items
            .into_iter()
            .map(|item| {
                s.spawn(move || {
                    trace!(start = item.rows.start, end = item.rows.end, "multiply worker");
                    multiply_rows(a, b, item.out, item.rows);
                })
            })
            .collect();

        join_all(handles)
    })
}

/// Hand each range its own rows of `out`. Ranges must be contiguous and in
/// order, as the partitioner produces them.
fn split_rows(mut out: &mut [f64], cols: usize, ranges: Vec<Range<usize>>) -> Vec<WorkItem<'_>> {
    let mut items = Vec::with_capacity(ranges.len());
    let mut next = 0;
    for rows in ranges {
        assert_eq!(rows.start, next, "row ranges must be contiguous");
        let (head, tail) = std::mem::take(&mut out).split_at_mut(rows.len() * cols);
        next = rows.end;
        items.push(WorkItem { rows, out: head });
        out = tail;
    }
    assert!(out.is_empty(), "row ranges do not cover the output");
    items
}
