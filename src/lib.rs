//! Dense matrix transpose and multiplication, single- or multi-threaded.
//!
//! Both operations come in a sequential reference form and a row-partitioned
//! threaded form. The threaded form splits rows across a fixed number of
//! scoped workers that each own a disjoint part of the output, and always
//! produces exactly the same values as the sequential form.
//!
//! ## Usage
//!
//! ```
//! use matmul_trans::{Matrix, multiply, transpose};
//!
//! let a = Matrix::parse("7,9,11,13,15,8,10,12,14,16", 2, 5).unwrap();
//! let b = Matrix::parse("1,5,5,0,6,1,6,1,8,8,1,0,9,1,9,1,1,10,10,0", 5, 4).unwrap();
//!
//! let c = multiply(&a, &b, 2, false).unwrap().matrix;
//! assert_eq!(c.row(0), &[281.0, 295.0, 367.0, 22.0]);
//!
//! let t = transpose(&a, 1, false).unwrap().matrix;
//! assert_eq!(t.shape(), (5, 2));
//! ```
//!
//! ## What's inside
//!
//! - [`matrix`]: the owned [`Matrix`] and the sequential kernels
//! - [`threaded`]: the row partitioner and the threaded kernels
//! - [`selftest`]: the built-in reference cases

pub mod error;
pub mod matrix;
pub mod selftest;
pub mod threaded;

use std::time::{Duration, Instant};

use tracing::debug;

pub use error::{MatrixError, Result};
pub use matrix::Matrix;
pub use threaded::partition::choose_thread_count;

/// The result of a dispatched operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub matrix: Matrix,
    /// Thread count the operation was dispatched with; 1 for the sequential
    /// path.
    pub threads: usize,
    /// Worker threads actually spawned; 1 for the sequential path. Equals
    /// `threads` for multiply, but transpose chunking can start more
    /// workers than requested (7 rows on 3 threads runs 4 workers).
    pub workers: usize,
    /// Wall-clock time of the compute step, if timing was requested.
    /// Allocation of the result is not included.
    pub elapsed: Option<Duration>,
}

/// Transpose `m`, sequentially when `num_threads <= 1` and threaded otherwise.
///
/// # Example
///
/// ```
/// use matmul_trans::{Matrix, transpose};
///
/// let m = Matrix::parse("1,2,3,4", 2, 2).unwrap();
/// let out = transpose(&m, 2, true).unwrap();
///
/// assert_eq!(out.matrix.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
/// assert_eq!(out.threads, 2);
/// assert_eq!(out.workers, 2);
/// assert!(out.elapsed.is_some());
/// ```
pub fn transpose(m: &Matrix, num_threads: usize, show_timing: bool) -> Result<Outcome> {
    let mut dst = Matrix::alloc(m.cols(), m.rows());

    if num_threads <= 1 {
        debug!(rows = m.rows(), cols = m.cols(), "sequential transpose");
        let elapsed = timed(show_timing, || matrix::transpose::transpose_into(m, &mut dst))?;
        Ok(finish(dst, 1, 1, elapsed))
    } else {
        let workers = threaded::partition::transpose_chunks(m.rows(), num_threads).len();
        let elapsed = timed(show_timing, || {
            threaded::transpose_mt::transpose_parallel_into(m, &mut dst, num_threads)
        })?;
        Ok(finish(dst, num_threads, workers, elapsed))
    }
}

/// Multiply `a × b`, sequentially when `num_threads <= 1` and threaded
/// otherwise.
///
/// # Errors
///
/// [`MatrixError::DimensionMismatch`] if `a.cols() != b.rows()`. Nothing is
/// allocated or computed in that case.
pub fn multiply(a: &Matrix, b: &Matrix, num_threads: usize, show_timing: bool) -> Result<Outcome> {
    matrix::naive_ijk::check_operands(a, b)?;
    let mut c = Matrix::alloc(a.rows(), b.cols());

    if num_threads <= 1 {
        debug!(r1 = a.rows(), c1 = a.cols(), c2 = b.cols(), "sequential multiply");
        let elapsed = timed(show_timing, || matrix::naive_ijk::multiply_into(a, b, &mut c))?;
        Ok(finish(c, 1, 1, elapsed))
    } else {
        let elapsed = timed(show_timing, || {
            threaded::multiply_mt::multiply_parallel_into(a, b, &mut c, num_threads)
        })?;
        Ok(finish(c, num_threads, num_threads, elapsed))
    }
}

fn timed<F>(enabled: bool, f: F) -> Result<Option<Duration>>
where
    F: FnOnce() -> Result<()>,
{
    if !enabled {
        f()?;
        return Ok(None);
    }
    let start = Instant::now();
    f()?;
    Ok(Some(start.elapsed()))
}

fn finish(matrix: Matrix, threads: usize, workers: usize, elapsed: Option<Duration>) -> Outcome {
    if let Some(elapsed) = elapsed {
        debug!(threads, workers, nanos = elapsed.as_nanos() as u64, "compute finished");
    }
    Outcome {
        matrix,
        threads,
        workers,
        elapsed,
    }
}
