//! Splitting rows across workers.
//!
//! Two policies, one per operation. Both hand out contiguous half-open row
//! ranges that cover `0..rows` exactly once, which is what lets workers write
//! into the shared output without locks.

use std::ops::Range;

/// Row ranges for the threaded transpose.
///
/// Steps through the rows in chunks of `rows / num_threads`, clipping the
/// last chunk at `rows`. When `num_threads` does not divide `rows` this
/// yields more ranges than threads:
///
/// ```
/// use matmul_trans::threaded::partition::transpose_chunks;
///
/// assert_eq!(transpose_chunks(7, 3), vec![0..2, 2..4, 4..6, 6..7]);
/// assert_eq!(transpose_chunks(8, 2), vec![0..4, 4..8]);
/// ```
///
/// A chunk size of zero (more threads than rows) is raised to one row per
/// range.
pub fn transpose_chunks(rows: usize, num_threads: usize) -> Vec<Range<usize>> {
    let chunk = (rows / num_threads.max(1)).max(1);

    let mut ranges = Vec::with_capacity(rows.div_ceil(chunk));
    let mut start = 0;
    while start < rows {
        let end = (start + chunk).min(rows);
        ranges.push(start..end);
        start += chunk;
    }
    ranges
}

/// Row range of worker `index` for the threaded multiply.
///
/// Every worker gets `r1 / num_threads` rows and worker 0 additionally takes
/// the whole remainder `r1 % num_threads`. Ranges are empty for workers
/// `1..num_threads` when there are more threads than rows.
///
/// # Panics
///
/// Panics if `index >= num_threads`.
pub fn multiply_range(r1: usize, num_threads: usize, index: usize) -> Range<usize> {
    let num_threads = num_threads.max(1);
    assert!(
        index < num_threads,
        "worker {} out of range for {} threads",
        index,
        num_threads
    );

    let per_thread = r1 / num_threads;
    let remainder = r1 % num_threads;

    if index == 0 {
        0..per_thread + remainder
    } else {
        per_thread * index + remainder..per_thread * (index + 1) + remainder
    }
}

/// All multiply ranges, one per worker, in worker order.
pub fn multiply_ranges(r1: usize, num_threads: usize) -> Vec<Range<usize>> {
    (0..num_threads.max(1))
        .map(|index| multiply_range(r1, num_threads, index))
        .collect()
}

/// Screen a requested thread count before dispatch.
///
/// Falls back to a single thread when the request exceeds the hardware
/// parallelism or the larger matrix dimension. A request of zero also means
/// one thread.
///
/// # Arguments
///
/// * `requested` - Threads asked for by the caller
/// * `largest_dim` - `max(rows, cols)` over the operands
/// * `hardware` - Available hardware parallelism
pub fn choose_thread_count(requested: usize, largest_dim: usize, hardware: usize) -> usize {
    if requested == 0 || requested > hardware || requested > largest_dim {
        1
    } else {
        requested
    }
}
