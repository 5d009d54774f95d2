//! Multi-threaded kernels.
//!
//! Each operation spawns a fixed set of scoped threads, one per row range
//! from [`partition`], and joins all of them before returning. Inputs are
//! shared read-only; every worker writes a disjoint part of the output, so
//! there are no locks.
//!
//! Available implementations:
//! - `transpose_mt`: rows of the input split with `transpose_chunks`
//! - `multiply_mt`: rows of A and C split with `multiply_range`

pub mod multiply_mt;
pub mod partition;
pub mod transpose_mt;

use std::thread::ScopedJoinHandle;

use crate::error::{MatrixError, Result};

/// Join every handle, reporting the first worker that panicked.
///
/// All handles are joined even after a failure so that no panic is left
/// unobserved when the scope ends.
fn join_all(handles: Vec<ScopedJoinHandle<'_, ()>>) -> Result<()> {
    let mut result = Ok(());
    for (worker, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() && result.is_ok() {
            result = Err(MatrixError::WorkerPanicked { worker });
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_join_all_reports_panicking_worker() {
        // The scope only returns if every handle was joined; an unjoined
        // panicking thread would make it panic instead.
        let result = thread::scope(|s| {
            let handles: Vec<_> = (0..3)
                .map(|i| {
                    s.spawn(move || {
                        if i == 1 {
                            panic!("worker {} failed", i);
                        }
                    })
                })
                .collect();
            join_all(handles)
        });

        assert_eq!(result, Err(MatrixError::WorkerPanicked { worker: 1 }));
    }

    #[test]
    fn test_join_all_ok() {
        let result = thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| ())).collect();
            join_all(handles)
        });
        assert_eq!(result, Ok(()));
    }
}
