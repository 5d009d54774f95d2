//! The dense matrix type and the single-threaded kernels.
//!
//! These are the reference implementations: the threaded kernels run the
//! same per-row loops and must produce identical output.

mod dense;
pub mod naive_ijk;
pub mod transpose;

pub use dense::Matrix;
