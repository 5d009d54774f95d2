//! The built-in reference cases run by `matmul-trans test`.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::{multiply, transpose};

/// Result of one reference case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub number: usize,
    pub name: &'static str,
    pub passed: bool,
    pub elapsed: Option<Duration>,
}

/// Results of every reference case, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub cases: Vec<CaseResult>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "passed" } else { "failed" };
        write!(f, "Test Case {} : {} {}", self.number, self.name, status)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{}", case)?;
            if let Some(elapsed) = case.elapsed {
                writeln!(f, "Time measured: {} nanoseconds", elapsed.as_nanos())?;
            }
            writeln!(f)?;
        }
        if self.all_passed() {
            writeln!(f, "All {} out of {} test cases passed.", self.passed(), self.total())
        } else {
            writeln!(
                f,
                "Only {} out of {} test cases passed. Please look above to see which test cases have failed.",
                self.passed(),
                self.total()
            )
        }
    }
}

/// Run the six reference cases single-threaded.
///
/// A case whose inputs fail to build counts as failed rather than aborting
/// the run.
pub fn run(show_timing: bool) -> Report {
    let cases: [(&'static str, fn(bool) -> Result<(bool, Option<Duration>)>); 6] = [
        ("Transpose symmetric matrix", transpose_symmetric),
        ("Transpose asymmetric matrix", transpose_asymmetric),
        ("Transpose matrix", transpose_5x7),
        ("Matrix multiplication", multiply_symmetric),
        ("Matrix multiplication", multiply_square),
        ("Matrix multiplication", multiply_rectangular),
    ];

    let cases = cases
        .iter()
        .enumerate()
        .map(|(i, &(name, case))| {
            let (passed, elapsed) = case(show_timing).unwrap_or_else(|err| {
                debug!(case = i + 1, %err, "reference case could not run");
                (false, None)
            });
            CaseResult {
                number: i + 1,
                name,
                passed,
                elapsed,
            }
        })
        .collect();

    Report { cases }
}

fn transpose_symmetric(show_timing: bool) -> Result<(bool, Option<Duration>)> {
    let m = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]])?;
    let out = transpose(&m, 1, show_timing)?;
    Ok((out.matrix == m, out.elapsed))
}

fn transpose_asymmetric(show_timing: bool) -> Result<(bool, Option<Duration>)> {
    let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
    let expected = Matrix::from_rows(&[[1.0, 3.0], [2.0, 4.0]])?;
    let out = transpose(&m, 1, show_timing)?;
    Ok((out.matrix == expected, out.elapsed))
}

fn transpose_5x7(show_timing: bool) -> Result<(bool, Option<Duration>)> {
    let m = Matrix::from_fn(5, 7, |i, j| (i * 7 + j + 1) as f64)?;
    let expected = Matrix::from_fn(7, 5, |i, j| (j * 7 + i + 1) as f64)?;
    let out = transpose(&m, 1, show_timing)?;
    Ok((out.matrix == expected, out.elapsed))
}

fn multiply_symmetric(show_timing: bool) -> Result<(bool, Option<Duration>)> {
    let m = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]])?;
    let expected = Matrix::from_rows(&[[5.0, 4.0], [4.0, 5.0]])?;
    let out = multiply(&m, &m, 1, show_timing)?;
    Ok((out.matrix == expected, out.elapsed))
}

fn multiply_square(show_timing: bool) -> Result<(bool, Option<Duration>)> {
    let a = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]])?;
    let b = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
    let expected = Matrix::from_rows(&[[7.0, 10.0], [5.0, 8.0]])?;
    let out = multiply(&a, &b, 1, show_timing)?;
    Ok((out.matrix == expected, out.elapsed))
}

fn multiply_rectangular(show_timing: bool) -> Result<(bool, Option<Duration>)> {
    let a = Matrix::parse("7,9,11,13,15,8,10,12,14,16", 2, 5)?;
    let b = Matrix::parse("1,5,5,0,6,1,6,1,8,8,1,0,9,1,9,1,1,10,10,0", 5, 4)?;
    let expected = Matrix::from_rows(&[[281.0, 295.0, 367.0, 22.0], [306.0, 320.0, 398.0, 24.0]])?;
    let out = multiply(&a, &b, 1, show_timing)?;
    Ok((out.matrix == expected, out.elapsed))
}
