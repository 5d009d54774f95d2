//! Command-line front end for the matrix kernels.
//!
//! ```text
//! matmul-trans transpose --timing 2 2 1,2,2,1
//! matmul-trans multiply --threads 2 3 3 1,2,3,4,5,6,7,8,9 3 1 4,5,6
//! matmul-trans test --timing
//! ```

use std::process::ExitCode;
use std::thread;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use matmul_trans::{Matrix, Outcome, choose_thread_count, selftest};
use tracing::{Level, debug, warn};
use tracing_subscriber::FmtSubscriber;

/// Dense matrix transpose and multiplication
#[derive(Parser, Debug)]
#[command(name = "matmul-trans")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transpose a ROWS x COLS matrix
    Transpose {
        #[command(flatten)]
        run: RunArgs,

        /// Rows of the matrix
        rows: usize,
        /// Columns of the matrix
        cols: usize,
        /// Comma-separated values in row-major order
        #[arg(allow_hyphen_values = true)]
        values: String,
    },

    /// Multiply an R1 x C1 matrix by an R2 x C2 matrix
    Multiply {
        #[command(flatten)]
        run: RunArgs,

        r1: usize,
        c1: usize,
        /// Comma-separated values of the first matrix
        #[arg(allow_hyphen_values = true)]
        values1: String,
        r2: usize,
        c2: usize,
        /// Comma-separated values of the second matrix
        #[arg(allow_hyphen_values = true)]
        values2: String,
    },

    /// Run the built-in reference cases
    Test {
        /// Print the compute time of each case
        #[arg(long)]
        timing: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Worker threads; 1 runs the sequential kernel
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Print the compute time in nanoseconds
    #[arg(long)]
    timing: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = parse_failure_code(&err);
            if let Err(io_err) = err.print() {
                eprintln!("{}", io_err);
            }
            return ExitCode::from(code);
        }
    };

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", err);
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Transpose {
            run: opts,
            rows,
            cols,
            values,
        } => {
            check_dims(&[rows, cols])?;
            let threads = screen_threads(opts.threads, rows.max(cols));
            let m = Matrix::parse(&values, rows, cols).context("invalid matrix values")?;
            print!("{}", render_result("Input Matrix : ", &m));

            let out = matmul_trans::transpose(&m, threads, opts.timing)?;
            report_timing(&out);
            print!("{}", render_result("Result of matrix transpose is: ", &out.matrix));
        }
        Commands::Multiply {
            run: opts,
            r1,
            c1,
            values1,
            r2,
            c2,
            values2,
        } => {
            check_dims(&[r1, c1, r2, c2])?;
            if c1 != r2 {
                bail!(
                    "cannot multiply: columns of the first matrix ({}) must equal rows of the second ({})",
                    c1,
                    r2
                );
            }
            let threads = screen_threads(opts.threads, r1.max(c1));
            let threads = screen_threads(threads, r2.max(c2));

            let a = Matrix::parse(&values1, r1, c1).context("invalid values for the first matrix")?;
            let b = Matrix::parse(&values2, r2, c2).context("invalid values for the second matrix")?;
            print!("{}", render_result("Input Matrix : ", &a));
            print!("{}", render_result("Input Matrix : ", &b));

            let out = matmul_trans::multiply(&a, &b, threads, opts.timing)?;
            report_timing(&out);
            print!("{}", render_result("Result of matrix multiplication is: ", &out.matrix));
        }
        Commands::Test { timing } => {
            let report = selftest::run(timing);
            print!("{}", report);
            if !report.all_passed() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Exit status for a command line clap rejected: 1 for errors, 0 for
/// `--help` and `--version`.
fn parse_failure_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { 1 } else { 0 }
}

/// A heading, a blank line, then the matrix. `Display` already ends the
/// matrix with a blank line.
fn render_result(title: &str, m: &Matrix) -> String {
    format!("{}\n\n{}", title, m)
}

fn check_dims(dims: &[usize]) -> Result<()> {
    if dims.iter().any(|&d| d == 0) {
        bail!("matrix dimensions must be greater than zero");
    }
    Ok(())
}

/// Fall back to one thread when the request does not fit the host or the
/// matrix.
fn screen_threads(requested: usize, largest_dim: usize) -> usize {
    let hardware = thread::available_parallelism().map_or(1, |n| n.get());
    let threads = choose_thread_count(requested, largest_dim, hardware);
    if threads != requested {
        warn!(
            requested,
            hardware, largest_dim, "thread count exceeds the system or the matrix, using 1 thread"
        );
    }
    debug!(threads, "thread count screened");
    threads
}

fn report_timing(out: &Outcome) {
    if let Some(elapsed) = out.elapsed {
        if out.threads > 1 {
            println!(
                "Time measured: {} nanoseconds for number of threads {}\n",
                elapsed.as_nanos(),
                out.threads
            );
        } else {
            println!("Time measured: {} nanoseconds\n", elapsed.as_nanos());
        }
    }
}
