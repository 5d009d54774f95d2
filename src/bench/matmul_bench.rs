//! Sequential vs. threaded kernels.
//!
//! Run with `cargo bench`. Thread counts above the host's parallelism are
//! skipped.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use matmul_trans::Matrix;
use matmul_trans::matrix::naive_ijk::multiply;
use matmul_trans::matrix::transpose::transpose;
use matmul_trans::threaded::multiply_mt::multiply_parallel;
use matmul_trans::threaded::transpose_mt::transpose_parallel;

fn test_matrix(rows: usize, cols: usize) -> Matrix {
    Matrix::from_fn(rows, cols, |i, j| ((i * cols + j) % 100) as f64).unwrap()
}

fn thread_counts() -> Vec<usize> {
    let hardware = std::thread::available_parallelism().map_or(1, |n| n.get());
    [2, 4, 8].into_iter().filter(|&t| t <= hardware).collect()
}

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");
    group.sample_size(10);

    for size in [64, 128, 256] {
        let a = test_matrix(size, size);
        let b = test_matrix(size, size);
        group.throughput(Throughput::Elements((2 * size * size * size) as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |bench, _| {
            bench.iter(|| multiply(black_box(&a), black_box(&b)).unwrap())
        });
        for threads in thread_counts() {
            group.bench_with_input(
                BenchmarkId::new(format!("threads_{}", threads), size),
                &size,
                |bench, _| bench.iter(|| multiply_parallel(black_box(&a), black_box(&b), threads).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    for size in [256, 1024] {
        let m = test_matrix(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |bench, _| {
            bench.iter(|| transpose(black_box(&m)))
        });
        for threads in thread_counts() {
            group.bench_with_input(
                BenchmarkId::new(format!("threads_{}", threads), size),
                &size,
                |bench, _| bench.iter(|| transpose_parallel(black_box(&m), threads).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_multiply, bench_transpose);
criterion_main!(benches);
