use matmul_trans::matrix::naive_ijk;
use matmul_trans::matrix::transpose as seq;
use matmul_trans::threaded::multiply_mt::multiply_parallel;
use matmul_trans::threaded::transpose_mt::transpose_parallel;
use matmul_trans::{Matrix, MatrixError, multiply, transpose};

fn assert_bit_identical(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(expected.shape(), actual.shape(), "{}: shape mismatch", name);
    for (i, (e, a)) in expected.as_slice().iter().zip(actual.as_slice()).enumerate() {
        assert!(
            e.to_bits() == a.to_bits(),
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            e,
            a
        );
    }
}

fn sample(rows: usize, cols: usize) -> Matrix {
    Matrix::from_fn(rows, cols, |i, j| ((i * 31 + j * 17) % 23) as f64 / 7.0 - 1.5).unwrap()
}

// ============================================================
// Reference cases
// ============================================================

#[test]
fn test_transpose_symmetric() {
    let m = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]]).unwrap();
    assert_eq!(transpose(&m, 1, false).unwrap().matrix, m);
}

#[test]
fn test_transpose_asymmetric() {
    let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let t = transpose(&m, 2, false).unwrap().matrix;
    assert_eq!(t.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
}

#[test]
fn test_transpose_shape() {
    let m = Matrix::from_fn(5, 7, |i, j| (i * 7 + j + 1) as f64).unwrap();
    let t = transpose(&m, 1, false).unwrap().matrix;

    assert_eq!(t.shape(), (7, 5));
    for i in 0..5 {
        for j in 0..7 {
            assert_eq!(t[(j, i)], m[(i, j)]);
        }
    }
}

#[test]
fn test_multiply_symmetric_is_symmetric() {
    let m = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]]).unwrap();
    let c = multiply(&m, &m, 1, false).unwrap().matrix;
    assert_eq!(c, Matrix::from_rows(&[[5.0, 4.0], [4.0, 5.0]]).unwrap());
}

#[test]
fn test_multiply_square() {
    let a = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]]).unwrap();
    let b = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let c = multiply(&a, &b, 2, false).unwrap().matrix;
    assert_eq!(c.as_slice(), &[7.0, 10.0, 5.0, 8.0]);
}

#[test]
fn test_multiply_rectangular() {
    let a = Matrix::parse("7,9,11,13,15,8,10,12,14,16", 2, 5).unwrap();
    let b = Matrix::parse("1,5,5,0,6,1,6,1,8,8,1,0,9,1,9,1,1,10,10,0", 5, 4).unwrap();
    let expected =
        Matrix::from_rows(&[[281.0, 295.0, 367.0, 22.0], [306.0, 320.0, 398.0, 24.0]]).unwrap();

    for threads in 1..=4 {
        let c = multiply(&a, &b, threads, false).unwrap().matrix;
        assert_eq!(c, expected, "threads = {}", threads);
    }
}

// ============================================================
// Thread-count invariance
// ============================================================

#[test]
fn test_transpose_thread_invariance() {
    let sizes = [(1, 1), (1, 9), (9, 1), (7, 3), (16, 16), (33, 20), (64, 5)];

    for (rows, cols) in sizes {
        let m = sample(rows, cols);
        let baseline = seq::transpose(&m);

        for threads in 1..=rows.min(cols).max(2) {
            let got = transpose_parallel(&m, threads).unwrap();
            assert_bit_identical(&baseline, &got, &format!("{}x{} / {} threads", rows, cols, threads));
        }
    }
}

#[test]
fn test_multiply_thread_invariance() {
    let shapes = [(3, 3, 3), (5, 5, 5), (7, 3, 5), (11, 13, 17), (32, 8, 24)];

    for (r1, c1, c2) in shapes {
        let a = sample(r1, c1);
        let b = sample(c1, c2);
        let baseline = naive_ijk::multiply(&a, &b).unwrap();

        for threads in 1..=r1.min(c2) {
            let got = multiply_parallel(&a, &b, threads).unwrap();
            assert_bit_identical(
                &baseline,
                &got,
                &format!("{}x{}x{} / {} threads", r1, c1, c2, threads),
            );
        }
    }
}

#[test]
fn test_dispatch_matches_direct_kernels() {
    let a = sample(12, 9);
    let b = sample(9, 10);

    let direct = naive_ijk::multiply(&a, &b).unwrap();
    assert_bit_identical(&direct, &multiply(&a, &b, 1, false).unwrap().matrix, "multiply t=1");
    assert_bit_identical(&direct, &multiply(&a, &b, 4, true).unwrap().matrix, "multiply t=4");

    let direct = seq::transpose(&a);
    assert_bit_identical(&direct, &transpose(&a, 1, false).unwrap().matrix, "transpose t=1");
    assert_bit_identical(&direct, &transpose(&a, 4, true).unwrap().matrix, "transpose t=4");
}

#[test]
fn test_double_transpose() {
    for (rows, cols) in [(1, 1), (2, 3), (10, 4), (17, 17)] {
        let m = sample(rows, cols);
        let once = transpose(&m, 3, false).unwrap().matrix;
        let twice = transpose(&once, 2, false).unwrap().matrix;
        assert_eq!(twice, m, "{}x{}", rows, cols);
    }
}

// ============================================================
// Error handling
// ============================================================

#[test]
fn test_incompatible_shapes_are_reported() {
    let a = sample(2, 5);
    let b = sample(4, 2);

    for threads in [1, 2] {
        assert_eq!(
            multiply(&a, &b, threads, false).unwrap_err(),
            MatrixError::DimensionMismatch {
                left_cols: 5,
                right_rows: 4
            }
        );
    }
}

#[test]
fn test_invalid_dimensions_are_reported() {
    assert!(matches!(
        Matrix::parse("", 0, 2),
        Err(MatrixError::InvalidDimensions { rows: 0, cols: 2 })
    ));
    assert!(matches!(
        Matrix::from_vec(2, 2, vec![1.0; 3]),
        Err(MatrixError::LengthMismatch { expected: 4, actual: 3, .. })
    ));
}

#[test]
fn test_error_messages() {
    let err = MatrixError::DimensionMismatch {
        left_cols: 3,
        right_rows: 2,
    };
    assert_eq!(
        err.to_string(),
        "cannot multiply: left operand has 3 columns but right operand has 2 rows"
    );
}
