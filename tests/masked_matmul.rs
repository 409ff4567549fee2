use mspgemm::{
    create_accumulators, masked_column, masked_matmul, masked_matmul_in, Accumulator,
    AccumulatorKind, BitAccumulator, Csc, MaskedMatMul, MaskedMatMulError, ThreadPool,
    TriStateAccumulator,
};
use mspgemm_testing::fixtures::{dense_masked_product, random_csc, CscParts};
use mspgemm_testing::TestCases;

const KINDS: [AccumulatorKind; 2] = [AccumulatorKind::TriState, AccumulatorKind::BitState];

fn to_csc(parts: &CscParts) -> Csc<f64> {
    Csc::from_parts(
        parts.nrows,
        parts.ncols,
        parts.colptr.clone(),
        parts.rowidx.clone(),
        parts.vals.clone(),
    )
    .unwrap()
}

/// Random product inputs `(a, b, mask)` with shapes m×k, k×n and m×n.
fn random_inputs(
    seed: u64,
    [m, k, n]: [usize; 3],
    density: f64,
    mask_density: f64,
) -> (CscParts, CscParts, CscParts) {
    let mut rng = fastrand::Rng::with_seed(seed);
    let a = random_csc(&mut rng, m, k, density);
    let b = random_csc(&mut rng, k, n, density);
    let mask = random_csc(&mut rng, m, n, mask_density);
    (a, b, mask)
}

fn run(
    kind: AccumulatorKind,
    workers: usize,
    a: &Csc<f64>,
    b: &Csc<f64>,
    mask: &Csc<f64>,
) -> Csc<f64> {
    let mut c = Csc::zeros_like_pattern(mask);
    let mut accums = create_accumulators(kind, c.rows(), workers);
    masked_matmul(&mut c, a, b, &mut accums).unwrap();
    assert!(accums.is_clear());
    c
}

fn bits(mat: &Csc<f64>) -> Vec<u64> {
    mat.vals().iter().map(|x| x.to_bits()).collect()
}

#[test]
fn test_matches_dense_reference() {
    #[derive(Debug)]
    struct Case {
        seed: u64,
        shape: [usize; 3],
        density: f64,
        mask_density: f64,
    }

    let cases = [
        Case {
            seed: 1,
            shape: [10, 8, 12],
            density: 0.3,
            mask_density: 0.4,
        },
        Case {
            seed: 2,
            shape: [50, 40, 30],
            density: 0.1,
            mask_density: 0.2,
        },
        Case {
            seed: 3,
            shape: [1, 20, 1],
            density: 0.9,
            mask_density: 1.0,
        },
        Case {
            seed: 4,
            shape: [30, 1, 25],
            density: 0.5,
            mask_density: 0.5,
        },
        // Dense mask.
        Case {
            seed: 5,
            shape: [16, 16, 16],
            density: 0.2,
            mask_density: 1.0,
        },
        // Empty mask.
        Case {
            seed: 6,
            shape: [8, 8, 8],
            density: 0.5,
            mask_density: 0.0,
        },
    ];

    cases.test_each(|case| {
        let (a, b, mask) = random_inputs(case.seed, case.shape, case.density, case.mask_density);
        let expected = dense_masked_product(&a, &b, &mask);
        let (a, b, mask) = (to_csc(&a), to_csc(&b), to_csc(&mask));

        for kind in KINDS {
            for workers in [1, 3] {
                let c = run(kind, workers, &a, &b, &mask);
                assert_eq!(c.colptr(), mask.colptr());
                assert_eq!(c.rowidx(), mask.rowidx());
                assert_eq!(c.vals(), expected.as_slice());
            }
        }
    });
}

#[test]
fn test_variants_are_bit_identical() {
    for seed in 0..10 {
        let (a, b, mask) = random_inputs(seed, [24, 18, 20], 0.25, 0.3);
        let (a, b, mask) = (to_csc(&a), to_csc(&b), to_csc(&mask));

        let tri = run(AccumulatorKind::TriState, 4, &a, &b, &mask);
        let bit = run(AccumulatorKind::BitState, 4, &a, &b, &mask);
        assert_eq!(bits(&tri), bits(&bit));
    }
}

#[test]
fn test_variants_agree_when_product_cancels() {
    // Row 0 of A · B is 1*2 + 1*(-2) = 0 in column 0. The position is in the
    // mask, so it is stored, with value zero.
    let a = Csc::from_dense(2, 2, &[1., 1., 0., 3.]).unwrap();
    let b = Csc::from_dense(2, 1, &[2., -2.]).unwrap();
    let mask = Csc::from_dense(2, 1, &[1., 1.]).unwrap();

    let tri = run(AccumulatorKind::TriState, 1, &a, &b, &mask);
    let bit = run(AccumulatorKind::BitState, 1, &a, &b, &mask);

    assert_eq!(tri.get(0, 0), Some(0.));
    assert_eq!(tri.get(1, 0), Some(-6.));
    assert_eq!(bits(&tri), bits(&bit));
}

#[test]
fn test_variants_agree_when_product_underflows() {
    // -1e-200 * 1e-200 rounds to -0.0. Both variants store +0.0.
    let a = Csc::from_dense(1, 1, &[-1e-200]).unwrap();
    let b = Csc::from_dense(1, 1, &[1e-200]).unwrap();
    let mask = Csc::from_dense(1, 1, &[1.]).unwrap();

    let tri = run(AccumulatorKind::TriState, 1, &a, &b, &mask);
    let bit = run(AccumulatorKind::BitState, 1, &a, &b, &mask);

    assert_eq!(bits(&tri), [0.0f64.to_bits()]);
    assert_eq!(bits(&tri), bits(&bit));
}

#[test]
fn test_result_independent_of_worker_count() {
    let (a, b, mask) = random_inputs(42, [40, 30, 37], 0.15, 0.25);
    let (a, b, mask) = (to_csc(&a), to_csc(&b), to_csc(&mask));

    for kind in KINDS {
        let reference = run(kind, 1, &a, &b, &mask);
        for workers in 2..=12 {
            let c = run(kind, workers, &a, &b, &mask);
            assert_eq!(bits(&c), bits(&reference), "workers {}", workers);
        }
    }
}

#[test]
fn test_result_independent_of_thread_count() {
    let (a, b, mask) = random_inputs(7, [30, 20, 30], 0.2, 0.3);
    let (a, b, mask) = (to_csc(&a), to_csc(&b), to_csc(&mask));
    let reference = run(AccumulatorKind::BitState, 1, &a, &b, &mask);

    for threads in [1, 2, 4] {
        let pool = ThreadPool::with_num_threads(threads);
        let mut c = Csc::zeros_like_pattern(&mask);
        let mut accums = create_accumulators(AccumulatorKind::BitState, c.rows(), 4);
        masked_matmul_in(&pool, &mut c, &a, &b, &mut accums).unwrap();
        assert_eq!(bits(&c), bits(&reference));
    }
}

#[test]
fn test_accumulator_clear_after_each_column() {
    fn check<A: Accumulator<f64>>(mut accum: A, a: &Csc<f64>, b: &Csc<f64>, mask: &Csc<f64>) {
        let mut c = Csc::zeros_like_pattern(mask);
        for col in 0..c.cols() {
            masked_column(&mut c, a, b, col, &mut accum).unwrap();
            assert!(accum.is_clear(), "accumulator not clear after column {}", col);
        }
    }

    let (a, b, mask) = random_inputs(11, [25, 20, 15], 0.3, 0.5);
    let (a, b, mask) = (to_csc(&a), to_csc(&b), to_csc(&mask));

    check(TriStateAccumulator::new(mask.rows()), &a, &b, &mask);
    check(BitAccumulator::new(mask.rows()), &a, &b, &mask);
}

#[test]
fn test_repeated_calls_are_idempotent() {
    let (a, b, mask) = random_inputs(9, [20, 20, 20], 0.2, 0.3);
    let expected = dense_masked_product(&a, &b, &mask);
    let (a, b, mask) = (to_csc(&a), to_csc(&b), to_csc(&mask));

    for kind in KINDS {
        let mut c = Csc::zeros_like_pattern(&mask);
        let mut accums = create_accumulators(kind, c.rows(), 3);

        masked_matmul(&mut c, &a, &b, &mut accums).unwrap();
        let first = bits(&c);
        masked_matmul(&mut c, &a, &b, &mut accums).unwrap();
        assert_eq!(bits(&c), first);
        assert_eq!(c.vals(), expected.as_slice());
    }
}

#[test]
fn test_stale_output_values_are_overwritten() {
    let a = Csc::from_dense(2, 2, &[1., 0., 0., 2.]).unwrap();
    let b = Csc::from_dense(2, 2, &[3., 0., 1., 4.]).unwrap();

    // Every position is in the mask, and starts with garbage.
    let mut c = Csc::from_dense(2, 2, &[9., 9., 9., 9.]).unwrap();
    let mut accums = create_accumulators(AccumulatorKind::BitState, 2, 2);
    masked_matmul(&mut c, &a, &b, &mut accums).unwrap();

    assert_eq!(c.to_dense(), [3., 0., 2., 8.]);
    // (0, 1) has no contributing products but is still stored.
    assert_eq!(c.get(0, 1), Some(0.));
}

#[test]
fn test_shape_mismatch_leaves_output_untouched() {
    #[derive(Debug)]
    struct Case {
        a: (usize, usize),
        b: (usize, usize),
        c: (usize, usize),
    }

    let cases = [
        // cols(A) != rows(B)
        Case {
            a: (3, 4),
            b: (5, 3),
            c: (3, 3),
        },
        // rows(C) != rows(A)
        Case {
            a: (2, 4),
            b: (4, 3),
            c: (3, 3),
        },
        // cols(C) != cols(B)
        Case {
            a: (3, 4),
            b: (4, 2),
            c: (3, 3),
        },
    ];

    cases.test_each(|case| {
        let ones = |(rows, cols): (usize, usize)| {
            Csc::from_dense(rows, cols, &vec![1.; rows * cols]).unwrap()
        };
        let (a, b) = (ones(case.a), ones(case.b));
        let mut c = ones(case.c);

        for kind in KINDS {
            let mut accums = create_accumulators(kind, case.c.0, 2);
            let result = masked_matmul(&mut c, &a, &b, &mut accums).map(|_| ());
            assert_eq!(
                result,
                Err(MaskedMatMulError::ShapeMismatch {
                    a: case.a,
                    b: case.b,
                    c: case.c,
                })
            );
            assert!(c.vals().iter().all(|&x| x == 1.));
        }
    });
}

#[test]
fn test_integer_elements() {
    let a = Csc::from_dense(2, 3, &[1i64, 2, 0, 0, 1, 5]).unwrap();
    let b = Csc::from_dense(3, 2, &[2i64, 0, 1, 1, 1, 0]).unwrap();
    let mask = Csc::from_dense(2, 2, &[1i64, 1, 1, 0]).unwrap();

    for kind in KINDS {
        let mut c = Csc::zeros_like_pattern(&mask);
        let mut accums = create_accumulators(kind, 2, 2);
        masked_matmul(&mut c, &a, &b, &mut accums).unwrap();

        // A · B = [[4, 2], [6, 1]]
        assert_eq!(c.to_dense(), [4, 2, 6, 0]);
    }
}

#[test]
fn test_executor() {
    let (a, b, mask) = random_inputs(21, [30, 25, 28], 0.2, 0.3);
    let expected = dense_masked_product(&a, &b, &mask);
    let (a, b, mask) = (to_csc(&a), to_csc(&b), to_csc(&mask));

    for kind in KINDS {
        let mut exec = MaskedMatMul::new(kind);
        let mut c = Csc::zeros_like_pattern(&mask);
        for _ in 0..2 {
            exec.run(&mut c, &a, &b).unwrap();
            assert_eq!(c.vals(), expected.as_slice());
        }
        assert!(exec.accumulators().is_some_and(|accs| accs.is_clear()));
    }
}
