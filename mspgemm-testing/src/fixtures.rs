//! Random sparse matrices and dense reference products.
//!
//! Matrices are returned as raw compressed-sparse-column parts so that this
//! crate does not depend on the matrix types it is used to test. Values are
//! small non-zero integers stored as `f64`, which keeps every product and
//! partial sum exact regardless of accumulation order.

/// Raw parts of a compressed-sparse-column matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CscParts {
    pub nrows: usize,
    pub ncols: usize,
    pub colptr: Vec<usize>,
    pub rowidx: Vec<usize>,
    pub vals: Vec<f64>,
}

impl CscParts {
    pub fn nnz(&self) -> usize {
        self.rowidx.len()
    }

    /// Return the matrix as a dense row-major array.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.; self.nrows * self.ncols];
        for col in 0..self.ncols {
            for p in self.colptr[col]..self.colptr[col + 1] {
                dense[self.rowidx[p] * self.ncols + col] = self.vals[p];
            }
        }
        dense
    }
}

/// Generate a random `nrows x ncols` matrix in which each entry is present
/// with probability `density`.
///
/// Row indices within each column are shuffled, since CSC consumers must not
/// assume sorted columns.
pub fn random_csc(rng: &mut fastrand::Rng, nrows: usize, ncols: usize, density: f64) -> CscParts {
    let mut colptr = Vec::with_capacity(ncols + 1);
    let mut rowidx = Vec::new();
    let mut vals = Vec::new();
    colptr.push(0);

    for _ in 0..ncols {
        let col_start = rowidx.len();
        for row in 0..nrows {
            if rng.f64() < density {
                rowidx.push(row);
                let mag = rng.i32(1..=3) as f64;
                vals.push(if rng.bool() { mag } else { -mag });
            }
        }
        rng.shuffle(&mut rowidx[col_start..]);
        colptr.push(rowidx.len());
    }

    CscParts {
        nrows,
        ncols,
        colptr,
        rowidx,
        vals,
    }
}

/// Multiply row-major dense matrices `a` (m x k) and `b` (k x n).
pub fn dense_matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    assert_eq!(a.len(), m * k);
    assert_eq!(b.len(), k * n);
    let mut out = vec![0.; m * n];
    for i in 0..m {
        for depth in 0..k {
            let a_ik = a[i * k + depth];
            for j in 0..n {
                out[i * n + j] += a_ik * b[depth * n + j];
            }
        }
    }
    out
}

/// Compute the expected values of `mask ⊙ (a · b)`, in the storage order of
/// `mask`'s non-zeros.
pub fn dense_masked_product(a: &CscParts, b: &CscParts, mask: &CscParts) -> Vec<f64> {
    assert_eq!(a.ncols, b.nrows);
    let product = dense_matmul(&a.to_dense(), &b.to_dense(), a.nrows, a.ncols, b.ncols);
    let mut expected = Vec::with_capacity(mask.nnz());
    for col in 0..mask.ncols {
        for p in mask.colptr[col]..mask.colptr[col + 1] {
            expected.push(product[mask.rowidx[p] * b.ncols + col]);
        }
    }
    expected
}

#[cfg(test)]
mod tests {
    use super::{dense_masked_product, dense_matmul, random_csc, CscParts};

    #[test]
    fn test_random_csc() {
        let mut rng = fastrand::Rng::with_seed(1234);
        let parts = random_csc(&mut rng, 20, 15, 0.3);

        assert_eq!(parts.colptr.len(), 16);
        assert_eq!(parts.colptr[0], 0);
        assert_eq!(*parts.colptr.last().unwrap(), parts.nnz());
        assert_eq!(parts.vals.len(), parts.nnz());
        for col in 0..parts.ncols {
            let rows = &parts.rowidx[parts.colptr[col]..parts.colptr[col + 1]];
            let mut sorted = rows.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), rows.len());
            assert!(rows.iter().all(|&r| r < parts.nrows));
        }
        assert!(parts.vals.iter().all(|&v| v != 0.));
    }

    #[test]
    fn test_dense_matmul() {
        let a = [1., 0., 0., 2.];
        let b = [3., 0., 1., 4.];
        assert_eq!(dense_matmul(&a, &b, 2, 2, 2), [3., 0., 2., 8.]);
    }

    #[test]
    fn test_dense_masked_product() {
        let identity = CscParts {
            nrows: 2,
            ncols: 2,
            colptr: vec![0, 1, 2],
            rowidx: vec![0, 1],
            vals: vec![1., 1.],
        };
        let b = CscParts {
            nrows: 2,
            ncols: 2,
            colptr: vec![0, 2, 3],
            rowidx: vec![1, 0, 1],
            vals: vec![5., 6., 7.],
        };
        let mask = CscParts {
            nrows: 2,
            ncols: 2,
            colptr: vec![0, 2, 2],
            rowidx: vec![1, 0],
            vals: vec![0., 0.],
        };
        assert_eq!(dense_masked_product(&identity, &b, &mask), [5., 6.]);
    }
}
