//! Compressed sparse column (CSC) matrices.

use std::ops::Range;

use mspgemm_base::bit_vec::BitVec;
use mspgemm_base::num::Element;

use crate::errors::CscError;

/// A sparse matrix in compressed sparse column format.
///
/// The non-zeros of column `j` are at positions `colptr[j]..colptr[j + 1]`
/// of `rowidx` and `vals`. Row indices within a column are unique but may be
/// in any order.
#[derive(Clone, Debug, PartialEq)]
pub struct Csc<T> {
    nrows: usize,
    ncols: usize,
    colptr: Vec<usize>,
    rowidx: Vec<usize>,
    vals: Vec<T>,
}

impl<T> Csc<T> {
    /// Create a matrix from its parts, validating the CSC invariants.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        colptr: Vec<usize>,
        rowidx: Vec<usize>,
        vals: Vec<T>,
    ) -> Result<Self, CscError> {
        if colptr.len() != ncols + 1 {
            return Err(CscError::WrongColPtrLength {
                len: colptr.len(),
                expected: ncols + 1,
            });
        }
        if rowidx.len() != vals.len() {
            return Err(CscError::ValueLengthMismatch {
                rows: rowidx.len(),
                vals: vals.len(),
            });
        }
        if colptr[0] != 0 {
            return Err(CscError::ColPtrStart);
        }
        let nnz = rowidx.len();
        if colptr[ncols] != nnz {
            return Err(CscError::ColPtrEnd {
                end: colptr[ncols],
                nnz,
            });
        }
        if let Some(col) = colptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(CscError::ColPtrDecreasing { col });
        }

        let mut seen = BitVec::zeros(nrows);
        for col in 0..ncols {
            let rows = &rowidx[colptr[col]..colptr[col + 1]];
            let mut result = Ok(());
            for &row in rows {
                if row >= nrows {
                    result = Err(CscError::RowOutOfRange { col, row });
                    break;
                }
                if seen.get(row) {
                    result = Err(CscError::DuplicateRow { col, row });
                    break;
                }
                seen.insert(row);
            }
            result?;
            for &row in rows {
                seen.delete(row);
            }
        }

        Ok(Self::from_parts_unchecked(nrows, ncols, colptr, rowidx, vals))
    }

    /// Create a matrix from its parts without validation.
    ///
    /// The caller must ensure the invariants checked by [`Csc::from_parts`]
    /// hold. Operations on an invalid matrix may panic or return errors, but
    /// will not cause undefined behavior.
    pub fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        colptr: Vec<usize>,
        rowidx: Vec<usize>,
        vals: Vec<T>,
    ) -> Self {
        Csc {
            nrows,
            ncols,
            colptr,
            rowidx,
            vals,
        }
    }

    /// Consume the matrix and return `(colptr, rowidx, vals)`.
    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>, Vec<T>) {
        (self.colptr, self.rowidx, self.vals)
    }

    /// Return the `(rows, cols)` shape of the matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn rows(&self) -> usize {
        self.nrows
    }

    pub fn cols(&self) -> usize {
        self.ncols
    }

    /// Return the number of stored entries.
    pub fn nnz(&self) -> usize {
        self.rowidx.len()
    }

    pub fn colptr(&self) -> &[usize] {
        &self.colptr
    }

    pub fn rowidx(&self) -> &[usize] {
        &self.rowidx
    }

    pub fn vals(&self) -> &[T] {
        &self.vals
    }

    /// Return the values mutably. The sparsity pattern cannot be changed.
    pub fn vals_mut(&mut self) -> &mut [T] {
        &mut self.vals
    }

    /// Borrow the pattern immutably and the values mutably at the same time.
    pub(crate) fn pattern_and_vals_mut(&mut self) -> (&[usize], &[usize], &mut [T]) {
        (&self.colptr, &self.rowidx, &mut self.vals)
    }

    /// Return the range of `rowidx` and `vals` that holds column `col`.
    #[inline]
    pub fn col_range(&self, col: usize) -> Range<usize> {
        self.colptr[col]..self.colptr[col + 1]
    }

    /// Return the row indices and values of column `col`.
    #[inline]
    pub fn column(&self, col: usize) -> (&[usize], &[T]) {
        let range = self.col_range(col);
        (&self.rowidx[range.clone()], &self.vals[range])
    }
}

impl<T: Element> Csc<T> {
    /// Create a matrix with the same shape and pattern as `mask` and all
    /// values set to zero.
    ///
    /// This is the usual way to allocate the output of
    /// [`masked_matmul`](crate::masked_matmul).
    pub fn zeros_like_pattern<U>(mask: &Csc<U>) -> Self {
        Csc {
            nrows: mask.nrows,
            ncols: mask.ncols,
            colptr: mask.colptr.clone(),
            rowidx: mask.rowidx.clone(),
            vals: vec![T::zero(); mask.nnz()],
        }
    }

    /// Create a matrix from a row-major dense array, storing every entry
    /// that is not zero.
    pub fn from_dense(nrows: usize, ncols: usize, data: &[T]) -> Result<Self, CscError> {
        if data.len() != nrows * ncols {
            return Err(CscError::DenseSizeMismatch {
                len: data.len(),
                expected: nrows * ncols,
            });
        }

        let mut colptr = Vec::with_capacity(ncols + 1);
        let mut rowidx = Vec::new();
        let mut vals = Vec::new();
        colptr.push(0);
        for col in 0..ncols {
            for row in 0..nrows {
                let x = data[row * ncols + col];
                if x != T::zero() {
                    rowidx.push(row);
                    vals.push(x);
                }
            }
            colptr.push(rowidx.len());
        }

        Ok(Self::from_parts_unchecked(nrows, ncols, colptr, rowidx, vals))
    }

    /// Return the matrix as a row-major dense array.
    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![T::zero(); self.nrows * self.ncols];
        for col in 0..self.ncols {
            let (rows, vals) = self.column(col);
            for (&row, &x) in rows.iter().zip(vals) {
                dense[row * self.ncols + col] = x;
            }
        }
        dense
    }

    /// Return the stored value at `(row, col)`, or `None` if that position
    /// is not part of the sparsity pattern.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if col >= self.ncols {
            return None;
        }
        let (rows, vals) = self.column(col);
        rows.iter().position(|&r| r == row).map(|p| vals[p])
    }
}

#[cfg(test)]
mod tests {
    use mspgemm_testing::TestCases;

    use super::Csc;
    use crate::errors::CscError;

    #[test]
    fn test_from_parts() {
        // [1 0 4]
        // [0 3 0]
        // [2 0 5]
        let mat = Csc::from_parts(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![2, 0, 1, 0, 2],
            vec![2., 1., 3., 4., 5.],
        )
        .unwrap();

        assert_eq!(mat.shape(), (3, 3));
        assert_eq!(mat.nnz(), 5);
        assert_eq!(mat.column(0), (&[2, 0][..], &[2., 1.][..]));
        assert_eq!(mat.get(0, 0), Some(1.));
        assert_eq!(mat.get(1, 0), None);
        assert_eq!(mat.get(2, 2), Some(5.));
        assert_eq!(mat.get(0, 3), None);
        assert_eq!(mat.to_dense(), [1., 0., 4., 0., 3., 0., 2., 0., 5.]);

        let (colptr, rowidx, vals) = mat.clone().into_parts();
        assert_eq!(colptr, [0, 2, 3, 5]);
        assert_eq!(rowidx, [2, 0, 1, 0, 2]);
        assert_eq!(Csc::from_parts(3, 3, colptr, rowidx, vals), Ok(mat));
    }

    #[test]
    fn test_from_parts_invalid() {
        #[derive(Debug)]
        struct Case {
            nrows: usize,
            ncols: usize,
            colptr: Vec<usize>,
            rowidx: Vec<usize>,
            expected: CscError,
        }

        let cases = [
            Case {
                nrows: 2,
                ncols: 2,
                colptr: vec![0, 1],
                rowidx: vec![0],
                expected: CscError::WrongColPtrLength { len: 2, expected: 3 },
            },
            Case {
                nrows: 2,
                ncols: 1,
                colptr: vec![1, 1],
                rowidx: vec![0],
                expected: CscError::ColPtrStart,
            },
            Case {
                nrows: 2,
                ncols: 1,
                colptr: vec![0, 2],
                rowidx: vec![0],
                expected: CscError::ColPtrEnd { end: 2, nnz: 1 },
            },
            Case {
                nrows: 3,
                ncols: 3,
                colptr: vec![0, 2, 1, 2],
                rowidx: vec![0, 1],
                expected: CscError::ColPtrDecreasing { col: 1 },
            },
            Case {
                nrows: 2,
                ncols: 2,
                colptr: vec![0, 1, 2],
                rowidx: vec![0, 2],
                expected: CscError::RowOutOfRange { col: 1, row: 2 },
            },
            Case {
                nrows: 3,
                ncols: 2,
                colptr: vec![0, 2, 4],
                rowidx: vec![0, 1, 2, 2],
                expected: CscError::DuplicateRow { col: 1, row: 2 },
            },
        ];

        cases.test_each(|case| {
            let vals = vec![1.0f32; case.rowidx.len()];
            let result = Csc::from_parts(
                case.nrows,
                case.ncols,
                case.colptr.clone(),
                case.rowidx.clone(),
                vals,
            );
            assert_eq!(result.err(), Some(case.expected.clone()));
        });
    }

    #[test]
    fn test_from_parts_value_length_mismatch() {
        let result = Csc::from_parts(2, 1, vec![0, 2], vec![0, 1], vec![1i32]);
        assert_eq!(
            result.err(),
            Some(CscError::ValueLengthMismatch { rows: 2, vals: 1 })
        );
    }

    #[test]
    fn test_same_row_in_different_columns() {
        // Duplicate tracking must be reset between columns.
        let mat = Csc::from_parts(2, 2, vec![0, 2, 4], vec![1, 0, 0, 1], vec![1; 4]);
        assert!(mat.is_ok());
    }

    #[test]
    fn test_dense_round_trip() {
        let dense = [0, 7, 0, 0, 1, 0, -2, 3, 0, 0, 0, 9];
        let mat = Csc::from_dense(3, 4, &dense).unwrap();
        assert_eq!(mat.nnz(), 5);
        assert_eq!(mat.colptr(), [0, 1, 2, 3, 5]);
        assert_eq!(mat.to_dense(), dense);

        assert_eq!(
            Csc::from_dense(3, 3, &dense).err(),
            Some(CscError::DenseSizeMismatch {
                len: 12,
                expected: 9
            })
        );
    }

    #[test]
    fn test_zeros_like_pattern() {
        let mask = Csc::from_parts(3, 2, vec![0, 1, 3], vec![2, 0, 1], vec![true; 3]).unwrap();
        let out = Csc::<f64>::zeros_like_pattern(&mask);
        assert_eq!(out.shape(), (3, 2));
        assert_eq!(out.colptr(), mask.colptr());
        assert_eq!(out.rowidx(), mask.rowidx());
        assert_eq!(out.vals(), [0., 0., 0.]);
    }

    #[test]
    fn test_empty_matrix() {
        let mat = Csc::<f32>::from_parts(0, 0, vec![0], vec![], vec![]).unwrap();
        assert_eq!(mat.shape(), (0, 0));
        assert_eq!(mat.nnz(), 0);
        assert!(mat.to_dense().is_empty());
    }
}
