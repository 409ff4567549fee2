//! Masked sparse matrix multiplication.
//!
//! Computes `C = M ⊙ (A · B)` where the sparsity pattern of `C` is fixed in
//! advance to that of the mask `M`. Because the output structure is known,
//! no symbolic phase is needed: each output column is computed independently
//! using a masked sparse accumulator (see [`crate::accumulator`]), and
//! columns are split into contiguous chunks that are processed in parallel.
//!
//! For output column `j` the kernel performs three phases:
//!
//! 1. Mark every row of the mask column as allowed.
//! 2. For each non-zero `B[k, j]` and each non-zero `A[i, k]`, accumulate
//!    `A[i, k] * B[k, j]` into row `i` if it is allowed. Rows outside the mask
//!    are skipped.
//! 3. For every row of the mask column, move the accumulated value (if any)
//!    into `C` and mark the row as not allowed.
//!
//! Phase 3 visits exactly the rows marked in phase 1, which returns the
//! accumulator to its clear state in time proportional to the column's size
//! rather than the row count.

use std::ops::Range;
use std::time::Instant;

use mspgemm_base::iter::range_partition;
use mspgemm_base::num::Element;

use crate::accumulator::{Accumulator, AccumulatorKind};
use crate::csc::Csc;
use crate::env::timing_enabled;
use crate::errors::MaskedMatMulError;
use crate::iter_util::MaybeParIter;
use crate::pool::AccumulatorSet;
use crate::threading::{thread_pool, ThreadPool};

/// A contiguous range of output columns whose values can be written
/// independently of other chunks.
struct OutputChunk<'a, T> {
    /// Column pointers of the whole output.
    colptr: &'a [usize],

    /// Row indices of the whole output.
    rowidx: &'a [usize],

    /// Values of the columns in this chunk.
    vals: &'a mut [T],

    /// Position of `vals[0]` in the output's value array.
    offset: usize,
}

/// Compute one column of a masked product into `out`.
///
/// `accum` must be in the clear state on entry, and is left in the clear
/// state on return, including when an error is returned.
fn masked_column_impl<T: Element, A: Accumulator<T>>(
    out: &mut OutputChunk<T>,
    a: &Csc<T>,
    b: &Csc<T>,
    col: usize,
    accum: &mut A,
) -> Result<(), MaskedMatMulError> {
    let mask_range = out.colptr[col]..out.colptr[col + 1];
    let mask_rows = &out.rowidx[mask_range.clone()];
    let rows = accum.len();

    for (marked, &row) in mask_rows.iter().enumerate() {
        if row >= rows {
            for &prev_row in &mask_rows[..marked] {
                accum.set_not_allowed(prev_row);
            }
            return Err(MaskedMatMulError::RowOutOfRange { col, row, rows });
        }
        accum.set_allowed(row);
    }

    let (b_rows, b_vals) = b.column(col);
    for (&k, &b_kj) in b_rows.iter().zip(b_vals) {
        let (a_rows, a_vals) = a.column(k);
        for (&i, &a_ik) in a_rows.iter().zip(a_vals) {
            if accum.is_allowed(i) {
                accum.insert(i, a_ik * b_kj);
            }
        }
    }

    let out_vals = &mut out.vals[mask_range.start - out.offset..mask_range.end - out.offset];
    for (&row, out_val) in mask_rows.iter().zip(out_vals) {
        if accum.is_set(row) {
            *out_val = accum.remove(row);
        }
        accum.set_not_allowed(row);
    }

    Ok(())
}

/// Compute column `col` of `c = mask ⊙ (a · b)` using `accum`, where the mask
/// is the sparsity pattern of `c`.
///
/// Only the values of column `col` are written. Positions in the pattern
/// for which the product is empty or sums to zero are left unchanged, so
/// `c` is normally zeroed first. Shapes are not validated: `col` must be a
/// valid column of `c` and `b`, `a` must have as many columns as `b` has
/// rows, and `accum` must be in the clear state. `accum` is returned to the
/// clear state on exit.
pub fn masked_column<T: Element, A: Accumulator<T>>(
    c: &mut Csc<T>,
    a: &Csc<T>,
    b: &Csc<T>,
    col: usize,
    accum: &mut A,
) -> Result<(), MaskedMatMulError> {
    let (colptr, rowidx, vals) = c.pattern_and_vals_mut();
    let mut out = OutputChunk {
        colptr,
        rowidx,
        vals,
        offset: 0,
    };
    masked_column_impl(&mut out, a, b, col, accum)
}

fn validate_shapes<T>(c: &Csc<T>, a: &Csc<T>, b: &Csc<T>) -> Result<(), MaskedMatMulError> {
    if c.rows() != a.rows() || c.cols() != b.cols() || a.cols() != b.rows() {
        return Err(MaskedMatMulError::ShapeMismatch {
            a: a.shape(),
            b: b.shape(),
            c: c.shape(),
        });
    }
    Ok(())
}

/// Split the output columns into one chunk per accumulator and compute each
/// chunk, in parallel if there is more than one.
fn run_chunks<T: Element, A: Accumulator<T>>(
    c: &mut Csc<T>,
    a: &Csc<T>,
    b: &Csc<T>,
    accums: &mut [A],
) -> Result<(), MaskedMatMulError> {
    let n_cols = c.cols();
    let (colptr, rowidx, vals) = c.pattern_and_vals_mut();

    let mut chunks: Vec<(Range<usize>, OutputChunk<T>, &mut A)> =
        Vec::with_capacity(accums.len());
    let mut remainder = vals;
    let mut offset = 0;
    for (cols, accum) in range_partition(0..n_cols, accums.len()).zip(accums.iter_mut()) {
        let end = colptr[cols.end];
        let (chunk_vals, rest) = std::mem::take(&mut remainder).split_at_mut(end - offset);
        chunks.push((
            cols,
            OutputChunk {
                colptr,
                rowidx,
                vals: chunk_vals,
                offset,
            },
            accum,
        ));
        remainder = rest;
        offset = end;
    }

    // In a single-threaded context we get better performance by avoiding Rayon
    // overhead altogether.
    let parallel = chunks.len() > 1 && rayon::current_num_threads() > 1;

    chunks
        .into_iter()
        .enumerate()
        .collect::<Vec<_>>()
        .maybe_par_iter(parallel)
        .try_for_each(
            |(worker, (cols, mut out, accum))| -> Result<(), MaskedMatMulError> {
                log::trace!(
                    "worker {} computing columns {:?} ({} outputs)",
                    worker,
                    cols,
                    out.vals.len()
                );
                for col in cols {
                    masked_column_impl(&mut out, a, b, col, accum)?;
                }
                Ok(())
            },
        )
}

/// Compute `c = mask ⊙ (a · b)` in the crate's thread pool, where the mask is
/// the sparsity pattern of `c`.
///
/// Every value of `c` is overwritten: positions where the product is empty
/// or sums to zero are set to zero. The pattern of `c` is not changed. The
/// output columns are split into one contiguous chunk per accumulator in
/// `accumulators`, and each chunk is processed by one worker using its own
/// accumulator. The accumulators must have at least as many rows as `c`.
///
/// If the shapes of `a`, `b` and `c` are incompatible, or the accumulators
/// are unsuitable, an error is returned before `c` is modified. If a worker
/// fails, the error is returned after all workers finish, and the values of
/// `c` are unspecified.
pub fn masked_matmul<'c, T: Element>(
    c: &'c mut Csc<T>,
    a: &Csc<T>,
    b: &Csc<T>,
    accumulators: &mut AccumulatorSet<T>,
) -> Result<&'c mut Csc<T>, MaskedMatMulError> {
    masked_matmul_in(thread_pool(), c, a, b, accumulators)
}

/// Variant of [`masked_matmul`] which runs in a given thread pool.
pub fn masked_matmul_in<'c, T: Element>(
    pool: &ThreadPool,
    c: &'c mut Csc<T>,
    a: &Csc<T>,
    b: &Csc<T>,
    accumulators: &mut AccumulatorSet<T>,
) -> Result<&'c mut Csc<T>, MaskedMatMulError> {
    validate_shapes(c, a, b)?;
    if accumulators.is_empty() {
        return Err(MaskedMatMulError::NoAccumulators);
    }
    if accumulators.rows() < c.rows() {
        return Err(MaskedMatMulError::AccumulatorTooSmall {
            rows: accumulators.rows(),
            required: c.rows(),
        });
    }

    log::debug!(
        "masked matmul: a {:?} nnz {}, b {:?} nnz {}, c {:?} nnz {}, {} {:?} accumulators",
        a.shape(),
        a.nnz(),
        b.shape(),
        b.nnz(),
        c.shape(),
        c.nnz(),
        accumulators.len(),
        accumulators.kind(),
    );
    let start = Instant::now();

    c.vals_mut().fill(T::zero());
    let result = pool.run(|| match accumulators {
        AccumulatorSet::TriState(accums) => run_chunks(c, a, b, accums),
        AccumulatorSet::BitState(accums) => run_chunks(c, a, b, accums),
    });

    if timing_enabled() {
        log::info!(
            "masked matmul of {:?} output with {} non-zeros took {:.3}ms",
            c.shape(),
            c.nnz(),
            start.elapsed().as_secs_f64() * 1000.
        );
    }

    result.map(|_| c)
}

/// Executor for repeated masked multiplications.
///
/// This owns an [`AccumulatorSet`] with one accumulator per thread of its
/// thread pool, and reuses it across calls to [`run`](MaskedMatMul::run) as
/// long as the output row count does not change.
pub struct MaskedMatMul<'p, T> {
    kind: AccumulatorKind,
    pool: &'p ThreadPool,
    accumulators: Option<AccumulatorSet<T>>,
}

impl<T: Element> MaskedMatMul<'static, T> {
    /// Create an executor which uses the crate's global thread pool.
    pub fn new(kind: AccumulatorKind) -> Self {
        Self::with_pool(kind, thread_pool())
    }
}

impl<T: Element> Default for MaskedMatMul<'static, T> {
    fn default() -> Self {
        Self::new(AccumulatorKind::default())
    }
}

impl<'p, T: Element> MaskedMatMul<'p, T> {
    /// Create an executor which runs in `pool`.
    pub fn with_pool(kind: AccumulatorKind, pool: &'p ThreadPool) -> Self {
        MaskedMatMul {
            kind,
            pool,
            accumulators: None,
        }
    }

    pub fn kind(&self) -> AccumulatorKind {
        self.kind
    }

    /// Return the accumulators allocated by the previous call to
    /// [`run`](MaskedMatMul::run), if any.
    pub fn accumulators(&self) -> Option<&AccumulatorSet<T>> {
        self.accumulators.as_ref()
    }

    /// Compute `c = mask ⊙ (a · b)`. See [`masked_matmul`].
    pub fn run<'c>(
        &mut self,
        c: &'c mut Csc<T>,
        a: &Csc<T>,
        b: &Csc<T>,
    ) -> Result<&'c mut Csc<T>, MaskedMatMulError> {
        validate_shapes(c, a, b)?;

        let workers = self.pool.num_threads();
        let reusable = self
            .accumulators
            .as_ref()
            .is_some_and(|accs| accs.rows() == c.rows() && accs.len() == workers);
        if !reusable {
            log::debug!(
                "allocating {} {:?} accumulators with {} rows",
                workers,
                self.kind,
                c.rows()
            );
        }
        let accumulators = match self.accumulators.take() {
            Some(accs) if reusable => self.accumulators.insert(accs),
            _ => self
                .accumulators
                .insert(AccumulatorSet::new(self.kind, c.rows(), workers)),
        };

        masked_matmul_in(self.pool, c, a, b, accumulators)
    }
}
