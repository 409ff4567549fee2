//! mspgemm computes masked sparse matrix-matrix products.
//!
//! Given sparse matrices `A` (m×k) and `B` (k×n) and a sparse mask `M` (m×n),
//! [`masked_matmul`] computes `C = M ⊙ (A · B)`: `C` has exactly the sparsity
//! pattern of `M`, and each stored value is the corresponding entry of the
//! full product `A · B` (zero if no products contribute to it). Since the
//! output pattern is known in advance, no symbolic phase is needed.
//!
//! All matrices use compressed sparse column ([`Csc`]) storage.
//!
//! # Usage
//!
//! ```
//! use mspgemm::{create_accumulators, masked_matmul, AccumulatorKind, Csc};
//!
//! let a = Csc::from_dense(2, 2, &[1., 0., 0., 2.]).unwrap();
//! let b = Csc::from_dense(2, 2, &[3., 0., 1., 4.]).unwrap();
//!
//! // Only compute the diagonal of the product.
//! let mask = Csc::from_dense(2, 2, &[1., 0., 0., 1.]).unwrap();
//! let mut c = Csc::zeros_like_pattern(&mask);
//!
//! // One accumulator per worker, sized to the output row count.
//! let mut accumulators = create_accumulators(AccumulatorKind::BitState, c.rows(), 2);
//! masked_matmul(&mut c, &a, &b, &mut accumulators).unwrap();
//!
//! assert_eq!(c.get(0, 0), Some(3.));
//! assert_eq!(c.get(1, 1), Some(8.));
//! assert_eq!(c.get(1, 0), None);
//! ```
//!
//! For repeated multiplications, [`MaskedMatMul`] allocates one accumulator
//! per thread and keeps them between calls.
//!
//! ## Accumulators
//!
//! Each worker uses a masked sparse accumulator to compute one output column
//! at a time. Two interchangeable implementations are available, selected by
//! [`AccumulatorKind`]. See the [`accumulator`] module.
//!
//! ## Threading
//!
//! Multiplications run in a Rayon
//! [ThreadPool](https://docs.rs/rayon/latest/rayon/struct.ThreadPool.html)
//! which is sized to match the number of physical cores. The size can be
//! changed with the `MSPGEMM_NUM_THREADS` environment variable. You can
//! access this pool using [`thread_pool`] or run in a custom pool using
//! [`masked_matmul_in`].
//!
//! ## Logging
//!
//! Diagnostics are emitted using the [log](https://docs.rs/log) crate. Set
//! `MSPGEMM_TIMING=1` to log the duration of each multiplication at info
//! level.

pub mod accumulator;
mod csc;
mod env;
mod errors;
mod iter_util;
mod masked_matmul;
mod pool;
mod threading;

pub use accumulator::{Accumulator, AccumulatorKind, BitAccumulator, TriStateAccumulator};
pub use csc::Csc;
pub use errors::{CscError, MaskedMatMulError};
pub use masked_matmul::{masked_column, masked_matmul, masked_matmul_in, MaskedMatMul};
pub use pool::{create_accumulators, AccumulatorSet};
pub use threading::{thread_pool, ThreadPool};

/// Element types of matrices that can be multiplied.
pub use mspgemm_base::num::{Element, Identities};
