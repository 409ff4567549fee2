//! Per-worker accumulator allocation.

use mspgemm_base::num::Element;

use crate::accumulator::{Accumulator, AccumulatorKind, BitAccumulator, TriStateAccumulator};

/// A set of accumulators, one per parallel worker, all of the same kind and
/// size.
///
/// Accumulators are allocated once and reused for every column a worker
/// processes, and across calls to [`masked_matmul`](crate::masked_matmul)
/// with outputs of the same row count. The backing storage is released when
/// the set is dropped.
#[derive(Clone, Debug)]
pub enum AccumulatorSet<T> {
    TriState(Vec<TriStateAccumulator<T>>),
    BitState(Vec<BitAccumulator<T>>),
}

impl<T: Element> AccumulatorSet<T> {
    /// Allocate `count` accumulators of the given kind with `rows` rows each.
    pub fn new(kind: AccumulatorKind, rows: usize, count: usize) -> Self {
        match kind {
            AccumulatorKind::TriState => {
                Self::TriState((0..count).map(|_| TriStateAccumulator::new(rows)).collect())
            }
            AccumulatorKind::BitState => {
                Self::BitState((0..count).map(|_| BitAccumulator::new(rows)).collect())
            }
        }
    }

    pub fn kind(&self) -> AccumulatorKind {
        match self {
            Self::TriState(_) => AccumulatorKind::TriState,
            Self::BitState(_) => AccumulatorKind::BitState,
        }
    }

    /// Return the number of accumulators, which is the number of workers
    /// a multiplication using this set will be split across.
    pub fn len(&self) -> usize {
        match self {
            Self::TriState(accs) => accs.len(),
            Self::BitState(accs) => accs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the row count of the accumulators, or zero if the set is empty.
    pub fn rows(&self) -> usize {
        match self {
            Self::TriState(accs) => accs.first().map(|acc| acc.len()).unwrap_or(0),
            Self::BitState(accs) => accs.first().map(|acc| acc.len()).unwrap_or(0),
        }
    }

    /// Return true if every accumulator is in the clear state.
    pub fn is_clear(&self) -> bool {
        match self {
            Self::TriState(accs) => accs.iter().all(|acc| acc.is_clear()),
            Self::BitState(accs) => accs.iter().all(|acc| acc.is_clear()),
        }
    }

    /// Reset every accumulator to the clear state with a full sweep.
    pub fn init(&mut self) {
        match self {
            Self::TriState(accs) => accs.iter_mut().for_each(|acc| acc.init()),
            Self::BitState(accs) => accs.iter_mut().for_each(|acc| acc.init()),
        }
    }
}

/// Allocate `count` accumulators of the given kind with `rows` rows each.
///
/// `rows` should be the row count of the output matrix and `count` the
/// desired number of parallel workers.
pub fn create_accumulators<T: Element>(
    kind: AccumulatorKind,
    rows: usize,
    count: usize,
) -> AccumulatorSet<T> {
    AccumulatorSet::new(kind, rows, count)
}
