//! Masked sparse accumulators (MSA).
//!
//! An accumulator holds the partial sums of one output column at a time. Rows
//! must be marked as allowed (present in the output pattern) before values
//! can be inserted, and the kernel restores each accumulator to its clear
//! state by visiting exactly the rows it marked. Two implementations are
//! provided:
//!
//! - [`TriStateAccumulator`] tracks an explicit
//!   not-allowed / allowed / set state per row.
//! - [`BitAccumulator`] stores only an "allowed" bit per row and treats a
//!   zero value as unset. This halves the bookkeeping footprint and makes
//!   insertion branch-free. Both produce the same output, because the output
//!   is zeroed before a multiplication and a row whose sum is zero leaves its
//!   output slot at zero either way.

use mspgemm_base::num::Element;

mod bit_state;
mod tri_state;

pub use bit_state::BitAccumulator;
pub use tri_state::{RowState, TriStateAccumulator};

/// Selects which [`Accumulator`] implementation to use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccumulatorKind {
    /// Explicit three-valued state per row.
    TriState,
    /// One allowed bit per row, with zero values meaning "unset".
    #[default]
    BitState,
}

/// Scratch space mapping row indices to partially accumulated values, gated
/// by a per-column "allowed" mask.
///
/// In the clear state, every row is not allowed and every value is zero.
/// The row index passed to each method must be less than [`len`](Accumulator::len).
pub trait Accumulator<T: Element>: Send {
    /// Return the number of rows in the accumulator.
    fn len(&self) -> usize;

    /// Return true if the accumulator has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allow values to be inserted for `row`. No-op if already allowed.
    fn set_allowed(&mut self, row: usize);

    /// Return true if `row` is allowed or set.
    fn is_allowed(&self, row: usize) -> bool;

    /// Add `value` to the sum for `row`.
    ///
    /// `row` must be allowed. The first insertion into a row replaces the
    /// initial zero, subsequent insertions accumulate.
    fn insert(&mut self, row: usize, value: T);

    /// Return true if a value has been inserted for `row`.
    fn is_set(&self, row: usize) -> bool;

    /// Take the accumulated value for `row`, returning the row to the
    /// not-allowed state with a zero value.
    ///
    /// `row` must be set.
    fn remove(&mut self, row: usize) -> T;

    /// Return `row` to the not-allowed state.
    ///
    /// Set rows must be removed first, otherwise their value is retained.
    fn set_not_allowed(&mut self, row: usize);

    /// Return every row to the clear state.
    ///
    /// This visits every row, so it is only used at construction and for
    /// explicit resets, never per column.
    fn init(&mut self);

    /// Return true if every row is in the clear state.
    fn is_clear(&self) -> bool;
}
