use mspgemm_base::bit_vec::BitVec;
use mspgemm_base::num::Element;

use super::Accumulator;

/// Accumulator which stores one "allowed" bit per row.
///
/// Values of rows which are not set are always zero, so a row is set iff it
/// is allowed and its value is non-zero. Insertion is an unconditional add.
#[derive(Clone, Debug)]
pub struct BitAccumulator<T> {
    values: Vec<T>,
    allowed: BitVec,
}

impl<T: Element> BitAccumulator<T> {
    /// Create an accumulator for `rows` rows in the clear state.
    pub fn new(rows: usize) -> Self {
        BitAccumulator {
            values: vec![T::zero(); rows],
            allowed: BitVec::zeros(rows),
        }
    }
}

impl<T: Element> Accumulator<T> for BitAccumulator<T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn set_allowed(&mut self, row: usize) {
        self.allowed.insert(row);
    }

    #[inline]
    fn is_allowed(&self, row: usize) -> bool {
        self.allowed.get(row)
    }

    #[inline]
    fn insert(&mut self, row: usize, value: T) {
        debug_assert!(
            self.allowed.get(row),
            "insert into row {} which is not allowed",
            row
        );
        self.values[row] += value;
    }

    #[inline]
    fn is_set(&self, row: usize) -> bool {
        self.values[row] != T::zero()
    }

    #[inline]
    fn remove(&mut self, row: usize) -> T {
        debug_assert!(self.is_set(row), "remove from row {} which is not set", row);
        self.allowed.delete(row);
        std::mem::replace(&mut self.values[row], T::zero())
    }

    #[inline]
    fn set_not_allowed(&mut self, row: usize) {
        self.allowed.delete(row);
    }

    fn init(&mut self) {
        self.allowed.clear();
        self.values.fill(T::zero());
    }

    fn is_clear(&self) -> bool {
        self.allowed.none() && self.values.iter().all(|x| *x == T::zero())
    }
}
