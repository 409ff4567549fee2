use mspgemm_base::num::Element;

use super::Accumulator;

/// Per-row state of a [`TriStateAccumulator`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum RowState {
    #[default]
    NotAllowed,
    Allowed,
    Set,
}

/// Accumulator which tracks an explicit [`RowState`] for each row.
#[derive(Clone, Debug)]
pub struct TriStateAccumulator<T> {
    values: Vec<T>,
    states: Vec<RowState>,
}

impl<T: Element> TriStateAccumulator<T> {
    /// Create an accumulator for `rows` rows in the clear state.
    pub fn new(rows: usize) -> Self {
        TriStateAccumulator {
            values: vec![T::zero(); rows],
            states: vec![RowState::NotAllowed; rows],
        }
    }

    /// Return the state of `row`.
    pub fn state(&self, row: usize) -> RowState {
        self.states[row]
    }
}

impl<T: Element> Accumulator<T> for TriStateAccumulator<T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn set_allowed(&mut self, row: usize) {
        let state = &mut self.states[row];
        if *state == RowState::NotAllowed {
            *state = RowState::Allowed;
        }
    }

    #[inline]
    fn is_allowed(&self, row: usize) -> bool {
        self.states[row] != RowState::NotAllowed
    }

    #[inline]
    fn insert(&mut self, row: usize, value: T) {
        match self.states[row] {
            RowState::Allowed => {
                // Start the sum from zero so that it is never `-0.0`.
                self.values[row] = T::zero() + value;
                self.states[row] = RowState::Set;
            }
            RowState::Set => self.values[row] += value,
            RowState::NotAllowed => {
                debug_assert!(false, "insert into row {} which is not allowed", row)
            }
        }
    }

    #[inline]
    fn is_set(&self, row: usize) -> bool {
        self.states[row] == RowState::Set
    }

    #[inline]
    fn remove(&mut self, row: usize) -> T {
        debug_assert!(self.is_set(row), "remove from row {} which is not set", row);
        self.states[row] = RowState::NotAllowed;
        std::mem::replace(&mut self.values[row], T::zero())
    }

    #[inline]
    fn set_not_allowed(&mut self, row: usize) {
        self.states[row] = RowState::NotAllowed;
    }

    fn init(&mut self) {
        self.states.fill(RowState::NotAllowed);
        self.values.fill(T::zero());
    }

    fn is_clear(&self) -> bool {
        self.states.iter().all(|s| *s == RowState::NotAllowed)
            && self.values.iter().all(|x| *x == T::zero())
    }
}
