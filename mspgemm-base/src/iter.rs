//! Iterators for splitting index ranges into work chunks.

use std::ops::Range;

/// Iterator returned by [`range_partition`].
#[derive(Clone, Debug)]
pub struct RangePartition {
    start: usize,
    end: usize,

    /// Length of the smallest part.
    base: usize,

    /// Number of leading parts that are one longer than `base`.
    extra: usize,

    /// Index of the next part to yield.
    next: usize,

    /// Total number of parts.
    parts: usize,
}

impl RangePartition {
    fn part(&self, index: usize) -> Range<usize> {
        debug_assert!(index < self.parts);
        let longer = index.min(self.extra);
        let start = self.start + index * self.base + longer;
        let len = self.base + usize::from(index < self.extra);
        debug_assert!(start + len <= self.end);
        start..start + len
    }
}

impl Iterator for RangePartition {
    type Item = Range<usize>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.parts {
            let part = self.part(self.next);
            self.next += 1;
            Some(part)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.parts - self.next;
        (len, Some(len))
    }
}

impl ExactSizeIterator for RangePartition {}

impl std::iter::FusedIterator for RangePartition {}

/// Split `range` into `parts` contiguous, non-overlapping sub-ranges whose
/// lengths differ by at most one.
///
/// Longer parts come first. If `range.len() < parts` the trailing parts are
/// empty. Panics if `parts` is zero.
pub fn range_partition(range: Range<usize>, parts: usize) -> RangePartition {
    assert!(parts > 0, "cannot partition a range into zero parts");
    let len = range.len();
    RangePartition {
        start: range.start,
        end: range.end,
        base: len / parts,
        extra: len % parts,
        next: 0,
        parts,
    }
}
