/// A fixed-length vector of bits, packed into 64-bit words.
///
/// All bits are initially unset.
#[derive(Clone, Default, PartialEq)]
pub struct BitVec {
    words: Vec<u64>,
    len: usize,
}

impl BitVec {
    const WORD_BITS: usize = u64::BITS as usize;

    /// Return a bit vector of length `len` with no bits set.
    pub fn zeros(len: usize) -> Self {
        BitVec {
            words: vec![0; len.div_ceil(Self::WORD_BITS)],
            len,
        }
    }

    /// Return the number of bits in the vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the vector has zero length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn locate(&self, pos: usize) -> (usize, u64) {
        debug_assert!(pos < self.len, "bit {} out of range for len {}", pos, self.len);
        (pos / Self::WORD_BITS, 1 << (pos % Self::WORD_BITS))
    }

    /// Return true if position `pos` is set.
    #[inline]
    pub fn get(&self, pos: usize) -> bool {
        let (word, mask) = self.locate(pos);
        self.words[word] & mask != 0
    }

    /// Set the bit at position `pos`.
    #[inline]
    pub fn insert(&mut self, pos: usize) {
        let (word, mask) = self.locate(pos);
        self.words[word] |= mask;
    }

    /// Unset the bit at position `pos`.
    #[inline]
    pub fn delete(&mut self, pos: usize) {
        let (word, mask) = self.locate(pos);
        self.words[word] &= !mask;
    }

    /// Unset every bit.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Return true if no bits are set.
    pub fn none(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }
}

impl std::fmt::Debug for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for pos in 0..self.len {
            write!(f, "{}", self.get(pos) as u8)?;
        }
        Ok(())
    }
}
