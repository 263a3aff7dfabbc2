//! Byte-lane encoding of the 4-byte-wide UART_DM FIFO word.
//!
//! Byte `j` of a FIFO word travels in bits `[8j, 8j + 8)`: the lowest lane is
//! the first character on the wire.

/// Number of byte lanes in one FIFO word.
pub const LANES: usize = 4;

/// A value as read from `RF` or written to `TF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoWord(u32);

impl FifoWord {
    /// The all-zero word.
    pub const ZERO: Self = FifoWord(0);

    /// Wraps a raw register value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FifoWord(raw)
    }

    /// The raw register value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Builds a word from four lanes, lane 0 first.
    #[inline]
    pub const fn from_lanes(lanes: [u8; LANES]) -> Self {
        FifoWord(u32::from_le_bytes(lanes))
    }

    /// Splits the word into its four lanes, lane 0 first.
    #[inline]
    pub const fn lanes(self) -> [u8; LANES] {
        self.0.to_le_bytes()
    }

    /// Returns lane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    #[inline]
    pub const fn lane(self, index: usize) -> u8 {
        self.lanes()[index]
    }

    /// Packs up to [`LANES`] bytes from `bytes`, returning the word and the
    /// number of lanes that were filled.
    ///
    /// Unfilled lanes are zero. Returns `None` once `bytes` is exhausted.
    pub fn pack(bytes: &mut impl Iterator<Item = u8>) -> Option<(Self, usize)> {
        let mut lanes = [0; LANES];
        let mut filled = 0;
        for (slot, byte) in lanes.iter_mut().zip(bytes) {
            *slot = byte;
            filled += 1;
        }
        (filled > 0).then(|| (FifoWord::from_lanes(lanes), filled))
    }
}

impl From<u32> for FifoWord {
    fn from(raw: u32) -> Self {
        FifoWord(raw)
    }
}

impl From<FifoWord> for u32 {
    fn from(word: FifoWord) -> Self {
        word.0
    }
}

/// Number of FIFO words needed to carry `chars` characters.
#[inline]
pub const fn words_for(chars: usize) -> usize {
    chars.div_ceil(LANES)
}
