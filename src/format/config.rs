use crate::error::{Error, Result};

/// Default number of bits given to the count field of a match
pub const DEFAULT_COUNT_BITS: u8 = 2;

/// Default number of offset bits borrowed for zero-offset matches (disabled)
pub const DEFAULT_ZERO_BITS: u8 = 0;

/// Bit-width parameters of the token format
///
/// `count_bits` splits the seven payload bits of a match token between count
/// and offset. `zero_bits`, when non-zero, reserves the top offset values so
/// that a match at offset 0 can carry a count field `count_bits + zero_bits`
/// wide. Both encoder and decoder must agree on the same configuration; the
/// stream itself carries no header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodecConfig {
    count_bits: u8,
    zero_bits: u8,
}

impl CodecConfig {
    /// Create a validated configuration
    ///
    /// `count_bits` may be 0-6. `zero_bits` must leave at least one offset bit
    /// above the widened count field (`zero_bits < 7 - count_bits`).
    pub fn new(count_bits: u8, zero_bits: u8) -> Result<Self> {
        if count_bits > 6 || zero_bits >= 7 - count_bits {
            return Err(Error::InvalidConfig { count_bits, zero_bits });
        }
        Ok(Self { count_bits, zero_bits })
    }

    pub fn count_bits(&self) -> u8 {
        self.count_bits
    }

    pub fn zero_bits(&self) -> u8 {
        self.zero_bits
    }

    /// Whether offset-0 matches use the widened count encoding
    pub fn zero_offset_extension(&self) -> bool {
        self.zero_bits > 0
    }

    /// Number of distinct offsets a match can express
    pub fn lookback(&self) -> usize {
        let reserved = if self.zero_offset_extension() { 1 << self.zero_bits } else { 0 };
        (1 << (7 - self.count_bits)) - reserved
    }

    /// Longest match at any non-zero offset
    pub fn max_match(&self) -> usize {
        (1 << self.count_bits) + 1
    }

    /// Longest match at offset 0 (equals `max_match` without the extension)
    pub fn max_zero_match(&self) -> usize {
        (1 << (self.count_bits + self.zero_bits)) + 1
    }

    /// Longest match encodable at the given offset
    pub fn max_match_for(&self, offset: usize) -> usize {
        if offset == 0 {
            self.max_zero_match()
        } else {
            self.max_match()
        }
    }

    #[inline]
    pub(crate) fn count_mask(&self) -> u8 {
        ((1u16 << self.count_bits) - 1) as u8
    }

    /// Mask of the widened count field used by zero-offset matches
    #[inline]
    pub(crate) fn zero_count_mask(&self) -> u8 {
        ((1u16 << (self.count_bits + self.zero_bits)) - 1) as u8
    }

    /// True for the reserved "offset 0, wide count" byte pattern
    #[inline]
    pub(crate) fn is_zero_pattern(&self, byte: u8) -> bool {
        self.zero_offset_extension() && (byte | self.zero_count_mask()) == 0xff
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { count_bits: DEFAULT_COUNT_BITS, zero_bits: DEFAULT_ZERO_BITS }
    }
}
