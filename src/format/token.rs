use super::config::CodecConfig;
use super::position::Lookback;
use crate::error::{Error, Result};

/// High bit tags a match token
pub const MATCH_FLAG: u8 = 0x80;

/// Mask of the payload bits shared by both token kinds
pub const PAYLOAD_MASK: u8 = 0x7f;

/// Literal tokens are their own character
#[inline]
pub fn is_literal(byte: u8) -> bool {
    byte & MATCH_FLAG == 0
}

/// A single decoded token of the compressed stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// One character, 0-127
    Literal(u8),
    /// Copy `count` characters starting `offset + 1` tokens back
    Match { offset: Lookback, count: usize },
}

impl Token {
    /// Returns the decoded size this token represents
    pub fn decoded_len(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { count, .. } => *count,
        }
    }
}

impl CodecConfig {
    /// Decoded length of a token byte: 1 for literals
    #[inline]
    pub fn decode_count(&self, byte: u8) -> usize {
        if is_literal(byte) {
            1
        } else if self.is_zero_pattern(byte) {
            usize::from(byte & self.zero_count_mask()) + 2
        } else {
            usize::from(byte & self.count_mask()) + 2
        }
    }

    /// Offset field of a token byte; 0 for literals
    #[inline]
    pub fn decode_offset(&self, byte: u8) -> Lookback {
        if is_literal(byte) || self.is_zero_pattern(byte) {
            return Lookback::new(0);
        }
        let field = usize::from((byte & PAYLOAD_MASK) >> self.count_bits());
        Lookback::new(field + usize::from(self.zero_offset_extension()))
    }

    /// Typed view of a token byte
    #[inline]
    pub fn decode(&self, byte: u8) -> Token {
        if is_literal(byte) {
            Token::Literal(byte)
        } else {
            Token::Match { offset: self.decode_offset(byte), count: self.decode_count(byte) }
        }
    }

    /// Build a match token
    ///
    /// Fails if `count` is below 2 or too long for `offset`, or if `offset`
    /// is outside the lookback window.
    pub fn encode_match(&self, count: usize, offset: Lookback) -> Result<u8> {
        let off = offset.get();
        if count < 2 || count > self.max_match_for(off) || off >= self.lookback() {
            return Err(Error::InvalidMatch { count, offset: off });
        }
        let count_field = (count - 2) as u8;
        if self.zero_offset_extension() && off == 0 {
            return Ok(!self.zero_count_mask() | count_field);
        }
        let field = (off - usize::from(self.zero_offset_extension())) as u8;
        Ok(MATCH_FLAG | (field << self.count_bits()) | count_field)
    }
}
