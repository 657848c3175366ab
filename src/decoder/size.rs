use crate::format::{is_literal, CodecConfig};

/// Decoded length of a compressed stream
///
/// Pass the result of [`crate::until_nul`] for NUL-terminated data.
pub fn decompressed_size(config: &CodecConfig, compressed: &[u8]) -> usize {
    compressed.iter().map(|&b| config.decode_count(b)).sum()
}

/// Token statistics of a compressed stream
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub tokens: usize,
    pub literals: usize,
    pub matches: usize,
    pub decoded_bytes: usize,
}

/// Fraction of `original` bytes saved by compressing to `compressed` bytes
///
/// Returns 0.0 for empty data.
pub fn savings(original: usize, compressed: usize) -> f64 {
    if original == 0 {
        0.0
    } else {
        1.0 - compressed as f64 / original as f64
    }
}

impl StreamStats {
    /// Fraction of the decoded size saved by compression
    pub fn savings(&self) -> f64 {
        savings(self.decoded_bytes, self.tokens)
    }
}

/// Single pass collecting token counts and the decoded length
pub fn stream_stats(config: &CodecConfig, compressed: &[u8]) -> StreamStats {
    let mut stats = StreamStats { tokens: compressed.len(), ..Default::default() };
    for &byte in compressed {
        if is_literal(byte) {
            stats.literals += 1;
        } else {
            stats.matches += 1;
        }
        stats.decoded_bytes += config.decode_count(byte);
    }
    stats
}
