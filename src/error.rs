use thiserror::Error;

/// Why a compressed stream was rejected by a decoder
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corruption {
    /// A match resolves to a position before the start of the stream
    #[error("backreference points before stream start")]
    SourceBeforeStart,
    /// Decoding would write past the end of the output buffer
    #[error("decoded data exceeds output capacity")]
    OutputOverflow,
}

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Encoder errors
    #[error("Input byte 0x{byte:02x} at position {position} is not 7-bit clean")]
    InvalidInput { position: usize, byte: u8 },

    #[error("Cannot encode match: count={count}, offset={offset}")]
    InvalidMatch { count: usize, offset: usize },

    // Decoder errors
    #[error("Corrupt compressed stream at position {position}: {reason}")]
    CorruptStream { position: usize, reason: Corruption },

    // Configuration errors
    #[error("Invalid codec parameters: COUNT_BITS={count_bits}, ZERO_BITS={zero_bits}")]
    InvalidConfig { count_bits: u8, zero_bits: u8 },

    // Export errors
    #[error("Record name {0:?} collides with another record's C identifier")]
    DuplicateIdentifier(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn corrupt(position: usize, reason: Corruption) -> Self {
        Error::CorruptStream { position, reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
