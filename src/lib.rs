//! Tiny LZ77 codec for 7-bit data whose backreferences point into the
//! compressed stream itself.
//!
//! Every compressed byte is one token: a literal character (high bit clear) or
//! a match `1ooooocc` that copies `cc + 2` characters starting `ooooo + 1`
//! tokens back. Because matches refer to compressed positions rather than
//! decoded ones, data can be decoded without any output buffer, starting at
//! any token, which makes the format suited to string tables on small
//! targets.
//!
//! ```
//! use lzjwm::{decode, encode, CodecConfig};
//!
//! let text = b"abcabcabcabc";
//! let compressed = encode(text)?;
//! assert!(compressed.len() < text.len());
//! assert_eq!(decode(&CodecConfig::default(), &compressed)?, text);
//! # Ok::<(), lzjwm::Error>(())
//! ```

pub mod decoder;
pub mod dump;
pub mod encoder;
pub mod error;
pub mod export;
pub mod format;
pub mod yaml;

pub use decoder::{
    decode, decode_into, decode_range, decode_stream, decode_stream_to, decode_terminated,
    decompressed_size, savings, stream_stats, StreamDecoder, StreamStats,
};
pub use dump::{dump, Dump};
pub use encoder::{encode, split_lines, Archive, Encoder, Entry, Record, RecordOptions};
pub use error::{Corruption, Error, Result};
pub use export::write_c_header;
pub use format::{until_nul, CodecConfig, Lookback, OutputPos, StreamPos, Token};
pub use yaml::{read_records, write_yaml, ArchiveDocument};
