pub mod config;
pub mod position;
pub mod token;

pub use config::CodecConfig;
pub use position::{Lookback, OutputPos, StreamPos};
pub use token::{is_literal, Token};

/// Trim a NUL-terminated compressed stream to its tokens
///
/// Returns everything before the first NUL byte, or the whole slice if there
/// is none. A NUL is also the literal token for character 0, so streams that
/// rely on termination cannot carry embedded NULs.
pub fn until_nul(data: &[u8]) -> &[u8] {
    match memchr::memchr(0, data) {
        Some(end) => &data[..end],
        None => data,
    }
}
