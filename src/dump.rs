use std::fmt;

use crate::format::{CodecConfig, Token};

/// Human-readable rendering of a token stream
///
/// Literals print as their character, matches as `(offset,count)`.
pub struct Dump<'a> {
    config: &'a CodecConfig,
    data: &'a [u8],
}

impl<'a> Dump<'a> {
    pub fn new(config: &'a CodecConfig, data: &'a [u8]) -> Self {
        Self { config, data }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.data {
            match self.config.decode(byte) {
                Token::Literal(c) => fmt::Write::write_char(f, char::from(c))?,
                Token::Match { offset, count } => write!(f, "({},{})", offset.get(), count)?,
            }
        }
        Ok(())
    }
}

/// Render a compressed stream for debugging
pub fn dump(config: &CodecConfig, data: &[u8]) -> String {
    Dump::new(config, data).to_string()
}
