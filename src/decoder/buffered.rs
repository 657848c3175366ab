use super::size::decompressed_size;
use crate::error::{Corruption, Error, Result};
use crate::format::{CodecConfig, Lookback, OutputPos, StreamPos, Token};

/// Decode into a caller-provided buffer, returning the bytes written
///
/// The output produced so far is the dictionary: a match's token offset is
/// translated into an output position by summing the decoded lengths of the
/// tokens between the match and its source. `out` must hold at least
/// [`decompressed_size`] bytes; overruns are reported as corruption.
pub fn decode_into(config: &CodecConfig, compressed: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut written = 0;

    for (pos, &byte) in compressed.iter().enumerate() {
        match config.decode(byte) {
            Token::Literal(c) => {
                let slot = out
                    .get_mut(written)
                    .ok_or_else(|| Error::corrupt(pos, Corruption::OutputOverflow))?;
                *slot = c;
                written += 1;
            }
            Token::Match { offset, count } => {
                let source = source_position(
                    config,
                    compressed,
                    StreamPos::new(pos),
                    offset,
                    OutputPos::new(written),
                )?;
                if written + count > out.len() {
                    return Err(Error::corrupt(pos, Corruption::OutputOverflow));
                }
                // Byte by byte: the source may overlap the bytes being written
                for i in 0..count {
                    out[written + i] = out[source.get() + i];
                }
                written += count;
            }
        }
    }

    Ok(written)
}

/// Decode a whole stream into a new buffer
pub fn decode(config: &CodecConfig, compressed: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; decompressed_size(config, compressed)];
    let written = decode_into(config, compressed, &mut out)?;
    out.truncate(written);
    Ok(out)
}

/// Output position where the source of the match at `token` begins
///
/// `end` is the decoded length of everything before `token`.
fn source_position(
    config: &CodecConfig,
    compressed: &[u8],
    token: StreamPos,
    offset: Lookback,
    end: OutputPos,
) -> Result<OutputPos> {
    let source = offset
        .resolve(token)
        .ok_or_else(|| Error::corrupt(token.get(), Corruption::SourceBeforeStart))?;
    let skipped: usize =
        compressed[source.get()..token.get()].iter().map(|&b| config.decode_count(b)).sum();
    // `end` is the sum over all earlier tokens, so it covers `skipped`
    Ok(OutputPos::new(end.get() - skipped))
}
