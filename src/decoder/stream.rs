use std::io::{self, Write};
use std::iter::FusedIterator;

use crate::error::{Corruption, Error, Result};
use crate::format::{CodecConfig, StreamPos, Token};

/// Pending request: produce `needed` characters reading from `pos`
#[derive(Clone, Copy, Debug)]
struct Task {
    pos: usize,
    needed: usize,
}

/// Buffer-free decoder yielding one character at a time
///
/// Matches are resolved by seeking back inside the compressed input, so no
/// decoded output is kept. When a match covers everything the current task
/// still needs, the task jumps to the source; otherwise a nested task for the
/// match's span is pushed. Each nested task asks for fewer characters than its
/// parent still needs, so the stack never grows beyond `max_zero_match` tasks.
/// A nested task always meets its own match token again before the end of the
/// input and jumps back, so only the root task can run out of input.
pub struct StreamDecoder<'a> {
    config: CodecConfig,
    input: &'a [u8],
    stack: Vec<Task>,
    peak_depth: usize,
}

impl<'a> StreamDecoder<'a> {
    /// Decode the whole stream from its start
    pub fn new(config: &CodecConfig, input: &'a [u8]) -> Self {
        Self::starting_at(config, input, StreamPos::new(0), None)
    }

    /// Decode from an arbitrary token, stopping after `limit` characters
    ///
    /// `start` must be the position of a token whose decoding begins a span of
    /// interest, e.g. an archive entry point.
    pub fn starting_at(
        config: &CodecConfig,
        input: &'a [u8],
        start: StreamPos,
        limit: Option<usize>,
    ) -> Self {
        let root = Task { pos: start.get(), needed: limit.unwrap_or(usize::MAX) };
        Self { config: *config, input, stack: vec![root], peak_depth: 1 }
    }

    /// Deepest the task stack has been so far
    pub fn peak_depth(&self) -> usize {
        self.peak_depth
    }

    fn fail(&mut self, position: usize, reason: Corruption) -> Option<Result<u8>> {
        self.stack.clear();
        Some(Err(Error::corrupt(position, reason)))
    }
}

impl Iterator for StreamDecoder<'_> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let task = self.stack.last_mut()?;
            if task.needed == 0 {
                self.stack.pop();
                continue;
            }

            let Some(&byte) = self.input.get(task.pos) else {
                self.stack.pop();
                continue;
            };
            let at = StreamPos::new(task.pos);
            task.pos += 1;

            match self.config.decode(byte) {
                Token::Literal(c) => {
                    task.needed -= 1;
                    return Some(Ok(c));
                }
                Token::Match { offset, count } => {
                    let Some(source) = offset.resolve(at) else {
                        return self.fail(at.get(), Corruption::SourceBeforeStart);
                    };
                    if task.needed > count {
                        task.needed -= count;
                        self.stack.push(Task { pos: source.get(), needed: count });
                        self.peak_depth = self.peak_depth.max(self.stack.len());
                    } else {
                        task.pos = source.get();
                    }
                }
            }
        }
    }
}

impl FusedIterator for StreamDecoder<'_> {}

/// Decode from the start of the stream, handing each character to `sink`
///
/// Returns the number of characters emitted. `limit` bounds the output; with
/// `Some(k)` exactly the first `k` decoded characters are produced (fewer if
/// the stream is shorter).
pub fn decode_stream<F>(
    config: &CodecConfig,
    compressed: &[u8],
    limit: Option<usize>,
    sink: F,
) -> Result<usize>
where
    F: FnMut(u8) -> io::Result<()>,
{
    decode_range(config, compressed, StreamPos::new(0), limit, sink)
}

/// Decode starting at token `start` (random access)
pub fn decode_range<F>(
    config: &CodecConfig,
    compressed: &[u8],
    start: StreamPos,
    limit: Option<usize>,
    mut sink: F,
) -> Result<usize>
where
    F: FnMut(u8) -> io::Result<()>,
{
    let mut emitted = 0;
    for c in StreamDecoder::starting_at(config, compressed, start, limit) {
        sink(c?)?;
        emitted += 1;
    }
    Ok(emitted)
}

/// Decode a NUL-terminated record starting at token `start`
///
/// Stops at the first decoded NUL character (not passed to `sink`) or after
/// `limit` characters, whichever comes first. Archives built with
/// `keep_literal(0)` and a NUL terminator keep every terminator as its own
/// literal token, so this reads exactly one record.
pub fn decode_terminated<F>(
    config: &CodecConfig,
    compressed: &[u8],
    start: StreamPos,
    limit: Option<usize>,
    mut sink: F,
) -> Result<usize>
where
    F: FnMut(u8) -> io::Result<()>,
{
    let mut emitted = 0;
    for c in StreamDecoder::starting_at(config, compressed, start, limit) {
        let c = c?;
        if c == 0 {
            break;
        }
        sink(c)?;
        emitted += 1;
    }
    Ok(emitted)
}

/// Stream-decode the whole input into a writer
pub fn decode_stream_to<W: Write>(
    config: &CodecConfig,
    compressed: &[u8],
    mut writer: W,
) -> Result<usize> {
    let emitted = decode_stream(config, compressed, None, |c| writer.write_all(&[c]))?;
    writer.flush()?;
    Ok(emitted)
}
