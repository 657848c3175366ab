//! Greedy match/merge encoder.
//!
//! Every input byte starts as its own run node. Walking the list front to
//! back, each node is compared against the next `lookback` surviving nodes;
//! when the input at a later node repeats the input at the current one, the
//! later node swallows as many whole following nodes as the match covers and
//! becomes a reference back to the current node. Matches never split a node
//! that is already a match, so every surviving node maps to exactly one output
//! token and token distances can be computed once the list is final.

pub mod records;
mod runs;

pub use records::{split_lines, Archive, Entry, Record, RecordOptions};

use crate::error::{Error, Result};
use crate::format::token::PAYLOAD_MASK;
use crate::format::{is_literal, CodecConfig, Lookback};
use runs::RunList;

/// Encoder for a fixed codec configuration
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    config: CodecConfig,
    /// Bitset of characters that never take part in a match
    kept: u128,
}

/// Encoded stream plus the output position of every input node
pub(crate) struct Encoded {
    pub data: Vec<u8>,
    /// `emitted[i]` is the token position of the node starting at input `i`,
    /// valid for nodes that survived merging
    pub emitted: Vec<usize>,
}

impl Encoder {
    pub fn new(config: CodecConfig) -> Self {
        Self { config, kept: 0 }
    }

    /// Never fold `byte` into a match, so it always appears as a literal
    ///
    /// Keeping NUL makes record terminators visible in the compressed data.
    pub fn keep_literal(mut self, byte: u8) -> Self {
        if is_literal(byte) {
            self.kept |= 1u128 << byte;
        }
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress 7-bit clean data
    ///
    /// The output is never longer than the input.
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encode_anchored(input, &[])?.data)
    }

    /// Compress with the given input positions pinned as literal entry points
    pub(crate) fn encode_anchored(&self, input: &[u8], anchors: &[usize]) -> Result<Encoded> {
        if let Some(position) = input.iter().position(|&b| !is_literal(b)) {
            return Err(Error::InvalidInput { position, byte: input[position] });
        }

        let mut runs = RunList::new(input.len());
        for &anchor in anchors.iter().filter(|&&a| a < input.len()) {
            runs.anchor(anchor);
        }

        let merges = self.merge_runs(input, &mut runs);
        let encoded = self.linearize(input, &runs)?;

        tracing::debug!(
            input_bytes = input.len(),
            output_bytes = encoded.data.len(),
            merges,
            "encoded stream"
        );
        Ok(encoded)
    }

    /// Greedy pass collapsing repeated spans; returns the number of merges
    fn merge_runs(&self, input: &[u8], runs: &mut RunList) -> usize {
        let lookback = self.config.lookback();
        let mut merges = 0;
        let mut current = runs.head();

        while let Some(source) = current {
            let mut candidate = source;
            for offset in 0..lookback {
                let Some(next) = runs.next(candidate) else {
                    break;
                };
                candidate = next;

                let len = self.common_run(input, source, candidate, self.config.max_match_for(offset));
                if len < 2 {
                    continue;
                }
                if let Some(merged) = runs.try_merge(source, candidate, len) {
                    tracing::trace!(source, candidate, merged, "merged runs");
                    merges += 1;
                }
            }
            current = runs.next(source);
        }
        merges
    }

    /// Length of the common prefix of `input[x..]` and `input[y..]`, `x < y`
    fn common_run(&self, input: &[u8], x: usize, y: usize, limit: usize) -> usize {
        debug_assert!(x < y);
        let limit = limit.min(input.len() - y);
        input[x..]
            .iter()
            .zip(&input[y..])
            .take(limit)
            .take_while(|(a, b)| a == b && !self.is_kept(**a))
            .count()
    }

    #[inline]
    fn is_kept(&self, byte: u8) -> bool {
        self.kept & (1u128 << (byte & PAYLOAD_MASK)) != 0
    }

    /// Emit one token per surviving node
    fn linearize(&self, input: &[u8], runs: &RunList) -> Result<Encoded> {
        let mut data = Vec::with_capacity(input.len());
        let mut emitted = vec![0usize; input.len()];

        for (index, run) in runs.iter() {
            let pos = data.len();
            let byte = if run.count < 2 {
                input[index] & PAYLOAD_MASK
            } else {
                // Sources always precede their matches in list order
                let offset = Lookback::new(pos - emitted[run.from] - 1);
                self.config.encode_match(run.count, offset)?
            };
            data.push(byte);
            emitted[index] = pos;
        }

        Ok(Encoded { data, emitted })
    }
}

/// Compress with the default configuration
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    Encoder::default().encode(input)
}
