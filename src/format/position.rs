//! Typed coordinates for the two spaces a backreference can be measured in.
//!
//! A match token stores a [`Lookback`] counted in compressed-stream tokens.
//! The streaming decoder follows it directly as a [`StreamPos`]; the buffered
//! decoder has to translate it into an [`OutputPos`] by summing the decoded
//! lengths of the tokens it skips. Keeping the two as separate types stops one
//! from being used where the other is meant.

/// Offset field of a match token: the source starts `get() + 1` tokens back
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lookback(usize);

impl Lookback {
    pub const fn new(offset: usize) -> Self {
        Self(offset)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of tokens between the match token and its source
    pub const fn distance(self) -> usize {
        self.0 + 1
    }

    /// Source position of a match token sitting at `token`
    ///
    /// Returns None when the source would lie before the stream start.
    pub fn resolve(self, token: StreamPos) -> Option<StreamPos> {
        token.0.checked_sub(self.distance()).map(StreamPos)
    }
}

/// Position in the compressed stream (one token per byte)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamPos(usize);

impl StreamPos {
    pub const fn new(pos: usize) -> Self {
        Self(pos)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

/// Position in the decoded output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutputPos(usize);

impl OutputPos {
    pub const fn new(pos: usize) -> Self {
        Self(pos)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}
