//! Multi-record archives with random-access entry points.
//!
//! Records are concatenated (optionally with a terminator byte after each)
//! and compressed as one stream so later records can reference earlier ones.
//! The first byte of every record is pinned as a literal token, which makes
//! its compressed position a valid starting point for the streaming decoder.

use std::collections::BTreeMap;

use super::Encoder;
use crate::decoder::stream::decode_range;
use crate::error::Result;
use crate::format::{CodecConfig, StreamPos};

/// A named payload to store in an archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub data: Vec<u8>,
}

impl Record {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), data: data.into() }
    }
}

/// How records are laid out before compression
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordOptions {
    /// Byte appended after every record (usually NUL)
    pub terminator: Option<u8>,
    /// Store identical payloads once; entries are then ordered by payload
    pub dedup: bool,
}

/// Location of one record inside an archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Compressed position of the record's first token
    pub offset: StreamPos,
    /// Decoded length, terminator excluded
    pub length: usize,
}

/// A compressed stream plus the table of records it holds
#[derive(Clone, Debug)]
pub struct Archive {
    pub config: CodecConfig,
    pub data: Vec<u8>,
    pub entries: Vec<Entry>,
}

impl Archive {
    /// Look up an entry by record name
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Decode a single record without touching the rest of the archive
    pub fn read(&self, entry: &Entry) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(entry.length);
        decode_range(&self.config, &self.data, entry.offset, Some(entry.length), |c| {
            out.push(c);
            Ok(())
        })?;
        Ok(out)
    }
}

impl Encoder {
    /// Compress records into one stream, keeping each directly addressable
    pub fn encode_records(&self, records: &[Record], options: &RecordOptions) -> Result<Archive> {
        let groups = group_records(records, options.dedup);

        let mut joined = Vec::with_capacity(records.iter().map(|r| r.data.len() + 1).sum());
        let mut starts = Vec::with_capacity(groups.len());
        for (payload, _) in &groups {
            starts.push(joined.len());
            joined.extend_from_slice(payload);
            if let Some(terminator) = options.terminator {
                joined.push(terminator);
            }
        }

        let encoded = self.encode_anchored(&joined, &starts)?;

        let mut entries = Vec::with_capacity(records.len());
        for ((payload, names), &start) in groups.iter().zip(&starts) {
            let offset = if start < joined.len() {
                StreamPos::new(encoded.emitted[start])
            } else {
                StreamPos::new(encoded.data.len())
            };
            for name in names {
                entries.push(Entry { name: (*name).to_string(), offset, length: payload.len() });
            }
        }

        tracing::debug!(
            records = records.len(),
            stored = groups.len(),
            input_bytes = joined.len(),
            output_bytes = encoded.data.len(),
            "encoded record archive"
        );
        Ok(Archive { config: self.config, data: encoded.data, entries })
    }
}

/// Split text into lines, one record per line
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A final line break does not
/// start an extra empty line.
pub fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    while let Some(found) = memchr::memchr2(b'\n', b'\r', &data[start..]) {
        let end = start + found;
        lines.push(&data[start..end]);
        start = if data[end] == b'\r' && data.get(end + 1) == Some(&b'\n') {
            end + 2
        } else {
            end + 1
        };
    }
    if start < data.len() {
        lines.push(&data[start..]);
    }
    lines
}

/// Payloads in storage order, each with the names that share it
fn group_records(records: &[Record], dedup: bool) -> Vec<(&[u8], Vec<&str>)> {
    if !dedup {
        return records.iter().map(|r| (r.data.as_slice(), vec![r.name.as_str()])).collect();
    }
    let mut unique: BTreeMap<&[u8], Vec<&str>> = BTreeMap::new();
    for record in records {
        unique.entry(record.data.as_slice()).or_default().push(record.name.as_str());
    }
    unique.into_iter().collect()
}
