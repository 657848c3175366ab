//! YAML views of record archives.
//!
//! An archive is written as a document with the compressed bytes, their
//! length and one part per record name:
//!
//! ```yaml
//! raw:
//! - 104
//! - 105
//! - 0
//! compressed_length: 3
//! parts:
//! - name: greeting
//!   compressed_offset: 0
//!   length: 2
//! ```
//!
//! Record lists are read from a sequence of `{name, data}` mappings.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::encoder::{Archive, Record};
use crate::error::Result;

/// Machine-readable entry table of an archive
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    pub raw: Vec<u8>,
    pub compressed_length: usize,
    pub parts: Vec<Part>,
}

/// One named entry point
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub compressed_offset: usize,
    pub length: usize,
}

impl From<&Archive> for ArchiveDocument {
    fn from(archive: &Archive) -> Self {
        let parts = archive
            .entries
            .iter()
            .map(|e| Part { name: e.name.clone(), compressed_offset: e.offset.get(), length: e.length })
            .collect();
        Self { raw: archive.data.clone(), compressed_length: archive.data.len(), parts }
    }
}

/// Write an archive as a YAML document
pub fn write_yaml<W: Write>(mut out: W, archive: &Archive) -> Result<()> {
    serde_yaml::to_writer(&mut out, &ArchiveDocument::from(archive))?;
    out.flush()?;
    Ok(())
}

/// Names may be written as plain numbers, e.g. line indices
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordName {
    Text(String),
    Number(i64),
}

#[derive(Deserialize)]
struct RecordSpec {
    name: RecordName,
    #[serde(default)]
    data: String,
}

/// Read a YAML sequence of `{name, data}` records
///
/// A missing `data` key is an empty record.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let specs: Vec<RecordSpec> = serde_yaml::from_reader(reader)?;
    Ok(specs
        .into_iter()
        .map(|spec| {
            let name = match spec.name {
                RecordName::Text(name) => name,
                RecordName::Number(n) => n.to_string(),
            };
            Record::new(name, spec.data)
        })
        .collect())
}
