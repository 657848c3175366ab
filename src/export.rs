//! C header rendering of record archives.
//!
//! The header defines `OFFSET_<NAME>` and `LENGTH_<NAME>` for every entry and
//! embeds the compressed bytes as a string literal, ready to be decoded in
//! place by a streaming decoder on the target.

use std::collections::HashSet;
use std::io::Write;

use crate::encoder::Archive;
use crate::error::{Error, Result};

/// Name of the embedded data array
pub const DATA_SYMBOL: &str = "lzjwm_data";

/// Include guard of the generated header
pub const INCLUDE_GUARD: &str = "LZJWM_DATA_H";

/// Characters per string literal line, before escaping overshoot
const LINE_WIDTH: usize = 80;

/// Upper-case a record name, replacing anything outside `[A-Za-z0-9_]`
pub fn c_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

/// Escape one byte for use inside a C string literal
fn escape_byte(byte: u8, out: &mut String) {
    match byte {
        0x07 => out.push_str("\\a"),
        0x08 => out.push_str("\\b"),
        0x0c => out.push_str("\\f"),
        b'\n' => out.push_str("\\n"),
        b'\r' => out.push_str("\\r"),
        b'\t' => out.push_str("\\t"),
        0x0b => out.push_str("\\v"),
        b'\\' => out.push_str("\\\\"),
        b'"' => out.push_str("\\\""),
        0x20..=0x7e => out.push(char::from(byte)),
        // Always three digits so a following digit is not absorbed
        _ => out.push_str(&format!("\\{:03o}", byte)),
    }
}

/// Split data into escaped string literal bodies of about `LINE_WIDTH` chars
fn literal_lines(data: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for &byte in data {
        escape_byte(byte, &mut line);
        if line.len() >= LINE_WIDTH {
            lines.push(std::mem::take(&mut line));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Write an archive as a C header
///
/// `progmem` tags the array with `PROGMEM` so AVR targets keep it in flash.
pub fn write_c_header<W: Write>(mut out: W, archive: &Archive, progmem: bool) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in &archive.entries {
        if !seen.insert(c_identifier(&entry.name)) {
            return Err(Error::DuplicateIdentifier(entry.name.clone()));
        }
    }

    writeln!(out, "#ifndef {INCLUDE_GUARD}")?;
    writeln!(out, "#define {INCLUDE_GUARD}")?;
    writeln!(out)?;

    for entry in &archive.entries {
        let ident = c_identifier(&entry.name);
        writeln!(out, "#define OFFSET_{} {}", ident, entry.offset.get())?;
        writeln!(out, "#define LENGTH_{} {}", ident, entry.length)?;
        writeln!(out)?;
    }

    let attribute = if progmem { " PROGMEM" } else { "" };
    let lines = literal_lines(&archive.data);
    if lines.is_empty() {
        writeln!(out, "static const char {DATA_SYMBOL}[]{attribute} = \"\";")?;
    } else {
        writeln!(out, "static const char {DATA_SYMBOL}[]{attribute} =")?;
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            let end = if i == last { ";" } else { "" };
            writeln!(out, "    \"{line}\"{end}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "#endif")?;
    out.flush()?;
    Ok(())
}
