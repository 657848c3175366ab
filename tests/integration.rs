//! End-to-end integration tests for lzjwm.
//!
//! Exercises encoder, both decoders, the size calculator and the dump printer
//! against each other on synthetic data.

use std::path::Path;
use std::process::Command;

use lzjwm::{
    decode, decode_into, decode_range, decode_stream, decompressed_size, dump, encode, until_nul,
    ArchiveDocument, CodecConfig, Encoder, Error, Record, RecordOptions, StreamDecoder, StreamPos,
    Token,
};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Generate random 7-bit data using a simple PRNG
fn generate_random_ascii(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        // Simple xorshift PRNG
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0x7F) as u8);
    }
    data
}

/// Generate random text over a small alphabet (many short repeats)
fn generate_small_alphabet(size: usize, seed: u64) -> Vec<u8> {
    generate_random_ascii(size, seed).into_iter().map(|b| b"acgt"[(b & 3) as usize]).collect()
}

/// Generate highly repetitive data (good compression)
fn generate_repetitive_data(size: usize) -> Vec<u8> {
    let pattern = b"AAAAAAAAAAAAAAAA";
    pattern.iter().cycle().take(size).copied().collect()
}

/// Generate English-like prose with recurring words
fn generate_prose(size: usize) -> Vec<u8> {
    let words: [&[u8]; 8] =
        [b"the ", b"quick ", b"brown ", b"fox ", b"jumps ", b"over ", b"lazy ", b"dog. "];
    let mut data = Vec::with_capacity(size);
    let mut i = 0usize;
    while data.len() < size {
        data.extend_from_slice(words[(i * 5 + i / 3) % words.len()]);
        i += 1;
    }
    data.truncate(size);
    data
}

/// All configurations the format allows
fn all_configs() -> Vec<CodecConfig> {
    let mut configs = Vec::new();
    for count_bits in 0..=6u8 {
        for zero_bits in 0..(7 - count_bits) {
            configs.push(CodecConfig::new(count_bits, zero_bits).unwrap());
        }
    }
    configs
}

fn sample_inputs() -> Vec<Vec<u8>> {
    vec![
        Vec::new(),
        b"a".to_vec(),
        b"aaaaaaaa".to_vec(),
        b"abcabcabc".to_vec(),
        generate_random_ascii(2_000, 12345),
        generate_small_alphabet(2_000, 999),
        generate_repetitive_data(1_000),
        generate_prose(3_000),
    ]
}

/// Decode through the streaming decoder into a vector
fn stream_decode(config: &CodecConfig, data: &[u8], limit: Option<usize>) -> Vec<u8> {
    let mut out = Vec::new();
    decode_stream(config, data, limit, |c| {
        out.push(c);
        Ok(())
    })
    .unwrap();
    out
}

// ============================================================================
// Round Trip Properties
// ============================================================================

#[test]
fn test_round_trip_default_config() {
    let config = CodecConfig::default();
    for input in sample_inputs() {
        let encoded = encode(&input).unwrap();
        assert_eq!(decode(&config, &encoded).unwrap(), input);
    }
}

#[test]
fn test_round_trip_all_configs() {
    for config in all_configs() {
        let encoder = Encoder::new(config);
        for input in sample_inputs() {
            let encoded = encoder.encode(&input).unwrap();
            assert_eq!(decode(&config, &encoded).unwrap(), input, "config {:?}", config);
            assert_eq!(stream_decode(&config, &encoded, None), input, "config {:?}", config);
        }
    }
}

#[test]
fn test_never_expands() {
    for config in all_configs() {
        for input in sample_inputs() {
            let encoded = Encoder::new(config).encode(&input).unwrap();
            assert!(encoded.len() <= input.len());
        }
    }
}

#[test]
fn test_compresses_repetitive_data() {
    let input = generate_repetitive_data(10_000);
    let encoded = encode(&input).unwrap();
    assert!(encoded.len() < input.len() / 3);

    let prose = generate_prose(10_000);
    assert!(encode(&prose).unwrap().len() < prose.len());
}

#[test]
fn test_rejects_high_bit_input() {
    let mut input = generate_prose(100);
    input[57] = 0x80;
    assert!(matches!(encode(&input), Err(Error::InvalidInput { position: 57, byte: 0x80 })));
    assert!(matches!(encode(&[0xff]), Err(Error::InvalidInput { position: 0, .. })));
}

#[test]
fn test_size_agreement() {
    for config in all_configs() {
        for input in sample_inputs() {
            let encoded = Encoder::new(config).encode(&input).unwrap();
            assert_eq!(decompressed_size(&config, &encoded), input.len());
        }
    }
}

// ============================================================================
// Decoder Agreement
// ============================================================================

#[test]
fn test_decoders_agree() {
    let config = CodecConfig::default();
    for input in sample_inputs() {
        let encoded = encode(&input).unwrap();
        assert_eq!(stream_decode(&config, &encoded, None), decode(&config, &encoded).unwrap());
    }
}

#[test]
fn test_bounded_streaming_prefixes() {
    let config = CodecConfig::default();
    let input = generate_prose(300);
    let encoded = encode(&input).unwrap();
    for k in 0..=input.len() {
        assert_eq!(stream_decode(&config, &encoded, Some(k)), &input[..k]);
    }
}

#[test]
fn test_streaming_with_zero_extension() {
    let config = CodecConfig::new(2, 2).unwrap();
    let input = generate_repetitive_data(500);
    let encoded = Encoder::new(config).encode(&input).unwrap();
    for k in [0, 1, 17, 18, 250, 500] {
        assert_eq!(stream_decode(&config, &encoded, Some(k)), &input[..k]);
    }
}

#[test]
fn test_stream_decoder_depth_stays_bounded() {
    for config in all_configs() {
        let input = generate_small_alphabet(3_000, 7);
        let encoded = Encoder::new(config).encode(&input).unwrap();
        let mut decoder = StreamDecoder::new(&config, &encoded);
        let decoded: Vec<u8> = decoder.by_ref().collect::<lzjwm::Result<_>>().unwrap();
        assert_eq!(decoded, input);
        assert!(decoder.peak_depth() <= config.max_zero_match());
    }
}

#[test]
fn test_decode_into_exact_buffer() {
    let config = CodecConfig::default();
    let input = generate_prose(1_000);
    let encoded = encode(&input).unwrap();
    let mut out = vec![0u8; decompressed_size(&config, &encoded)];
    assert_eq!(decode_into(&config, &encoded, &mut out).unwrap(), input.len());
    assert_eq!(out, input);
}

#[test]
fn test_nul_terminated_stream() {
    let config = CodecConfig::default();
    let input = generate_prose(200);
    let mut encoded = encode(&input).unwrap();
    encoded.push(0);
    encoded.extend_from_slice(b"trailing garbage");

    let stream = until_nul(&encoded);
    assert_eq!(decompressed_size(&config, stream), input.len());
    assert_eq!(decode(&config, stream).unwrap(), input);
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn test_scenario_single_char_run() {
    let config = CodecConfig::default();
    let encoded = encode(b"aaaaaaaa").unwrap();
    assert_eq!(config.decode(encoded[0]), Token::Literal(b'a'));
    let rest: usize = encoded[1..]
        .iter()
        .map(|&b| match config.decode(b) {
            Token::Match { count, .. } => count,
            Token::Literal(c) => panic!("unexpected literal {}", c),
        })
        .sum();
    assert_eq!(rest, 7);
    assert_eq!(decode(&config, &encoded).unwrap(), b"aaaaaaaa");
}

#[test]
fn test_scenario_repeated_word() {
    let config = CodecConfig::default();
    let encoded = encode(b"abcabcabc").unwrap();
    assert!(encoded.len() < 9);
    assert!(encoded[3..].iter().any(|&b| matches!(config.decode(b), Token::Match { .. })));
    assert_eq!(decode(&config, &encoded).unwrap(), b"abcabcabc");
}

#[test]
fn test_scenario_empty() {
    let config = CodecConfig::default();
    assert!(encode(b"").unwrap().is_empty());
    assert_eq!(decompressed_size(&config, b""), 0);
    assert_eq!(stream_decode(&config, b"", None), Vec::<u8>::new());
}

#[test]
fn test_scenario_run_longer_than_max_match() {
    let config = CodecConfig::default();
    let encoded = encode(&[b'a'; 20]).unwrap();
    let counts: Vec<usize> = encoded
        .iter()
        .filter_map(|&b| match config.decode(b) {
            Token::Match { count, .. } => Some(count),
            Token::Literal(_) => None,
        })
        .collect();
    assert!(counts.len() > 1);
    assert!(counts.iter().all(|&c| c <= config.max_match()));
    assert_eq!(decode(&config, &encoded).unwrap(), vec![b'a'; 20]);
}

#[test]
fn test_dump_is_pure() {
    let config = CodecConfig::default();
    let encoded = encode(&generate_prose(500)).unwrap();
    let copy = encoded.clone();
    let first = dump(&config, &encoded);
    assert_eq!(first, dump(&config, &encoded));
    assert_eq!(encoded, copy);
    assert!(first.contains('('));
}

// ============================================================================
// Corrupt Input
// ============================================================================

#[test]
fn test_corrupt_streams_fail_closed() {
    let config = CodecConfig::default();
    for seed in 0..50u64 {
        let garbage: Vec<u8> = generate_random_ascii(64, seed + 1)
            .into_iter()
            .enumerate()
            .map(|(i, b)| if i % 3 == 0 { b | 0x80 } else { b })
            .collect();
        // Either decodes or reports corruption; both decoders must agree
        let buffered = decode(&config, &garbage);
        let mut streamed = Vec::new();
        let stream_result = decode_stream(&config, &garbage, None, |c| {
            streamed.push(c);
            Ok(())
        });
        match (buffered, stream_result) {
            (Ok(out), Ok(_)) => assert_eq!(out, streamed),
            (Err(Error::CorruptStream { .. }), Err(Error::CorruptStream { .. })) => {}
            (a, b) => panic!("decoders disagree: {:?} vs {:?}", a.map(|v| v.len()), b),
        }
    }
}

// ============================================================================
// Record Archives
// ============================================================================

#[test]
fn test_archive_random_access() {
    let config = CodecConfig::default();
    let records: Vec<Record> = generate_prose(2_000)
        .chunks(37)
        .enumerate()
        .map(|(i, chunk)| Record::new(format!("r{}", i), chunk))
        .collect();
    let options = RecordOptions { terminator: Some(0), dedup: false };
    let archive = Encoder::new(config).keep_literal(0).encode_records(&records, &options).unwrap();

    for (record, entry) in records.iter().zip(&archive.entries) {
        let mut out = Vec::new();
        decode_range(&config, &archive.data, entry.offset, Some(entry.length), |c| {
            out.push(c);
            Ok(())
        })
        .unwrap();
        assert_eq!(out, record.data);

        // Reading one character further yields the terminator
        let mut with_nul = Vec::new();
        decode_range(&config, &archive.data, entry.offset, Some(entry.length + 1), |c| {
            with_nul.push(c);
            Ok(())
        })
        .unwrap();
        assert_eq!(with_nul.last(), Some(&0));
    }
}

// ============================================================================
// Binary CLI Tests
// ============================================================================

fn run_cli(args: &[&str], input: &Path, output: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_lzjwm"))
        .args(args)
        .arg("-i")
        .arg(input)
        .arg("-o")
        .arg(output)
        .output()
        .expect("Failed to run CLI")
}

#[test]
fn test_cli_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let packed = dir.path().join("plain.lzjwm");
    let unpacked = dir.path().join("unpacked.txt");
    let streamed = dir.path().join("streamed.txt");

    let data = generate_prose(5_000);
    std::fs::write(&plain, &data).unwrap();

    assert!(run_cli(&["-c"], &plain, &packed).status.success());
    assert!(run_cli(&["-d"], &packed, &unpacked).status.success());
    assert!(run_cli(&["-S"], &packed, &streamed).status.success());

    assert!(std::fs::metadata(&packed).unwrap().len() < data.len() as u64);
    assert_eq!(std::fs::read(&unpacked).unwrap(), data);
    assert_eq!(std::fs::read(&streamed).unwrap(), data);
}

#[test]
fn test_cli_rejects_binary_input() {
    let dir = tempfile::tempdir().unwrap();
    let binary = dir.path().join("binary.bin");
    let packed = dir.path().join("binary.lzjwm");
    std::fs::write(&binary, [0x00, 0x9f, 0xff]).unwrap();

    let output = run_cli(&["-c"], &binary, &packed);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not 7-bit clean"));
}

#[test]
fn test_cli_dump_and_params() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("packed.lzjwm");
    let dumped = dir.path().join("dump.txt");
    std::fs::write(&packed, encode(b"abcabcabc").unwrap()).unwrap();

    assert!(run_cli(&["-x"], &packed, &dumped).status.success());
    assert_eq!(std::fs::read_to_string(&dumped).unwrap(), "abc(2,5)c");

    let output = Command::new(env!("CARGO_BIN_EXE_lzjwm")).arg("-p").output().unwrap();
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("LOOKBACK         = 32"));
    assert!(text.contains("MAX_MATCH        = 5"));
}

#[test]
fn test_cli_c_header() {
    let dir = tempfile::tempdir().unwrap();
    let lines = dir.path().join("strings.txt");
    let header = dir.path().join("strings.h");
    std::fs::write(&lines, "hello there\nhello again\nbye\n").unwrap();

    let output = run_cli(&["-c", "--lines", "--terminate", "-z", "-f", "c"], &lines, &header);
    assert!(output.status.success());

    let text = std::fs::read_to_string(&header).unwrap();
    assert!(text.contains("#define OFFSET_0 0"));
    assert!(text.contains("#define LENGTH_1 11"));
    assert!(text.contains("#define LENGTH_2 3"));
    assert!(text.contains("static const char lzjwm_data[] ="));
}

/// Parse `#define <name> <value>` from a generated header
fn header_define(header: &str, name: &str) -> usize {
    let prefix = format!("#define {} ", name);
    header
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_else(|| panic!("{} missing from header", name))
}

#[test]
fn test_cli_nul_terminated_record_by_offset() {
    let dir = tempfile::tempdir().unwrap();
    let lines = dir.path().join("strings.txt");
    let packed = dir.path().join("strings.lzjwm");
    let header = dir.path().join("strings.h");
    let record = dir.path().join("record.txt");
    std::fs::write(&lines, "hello world\nworld peace\nthird line\n").unwrap();

    let flags = ["-c", "--lines", "--terminate", "-z"];
    assert!(run_cli(&flags, &lines, &packed).status.success());
    let header_flags = ["-c", "--lines", "--terminate", "-z", "-f", "c"];
    assert!(run_cli(&header_flags, &lines, &header).status.success());

    let text = std::fs::read_to_string(&header).unwrap();
    for (i, expected) in ["hello world", "world peace", "third line"].iter().enumerate() {
        let offset = header_define(&text, &format!("OFFSET_{}", i)).to_string();
        let output = run_cli(&["-S", "--start", &offset, "--nul-terminated"], &packed, &record);
        assert!(output.status.success());
        assert_eq!(std::fs::read_to_string(&record).unwrap(), *expected, "record {}", i);
    }
}

#[test]
fn test_cli_stream_start_and_count() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("packed.lzjwm");
    let part = dir.path().join("part.txt");

    let records = vec![Record::new("a", "alpha beta gamma"), Record::new("b", "beta gamma delta")];
    let archive = Encoder::default().encode_records(&records, &RecordOptions::default()).unwrap();
    std::fs::write(&packed, &archive.data).unwrap();

    let start = archive.entry("b").unwrap().offset.get().to_string();
    let output = run_cli(&["-S", "--start", &start, "--count", "10"], &packed, &part);
    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(&part).unwrap(), "beta gamma");
}

#[test]
fn test_cli_multiple_files_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    let table = dir.path().join("table.yaml");
    std::fs::write(&first, "the first file, the first file").unwrap();
    std::fs::write(&second, "the second file").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_lzjwm"))
        .args(["-c", "-f", "yaml", "-o"])
        .arg(&table)
        .arg(&first)
        .arg(&second)
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: ArchiveDocument =
        serde_yaml::from_str(&std::fs::read_to_string(&table).unwrap()).unwrap();
    assert_eq!(doc.compressed_length, doc.raw.len());
    let names: Vec<&str> = doc.parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["first.txt", "second.txt"]);

    let config = CodecConfig::default();
    for (part, path) in doc.parts.iter().zip([&first, &second]) {
        let mut out = Vec::new();
        decode_range(
            &config,
            &doc.raw,
            StreamPos::new(part.compressed_offset),
            Some(part.length),
            |c| {
                out.push(c);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(out, std::fs::read(path).unwrap());
    }
}

#[test]
fn test_cli_yaml_records_to_header() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("records.yaml");
    let header = dir.path().join("records.h");
    std::fs::write(&list, "- name: title\n  data: Main menu\n- name: quit\n  data: Quit game\n")
        .unwrap();

    let output = run_cli(&["-c", "-y", "-f", "c"], &list, &header);
    assert!(output.status.success());

    let text = std::fs::read_to_string(&header).unwrap();
    assert_eq!(header_define(&text, "OFFSET_TITLE"), 0);
    assert_eq!(header_define(&text, "LENGTH_TITLE"), 9);
    assert_eq!(header_define(&text, "LENGTH_QUIT"), 9);
}
