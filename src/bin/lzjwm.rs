use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgGroup, Parser, ValueEnum};
use lzjwm::format::config::{DEFAULT_COUNT_BITS, DEFAULT_ZERO_BITS};
use lzjwm::{
    decode, decode_range, decode_terminated, read_records, savings, split_lines, stream_stats,
    until_nul, write_c_header, write_yaml, CodecConfig, Dump, Encoder, Record, RecordOptions,
    StreamPos,
};
use tracing_subscriber::EnvFilter;

/// Output format when compressing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Compressed bytes only
    Raw,
    /// C header with offset/length defines and a string literal
    C,
    /// C header with the data placed in AVR program memory
    CAvr,
    /// YAML document with the compressed bytes and the entry table
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "lzjwm")]
#[command(about = "Compress and decompress 7-bit data with random-access backreferences")]
#[command(version)]
#[command(group(ArgGroup::new("mode").args(["compress", "decompress", "stream", "dump", "params"])))]
struct Args {
    /// Compress input
    #[arg(short, long)]
    compress: bool,

    /// Decompress input through an output buffer (default mode)
    #[arg(short, long)]
    decompress: bool,

    /// Decompress input with the buffer-free streaming decoder
    #[arg(short = 'S', long)]
    stream: bool,

    /// Print the compressed input in human-readable form
    #[arg(short = 'x', long)]
    dump: bool,

    /// Print the codec parameters and exit
    #[arg(short, long)]
    params: bool,

    /// Input file (use - for stdin); may be repeated
    #[arg(short, long)]
    input: Vec<PathBuf>,

    /// More input files; each becomes a record named after its file
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Bits of a match token given to the count field
    #[arg(long, default_value_t = DEFAULT_COUNT_BITS)]
    count_bits: u8,

    /// Offset bits borrowed for long offset-0 matches (0 disables)
    #[arg(long, default_value_t = DEFAULT_ZERO_BITS)]
    zero_bits: u8,

    /// Never fold NUL into a match, so it stays visible in compressed data
    #[arg(short = 'z', long)]
    keep_nul: bool,

    /// Treat each input line as its own record
    #[arg(short, long)]
    lines: bool,

    /// Inputs are YAML lists of {name, data} records
    #[arg(short = 'y', long)]
    yaml_input: bool,

    /// Append a NUL terminator to each record
    #[arg(long)]
    terminate: bool,

    /// Store identical records once
    #[arg(short = 's', long)]
    dedup: bool,

    /// Output format when compressing
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Raw)]
    format: OutputFormat,

    /// Stop at the first NUL (when streaming: the first NUL character read
    /// from the start position)
    #[arg(long)]
    nul_terminated: bool,

    /// Compressed position to start streaming from
    #[arg(long, requires = "stream")]
    start: Option<usize>,

    /// Maximum number of characters to stream
    #[arg(long, requires = "stream")]
    count: Option<usize>,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = CodecConfig::new(args.count_bits, args.zero_bits)?;

    if args.params {
        print_params(&config);
        return Ok(());
    }

    let inputs = input_paths(args);
    let mut output = open_output(&args.output)?;

    if args.compress {
        compress(args, &config, &inputs, &mut output)?;
    } else {
        let input = read_concatenated(&inputs)?;
        if args.stream {
            let start = StreamPos::new(args.start.unwrap_or(0));
            let sink = |c: u8| output.write_all(&[c]);
            // The terminator is searched from `start`, so later records stay reachable
            let emitted = if args.nul_terminated {
                decode_terminated(&config, &input, start, args.count, sink)?
            } else {
                decode_range(&config, &input, start, args.count, sink)?
            };
            tracing::debug!(emitted, "streamed characters");
            output.flush()?;
            return Ok(());
        }

        let data = if args.nul_terminated { until_nul(&input) } else { &input[..] };
        if args.dump {
            write!(output, "{}", Dump::new(&config, data))?;
        } else {
            let decoded = decode(&config, data)?;
            output.write_all(&decoded)?;
        }

        if args.verbose {
            let stats = stream_stats(&config, data);
            eprintln!("Decompression:");
            eprintln!("  Tokens:           {}", stats.tokens);
            eprintln!("  Literals:         {}", stats.literals);
            eprintln!("  Matches:          {}", stats.matches);
            eprintln!("  Decoded bytes:    {}", stats.decoded_bytes);
            eprintln!("  Savings:          {:.2}%", stats.savings() * 100.0);
        }
    }

    output.flush()?;
    Ok(())
}

fn compress(
    args: &Args,
    config: &CodecConfig,
    inputs: &[PathBuf],
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut encoder = Encoder::new(*config);
    if args.keep_nul {
        encoder = encoder.keep_literal(0);
    }

    let uses_records = args.lines
        || args.terminate
        || args.dedup
        || args.yaml_input
        || inputs.len() > 1
        || args.format != OutputFormat::Raw;

    let (input_len, compressed_len) = if uses_records {
        let records = build_records(args, inputs)?;
        let input_len: usize = records.iter().map(|r| r.data.len()).sum();
        let options =
            RecordOptions { terminator: args.terminate.then_some(0), dedup: args.dedup };
        let archive = encoder.encode_records(&records, &options)?;
        match args.format {
            OutputFormat::Raw => output.write_all(&archive.data)?,
            OutputFormat::C => write_c_header(&mut *output, &archive, false)?,
            OutputFormat::CAvr => write_c_header(&mut *output, &archive, true)?,
            OutputFormat::Yaml => write_yaml(&mut *output, &archive)?,
        }
        (input_len, archive.data.len())
    } else {
        let input = read_concatenated(inputs)?;
        let compressed = encoder.encode(&input)?;
        output.write_all(&compressed)?;
        (input.len(), compressed.len())
    };

    if args.verbose {
        let saved = savings(input_len, compressed_len) * 100.0;
        eprintln!("compressing: {} -> {} ({:.2}%)", input_len, compressed_len, saved);
    }
    Ok(())
}

/// Collect records: YAML record lists, one per line, or one per input file
fn build_records(args: &Args, inputs: &[PathBuf]) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    if args.yaml_input {
        let mut records = Vec::new();
        for path in inputs {
            records.extend(read_records(read_input(path)?.as_slice())?);
        }
        return Ok(records);
    }

    if args.lines {
        let input = read_concatenated(inputs)?;
        return Ok(split_lines(&input)
            .into_iter()
            .enumerate()
            .map(|(i, line)| Record::new(i.to_string(), line))
            .collect());
    }

    let records = inputs
        .iter()
        .map(|path| -> io::Result<Record> { Ok(Record::new(record_name(path), read_input(path)?)) })
        .collect::<io::Result<Vec<_>>>()?;
    Ok(records)
}

/// `-i` paths followed by positional files; stdin when none are given
fn input_paths(args: &Args) -> Vec<PathBuf> {
    let paths: Vec<PathBuf> = args.input.iter().chain(&args.files).cloned().collect();
    if paths.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        paths
    }
}

fn record_name(path: &Path) -> String {
    if path.to_str() == Some("-") {
        return "stdin".to_string();
    }
    path.file_name().and_then(|s| s.to_str()).unwrap_or("data").to_string()
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if path.to_str() == Some("-") {
        io::stdin().lock().read_to_end(&mut buf)?;
    } else {
        File::open(path)?.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn read_concatenated(paths: &[PathBuf]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    for path in paths {
        buf.extend(read_input(path)?);
    }
    Ok(buf)
}

fn open_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if path.to_str() == Some("-") {
        Ok(Box::new(BufWriter::new(io::stdout().lock())))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

fn print_params(config: &CodecConfig) {
    let params = [
        ("COUNT_BITS", config.count_bits() as usize),
        ("MAX_MATCH", config.max_match()),
        ("MAX_ZERO_MATCH", config.max_zero_match()),
        ("LOOKBACK", config.lookback()),
        ("ZERO_BITS", config.zero_bits() as usize),
    ];
    for (name, value) in params {
        println!("{:<16} = {}", name, value);
    }
}
