//! OxiFlate CLI - streaming DEFLATE, zlib and gzip compression
//!
//! A command-line front end for the Pure Rust OxiFlate compressor.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{BoundOptions, CompressOptions, cmd_bound, cmd_compress};
use oxiflate_deflate::config::{Format, Strategy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oxiflate")]
#[command(author, version, about = "Pure Rust DEFLATE compressor")]
#[command(long_about = "
OxiFlate compresses files as raw DEFLATE (RFC 1951), zlib (RFC 1950)
or gzip (RFC 1952) streams.

Examples:
  oxiflate compress notes.txt
  oxiflate compress notes.txt -f gzip -l 9 -o notes.txt.gz
  oxiflate compress data.bin -f raw --strategy filtered --json
  oxiflate compress page.html --dict common.html
  oxiflate bound 1048576 -f gzip
")]
struct Cli {
    /// Log engine decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (input name plus the format's extension if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stream wrapping
        #[arg(short, long, value_enum, default_value = "zlib")]
        format: FormatArg,

        /// Compression level, 0 (store) to 9 (best)
        #[arg(short, long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(0..=9))]
        level: u8,

        /// Base-two logarithm of the window size
        #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u8).range(9..=15))]
        window_bits: u8,

        /// Memory level, trading memory for speed and ratio
        #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(1..=9))]
        mem_level: u8,

        /// Match-finding strategy
        #[arg(long, value_enum, default_value = "default")]
        strategy: StrategyArg,

        /// Preset dictionary file (raw and zlib only)
        #[arg(long)]
        dict: Option<PathBuf>,

        /// Bytes read and written per step
        #[arg(long, default_value_t = 64 * 1024)]
        chunk_size: usize,

        /// Print the summary as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Print the worst-case compressed size of an input length
    Bound {
        /// Uncompressed length in bytes
        len: usize,

        /// Stream wrapping
        #[arg(short, long, value_enum, default_value = "zlib")]
        format: FormatArg,

        /// Compression level
        #[arg(short, long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(0..=9))]
        level: u8,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

/// Stream wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Bare DEFLATE data
    Raw,
    /// zlib header and Adler-32 trailer
    Zlib,
    /// gzip header and CRC-32 trailer
    Gzip,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Raw => Format::Raw,
            FormatArg::Zlib => Format::Zlib,
            FormatArg::Gzip => Format::Gzip,
        }
    }
}

/// Match-finding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Normal LZ77 matching
    Default,
    /// Prefer literals over short matches
    Filtered,
    /// No string matching at all
    HuffmanOnly,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Default => Strategy::Default,
            StrategyArg::Filtered => Strategy::Filtered,
            StrategyArg::HuffmanOnly => Strategy::HuffmanOnly,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            format,
            level,
            window_bits,
            mem_level,
            strategy,
            dict,
            chunk_size,
            json,
        } => cmd_compress(&CompressOptions {
            input: &input,
            output: output.as_deref(),
            format: format.into(),
            level,
            window_bits,
            mem_level,
            strategy: strategy.into(),
            dictionary: dict.as_deref(),
            chunk_size,
            json,
        }),
        Commands::Bound {
            len,
            format,
            level,
            json,
        } => cmd_bound(&BoundOptions {
            len,
            format: format.into(),
            level,
            json,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
