//! Compress command implementation.

use oxiflate_deflate::config::{DeflateConfig, Format, Strategy};
use oxiflate_deflate::deflate::Deflater;
use oxiflate_deflate::gzip::GzipHeader;
use oxiflate_deflate::write::DeflateEncoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, UNIX_EPOCH};
use tracing::{debug, info};

/// JSON summary of a compression run.
#[derive(Debug, Serialize)]
struct CompressJson {
    input: String,
    output: String,
    format: String,
    level: u8,
    strategy: String,
    input_size: u64,
    output_size: u64,
    ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    dictionary: Option<String>,
    elapsed_ms: u128,
}

/// Options for the compress command.
pub struct CompressOptions<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub format: Format,
    pub level: u8,
    pub window_bits: u8,
    pub mem_level: u8,
    pub strategy: Strategy,
    pub dictionary: Option<&'a Path>,
    pub chunk_size: usize,
    pub json: bool,
}

fn default_output(input: &Path, format: Format) -> PathBuf {
    let extension = match format {
        Format::Raw => "deflate",
        Format::Zlib => "zz",
        Format::Gzip => "gz",
    };
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Header recording the input's name and modification time.
fn gzip_header_for(input: &Path) -> GzipHeader {
    let mut header = GzipHeader::new();
    if let Some(name) = input.file_name() {
        header = header.name(name.to_string_lossy().into_owned());
    }
    let mtime = fs::metadata(input)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as u32);
    if let Some(mtime) = mtime {
        header = header.mtime(mtime);
    }
    header
}

pub fn cmd_compress(options: &CompressOptions) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let output_path = options
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(options.input, options.format));

    let config = DeflateConfig::new()
        .level(options.level)
        .window_bits(options.window_bits)
        .mem_level(options.mem_level)
        .strategy(options.strategy)
        .format(options.format);
    let mut deflater = Deflater::new(config)?;

    if let Some(dict_path) = options.dictionary {
        let dictionary = fs::read(dict_path)?;
        debug!(path = %dict_path.display(), len = dictionary.len(), "loaded dictionary");
        deflater.set_dictionary(&dictionary)?;
    }
    if options.format == Format::Gzip {
        deflater.set_gzip_header(gzip_header_for(options.input))?;
    }

    let mut reader = File::open(options.input)?;
    let writer = BufWriter::new(File::create(&output_path)?);
    let chunk_size = options.chunk_size.max(1);
    let mut encoder = DeflateEncoder::with_chunk_size(writer, deflater, chunk_size);

    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        encoder.write_all(&buf[..n])?;
    }

    let input_size = encoder.deflater().total_in();
    let mut writer = encoder.finish()?;
    writer.flush()?;
    drop(writer);

    let output_size = fs::metadata(&output_path)?.len();
    let ratio = if input_size == 0 {
        0.0
    } else {
        output_size as f64 / input_size as f64
    };
    info!(input_size, output_size, "compressed {}", options.input.display());

    if options.json {
        let summary = CompressJson {
            input: options.input.display().to_string(),
            output: output_path.display().to_string(),
            format: format!("{:?}", options.format).to_lowercase(),
            level: options.level,
            strategy: format!("{:?}", options.strategy).to_lowercase(),
            input_size,
            output_size,
            ratio,
            dictionary: options.dictionary.map(|p| p.display().to_string()),
            elapsed_ms: started.elapsed().as_millis(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} -> {}: {} -> {} bytes ({:.1}%)",
            options.input.display(),
            output_path.display(),
            input_size,
            output_size,
            ratio * 100.0
        );
    }

    Ok(())
}
