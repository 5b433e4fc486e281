//! One-shot compression helpers.
//!
//! These wrap a [`Deflater`] for the common case of compressing a whole
//! buffer at once. The output buffer is sized from [`Deflater::bound`], so
//! a single engine call normally completes the stream.
//!
//! # zlib format
//!
//! ```text
//! +---+---+============+---+---+---+---+
//! |CMF|FLG| compressed |    ADLER32    |
//! +---+---+============+---+---+---+---+
//! ```
//!
//! - CMF: CM = 8 (DEFLATE) in bits 0-3, CINFO = window bits - 8 in bits 4-7
//! - FLG: FCHECK in bits 0-4 so that `(CMF*256 + FLG) % 31 == 0`, FDICT in
//!   bit 5 (followed by the dictionary's Adler-32), FLEVEL in bits 6-7
//! - ADLER32: checksum of the uncompressed data, big-endian

use oxiflate_core::error::{OxiFlateError, Result};
use oxiflate_core::traits::{CompressStatus, FlushMode};

use crate::config::{DeflateConfig, Format};
use crate::deflate::Deflater;
use crate::gzip::GzipHeader;

/// Compress `input` as raw DEFLATE.
///
/// # Example
///
/// ```
/// use oxiflate_deflate::zlib::deflate;
///
/// let compressed = deflate(b"Hello, World! Hello, World!", 6).unwrap();
/// assert!(compressed.len() < 27);
/// ```
pub fn deflate(input: &[u8], level: u8) -> Result<Vec<u8>> {
    compress_with(DeflateConfig::new().level(level).format(Format::Raw), input)
}

/// Compress `input` in zlib format.
///
/// # Example
///
/// ```
/// use oxiflate_deflate::zlib::zlib_compress;
///
/// let compressed = zlib_compress(b"Hello, World! Hello, World!", 6).unwrap();
/// assert_eq!(compressed[0], 0x78);
/// ```
pub fn zlib_compress(input: &[u8], level: u8) -> Result<Vec<u8>> {
    compress_with(DeflateConfig::new().level(level), input)
}

/// Compress `input` in zlib format with a preset dictionary. The header
/// carries the dictionary's Adler-32 so the decoder knows which one to
/// load.
pub fn zlib_compress_with_dict(input: &[u8], level: u8, dictionary: &[u8]) -> Result<Vec<u8>> {
    let mut deflater = Deflater::new(DeflateConfig::new().level(level))?;
    deflater.set_dictionary(dictionary)?;
    compress_to_vec(&mut deflater, input)
}

/// Compress `input` as a gzip member with a minimal header.
pub fn gzip_compress(input: &[u8], level: u8) -> Result<Vec<u8>> {
    gzip_compress_with_header(input, level, GzipHeader::default())
}

/// Compress `input` as a gzip member with the given header fields.
///
/// # Example
///
/// ```
/// use oxiflate_deflate::gzip::GzipHeader;
/// use oxiflate_deflate::zlib::gzip_compress_with_header;
///
/// let header = GzipHeader::new().name("notes.txt");
/// let member = gzip_compress_with_header(b"some notes", 9, header).unwrap();
/// assert_eq!(&member[..4], &[0x1F, 0x8B, 0x08, 0x08]);
/// assert_eq!(member[8], 2);
/// ```
pub fn gzip_compress_with_header(input: &[u8], level: u8, header: GzipHeader) -> Result<Vec<u8>> {
    let mut deflater = Deflater::new(DeflateConfig::new().level(level).format(Format::Gzip))?;
    deflater.set_gzip_header(header)?;
    compress_to_vec(&mut deflater, input)
}

/// Compress `input` with an arbitrary configuration.
pub fn compress_with(config: DeflateConfig, input: &[u8]) -> Result<Vec<u8>> {
    let mut deflater = Deflater::new(config)?;
    compress_to_vec(&mut deflater, input)
}

/// Run `deflater` to the end of the stream over `input`.
pub fn compress_to_vec(deflater: &mut Deflater, input: &[u8]) -> Result<Vec<u8>> {
    let mut output = vec![0u8; deflater.bound(input.len())];
    let mut in_pos = 0;
    let mut out_pos = 0;

    loop {
        if out_pos == output.len() {
            output.resize(output.len() * 2, 0);
        }

        let (consumed, produced, status) = deflater.compress(
            &input[in_pos..],
            &mut output[out_pos..],
            FlushMode::Finish,
        )?;
        in_pos += consumed;
        out_pos += produced;

        match status {
            CompressStatus::Done => break,
            CompressStatus::NeedsOutput => continue,
            CompressStatus::NeedsInput if consumed == 0 && produced == 0 => {
                return Err(OxiFlateError::internal(
                    "deflate made no progress while finishing",
                ));
            }
            CompressStatus::NeedsInput => continue,
        }
    }

    output.truncate(out_pos);
    Ok(output)
}
