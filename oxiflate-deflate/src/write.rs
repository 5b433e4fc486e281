//! [`std::io::Write`] front end.
//!
//! [`DeflateEncoder`] compresses everything written to it and forwards the
//! compressed bytes to an inner writer. [`Write::flush`] performs a sync
//! flush, so the data written so far can be fully decoded by the reader.
//! The stream is completed by [`DeflateEncoder::finish`]; dropping the
//! encoder without finishing leaves a truncated stream.
//!
//! ```rust
//! use std::io::Write;
//! use oxiflate_deflate::config::{DeflateConfig, Format};
//! use oxiflate_deflate::write::DeflateEncoder;
//!
//! let mut encoder = DeflateEncoder::new(Vec::new(), DeflateConfig::new().format(Format::Gzip)).unwrap();
//! encoder.write_all(b"hello ").unwrap();
//! encoder.write_all(b"world").unwrap();
//! let member = encoder.finish().unwrap();
//! assert_eq!(&member[..2], &[0x1F, 0x8B]);
//! ```

use std::io::{self, Write};

use oxiflate_core::error::Result;
use oxiflate_core::traits::{CompressStatus, FlushMode};

use crate::config::DeflateConfig;
use crate::deflate::Deflater;

/// Default size of the staging buffer between the engine and the writer.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Streaming compressor writing to `W`.
#[derive(Debug)]
pub struct DeflateEncoder<W: Write> {
    deflater: Deflater,
    inner: W,
    buf: Vec<u8>,
}

impl<W: Write> DeflateEncoder<W> {
    /// Create an encoder with a fresh session.
    pub fn new(inner: W, config: DeflateConfig) -> Result<Self> {
        Ok(Self::with_deflater(inner, Deflater::new(config)?))
    }

    /// Wrap an already configured session, e.g. one with a preset
    /// dictionary or a gzip header.
    pub fn with_deflater(inner: W, deflater: Deflater) -> Self {
        Self::with_chunk_size(inner, deflater, DEFAULT_CHUNK_SIZE)
    }

    /// Wrap a session, staging at most `chunk_size` compressed bytes per
    /// write to the inner writer.
    pub fn with_chunk_size(inner: W, deflater: Deflater, chunk_size: usize) -> Self {
        Self {
            deflater,
            inner,
            buf: vec![0; chunk_size.max(1)],
        }
    }

    /// The compression session.
    pub fn deflater(&self) -> &Deflater {
        &self.deflater
    }

    /// Mutable access to the session, e.g. for [`Deflater::set_params`].
    pub fn deflater_mut(&mut self) -> &mut Deflater {
        &mut self.deflater
    }

    /// The inner writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Push `input` through the engine until it is consumed and, for a
    /// flush request, until the engine has nothing more to give.
    fn drive(&mut self, mut input: &[u8], flush: FlushMode) -> io::Result<()> {
        loop {
            let (consumed, produced, status) =
                self.deflater.compress(input, &mut self.buf, flush)?;
            input = &input[consumed..];
            if produced > 0 {
                self.inner.write_all(&self.buf[..produced])?;
            }

            match status {
                CompressStatus::Done => return Ok(()),
                CompressStatus::NeedsOutput => continue,
                CompressStatus::NeedsInput if input.is_empty() => return Ok(()),
                CompressStatus::NeedsInput => continue,
            }
        }
    }

    /// Complete the stream and return the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.drive(&[], FlushMode::Finish)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for DeflateEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.drive(buf, FlushMode::None)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drive(&[], FlushMode::Sync)?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Format;
    use crate::zlib::zlib_compress;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    #[test]
    fn test_matches_one_shot() {
        let input = b"streaming through a writer, streaming through a writer".repeat(50);
        let mut encoder = DeflateEncoder::new(Vec::new(), DeflateConfig::new()).unwrap();
        for chunk in input.chunks(97) {
            encoder.write_all(chunk).unwrap();
        }
        let streamed = encoder.finish().unwrap();
        assert_eq!(streamed, zlib_compress(&input, 6).unwrap());
    }

    #[test]
    fn test_flush_makes_data_decodable() {
        let mut encoder = DeflateEncoder::with_chunk_size(
            Vec::new(),
            Deflater::new(DeflateConfig::new().format(Format::Raw)).unwrap(),
            7,
        );
        encoder.write_all(b"first part ").unwrap();
        encoder.flush().unwrap();

        let partial = encoder.get_ref().clone();
        // A sync flush ends with an empty stored block.
        assert_eq!(&partial[partial.len() - 4..], &[0x00, 0x00, 0xFF, 0xFF]);

        let mut decoder = flate2::Decompress::new(false);
        let mut out = vec![0u8; 64];
        decoder
            .decompress(&partial, &mut out, flate2::FlushDecompress::Sync)
            .unwrap();
        assert_eq!(&out[..decoder.total_out() as usize], b"first part ");

        encoder.write_all(b"second part").unwrap();
        let raw = encoder.finish().unwrap();
        let mut all = Vec::new();
        flate2::read::DeflateDecoder::new(&raw[..])
            .read_to_end(&mut all)
            .unwrap();
        assert_eq!(all, b"first part second part");
    }

    #[test]
    fn test_small_chunk_size() {
        let input: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let deflater = Deflater::new(DeflateConfig::new().level(9)).unwrap();
        let mut encoder = DeflateEncoder::with_chunk_size(Vec::new(), deflater, 1);
        encoder.write_all(&input).unwrap();
        let out = encoder.finish().unwrap();

        let mut decoded = Vec::new();
        ZlibDecoder::new(&out[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, input);
    }
}
