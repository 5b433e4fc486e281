//! Core traits for streaming compression.
//!
//! This module defines the streaming [`Compressor`] contract together with
//! the flush directives and status values that travel across it.

use crate::error::{OxiFlateError, Result};

/// Status of a streaming compression operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressStatus {
    /// All supplied input was consumed and output space remains; more input
    /// can be accepted.
    NeedsInput,
    /// The output buffer is full (or was empty); call again with more output
    /// space. This is the steady-state signal of chunked streaming, not an
    /// error.
    NeedsOutput,
    /// Compression is complete and every byte has been delivered.
    Done,
}

/// Flush mode for compression.
///
/// Variants are ordered by strength: `None < Partial < Sync < Full < Finish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FlushMode {
    /// No flush - buffer data for best compression.
    #[default]
    None,
    /// Partial flush - complete the current block and emit an empty static
    /// block so the decoder sees all data so far (bits may stay pending).
    Partial,
    /// Sync flush - complete the current block and align the output to a
    /// byte boundary with an empty stored block.
    Sync,
    /// Full flush - like `Sync`, and also forget the match history so
    /// decompression can restart from this point.
    Full,
    /// Finish - complete the stream.
    Finish,
}

impl FlushMode {
    /// Numeric value as used by the zlib C interface (0..=4).
    pub fn as_i32(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Partial => 1,
            Self::Sync => 2,
            Self::Full => 3,
            Self::Finish => 4,
        }
    }
}

impl TryFrom<i32> for FlushMode {
    type Error = OxiFlateError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Partial),
            2 => Ok(Self::Sync),
            3 => Ok(Self::Full),
            4 => Ok(Self::Finish),
            other => Err(OxiFlateError::invalid_parameter(
                "flush",
                other as i64,
                "0..=4",
            )),
        }
    }
}

/// A streaming compressor (encoder).
///
/// Each call consumes as much of `input` and fills as much of `output` as it
/// can, then returns. The caller loops, supplying more input or more output
/// space, until [`CompressStatus::Done`] is returned for a
/// [`FlushMode::Finish`] request.
pub trait Compressor {
    /// Compress data from input to output.
    ///
    /// # Arguments
    ///
    /// * `input` - Input data to compress
    /// * `output` - Output buffer for compressed data
    /// * `flush` - Flush mode
    ///
    /// # Returns
    ///
    /// A tuple of (bytes consumed from input, bytes written to output, status)
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)>;

    /// Reset the compressor to its initial state.
    fn reset(&mut self);

    /// Check if the compressor has finished.
    fn is_finished(&self) -> bool;

    /// Compress all data at once (convenience method).
    fn compress_all(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut input_pos = 0;
        let mut buffer = vec![0u8; 32768];

        loop {
            let (consumed, produced, status) =
                self.compress(&input[input_pos..], &mut buffer, FlushMode::Finish)?;

            input_pos += consumed;
            output.extend_from_slice(&buffer[..produced]);

            match status {
                CompressStatus::Done => break,
                _ if consumed == 0 && produced == 0 => {
                    return Err(OxiFlateError::internal(
                        "compressor made no progress while finishing",
                    ));
                }
                _ => continue,
            }
        }

        Ok(output)
    }
}

/// Compression level for algorithms that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression (store only).
    pub const NONE: Self = Self(0);
    /// Fastest compression.
    pub const FAST: Self = Self(1);
    /// Default compression (balanced).
    pub const DEFAULT: Self = Self(6);
    /// Best compression (slowest).
    pub const BEST: Self = Self(9);

    /// Create a custom compression level.
    ///
    /// Levels above 9 are rejected with
    /// [`OxiFlateError::InvalidParameter`].
    pub fn new(level: u8) -> Result<Self> {
        if level > 9 {
            return Err(OxiFlateError::invalid_parameter(
                "level",
                level as i64,
                "0..=9",
            ));
        }
        Ok(Self(level))
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = OxiFlateError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}
