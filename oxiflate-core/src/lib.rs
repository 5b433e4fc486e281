//! # OxiFlate Core
//!
//! Core components for the OxiFlate compression library.
//!
//! This crate provides the building blocks shared by the DEFLATE engine and
//! its front ends:
//!
//! - [`bitstream`]: LSB-first bit packing into a pending output buffer
//! - [`checksum`]: the rolling [`Checksum`] trait and Adler-32
//! - [`crc`]: CRC-32 for gzip trailers
//! - [`traits`]: the streaming [`Compressor`] trait, flush modes and status
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Front ends                                          │
//! │     one-shot helpers, io::Write encoder, CLI            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     LZ77 window, Huffman trees, block encoder, engine   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitWriter, Adler-32/CRC-32, errors, traits          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiflate_core::bitstream::BitWriter;
//! use oxiflate_core::checksum::{Adler32, Checksum};
//! use oxiflate_core::crc::Crc32;
//!
//! let mut writer = BitWriter::with_capacity(8);
//! writer.send_bits(0b1, 1);
//! writer.align();
//! assert_eq!(writer.pending(), 1);
//!
//! assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
//! assert_eq!(Adler32::checksum(b"Wikipedia"), 0x11E60398);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod checksum;
pub mod crc;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use bitstream::BitWriter;
pub use checksum::{Adler32, Checksum};
pub use crc::Crc32;
pub use error::{OxiFlateError, Result};
pub use traits::{CompressStatus, CompressionLevel, Compressor, FlushMode};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::BitWriter;
    pub use crate::checksum::{Adler32, Checksum};
    pub use crate::crc::Crc32;
    pub use crate::error::{OxiFlateError, Result};
    pub use crate::traits::{CompressStatus, CompressionLevel, Compressor, FlushMode};
}
