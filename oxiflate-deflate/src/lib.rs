//! # OxiFlate Deflate
//!
//! Pure Rust streaming DEFLATE compressor (RFC 1951) with raw, zlib
//! (RFC 1950) and gzip (RFC 1952) wrapping.
//!
//! ## Features
//!
//! - **Streaming**: push input in any chunking, pull output into buffers of
//!   any size; the compressed stream does not depend on the output chunking
//! - **LZ77**: hash-chained sliding window with greedy (levels 1-3) and lazy
//!   (levels 4-9) matching
//! - **Huffman**: per block choice of stored, static or dynamic codes,
//!   whichever is smallest
//! - **Flush modes**: partial, sync and full flushes, finish
//! - **Extras**: preset dictionaries, gzip header fields, live level and
//!   strategy changes, session snapshots
//!
//! ## Example
//!
//! ```rust
//! use oxiflate_deflate::{zlib_compress, Deflater, DeflateConfig, Format};
//! use oxiflate_core::traits::{CompressStatus, FlushMode};
//!
//! // One shot
//! let compressed = zlib_compress(b"Hello, World! Hello, World!", 6).unwrap();
//! assert_eq!(compressed[0], 0x78);
//!
//! // Streaming
//! let mut deflater = Deflater::new(DeflateConfig::new().format(Format::Raw)).unwrap();
//! let mut out = [0u8; 64];
//! let (_, produced, status) = deflater
//!     .compress(b"abcabcabc", &mut out, FlushMode::Finish)
//!     .unwrap();
//! assert_eq!(status, CompressStatus::Done);
//! assert!(produced > 0);
//! ```
//!
//! ## Compression Levels
//!
//! - Level 0: No compression (stored blocks)
//! - Level 1-3: Greedy matching
//! - Level 4-6: Lazy matching (default is 6)
//! - Level 7-9: Lazy matching with longer chains (slower)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod config;
pub mod deflate;
pub mod gzip;
pub mod huffman;
pub mod stream;
pub mod tables;
pub mod window;
pub mod write;
pub mod zlib;

// Re-exports
pub use block::{BlockKind, DataType};
pub use config::{DeflateConfig, Format, Strategy};
pub use deflate::{DeflateSnapshot, Deflater, compress_bound};
pub use gzip::GzipHeader;
pub use write::DeflateEncoder;
pub use zlib::{
    compress_with, deflate, gzip_compress, gzip_compress_with_header, zlib_compress,
    zlib_compress_with_dict,
};
