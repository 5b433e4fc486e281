//! gzip member header (RFC 1952).
//!
//! ```text
//! +---+---+---+---+---+---+---+---+---+---+
//! |ID1|ID2|CM |FLG|     MTIME     |XFL|OS |
//! +---+---+---+---+---+---+---+---+---+---+
//! (if FEXTRA) XLEN(2, LE) + XLEN bytes
//! (if FNAME) file name, NUL terminated
//! (if FCOMMENT) comment, NUL terminated
//! (if FHCRC) CRC16: low 16 bits of the CRC-32 of the bytes above
//! ```
//!
//! The trailer (CRC-32 and ISIZE, both little-endian) is written by the
//! compression session.

use oxiflate_core::crc::Crc32;
use oxiflate_core::error::{OxiFlateError, Result};

/// First magic byte.
pub const GZIP_ID1: u8 = 0x1F;
/// Second magic byte.
pub const GZIP_ID2: u8 = 0x8B;
/// Compression method: deflate.
pub const GZIP_CM_DEFLATE: u8 = 8;
/// Operating system: unknown.
pub const OS_UNKNOWN: u8 = 255;

const FTEXT: u8 = 0x01;
const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;

/// Optional fields of a gzip header.
///
/// # Example
///
/// ```
/// use oxiflate_deflate::gzip::GzipHeader;
///
/// let header = GzipHeader::new().name("data.txt").mtime(1_700_000_000);
/// let bytes = header.to_bytes(6);
/// assert_eq!(&bytes[..4], &[0x1F, 0x8B, 0x08, 0x08]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// The content is probably text (FTEXT).
    pub text: bool,
    /// Modification time, seconds since the Unix epoch; 0 if unknown.
    pub mtime: u32,
    /// Operating system that produced the member.
    pub os: u8,
    /// Extra field payload (FEXTRA), at most 65535 bytes.
    pub extra: Option<Vec<u8>>,
    /// Original file name (FNAME), without NUL bytes.
    pub name: Option<Vec<u8>>,
    /// Comment (FCOMMENT), without NUL bytes.
    pub comment: Option<Vec<u8>>,
    /// Append a header CRC (FHCRC).
    pub hcrc: bool,
}

impl Default for GzipHeader {
    fn default() -> Self {
        Self {
            text: false,
            mtime: 0,
            os: OS_UNKNOWN,
            extra: None,
            name: None,
            comment: None,
            hcrc: false,
        }
    }
}

impl GzipHeader {
    /// Header without optional fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the content as text.
    pub fn text(mut self, text: bool) -> Self {
        self.text = text;
        self
    }

    /// Set the modification time.
    pub fn mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    /// Set the operating system byte.
    pub fn os(mut self, os: u8) -> Self {
        self.os = os;
        self
    }

    /// Set the extra field.
    pub fn extra(mut self, extra: impl Into<Vec<u8>>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Set the original file name.
    pub fn name(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the comment.
    pub fn comment(mut self, comment: impl Into<Vec<u8>>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Request a header CRC.
    pub fn hcrc(mut self, hcrc: bool) -> Self {
        self.hcrc = hcrc;
        self
    }

    /// Check that the optional fields can be encoded.
    pub fn validate(&self) -> Result<()> {
        let extra_len = self.extra.as_ref().map_or(0, Vec::len);
        if extra_len > u16::MAX as usize {
            return Err(OxiFlateError::invalid_parameter(
                "gzip extra length",
                extra_len as i64,
                "0..=65535",
            ));
        }
        if self.name.as_ref().is_some_and(|name| name.contains(&0)) {
            return Err(OxiFlateError::invalid_parameter(
                "gzip name",
                0,
                "no NUL bytes",
            ));
        }
        if self.comment.as_ref().is_some_and(|c| c.contains(&0)) {
            return Err(OxiFlateError::invalid_parameter(
                "gzip comment",
                0,
                "no NUL bytes",
            ));
        }
        Ok(())
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.text {
            flags |= FTEXT;
        }
        if self.hcrc {
            flags |= FHCRC;
        }
        if self.extra.is_some() {
            flags |= FEXTRA;
        }
        if self.name.is_some() {
            flags |= FNAME;
        }
        if self.comment.is_some() {
            flags |= FCOMMENT;
        }
        flags
    }

    /// Encode the header for a stream compressed at `level`, which
    /// determines the XFL byte.
    pub fn to_bytes(&self, level: u8) -> Vec<u8> {
        let xfl = match level {
            1 => 4,
            9 => 2,
            _ => 0,
        };

        let mut out = Vec::with_capacity(10);
        out.extend_from_slice(&[GZIP_ID1, GZIP_ID2, GZIP_CM_DEFLATE, self.flags()]);
        out.extend_from_slice(&self.mtime.to_le_bytes());
        out.push(xfl);
        out.push(self.os);

        if let Some(extra) = &self.extra {
            out.extend_from_slice(&(extra.len() as u16).to_le_bytes());
            out.extend_from_slice(extra);
        }
        if let Some(name) = &self.name {
            out.extend_from_slice(name);
            out.push(0);
        }
        if let Some(comment) = &self.comment {
            out.extend_from_slice(comment);
            out.push(0);
        }
        if self.hcrc {
            let crc = Crc32::compute(&out);
            out.extend_from_slice(&(crc as u16).to_le_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_header() {
        let bytes = GzipHeader::new().to_bytes(6);
        assert_eq!(bytes, vec![0x1F, 0x8B, 8, 0, 0, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_xfl_by_level() {
        assert_eq!(GzipHeader::new().to_bytes(1)[8], 4);
        assert_eq!(GzipHeader::new().to_bytes(9)[8], 2);
        assert_eq!(GzipHeader::new().to_bytes(5)[8], 0);
    }

    #[test]
    fn test_all_fields() {
        let header = GzipHeader::new()
            .text(true)
            .mtime(0x0102_0304)
            .os(3)
            .extra(vec![0xAA, 0xBB])
            .name("a.txt")
            .comment("hi")
            .hcrc(true);
        let bytes = header.to_bytes(6);

        assert_eq!(bytes[3], FTEXT | FHCRC | FEXTRA | FNAME | FCOMMENT);
        assert_eq!(&bytes[4..8], &[4, 3, 2, 1]);
        assert_eq!(bytes[9], 3);
        assert_eq!(&bytes[10..14], &[2, 0, 0xAA, 0xBB]);
        assert_eq!(&bytes[14..20], b"a.txt\0");
        assert_eq!(&bytes[20..23], b"hi\0");

        let crc = Crc32::compute(&bytes[..23]) as u16;
        assert_eq!(&bytes[23..], &crc.to_le_bytes());
    }

    #[test]
    fn test_validate() {
        assert!(GzipHeader::new().name("ok").validate().is_ok());
        assert!(GzipHeader::new().name(b"a\0b".to_vec()).validate().is_err());
        assert!(GzipHeader::new().comment(b"\0".to_vec()).validate().is_err());
        assert!(
            GzipHeader::new()
                .extra(vec![0u8; 70_000])
                .validate()
                .is_err()
        );
    }
}
