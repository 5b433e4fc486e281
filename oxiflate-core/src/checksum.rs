//! Rolling checksums for stream trailers.
//!
//! The compressor never computes a checksum itself; it hands every consumed
//! input byte to a [`Checksum`] collaborator. zlib streams use [`Adler32`],
//! gzip streams use [`Crc32`](crate::crc::Crc32), and callers may inject any
//! other implementation.

use std::fmt;

/// A rolling 32-bit checksum fed with the uncompressed input.
pub trait Checksum: fmt::Debug + Send {
    /// Feed more data.
    fn update(&mut self, data: &[u8]);

    /// Current checksum value of everything fed so far.
    fn value(&self) -> u32;

    /// Return to the initial state.
    fn reset(&mut self);

    /// Clone into a new box (used when a compression session is copied).
    fn box_clone(&self) -> Box<dyn Checksum>;
}

impl Clone for Box<dyn Checksum> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Largest prime smaller than 65536.
const ADLER_MOD: u32 = 65521;

/// Number of bytes to process before reducing.
const NMAX: usize = 5552;

/// Adler-32 checksum calculator (RFC 1950).
///
/// # Example
///
/// ```
/// use oxiflate_core::checksum::{Adler32, Checksum};
///
/// let mut adler = Adler32::new();
/// adler.update(b"Wikipedia");
/// assert_eq!(adler.value(), 0x11E6_0398);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Adler32 {
    /// Create a new Adler-32 calculator.
    pub fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Compute Adler-32 checksum of data in one shot.
    pub fn checksum(data: &[u8]) -> u32 {
        let mut adler = Self::new();
        adler.update(data);
        adler.value()
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Checksum for Adler32 {
    fn update(&mut self, data: &[u8]) {
        let mut a = self.a;
        let mut b = self.b;

        // Reduce at least every NMAX bytes so b cannot overflow
        for chunk in data.chunks(NMAX) {
            for &byte in chunk {
                a += byte as u32;
                b += a;
            }
            a %= ADLER_MOD;
            b %= ADLER_MOD;
        }

        self.a = a;
        self.b = b;
    }

    fn value(&self) -> u32 {
        (self.b << 16) | self.a
    }

    fn reset(&mut self) {
        self.a = 1;
        self.b = 0;
    }

    fn box_clone(&self) -> Box<dyn Checksum> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::Crc32;

    #[test]
    fn test_adler32_empty() {
        assert_eq!(Adler32::checksum(b""), 1);
    }

    #[test]
    fn test_adler32_known_values() {
        assert_eq!(Adler32::checksum(b"Wikipedia"), 0x11E6_0398);
        assert_eq!(Adler32::checksum(b"a"), 0x0062_0062);
        assert_eq!(Adler32::checksum(b"abc"), 0x024D_0127);
    }

    #[test]
    fn test_adler32_incremental_matches_one_shot() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let mut adler = Adler32::new();
        for chunk in data.chunks(777) {
            adler.update(chunk);
        }
        assert_eq!(adler.value(), Adler32::checksum(&data));
    }

    #[test]
    fn test_adler32_large_run_does_not_overflow() {
        let data = vec![0xFFu8; 100_000];
        let mut adler = Adler32::new();
        adler.update(&data);
        let mut reference_a = 1u64;
        let mut reference_b = 0u64;
        for &byte in &data {
            reference_a = (reference_a + byte as u64) % ADLER_MOD as u64;
            reference_b = (reference_b + reference_a) % ADLER_MOD as u64;
        }
        assert_eq!(adler.value() as u64, (reference_b << 16) | reference_a);
    }

    #[test]
    fn test_reset_and_box_clone() {
        let mut boxed: Box<dyn Checksum> = Box::new(Adler32::new());
        boxed.update(b"abc");
        let copy = boxed.clone();
        boxed.reset();
        assert_eq!(boxed.value(), 1);
        assert_eq!(copy.value(), 0x024D_0127);

        let mut crc: Box<dyn Checksum> = Box::new(Crc32::new());
        crc.update(b"123456789");
        assert_eq!(crc.value(), 0xCBF4_3926);
    }
}
