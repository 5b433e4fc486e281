//! Bit-level output packing for DEFLATE.
//!
//! [`BitWriter`] packs variable-length codes into its own pending byte
//! buffer. Bits are accumulated in a 16-bit register and spilled two bytes at
//! a time; the pending bytes are later drained into caller-supplied output
//! spans with [`BitWriter::drain_into`].
//!
//! # Bit Ordering
//!
//! DEFLATE uses LSB-first ordering: the first bit of a code occupies the least
//! significant free bit of the current byte. Huffman codes must therefore be
//! stored bit-reversed before they are sent.
//!
//! # Example
//!
//! ```
//! use oxiflate_core::bitstream::BitWriter;
//!
//! let mut writer = BitWriter::with_capacity(16);
//! writer.send_bits(0b101, 3);
//! writer.send_bits(0b1100, 4);
//! writer.align();
//!
//! let mut out = [0u8; 4];
//! let n = writer.drain_into(&mut out);
//! assert_eq!(&out[..n], &[0b0110_0101]);
//! ```

/// Width of the bit accumulator.
const BUF_SIZE: u8 = 16;

/// A bit packer writing into a pending byte buffer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Bytes already packed, not yet delivered.
    buf: Vec<u8>,
    /// Index of the next byte to deliver.
    out: usize,
    /// Bit accumulator (LSB-first). Bits above `bit_count` are zero.
    bit_buf: u16,
    /// Number of valid bits in `bit_buf`.
    bit_count: u8,
}

impl BitWriter {
    /// Create a writer whose pending buffer starts with `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Discard all pending bytes and bits, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.out = 0;
        self.bit_buf = 0;
        self.bit_count = 0;
    }

    /// Number of packed bytes waiting to be delivered.
    #[inline]
    pub fn pending(&self) -> usize {
        self.buf.len() - self.out
    }

    /// Whether any packed byte is waiting to be delivered.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.out < self.buf.len()
    }

    /// Number of bits held in the accumulator (0..=16).
    #[inline]
    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }

    /// Append a byte. The accumulator must be empty or the caller must know
    /// the byte belongs after the bits already spilled.
    #[inline]
    pub fn put_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a 16-bit value, least significant byte first.
    #[inline]
    pub fn put_short(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a 16-bit value, most significant byte first.
    #[inline]
    pub fn put_short_msb(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Send `length` bits (1..=16) of `value`, LSB first.
    #[inline]
    pub fn send_bits(&mut self, value: u32, length: u8) {
        debug_assert!(length > 0 && length <= BUF_SIZE, "invalid length {}", length);
        let value = value & ((1u32 << length) - 1);

        if self.bit_count > BUF_SIZE - length {
            self.bit_buf |= (value << self.bit_count) as u16;
            let spill = self.bit_buf;
            self.buf.extend_from_slice(&spill.to_le_bytes());
            self.bit_buf = (value >> (BUF_SIZE - self.bit_count)) as u16;
            // bit_count + length > BUF_SIZE here, so this cannot underflow.
            self.bit_count = self.bit_count + length - BUF_SIZE;
        } else {
            self.bit_buf |= (value << self.bit_count) as u16;
            self.bit_count += length;
        }
    }

    /// Spill whole bytes from the accumulator, keeping at most 7 bits.
    pub fn flush_bits(&mut self) {
        if self.bit_count == BUF_SIZE {
            let spill = self.bit_buf;
            self.buf.extend_from_slice(&spill.to_le_bytes());
            self.bit_buf = 0;
            self.bit_count = 0;
        } else if self.bit_count >= 8 {
            self.buf.push(self.bit_buf as u8);
            self.bit_buf >>= 8;
            self.bit_count -= 8;
        }
    }

    /// Spill the accumulator completely, padding to a byte boundary with zeros.
    pub fn align(&mut self) {
        if self.bit_count > 8 {
            let spill = self.bit_buf;
            self.buf.extend_from_slice(&spill.to_le_bytes());
        } else if self.bit_count > 0 {
            self.buf.push(self.bit_buf as u8);
        }
        self.bit_buf = 0;
        self.bit_count = 0;
    }

    /// Copy as many pending bytes as fit into `output`, returning the count.
    pub fn drain_into(&mut self, output: &mut [u8]) -> usize {
        let len = self.pending().min(output.len());
        if len == 0 {
            return 0;
        }
        output[..len].copy_from_slice(&self.buf[self.out..self.out + len]);
        self.out += len;
        if self.out == self.buf.len() {
            self.buf.clear();
            self.out = 0;
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_all(writer: &mut BitWriter) -> Vec<u8> {
        let mut out = vec![0u8; writer.pending()];
        let n = writer.drain_into(&mut out);
        out.truncate(n);
        out
    }

    #[test]
    fn test_bits_lsb_first() {
        let mut writer = BitWriter::default();
        writer.send_bits(1, 1);
        writer.send_bits(0b01, 2);
        writer.send_bits(0b11111, 5);
        writer.flush_bits();
        assert_eq!(drain_all(&mut writer), vec![0b1111_1011]);
        assert_eq!(writer.bit_count(), 0);
    }

    #[test]
    fn test_accumulator_spill_across_boundary() {
        let mut writer = BitWriter::default();
        writer.send_bits(0x7FF, 11);
        writer.send_bits(0b10101, 5);
        // Exactly 16 bits: nothing spilled until the next send or flush
        assert_eq!(writer.pending(), 0);
        assert_eq!(writer.bit_count(), 16);
        writer.send_bits(0b11, 2);
        assert_eq!(writer.pending(), 2);
        writer.align();
        assert_eq!(drain_all(&mut writer), vec![0xFF, 0xAF, 0x03]);
    }

    #[test]
    fn test_short_code_after_spill() {
        // Every code shorter than the accumulator that crosses the 16-bit
        // boundary leaves bit_count + length - 16 bits behind.
        let mut writer = BitWriter::default();
        writer.send_bits(0x3FFF, 14);
        writer.send_bits(0b101, 3);
        assert_eq!(writer.pending(), 2);
        assert_eq!(writer.bit_count(), 1);
        writer.send_bits(0x7F, 7);
        writer.send_bits(0xFFFF, 16);
        assert_eq!(writer.bit_count(), 8);
        writer.align();
        assert_eq!(drain_all(&mut writer), vec![0xFF, 0x7F, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_put_short_orders() {
        let mut writer = BitWriter::default();
        writer.put_short(0x1234);
        writer.put_short_msb(0x1234);
        assert_eq!(drain_all(&mut writer), vec![0x34, 0x12, 0x12, 0x34]);
    }

    #[test]
    fn test_align_pads_with_zeros() {
        let mut writer = BitWriter::default();
        writer.send_bits(0b1, 1);
        writer.align();
        assert_eq!(writer.bit_count(), 0);
        writer.put_byte(0xAA);
        assert_eq!(drain_all(&mut writer), vec![0x01, 0xAA]);
    }

    #[test]
    fn test_partial_drain() {
        let mut writer = BitWriter::with_capacity(8);
        writer.put_bytes(&[1, 2, 3, 4, 5]);
        let mut out = [0u8; 2];
        assert_eq!(writer.drain_into(&mut out), 2);
        assert_eq!(out, [1, 2]);
        assert_eq!(writer.pending(), 3);
        let mut rest = [0u8; 8];
        assert_eq!(writer.drain_into(&mut rest), 3);
        assert!(!writer.has_pending());
        assert_eq!(writer.drain_into(&mut rest), 0);
    }
}
