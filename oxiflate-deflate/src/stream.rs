//! Input and output cursors of one compression call.
//!
//! A [`StreamIo`] borrows the caller's input and output spans for the
//! duration of a call. Input is pulled into the sliding window with
//! [`StreamIo::read_into`], which also feeds the rolling checksum with
//! exactly the bytes consumed. Compressed bytes leave the pending buffer
//! through [`StreamIo::flush_pending`], bounded by the output capacity.

use oxiflate_core::bitstream::BitWriter;
use oxiflate_core::checksum::Checksum;

/// Caller buffers and the positions reached in them.
#[derive(Debug)]
pub struct StreamIo<'a> {
    input: &'a [u8],
    next_in: usize,
    output: &'a mut [u8],
    next_out: usize,
}

impl<'a> StreamIo<'a> {
    /// Wrap the caller's spans.
    pub fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self {
            input,
            next_in: 0,
            output,
            next_out: 0,
        }
    }

    /// Input bytes not yet consumed.
    #[inline]
    pub fn avail_in(&self) -> usize {
        self.input.len() - self.next_in
    }

    /// Output space left.
    #[inline]
    pub fn avail_out(&self) -> usize {
        self.output.len() - self.next_out
    }

    /// Input bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.next_in
    }

    /// Output bytes produced so far.
    pub fn produced(&self) -> usize {
        self.next_out
    }

    /// Copy as much input as fits into `buf`, updating `checksum` with the
    /// copied bytes. Returns the number of bytes copied.
    pub fn read_into(
        &mut self,
        buf: &mut [u8],
        checksum: Option<&mut (dyn Checksum + '_)>,
    ) -> usize {
        let len = self.avail_in().min(buf.len());
        if len == 0 {
            return 0;
        }

        let src = &self.input[self.next_in..self.next_in + len];
        buf[..len].copy_from_slice(src);
        if let Some(checksum) = checksum {
            checksum.update(src);
        }
        self.next_in += len;
        len
    }

    /// Move as many pending bytes as fit into the output. Returns the
    /// number of bytes moved.
    pub fn flush_pending(&mut self, bits: &mut BitWriter) -> usize {
        let len = bits.drain_into(&mut self.output[self.next_out..]);
        self.next_out += len;
        len
    }
}
