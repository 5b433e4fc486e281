//! Block encoding: symbol buffering, tallying and block emission.
//!
//! The matcher records every literal and match as a [`MatchRecord`] and
//! counts its symbols in the dynamic trees. When a block ends,
//! [`BlockEncoder::flush_block`] builds the trees, compares the cost of a
//! stored, a static-Huffman and a dynamic-Huffman block and writes the
//! cheapest through the [`BitWriter`].

use oxiflate_core::bitstream::BitWriter;

use crate::huffman::{HuffCode, TreeBuilder, TreeDesc};
use crate::tables::{
    BASE_DIST, BASE_LENGTH, BL_CODES, BL_ORDER, END_BLOCK, EXTRA_DBITS, EXTRA_LBITS,
    LENGTH_CODE, LITERALS, REP_3_6, REPZ_3_10, REPZ_11_138, STATIC_BL_DESC, STATIC_D_DESC,
    STATIC_DTREE, STATIC_L_DESC, STATIC_LTREE, d_code,
};

/// Block type: stored.
const STORED_BLOCK: u32 = 0;
/// Block type: static trees.
const STATIC_TREES: u32 = 1;
/// Block type: dynamic trees.
const DYN_TREES: u32 = 2;

/// Check the early end-of-block heuristic every this many symbols + 1.
const TRUNCATE_CHECK_MASK: usize = 0x1fff;

/// One buffered symbol of the current block.
///
/// `dist == 0` means a literal byte `lc`; otherwise `dist` is the match
/// distance and `lc` the match length minus 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchRecord {
    /// Match distance, 0 for a literal.
    pub dist: u16,
    /// Literal byte, or match length - 3.
    pub lc: u8,
}

/// Guess of the content type, made from the first block's literal
/// frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    /// Mostly control characters or bytes above 127.
    Binary,
    /// Mostly printable ASCII.
    Text,
    /// No block has been emitted yet.
    #[default]
    Unknown,
}

/// Encoded form of a block, as chosen by [`BlockEncoder::flush_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Uncompressed.
    Stored,
    /// Fixed Huffman codes.
    Static,
    /// Huffman codes sent with the block.
    Dynamic,
}

/// Per-block symbol buffer plus the three dynamic trees.
#[derive(Debug, Clone)]
pub struct BlockEncoder {
    ltree: TreeDesc,
    dtree: TreeDesc,
    bl_tree: TreeDesc,
    builder: TreeBuilder,
    symbols: Vec<MatchRecord>,
    lit_bufsize: usize,
    /// Number of matches in the current block.
    matches: usize,
    /// Bit length of the EOB code of the last block.
    last_eob_len: u8,
    /// Compression level; 0 forces stored blocks and > 2 enables the early
    /// end-of-block check.
    level: u8,
    data_type: DataType,
}

impl BlockEncoder {
    /// Create an encoder buffering at most `lit_bufsize - 1` symbols per
    /// block.
    pub fn new(lit_bufsize: usize, level: u8) -> Self {
        let mut encoder = Self {
            ltree: TreeDesc::new(&STATIC_L_DESC),
            dtree: TreeDesc::new(&STATIC_D_DESC),
            bl_tree: TreeDesc::new(&STATIC_BL_DESC),
            builder: TreeBuilder::new(),
            symbols: Vec::with_capacity(lit_bufsize),
            lit_bufsize,
            matches: 0,
            last_eob_len: 8,
            level,
            data_type: DataType::Unknown,
        };
        encoder.init_block();
        encoder
    }

    /// Return to the state of a fresh stream.
    pub fn reset(&mut self) {
        self.last_eob_len = 8;
        self.data_type = DataType::Unknown;
        self.init_block();
    }

    /// Change the compression level used for later blocks.
    pub fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    /// Content type guessed from the first block.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    fn init_block(&mut self) {
        self.ltree.clear_freqs();
        self.dtree.clear_freqs();
        self.bl_tree.clear_freqs();
        self.ltree.freq[END_BLOCK] = 1;
        self.builder.reset_costs();
        self.symbols.clear();
        self.matches = 0;
    }

    /// Record a literal byte. `in_length` is the number of input bytes the
    /// current block covers. Returns true when the block should end.
    pub fn tally_lit(&mut self, byte: u8, in_length: usize) -> bool {
        self.symbols.push(MatchRecord { dist: 0, lc: byte });
        self.ltree.freq[byte as usize] += 1;
        self.block_full(in_length)
    }

    /// Record a match of `length - 3 == lc` at distance `dist`. Returns true
    /// when the block should end.
    pub fn tally_match(&mut self, dist: usize, lc: usize, in_length: usize) -> bool {
        self.symbols.push(MatchRecord {
            dist: dist as u16,
            lc: lc as u8,
        });
        self.matches += 1;
        self.ltree.freq[LENGTH_CODE[lc] as usize + LITERALS + 1] += 1;
        self.dtree.freq[d_code(dist - 1)] += 1;
        self.block_full(in_length)
    }

    fn block_full(&self, in_length: usize) -> bool {
        let last_lit = self.symbols.len();

        // Stop early when the data compresses well enough that the dynamic
        // trees of a fresh block will likely pay off.
        if last_lit & TRUNCATE_CHECK_MASK == 0 && self.level > 2 {
            let mut out_length = last_lit as u64 * 8;
            for (dcode, &xbits) in EXTRA_DBITS.iter().enumerate() {
                out_length += self.dtree.freq[dcode] as u64 * (5 + xbits as u64);
            }
            out_length >>= 3;
            if self.matches < last_lit / 2 && out_length < in_length as u64 / 2 {
                return true;
            }
        }

        // Stored blocks are limited to 64K-1 bytes.
        last_lit == self.lit_bufsize - 1
    }

    /// End the current block and write it out.
    ///
    /// `stored` holds the raw input of the block when it is still in the
    /// window; without it a stored block cannot be emitted. `stored_len` is
    /// the number of input bytes the block covers. A final block leaves the
    /// output byte aligned.
    pub fn flush_block(
        &mut self,
        bits: &mut BitWriter,
        stored: Option<&[u8]>,
        stored_len: usize,
        eof: bool,
    ) -> BlockKind {
        let mut max_blindex = 0;
        let (opt_lenb, static_lenb);

        if self.level > 0 {
            if self.data_type == DataType::Unknown {
                self.set_data_type();
            }

            self.builder.build_tree(&mut self.ltree);
            self.builder.build_tree(&mut self.dtree);
            // opt_len and static_len now cover the compressed block data,
            // without the tree representations.

            max_blindex = self.build_bl_tree();

            let opt = ((self.builder.opt_len + 3 + 7) >> 3) as usize;
            let stat = ((self.builder.static_len + 3 + 7) >> 3) as usize;
            static_lenb = stat;
            opt_lenb = opt.min(stat);
        } else {
            opt_lenb = stored_len + 5;
            static_lenb = opt_lenb;
        }

        let kind = match stored {
            Some(data) if stored_len + 4 <= opt_lenb => {
                self.stored_block(bits, data, eof);
                BlockKind::Stored
            }
            _ if static_lenb == opt_lenb => {
                bits.send_bits((STATIC_TREES << 1) + eof as u32, 3);
                self.last_eob_len = self.compress_block(bits, &STATIC_LTREE, &STATIC_DTREE);
                BlockKind::Static
            }
            _ => {
                bits.send_bits((DYN_TREES << 1) + eof as u32, 3);
                self.send_all_trees(
                    bits,
                    self.ltree.max_code + 1,
                    self.dtree.max_code + 1,
                    max_blindex + 1,
                );
                self.last_eob_len =
                    self.compress_block(bits, &self.ltree.codes, &self.dtree.codes);
                BlockKind::Dynamic
            }
        };

        tracing::debug!(
            ?kind,
            stored_len,
            opt_lenb,
            static_lenb,
            symbols = self.symbols.len(),
            eof,
            "flushed block"
        );

        self.init_block();

        if eof {
            bits.align();
        }
        kind
    }

    /// Write a stored block holding `data`.
    pub fn stored_block(&mut self, bits: &mut BitWriter, data: &[u8], eof: bool) {
        bits.send_bits((STORED_BLOCK << 1) + eof as u32, 3);
        bits.align();
        self.last_eob_len = 8;

        let len = data.len() as u16;
        bits.put_short(len);
        bits.put_short(!len);
        bits.put_bytes(data);
    }

    /// Write an empty static block so the decoder has enough lookahead to
    /// finish the previous block. Leaves up to 7 bits in the accumulator.
    pub fn align(&mut self, bits: &mut BitWriter) {
        let eob = STATIC_LTREE[END_BLOCK];

        bits.send_bits(STATIC_TREES << 1, 3);
        send_code(bits, eob);
        bits.flush_bits();

        // The last real code needs 9 bits of lookahead. One more empty
        // block is needed when the previous EOB and what was just sent of
        // this one fall short of that.
        if 1 + self.last_eob_len as i32 + 10 - (bits.bit_count() as i32) < 9 {
            bits.send_bits(STATIC_TREES << 1, 3);
            send_code(bits, eob);
            bits.flush_bits();
        }
        self.last_eob_len = 7;
    }

    /// Send the buffered symbols with the given trees, then END_BLOCK.
    /// Returns the length of the END_BLOCK code.
    fn compress_block(&self, bits: &mut BitWriter, ltree: &[HuffCode], dtree: &[HuffCode]) -> u8 {
        for rec in &self.symbols {
            let lc = rec.lc as usize;
            if rec.dist == 0 {
                send_code(bits, ltree[lc]);
                continue;
            }

            let code = LENGTH_CODE[lc] as usize;
            send_code(bits, ltree[code + LITERALS + 1]);
            let extra = EXTRA_LBITS[code];
            if extra != 0 {
                bits.send_bits((lc - BASE_LENGTH[code] as usize) as u32, extra);
            }

            let dist = rec.dist as usize - 1;
            let code = d_code(dist);
            send_code(bits, dtree[code]);
            let extra = EXTRA_DBITS[code];
            if extra != 0 {
                bits.send_bits((dist - BASE_DIST[code] as usize) as u32, extra);
            }
        }

        send_code(bits, ltree[END_BLOCK]);
        ltree[END_BLOCK].len
    }

    /// Binary if bytes 0..=6 and 128..=255 make up more than a fifth of the
    /// literals.
    fn set_data_type(&mut self) {
        let freq = &self.ltree.freq;
        let bin: u64 = freq[..7]
            .iter()
            .chain(&freq[128..LITERALS])
            .map(|&f| f as u64)
            .sum();
        let ascii: u64 = freq[7..128].iter().map(|&f| f as u64).sum();
        self.data_type = if bin > ascii >> 2 {
            DataType::Binary
        } else {
            DataType::Text
        };
    }

    /// Build the bit-length tree for the literal and distance trees and
    /// return the index in BL_ORDER of the last bit-length code to send.
    fn build_bl_tree(&mut self) -> usize {
        scan_tree(&self.ltree, &mut self.bl_tree.freq);
        scan_tree(&self.dtree, &mut self.bl_tree.freq);

        self.builder.build_tree(&mut self.bl_tree);
        // opt_len now includes the tree representations, except the
        // bit-length codes and the 5+5+4 bits of counts.

        // At least 4 bit-length codes are sent.
        let mut max_blindex = BL_CODES - 1;
        while max_blindex >= 3 && self.bl_tree.bit_len(BL_ORDER[max_blindex]) == 0 {
            max_blindex -= 1;
        }
        self.builder.opt_len += 3 * (max_blindex as i64 + 1) + 5 + 5 + 4;
        max_blindex
    }

    /// Send the header of a dynamic block: the counts, the bit-length code
    /// lengths, then the literal and distance trees.
    fn send_all_trees(&self, bits: &mut BitWriter, lcodes: usize, dcodes: usize, blcodes: usize) {
        debug_assert!(lcodes >= 257 && dcodes >= 1 && blcodes >= 4);
        bits.send_bits((lcodes - 257) as u32, 5);
        bits.send_bits((dcodes - 1) as u32, 5);
        bits.send_bits((blcodes - 4) as u32, 4);
        for &symbol in &BL_ORDER[..blcodes] {
            bits.send_bits(self.bl_tree.bit_len(symbol) as u32, 3);
        }
        send_tree(bits, &self.ltree, &self.bl_tree);
        send_tree(bits, &self.dtree, &self.bl_tree);
    }
}

#[inline]
fn send_code(bits: &mut BitWriter, code: HuffCode) {
    bits.send_bits(code.code as u32, code.len);
}

/// Guard length past `max_code`, different from every real length.
const GUARD_LEN: u16 = 0xffff;

#[inline]
fn next_len(tree: &TreeDesc, n: usize) -> u16 {
    if n <= tree.max_code {
        tree.bit_len(n) as u16
    } else {
        GUARD_LEN
    }
}

/// Run-length state shared by [`scan_tree`] and [`send_tree`].
fn repeat_limits(curlen: u16, nextlen: u16) -> (usize, usize) {
    if nextlen == 0 {
        (138, 3)
    } else if curlen == nextlen {
        (6, 3)
    } else {
        (7, 4)
    }
}

/// Count the bit-length symbols needed to send `tree` into `bl_freq`.
fn scan_tree(tree: &TreeDesc, bl_freq: &mut [u32]) {
    let mut prevlen: i32 = -1;
    let mut nextlen = next_len(tree, 0);
    let mut count = 0usize;
    let (mut max_count, mut min_count) = if nextlen == 0 { (138, 3) } else { (7, 4) };

    for n in 0..=tree.max_code {
        let curlen = nextlen;
        nextlen = next_len(tree, n + 1);
        count += 1;
        if count < max_count && curlen == nextlen {
            continue;
        } else if count < min_count {
            bl_freq[curlen as usize] += count as u32;
        } else if curlen != 0 {
            if curlen as i32 != prevlen {
                bl_freq[curlen as usize] += 1;
            }
            bl_freq[REP_3_6] += 1;
        } else if count <= 10 {
            bl_freq[REPZ_3_10] += 1;
        } else {
            bl_freq[REPZ_11_138] += 1;
        }
        count = 0;
        prevlen = curlen as i32;
        (max_count, min_count) = repeat_limits(curlen, nextlen);
    }
}

/// Send the code lengths of `tree` run-length coded with `bl_tree`.
fn send_tree(bits: &mut BitWriter, tree: &TreeDesc, bl_tree: &TreeDesc) {
    let bl_code = |n: usize| bl_tree.codes[n];
    let mut prevlen: i32 = -1;
    let mut nextlen = next_len(tree, 0);
    let mut count = 0usize;
    let (mut max_count, mut min_count) = if nextlen == 0 { (138, 3) } else { (7, 4) };

    for n in 0..=tree.max_code {
        let curlen = nextlen;
        nextlen = next_len(tree, n + 1);
        count += 1;
        if count < max_count && curlen == nextlen {
            continue;
        } else if count < min_count {
            for _ in 0..count {
                send_code(bits, bl_code(curlen as usize));
            }
        } else if curlen != 0 {
            if curlen as i32 != prevlen {
                send_code(bits, bl_code(curlen as usize));
                count -= 1;
            }
            send_code(bits, bl_code(REP_3_6));
            bits.send_bits((count - 3) as u32, 2);
        } else if count <= 10 {
            send_code(bits, bl_code(REPZ_3_10));
            bits.send_bits((count - 3) as u32, 3);
        } else {
            send_code(bits, bl_code(REPZ_11_138));
            bits.send_bits((count - 11) as u32, 7);
        }
        count = 0;
        prevlen = curlen as i32;
        (max_count, min_count) = repeat_limits(curlen, nextlen);
    }
}
