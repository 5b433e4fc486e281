//! Huffman tree construction for DEFLATE compression.
//!
//! DEFLATE uses canonical Huffman codes, where codes of the same length are
//! assigned consecutive values in lexicographic order (RFC 1951 3.2.2). The
//! encoder builds three trees per dynamic block:
//!
//! - **Literal/Length**: 0-285 (0-255 literals, 256 EOB, 257-285 lengths)
//! - **Distance**: 0-29 (back-reference distances)
//! - **Bit Length**: 0-18 (for encoding the two trees above)
//!
//! [`TreeBuilder`] turns symbol frequencies into length-limited code lengths
//! and bit-reversed canonical codes ready for LSB-first output. While doing
//! so it accumulates the bit cost of the block under both the dynamic trees
//! being built and the static trees, which the block encoder uses to pick the
//! cheapest block type.

use crate::tables::{HEAP_SIZE, MAX_BITS, bi_reverse};

/// A code and its length, as sent to the bit writer.
///
/// `code` is stored bit-reversed so that it can be sent LSB-first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffCode {
    /// Bit-reversed code.
    pub code: u16,
    /// Code length in bits; 0 for unused symbols.
    pub len: u8,
}

impl HuffCode {
    /// An unused symbol.
    pub const EMPTY: Self = Self { code: 0, len: 0 };
}

/// Fixed properties of one of the three alphabets.
#[derive(Debug)]
pub struct StaticTreeDesc {
    /// Static tree, if the alphabet has one.
    pub static_tree: Option<&'static [HuffCode]>,
    /// Extra bits for each code at or above `extra_base`.
    pub extra_bits: &'static [u8],
    /// First code with extra bits.
    pub extra_base: usize,
    /// Number of symbols of the alphabet.
    pub elems: usize,
    /// Longest permitted code.
    pub max_length: usize,
}

/// A dynamic tree: per-node arrays for every leaf and internal node, plus
/// the largest symbol with a non-zero frequency.
#[derive(Debug, Clone)]
pub struct TreeDesc {
    /// Frequency of each node.
    pub freq: Vec<u32>,
    /// Code of each leaf; the length field holds the depth of internal
    /// nodes while a build is running.
    pub codes: Vec<HuffCode>,
    /// Parent of each node.
    dad: Vec<u16>,
    /// Largest symbol with non-zero frequency after the last build.
    pub max_code: usize,
    /// Alphabet description.
    pub stat: &'static StaticTreeDesc,
}

impl TreeDesc {
    /// Allocate a tree for `2 * elems + 1` nodes.
    pub fn new(stat: &'static StaticTreeDesc) -> Self {
        let nodes = 2 * stat.elems + 1;
        Self {
            freq: vec![0; nodes],
            codes: vec![HuffCode::EMPTY; nodes],
            dad: vec![0; nodes],
            max_code: 0,
            stat,
        }
    }

    /// Clear the leaf frequencies.
    pub fn clear_freqs(&mut self) {
        self.freq[..self.stat.elems].fill(0);
    }

    /// Code length of node `n`.
    #[inline]
    pub fn bit_len(&self, n: usize) -> u8 {
        self.codes[n].len
    }
}

/// Scratch state shared by the three tree builds of a block.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    /// Heap of nodes; `heap[1]` is the smallest. The top of the array
    /// (`heap[heap_max..]`) holds nodes in decreasing frequency order.
    heap: [u16; HEAP_SIZE],
    heap_len: usize,
    heap_max: usize,
    /// Depth of each subtree, used as tie breaker for equal frequencies.
    depth: [u8; HEAP_SIZE],
    /// Number of codes at each bit length.
    bl_count: [u16; MAX_BITS + 1],
    /// Bit cost of the block with the dynamic trees.
    pub opt_len: i64,
    /// Bit cost of the block with the static trees.
    pub static_len: i64,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Create a builder with zero accumulated cost.
    pub fn new() -> Self {
        Self {
            heap: [0; HEAP_SIZE],
            heap_len: 0,
            heap_max: HEAP_SIZE,
            depth: [0; HEAP_SIZE],
            bl_count: [0; MAX_BITS + 1],
            opt_len: 0,
            static_len: 0,
        }
    }

    /// Reset the accumulated block costs.
    pub fn reset_costs(&mut self) {
        self.opt_len = 0;
        self.static_len = 0;
    }

    /// Build the Huffman tree for the frequencies of `tree`, assigning code
    /// lengths and codes and updating `opt_len` and `static_len`.
    ///
    /// At least two codes of non-zero frequency are forced so that even an
    /// empty or single-symbol block gets a decodable tree.
    pub fn build_tree(&mut self, tree: &mut TreeDesc) {
        let stree = tree.stat.static_tree;
        let elems = tree.stat.elems;
        let mut max_code: isize = -1;

        self.heap_len = 0;
        self.heap_max = HEAP_SIZE;

        for n in 0..elems {
            if tree.freq[n] != 0 {
                self.heap_len += 1;
                self.heap[self.heap_len] = n as u16;
                max_code = n as isize;
                self.depth[n] = 0;
            } else {
                tree.codes[n].len = 0;
            }
        }

        // The pkzip format requires at least one distance code and at least
        // one bit should be sent even if there is only one possible code.
        while self.heap_len < 2 {
            let node = if max_code < 2 {
                max_code += 1;
                max_code as usize
            } else {
                0
            };
            self.heap_len += 1;
            self.heap[self.heap_len] = node as u16;
            tree.freq[node] = 1;
            self.depth[node] = 0;
            self.opt_len -= 1;
            if let Some(stree) = stree {
                self.static_len -= stree[node].len as i64;
            }
            // node is 0 or 1 so it has no extra bits
        }
        let max_code = max_code as usize;
        tree.max_code = max_code;

        for n in (1..=self.heap_len / 2).rev() {
            self.pqdownheap(tree, n);
        }

        // Combine the two least frequent nodes until one is left.
        let mut node = elems;
        loop {
            let n = self.heap[1] as usize;
            self.heap[1] = self.heap[self.heap_len];
            self.heap_len -= 1;
            self.pqdownheap(tree, 1);

            let m = self.heap[1] as usize;

            self.heap_max -= 1;
            self.heap[self.heap_max] = n as u16;
            self.heap_max -= 1;
            self.heap[self.heap_max] = m as u16;

            tree.freq[node] = tree.freq[n] + tree.freq[m];
            self.depth[node] = self.depth[n].max(self.depth[m]) + 1;
            tree.dad[n] = node as u16;
            tree.dad[m] = node as u16;

            self.heap[1] = node as u16;
            node += 1;
            self.pqdownheap(tree, 1);

            if self.heap_len < 2 {
                break;
            }
        }

        self.heap_max -= 1;
        self.heap[self.heap_max] = self.heap[1];

        self.gen_bitlen(tree, max_code);
        gen_codes(tree, max_code, &self.bl_count);
    }

    /// Compare two nodes by frequency, then by subtree depth.
    #[inline]
    fn smaller(&self, tree: &TreeDesc, n: usize, m: usize) -> bool {
        tree.freq[n] < tree.freq[m]
            || (tree.freq[n] == tree.freq[m] && self.depth[n] <= self.depth[m])
    }

    /// Restore the heap property by moving `heap[k]` down, exchanging it
    /// with the smaller of its two sons.
    fn pqdownheap(&mut self, tree: &TreeDesc, mut k: usize) {
        let v = self.heap[k] as usize;
        let mut j = k << 1;
        while j <= self.heap_len {
            if j < self.heap_len
                && self.smaller(tree, self.heap[j + 1] as usize, self.heap[j] as usize)
            {
                j += 1;
            }
            if self.smaller(tree, v, self.heap[j] as usize) {
                break;
            }
            self.heap[k] = self.heap[j];
            k = j;
            j <<= 1;
        }
        self.heap[k] = v as u16;
    }

    /// Compute the optimal bit lengths for a tree whose nodes are sorted in
    /// `heap[heap_max..]`, limiting them to the alphabet's maximum length,
    /// and add the block cost to `opt_len` and `static_len`.
    fn gen_bitlen(&mut self, tree: &mut TreeDesc, max_code: usize) {
        let stree = tree.stat.static_tree;
        let extra = tree.stat.extra_bits;
        let base = tree.stat.extra_base;
        let max_length = tree.stat.max_length;
        let mut overflow = 0i32;

        self.bl_count = [0; MAX_BITS + 1];

        // The root of the heap has length 0; every other node is one deeper
        // than its parent, which has already been visited.
        tree.codes[self.heap[self.heap_max] as usize].len = 0;

        for h in self.heap_max + 1..HEAP_SIZE {
            let n = self.heap[h] as usize;
            let mut bits = tree.codes[tree.dad[n] as usize].len as usize + 1;
            if bits > max_length {
                bits = max_length;
                overflow += 1;
            }
            tree.codes[n].len = bits as u8;

            if n > max_code {
                continue; // not a leaf
            }

            self.bl_count[bits] += 1;
            let xbits = if n >= base { extra[n - base] as i64 } else { 0 };
            let f = tree.freq[n] as i64;
            self.opt_len += f * (bits as i64 + xbits);
            if let Some(stree) = stree {
                self.static_len += f * (stree[n].len as i64 + xbits);
            }
        }

        if overflow == 0 {
            return;
        }

        tracing::trace!(overflow, max_length, "huffman bit length overflow");

        // Find the first bit length which could increase, move one leaf
        // down the tree and one overflow item up as its brother.
        loop {
            let mut bits = max_length - 1;
            while self.bl_count[bits] == 0 {
                bits -= 1;
            }
            self.bl_count[bits] -= 1;
            self.bl_count[bits + 1] += 2;
            self.bl_count[max_length] -= 1;
            overflow -= 2;
            if overflow <= 0 {
                break;
            }
        }

        // Reassign the lengths in increasing frequency order, taking the
        // leaves from the sorted top of the heap.
        let mut h = HEAP_SIZE;
        for bits in (1..=max_length).rev() {
            let mut n = self.bl_count[bits];
            while n != 0 {
                h -= 1;
                let m = self.heap[h] as usize;
                if m > max_code {
                    continue;
                }
                let len = tree.codes[m].len as i64;
                if len != bits as i64 {
                    self.opt_len += (bits as i64 - len) * tree.freq[m] as i64;
                    tree.codes[m].len = bits as u8;
                }
                n -= 1;
            }
        }
    }
}

/// Assign canonical codes to the leaves of `tree` from the bit length
/// counts, storing them bit-reversed.
fn gen_codes(tree: &mut TreeDesc, max_code: usize, bl_count: &[u16; MAX_BITS + 1]) {
    let mut next_code = [0u16; MAX_BITS + 1];
    let mut code = 0u32;

    for bits in 1..=MAX_BITS {
        code = (code + bl_count[bits - 1] as u32) << 1;
        next_code[bits] = code as u16;
    }

    for n in 0..=max_code {
        let len = tree.codes[n].len;
        if len == 0 {
            continue;
        }
        tree.codes[n].code = bi_reverse(next_code[len as usize], len);
        next_code[len as usize] = next_code[len as usize].wrapping_add(1);
    }
}
