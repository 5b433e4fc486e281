//! Fixed tables for DEFLATE encoding (RFC 1951).
//!
//! Everything in this module is computed at compile time: the length and
//! distance code maps, their base values, the extra-bits tables, and the
//! static literal/length and distance trees used by fixed-Huffman blocks.

use crate::huffman::{HuffCode, StaticTreeDesc};

/// Shortest match length.
pub const MIN_MATCH: usize = 3;

/// Longest match length.
pub const MAX_MATCH: usize = 258;

/// Minimum lookahead kept in the window, except at the end of the input.
pub const MIN_LOOKAHEAD: usize = MAX_MATCH + MIN_MATCH + 1;

/// Longest code of the literal/length and distance trees.
pub const MAX_BITS: usize = 15;

/// Longest code of the bit-length tree.
pub const MAX_BL_BITS: usize = 7;

/// Number of length codes, not counting the special END_BLOCK code.
pub const LENGTH_CODES: usize = 29;

/// Number of literal bytes 0..255.
pub const LITERALS: usize = 256;

/// Number of literal/length codes, including END_BLOCK.
pub const L_CODES: usize = LITERALS + 1 + LENGTH_CODES;

/// Number of distance codes.
pub const D_CODES: usize = 30;

/// Number of codes used to transfer the bit lengths.
pub const BL_CODES: usize = 19;

/// Heap size of the tree builder (node slots of the largest tree).
pub const HEAP_SIZE: usize = 2 * L_CODES + 1;

/// End of block literal code.
pub const END_BLOCK: usize = 256;

/// Repeat previous bit length 3-6 times (2 extra bits).
pub const REP_3_6: usize = 16;

/// Repeat a zero length 3-10 times (3 extra bits).
pub const REPZ_3_10: usize = 17;

/// Repeat a zero length 11-138 times (7 extra bits).
pub const REPZ_11_138: usize = 18;

/// Extra bits for each length code.
pub const EXTRA_LBITS: [u8; LENGTH_CODES] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Extra bits for each distance code.
pub const EXTRA_DBITS: [u8; D_CODES] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Extra bits for each bit-length code.
pub const EXTRA_BLBITS: [u8; BL_CODES] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 3, 7];

/// Order in which the bit-length code lengths are sent.
pub const BL_ORDER: [usize; BL_CODES] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// First normalized length (length - 3) of each length code.
pub const BASE_LENGTH: [u8; LENGTH_CODES] = {
    let mut base = [0u8; LENGTH_CODES];
    let mut length = 0usize;
    let mut code = 0;
    while code < LENGTH_CODES - 1 {
        base[code] = length as u8;
        length += 1 << EXTRA_LBITS[code];
        code += 1;
    }
    // Length 258 has its own code; 255 (258 - 3) is also reachable through
    // code 27 with all extra bits set, which deflate never uses.
    base[LENGTH_CODES - 1] = 255;
    base
};

/// Length code (0..28) for each normalized match length (length - 3).
pub const LENGTH_CODE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut code = 0;
    while code < LENGTH_CODES - 1 {
        let mut n = 0;
        while n < (1 << EXTRA_LBITS[code]) {
            table[BASE_LENGTH[code] as usize + n] = code as u8;
            n += 1;
        }
        code += 1;
    }
    table[255] = (LENGTH_CODES - 1) as u8;
    table
};

/// First normalized distance (distance - 1) of each distance code.
pub const BASE_DIST: [u16; D_CODES] = {
    let mut base = [0u16; D_CODES];
    let mut dist = 0u32;
    let mut code = 0;
    while code < D_CODES {
        base[code] = dist as u16;
        dist += 1 << EXTRA_DBITS[code];
        code += 1;
    }
    base
};

/// Distance codes. The first 256 entries are indexed by distance - 1 for
/// distances 1..256; the last 256 by `(distance - 1) >> 7` for the rest.
pub const DIST_CODE: [u8; 512] = {
    let mut table = [0u8; 512];
    let mut code = 0;
    while code < 16 {
        let mut n = 0;
        while n < (1 << EXTRA_DBITS[code]) {
            table[BASE_DIST[code] as usize + n] = code as u8;
            n += 1;
        }
        code += 1;
    }
    while code < D_CODES {
        let mut n = 0;
        while n < (1 << (EXTRA_DBITS[code] - 7)) {
            table[256 + (BASE_DIST[code] as usize >> 7) + n] = code as u8;
            n += 1;
        }
        code += 1;
    }
    table
};

/// Distance code of a normalized distance (distance - 1, 0..32767).
#[inline]
pub fn d_code(dist: usize) -> usize {
    if dist < 256 {
        DIST_CODE[dist] as usize
    } else {
        DIST_CODE[256 + (dist >> 7)] as usize
    }
}

/// Reverse the low `len` bits of `code`.
pub const fn bi_reverse(code: u16, len: u8) -> u16 {
    let mut code = code;
    let mut res = 0u16;
    let mut i = 0;
    while i < len {
        res = (res << 1) | (code & 1);
        code >>= 1;
        i += 1;
    }
    res
}

/// The static literal/length tree. Codes 286 and 287 take part in the
/// canonical construction but never occur in a stream.
pub const STATIC_LTREE: [HuffCode; L_CODES + 2] = {
    let mut tree = [HuffCode::EMPTY; L_CODES + 2];
    let mut bl_count = [0u16; MAX_BITS + 1];

    let mut n = 0;
    while n < L_CODES + 2 {
        let len = if n < 144 {
            8
        } else if n < 256 {
            9
        } else if n < 280 {
            7
        } else {
            8
        };
        tree[n].len = len;
        bl_count[len as usize] += 1;
        n += 1;
    }

    let mut next_code = [0u16; MAX_BITS + 1];
    let mut code = 0u16;
    let mut bits = 1;
    while bits <= MAX_BITS {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
        bits += 1;
    }

    n = 0;
    while n < L_CODES + 2 {
        let len = tree[n].len;
        tree[n].code = bi_reverse(next_code[len as usize], len);
        next_code[len as usize] += 1;
        n += 1;
    }
    tree
};

/// The static distance tree: every code is 5 bits long.
pub const STATIC_DTREE: [HuffCode; D_CODES] = {
    let mut tree = [HuffCode::EMPTY; D_CODES];
    let mut n = 0;
    while n < D_CODES {
        tree[n] = HuffCode {
            code: bi_reverse(n as u16, 5),
            len: 5,
        };
        n += 1;
    }
    tree
};

/// Descriptor of the literal/length tree.
pub static STATIC_L_DESC: StaticTreeDesc = StaticTreeDesc {
    static_tree: Some(&STATIC_LTREE),
    extra_bits: &EXTRA_LBITS,
    extra_base: LITERALS + 1,
    elems: L_CODES,
    max_length: MAX_BITS,
};

/// Descriptor of the distance tree.
pub static STATIC_D_DESC: StaticTreeDesc = StaticTreeDesc {
    static_tree: Some(&STATIC_DTREE),
    extra_bits: &EXTRA_DBITS,
    extra_base: 0,
    elems: D_CODES,
    max_length: MAX_BITS,
};

/// Descriptor of the bit-length tree, which has no static form.
pub static STATIC_BL_DESC: StaticTreeDesc = StaticTreeDesc {
    static_tree: None,
    extra_bits: &EXTRA_BLBITS,
    extra_base: 0,
    elems: BL_CODES,
    max_length: MAX_BL_BITS,
};
