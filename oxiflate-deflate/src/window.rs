//! Sliding window and LZ77 match finder.
//!
//! The window holds `2 * w_size` bytes. Input is appended after the current
//! lookahead; when the read position gets within [`MIN_LOOKAHEAD`] of the
//! end, the upper half is moved down and every stored position is rebased.
//!
//! Strings of [`MIN_MATCH`] bytes are indexed by a rolling hash. `head`
//! holds the most recent position of each hash value and `prev` links each
//! position to the previous one with the same hash, so that a hash chain
//! can be walked from newest to oldest. Position 0 doubles as the empty
//! marker; it is never a usable match candidate.

use crate::config::LevelConfig;
use crate::stream::StreamIo;
use crate::tables::{MAX_MATCH, MIN_LOOKAHEAD, MIN_MATCH};
use oxiflate_core::checksum::Checksum;
use oxiflate_core::error::{OxiFlateError, Result};

/// LZ77 state: the window, its hash chains and the match in progress.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    window: Vec<u8>,
    w_size: usize,
    w_mask: usize,

    /// Most recent position of each hash value.
    head: Vec<u32>,
    /// Previous position with the same hash, indexed by `pos & w_mask`.
    prev: Vec<u32>,
    hash_mask: u32,
    hash_shift: u32,
    /// Hash of the string at `str_start`.
    ins_h: u32,

    /// Start of the string to be inserted.
    pub str_start: usize,
    /// Window position where the current block starts. Negative once the
    /// block start has been slid out of the window.
    pub block_start: isize,
    /// Valid bytes ahead of `str_start`.
    pub lookahead: usize,
    /// Start of the last match found by [`longest_match`](Self::longest_match).
    pub match_start: usize,
    /// Length of the best match at the current position.
    pub match_length: usize,
    /// Start of the previous match (lazy evaluation).
    pub prev_match: usize,
    /// A literal from the previous position is still to be emitted.
    pub match_available: bool,
    /// Length of the best match at the previous position.
    pub prev_length: usize,

    max_chain_length: usize,
    max_lazy_match: usize,
    good_match: usize,
    nice_match: usize,
}

impl SlidingWindow {
    /// Allocate a window of `2 << window_bits` bytes and a hash table of
    /// `1 << hash_bits` entries.
    pub fn new(window_bits: u8, hash_bits: u32) -> Self {
        let w_size = 1usize << window_bits;
        let hash_size = 1usize << hash_bits;
        Self {
            window: vec![0; 2 * w_size],
            w_size,
            w_mask: w_size - 1,
            head: vec![0; hash_size],
            prev: vec![0; w_size],
            hash_mask: hash_size as u32 - 1,
            hash_shift: hash_bits.div_ceil(MIN_MATCH as u32),
            ins_h: 0,
            str_start: 0,
            block_start: 0,
            lookahead: 0,
            match_start: 0,
            match_length: MIN_MATCH - 1,
            prev_match: 0,
            match_available: false,
            prev_length: MIN_MATCH - 1,
            max_chain_length: 0,
            max_lazy_match: 0,
            good_match: 0,
            nice_match: 0,
        }
    }

    /// Forget all input and history, keeping the allocations.
    pub fn reset(&mut self) {
        self.clear_hash();
        self.str_start = 0;
        self.block_start = 0;
        self.lookahead = 0;
        self.match_start = 0;
        self.match_length = MIN_MATCH - 1;
        self.prev_length = MIN_MATCH - 1;
        self.prev_match = 0;
        self.match_available = false;
        self.ins_h = 0;
    }

    /// Load the matcher tuning of a level.
    pub fn configure(&mut self, config: &LevelConfig) {
        self.max_chain_length = config.max_chain as usize;
        self.max_lazy_match = config.max_lazy as usize;
        self.good_match = config.good_length as usize;
        self.nice_match = config.nice_length as usize;
    }

    /// Empty every hash chain.
    pub fn clear_hash(&mut self) {
        self.head.fill(0);
    }

    /// Window size in bytes (half the buffer).
    pub fn w_size(&self) -> usize {
        self.w_size
    }

    /// Longest match distance the matcher may use.
    #[inline]
    pub fn max_dist(&self) -> usize {
        self.w_size - MIN_LOOKAHEAD
    }

    /// Matches up to this length are fully hashed by the fast routine, and
    /// the lazy routine does not look for a better match above it.
    #[inline]
    pub fn max_lazy_match(&self) -> usize {
        self.max_lazy_match
    }

    /// Byte at window position `pos`.
    #[inline]
    pub fn byte(&self, pos: usize) -> u8 {
        self.window[pos]
    }

    /// Raw bytes of the current block, if they are all still in the window.
    pub fn block_bytes(&self) -> Option<&[u8]> {
        if self.block_start < 0 {
            return None;
        }
        Some(&self.window[self.block_start as usize..self.str_start])
    }

    /// Input bytes covered by the current block.
    #[inline]
    pub fn block_len(&self) -> usize {
        (self.str_start as isize - self.block_start) as usize
    }

    #[inline]
    fn update_hash(&self, h: u32, c: u8) -> u32 {
        ((h << self.hash_shift) ^ c as u32) & self.hash_mask
    }

    /// Prime the rolling hash with the first two bytes at `str_start`.
    #[inline]
    pub fn prime_hash(&mut self) {
        let h = self.window[self.str_start] as u32;
        self.ins_h = self.update_hash(h, self.window[self.str_start + 1]);
    }

    /// Insert the string at `str_start` into the hash table and return the
    /// previous head of its chain (0 if none).
    #[inline]
    pub fn insert_string(&mut self) -> usize {
        let pos = self.str_start;
        self.ins_h = self.update_hash(self.ins_h, self.window[pos + MIN_MATCH - 1]);
        let hash_head = self.head[self.ins_h as usize];
        self.prev[pos & self.w_mask] = hash_head;
        self.head[self.ins_h as usize] = pos as u32;
        hash_head as usize
    }

    /// Whether `hash_head` is a usable match candidate for `str_start`.
    #[inline]
    pub fn in_range(&self, hash_head: usize) -> bool {
        hash_head != 0 && self.str_start.wrapping_sub(hash_head) <= self.max_dist()
    }

    /// Move the upper half of the window down and rebase every position.
    fn slide(&mut self) {
        let w_size = self.w_size;
        self.window.copy_within(w_size.., 0);
        // A pending lazy match may start just below the slid-out half; its
        // distance is recovered with wrapping arithmetic.
        self.match_start = self.match_start.wrapping_sub(w_size);
        self.str_start -= w_size;
        self.block_start -= w_size as isize;

        let w = w_size as u32;
        for m in self.head.iter_mut().chain(self.prev.iter_mut()) {
            *m = if *m >= w { *m - w } else { 0 };
        }

        tracing::trace!(
            str_start = self.str_start,
            block_start = self.block_start,
            "window slid"
        );
    }

    /// Fill the window from `io` while the lookahead is short, sliding when
    /// the read position gets too close to the end.
    ///
    /// Every byte read is passed to `checksum`. On return either the
    /// lookahead is at least [`MIN_LOOKAHEAD`] or the input is exhausted.
    pub fn fill_window(
        &mut self,
        io: &mut StreamIo<'_>,
        mut checksum: Option<&mut (dyn Checksum + '_)>,
    ) {
        let window_size = self.window.len();
        loop {
            let mut more = window_size - self.lookahead - self.str_start;

            // Slide only once str_start is past the last position that can
            // still be matched without sliding. Every parse then slides at
            // the same position, whatever the input chunking.
            if self.str_start > self.w_size + self.max_dist() {
                self.slide();
                more += self.w_size;
            }

            if io.avail_in() == 0 {
                return;
            }

            let start = self.str_start + self.lookahead;
            let n = io.read_into(
                &mut self.window[start..start + more],
                checksum.as_deref_mut(),
            );
            self.lookahead += n;

            if self.lookahead >= MIN_MATCH {
                self.prime_hash();
            }

            if self.lookahead >= MIN_LOOKAHEAD || io.avail_in() == 0 {
                return;
            }
        }
    }

    /// Find the longest match starting at `str_start`, walking the hash
    /// chain from `cur_match`.
    ///
    /// Only matches longer than `prev_length` are reported; the start of
    /// the best one is left in `match_start`. The result never exceeds
    /// `lookahead`.
    pub fn longest_match(&mut self, mut cur_match: usize) -> usize {
        let mut chain_length = self.max_chain_length;
        let scan = self.str_start;
        let mut best_len = self.prev_length;
        let max_dist = self.max_dist();
        let limit = scan.saturating_sub(max_dist);
        let nice_match = self.nice_match.min(self.lookahead);

        // Do not waste too much time if we already have a good match.
        if self.prev_length >= self.good_match {
            chain_length >>= 2;
        }

        let window = &self.window;
        let scan_bytes = &window[scan..scan + MAX_MATCH];
        let mut scan_end1 = window[scan + best_len - 1];
        let mut scan_end = window[scan + best_len];

        loop {
            let m = cur_match;

            // Reject quickly on the bytes that would extend the best match
            // and on the first two bytes.
            if window[m + best_len] == scan_end
                && window[m + best_len - 1] == scan_end1
                && window[m] == scan_bytes[0]
                && window[m + 1] == scan_bytes[1]
            {
                let len = 2 + scan_bytes[2..]
                    .iter()
                    .zip(&window[m + 2..m + MAX_MATCH])
                    .take_while(|(a, b)| a == b)
                    .count();

                if len > best_len {
                    self.match_start = cur_match;
                    best_len = len;
                    if len >= nice_match {
                        break;
                    }
                    scan_end1 = window[scan + best_len - 1];
                    scan_end = window[scan + best_len];
                }
            }

            cur_match = self.prev[cur_match & self.w_mask] as usize;
            if cur_match <= limit || chain_length <= 1 {
                break;
            }
            chain_length -= 1;
        }

        best_len.min(self.lookahead)
    }

    /// Check the position bookkeeping.
    pub fn check_positions(&self) -> Result<()> {
        if self.str_start + self.lookahead > self.window.len() {
            return Err(OxiFlateError::internal(format!(
                "read position {} plus lookahead {} exceeds window of {} bytes",
                self.str_start,
                self.lookahead,
                self.window.len()
            )));
        }
        if self.block_start > self.str_start as isize {
            return Err(OxiFlateError::internal(format!(
                "block start {} is ahead of read position {}",
                self.block_start, self.str_start
            )));
        }
        Ok(())
    }

    /// Prime the window with a preset dictionary. Only the last
    /// `w_size - MIN_LOOKAHEAD` bytes are used.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) {
        if dictionary.len() < MIN_MATCH {
            return;
        }
        let max = self.max_dist();
        let dict = if dictionary.len() > max {
            &dictionary[dictionary.len() - max..]
        } else {
            dictionary
        };
        let length = dict.len();

        self.window[..length].copy_from_slice(dict);
        self.str_start = length;
        self.block_start = length as isize;

        // Insert every string of the dictionary into the hash table.
        self.ins_h = self.update_hash(self.window[0] as u32, self.window[1]);
        for n in 0..=length - MIN_MATCH {
            self.ins_h = self.update_hash(self.ins_h, self.window[n + MIN_MATCH - 1]);
            self.prev[n & self.w_mask] = self.head[self.ins_h as usize];
            self.head[self.ins_h as usize] = n as u32;
        }

        tracing::debug!(
            dictionary_len = dictionary.len(),
            used = length,
            "preset dictionary loaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxiflate_core::checksum::Adler32;

    fn window_with(data: &[u8], level: u8) -> SlidingWindow {
        let mut window = SlidingWindow::new(15, 15);
        window.configure(&LevelConfig::for_level(level));
        let mut out = [0u8; 0];
        let mut io = StreamIo::new(data, &mut out);
        window.fill_window(&mut io, None);
        window
    }

    #[test]
    fn test_hash_shift() {
        assert_eq!(SlidingWindow::new(15, 15).hash_shift, 5);
        assert_eq!(SlidingWindow::new(9, 8).hash_shift, 3);
        assert_eq!(SlidingWindow::new(15, 16).hash_shift, 6);
    }

    #[test]
    fn test_fill_reads_and_checksums() {
        let data = b"Wikipedia";
        let mut window = SlidingWindow::new(9, 8);
        let mut adler = Adler32::new();
        let mut out = [0u8; 0];
        let mut io = StreamIo::new(data, &mut out);
        window.fill_window(&mut io, Some(&mut adler));

        assert_eq!(window.lookahead, data.len());
        assert_eq!(io.avail_in(), 0);
        assert_eq!(adler.value(), 0x11E6_0398);
        assert_eq!(window.byte(0), b'W');
    }

    #[test]
    fn test_finds_repeat() {
        let data = b"abcdefabcdefabcdef";
        let mut window = window_with(data, 9);

        let mut heads = Vec::new();
        for _ in 0..12 {
            heads.push(window.insert_string());
            window.str_start += 1;
            window.lookahead -= 1;
        }
        // Position 0 reads as empty.
        assert_eq!(heads[6], 0);
        assert_eq!(heads[7], 1);

        let hash_head = window.insert_string();
        assert_eq!(hash_head, 6);
        assert!(window.in_range(hash_head));
        let len = window.longest_match(hash_head);
        assert_eq!(len, 6);
        assert_eq!(window.match_start, 6);
    }

    #[test]
    fn test_match_clamped_to_lookahead() {
        let data = vec![b'z'; 20];
        let mut window = window_with(&data, 9);
        window.insert_string();
        window.str_start += 1;
        window.lookahead -= 1;
        let hash_head = window.insert_string();
        assert_eq!(hash_head, 0);

        window.str_start += 1;
        window.lookahead -= 1;
        let hash_head = window.insert_string();
        assert_eq!(hash_head, 1);
        let len = window.longest_match(hash_head);
        assert_eq!(len, window.lookahead);
        assert_eq!(len, 18);
    }

    #[test]
    fn test_slide_rebases_positions() {
        let mut window = SlidingWindow::new(9, 8);
        window.configure(&LevelConfig::for_level(6));
        let data: Vec<u8> = (0..2000u32).map(|i| (i % 7) as u8).collect();
        let mut out = [0u8; 0];
        let mut io = StreamIo::new(&data, &mut out);

        window.fill_window(&mut io, None);
        assert_eq!(window.lookahead, 1024);

        // Consume everything up to the last position matched before a slide.
        let w_size = window.w_size();
        let threshold = w_size + window.max_dist();
        while window.str_start < threshold {
            window.insert_string();
            window.str_start += 1;
            window.lookahead -= 1;
        }
        window.fill_window(&mut io, None);
        assert_eq!(window.str_start, threshold);

        window.insert_string();
        window.str_start += 1;
        window.lookahead -= 1;
        window.block_start = window.str_start as isize;
        let before = window.str_start;
        let head_before = window.head.clone();

        window.fill_window(&mut io, None);
        assert_eq!(window.str_start, before - w_size);
        assert_eq!(window.block_start, (before - w_size) as isize);
        for (old, new) in head_before.iter().zip(&window.head) {
            let expected = old.saturating_sub(w_size as u32);
            assert_eq!(*new, expected);
        }
        assert!(window.lookahead >= MIN_LOOKAHEAD || io.avail_in() == 0);
    }

    #[test]
    fn test_dictionary_tail_is_used() {
        let mut window = SlidingWindow::new(9, 8);
        let dictionary: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        window.set_dictionary(&dictionary);

        let max = 512 - MIN_LOOKAHEAD;
        assert_eq!(window.str_start, max);
        assert_eq!(window.block_start, max as isize);
        assert_eq!(window.byte(0), dictionary[1000 - max]);
        assert_eq!(window.byte(max - 1), dictionary[999]);
    }

    #[test]
    fn test_check_positions() {
        let mut window = window_with(b"hello", 6);
        assert!(window.check_positions().is_ok());
        window.block_start = 3;
        assert!(window.check_positions().unwrap_err().is_fatal());
    }

    #[test]
    fn test_short_dictionary_ignored() {
        let mut window = SlidingWindow::new(9, 8);
        window.set_dictionary(b"ab");
        assert_eq!(window.str_start, 0);
    }
}
