//! Streaming DEFLATE compression session.
//!
//! A [`Deflater`] owns everything one compressed stream needs: the sliding
//! window and match finder, the block encoder with its Huffman trees, the
//! bit writer holding pending output, and the rolling checksum of the
//! wrapper format. Callers push input and a [`FlushMode`] through
//! [`Deflater::compress`] and collect output until [`CompressStatus::Done`].
//!
//! ## Example
//!
//! ```rust
//! use oxiflate_core::traits::{CompressStatus, FlushMode};
//! use oxiflate_deflate::config::{DeflateConfig, Format};
//! use oxiflate_deflate::deflate::Deflater;
//!
//! let mut deflater = Deflater::new(DeflateConfig::new().format(Format::Gzip)).unwrap();
//! let mut out = vec![0u8; 128];
//! let (consumed, produced, status) = deflater
//!     .compress(b"hello hello hello", &mut out, FlushMode::Finish)
//!     .unwrap();
//! assert_eq!(consumed, 17);
//! assert_eq!(status, CompressStatus::Done);
//! assert_eq!(&out[..3], &[0x1F, 0x8B, 0x08]);
//! assert!(produced > 18);
//! ```

use oxiflate_core::bitstream::BitWriter;
use oxiflate_core::checksum::{Adler32, Checksum};
use oxiflate_core::crc::Crc32;
use oxiflate_core::error::{OxiFlateError, Result};
use oxiflate_core::traits::{CompressStatus, Compressor, FlushMode};

use crate::block::{BlockEncoder, DataType};
use crate::config::{BlockFunction, DeflateConfig, Format, LevelConfig, Strategy, validate_level};
use crate::gzip::GzipHeader;
use crate::stream::StreamIo;
use crate::tables::{MIN_LOOKAHEAD, MIN_MATCH};
use crate::window::SlidingWindow;

/// Compression method 8 in the zlib CMF byte.
const Z_DEFLATED: u32 = 8;
/// FDICT bit of the zlib FLG byte.
const PRESET_DICT: u32 = 0x20;
/// A 3-byte match farther back than this is not worth its distance code.
const TOO_FAR: usize = 4096;

/// Where the session is in its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// Header not written yet.
    Init,
    /// Accepting input.
    Busy,
    /// Final block started; only draining remains.
    Finish,
}

/// Outcome of one run of a block routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    /// Input or output exhausted before the block ended.
    NeedMore,
    /// A block was flushed for a non-finish flush request.
    BlockDone,
    /// The final block was started but the output filled up.
    FinishStarted,
    /// The final block was written.
    FinishDone,
}

/// Outcome of one [`Deflater::compress`] step before mapping to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Progress,
    Idle,
    StreamEnd,
}

/// Streaming DEFLATE compressor with raw, zlib or gzip wrapping.
#[derive(Debug, Clone)]
pub struct Deflater {
    config: DeflateConfig,
    level_config: LevelConfig,
    status: Status,
    window: SlidingWindow,
    blocks: BlockEncoder,
    bits: BitWriter,
    checksum: Box<dyn Checksum>,
    gzip_header: Option<GzipHeader>,
    /// Flush mode of the previous call; `None` after the output filled up.
    last_flush: Option<FlushMode>,
    pending_buf_size: usize,
    dictionary: bool,
    trailer_written: bool,
    done: bool,
    total_in: u64,
    total_out: u64,
    poisoned: Option<OxiFlateError>,
}

/// Saved copy of an in-progress session, see [`Deflater::snapshot`].
#[derive(Debug, Clone)]
pub struct DeflateSnapshot {
    state: Box<Deflater>,
}

impl Deflater {
    /// Create a session. The checksum is Adler-32 for zlib and CRC-32 for
    /// gzip.
    pub fn new(config: DeflateConfig) -> Result<Self> {
        let checksum: Box<dyn Checksum> = match config.format {
            Format::Gzip => Box::new(Crc32::new()),
            Format::Raw | Format::Zlib => Box::new(Adler32::new()),
        };
        Self::with_checksum(config, checksum)
    }

    /// Create a session that feeds the trailer from a caller-supplied
    /// checksum.
    pub fn with_checksum(config: DeflateConfig, checksum: Box<dyn Checksum>) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            level = config.level,
            window_bits = config.window_bits,
            mem_level = config.mem_level,
            strategy = ?config.strategy,
            format = ?config.format,
            "deflate session created"
        );
        Ok(Self::build(config, checksum))
    }

    fn build(config: DeflateConfig, checksum: Box<dyn Checksum>) -> Self {
        let level_config = LevelConfig::for_level(config.level);
        let mut window = SlidingWindow::new(config.window_bits, config.hash_bits());
        window.configure(&level_config);
        let pending_buf_size = config.pending_buf_size();

        Self {
            config,
            level_config,
            status: initial_status(config.format),
            window,
            blocks: BlockEncoder::new(config.lit_bufsize(), config.level),
            bits: BitWriter::with_capacity(pending_buf_size),
            checksum,
            gzip_header: None,
            last_flush: Some(FlushMode::None),
            pending_buf_size,
            dictionary: false,
            trailer_written: false,
            done: false,
            total_in: 0,
            total_out: 0,
            poisoned: None,
        }
    }

    /// Current settings, including changes made by [`set_params`](Self::set_params).
    pub fn config(&self) -> &DeflateConfig {
        &self.config
    }

    /// Total input bytes consumed.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total output bytes produced.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Running checksum value. Before the header is written this is the
    /// checksum of the preset dictionary, if any.
    pub fn adler(&self) -> u32 {
        self.checksum.value()
    }

    /// Binary/text guess made from the first block.
    pub fn data_type(&self) -> DataType {
        self.blocks.data_type()
    }

    /// Upper bound of the compressed size of `source_len` bytes with the
    /// current settings, for a stream produced without intermediate
    /// flushes.
    pub fn bound(&self, source_len: usize) -> usize {
        let optional = match self.config.format {
            Format::Raw => 0,
            Format::Zlib if self.dictionary => 4,
            Format::Zlib => 0,
            Format::Gzip => self
                .gzip_header
                .as_ref()
                .map_or(0, |h| h.to_bytes(self.config.level).len() - 10),
        };
        compress_bound(source_len) + self.config.format.overhead() + optional
    }

    /// Whether the stream has been completely delivered.
    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Return to the state right after construction, keeping the current
    /// level, strategy, gzip header and allocations.
    pub fn reset(&mut self) {
        self.window.reset();
        self.window.configure(&self.level_config);
        self.blocks.reset();
        self.bits.reset();
        self.checksum.reset();
        self.status = initial_status(self.config.format);
        self.last_flush = Some(FlushMode::None);
        self.dictionary = false;
        self.trailer_written = false;
        self.done = false;
        self.total_in = 0;
        self.total_out = 0;
        self.poisoned = None;
        tracing::debug!("deflate session reset");
    }

    /// Copy the complete session state.
    pub fn snapshot(&self) -> DeflateSnapshot {
        DeflateSnapshot {
            state: Box::new(self.clone()),
        }
    }

    /// Return to a state saved with [`snapshot`](Self::snapshot). The
    /// snapshot stays usable.
    pub fn restore(&mut self, snapshot: &DeflateSnapshot) {
        self.clone_from(&snapshot.state);
    }

    /// Use `header` for the gzip header. Only valid for gzip streams before
    /// the header has been written.
    pub fn set_gzip_header(&mut self, header: GzipHeader) -> Result<()> {
        self.check_poisoned()?;
        if self.config.format != Format::Gzip {
            return Err(OxiFlateError::stream_state(
                "gzip header on a stream without gzip wrapping",
            ));
        }
        if self.status != Status::Init {
            return Err(OxiFlateError::stream_state(
                "gzip header after the header was written",
            ));
        }
        header.validate()?;
        self.gzip_header = Some(header);
        Ok(())
    }

    /// Prime the window with a preset dictionary.
    ///
    /// zlib streams accept a dictionary until the header is written; the
    /// header then carries its Adler-32. Raw streams accept one before any
    /// input. gzip has no way to signal a dictionary.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) -> Result<()> {
        self.check_poisoned()?;
        match self.config.format {
            Format::Gzip => {
                return Err(OxiFlateError::stream_state(
                    "preset dictionary with gzip wrapping",
                ));
            }
            Format::Zlib if self.status != Status::Init => {
                return Err(OxiFlateError::stream_state(
                    "preset dictionary after the header was written",
                ));
            }
            Format::Raw if self.total_in != 0 || self.window.lookahead != 0 => {
                return Err(OxiFlateError::stream_state(
                    "preset dictionary after input was consumed",
                ));
            }
            _ => {}
        }

        // A second dictionary replaces the first.
        self.window.reset();
        if self.config.format == Format::Zlib {
            self.checksum.reset();
            self.checksum.update(dictionary);
        }
        self.window.set_dictionary(dictionary);
        self.dictionary = self.window.str_start != 0;
        Ok(())
    }

    /// Change level and strategy mid-stream.
    ///
    /// When the level switches to a different block routine after input
    /// has been consumed, the data so far is first compressed with a
    /// partial flush into `output`. Returns the bytes written there. The
    /// new parameters are applied only once that flush is complete; on
    /// [`CompressStatus::NeedsOutput`] call again with more output space.
    pub fn set_params(
        &mut self,
        level: u8,
        strategy: Strategy,
        output: &mut [u8],
    ) -> Result<(usize, CompressStatus)> {
        self.check_poisoned()?;
        validate_level(level)?;

        let new_config = LevelConfig::for_level(level);
        let func_changed = new_config.func != self.level_config.func;
        let mut produced = 0;

        if func_changed && self.total_in != 0 {
            let (_, n, _) = self.compress(&[], output, FlushMode::Partial)?;
            produced = n;
            let clean = self.window.lookahead == 0
                && !self.window.match_available
                && self.window.block_len() == 0;
            if !clean {
                return Ok((produced, CompressStatus::NeedsOutput));
            }
        }

        if func_changed {
            if self.level_config.func == BlockFunction::Stored {
                self.window.clear_hash();
            }
            self.window.prev_length = MIN_MATCH - 1;
            self.window.match_length = MIN_MATCH - 1;
        }

        tracing::debug!(
            from_level = self.config.level,
            to_level = level,
            from_strategy = ?self.config.strategy,
            to_strategy = ?strategy,
            "compression parameters changed"
        );

        self.config.level = level;
        self.config.strategy = strategy;
        self.level_config = new_config;
        self.window.configure(&new_config);
        self.blocks.set_level(level);

        Ok((produced, CompressStatus::NeedsInput))
    }

    /// Compress from `input` into `output`.
    ///
    /// Returns the bytes consumed, the bytes produced and the status. With
    /// [`FlushMode::Finish`] the call is repeated with fresh output space
    /// until [`CompressStatus::Done`]; further input is then refused.
    pub fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)> {
        self.check_poisoned()?;

        if self.status == Status::Finish {
            if flush != FlushMode::Finish {
                return Err(OxiFlateError::stream_state(format!(
                    "{flush:?} flush after the stream was finished"
                )));
            }
            if !input.is_empty() {
                return Err(OxiFlateError::stream_state(
                    "input supplied after the stream was finished",
                ));
            }
            if self.done {
                return Ok((0, 0, CompressStatus::Done));
            }
        }

        if output.is_empty() {
            return Ok((0, 0, CompressStatus::NeedsOutput));
        }

        if let Err(err) = self.window.check_positions() {
            tracing::error!(%err, "deflate session poisoned");
            self.poisoned = Some(err.clone());
            return Err(err);
        }

        let mut io = StreamIo::new(input, output);
        let step = self.step(&mut io, flush);
        let consumed = io.consumed();
        let produced = io.produced();
        let out_full = io.avail_out() == 0;

        self.total_in += consumed as u64;
        self.total_out += produced as u64;

        let status = match step {
            Step::StreamEnd => {
                self.done = true;
                tracing::debug!(
                    total_in = self.total_in,
                    total_out = self.total_out,
                    "stream finished"
                );
                CompressStatus::Done
            }
            Step::Progress if out_full => CompressStatus::NeedsOutput,
            Step::Progress | Step::Idle => CompressStatus::NeedsInput,
        };
        Ok((consumed, produced, status))
    }

    fn check_poisoned(&self) -> Result<()> {
        match &self.poisoned {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn step(&mut self, io: &mut StreamIo<'_>, flush: FlushMode) -> Step {
        let old_flush = self.last_flush;
        self.last_flush = Some(flush);

        if self.status == Status::Init {
            self.write_header();
        }

        if self.bits.has_pending() {
            io.flush_pending(&mut self.bits);
            if io.avail_out() == 0 {
                // Only pending bytes were moved; the engine state is as the
                // previous call left it.
                self.last_flush = old_flush;
                return Step::Progress;
            }
        }

        // A flush that is no stronger than the last completed one has
        // nothing to add. Running it again would repeat the flush marker.
        if io.avail_in() == 0 && Some(flush) <= old_flush && flush != FlushMode::Finish {
            return Step::Idle;
        }

        if io.avail_in() != 0
            || self.window.lookahead != 0
            || (flush != FlushMode::None && self.status != Status::Finish)
        {
            let bstate = match self.level_config.func {
                BlockFunction::Stored => self.deflate_stored(io, flush),
                BlockFunction::Fast => self.deflate_fast(io, flush),
                BlockFunction::Slow => self.deflate_slow(io, flush),
            };

            if matches!(bstate, BlockState::FinishStarted | BlockState::FinishDone) {
                self.status = Status::Finish;
            }

            match bstate {
                BlockState::NeedMore | BlockState::FinishStarted => {
                    if io.avail_out() == 0 {
                        self.last_flush = None;
                    }
                    return Step::Progress;
                }
                BlockState::BlockDone => {
                    if flush == FlushMode::Partial {
                        self.blocks.align(&mut self.bits);
                    } else {
                        self.blocks.stored_block(&mut self.bits, &[], false);
                        if flush == FlushMode::Full {
                            self.window.clear_hash();
                        }
                    }
                    io.flush_pending(&mut self.bits);
                    if io.avail_out() == 0 {
                        // The marker is complete in `bits`, so last_flush
                        // stays Some(flush): the next call only drains it.
                        // Clearing it would emit a second marker.
                        return Step::Progress;
                    }
                }
                BlockState::FinishDone => {}
            }
        }

        if flush != FlushMode::Finish {
            return Step::Progress;
        }
        if self.trailer_written || self.config.format == Format::Raw {
            return Step::StreamEnd;
        }

        self.write_trailer(io.consumed());
        self.trailer_written = true;
        io.flush_pending(&mut self.bits);
        if self.bits.has_pending() {
            Step::Progress
        } else {
            Step::StreamEnd
        }
    }

    fn write_header(&mut self) {
        match self.config.format {
            Format::Zlib => {
                let cmf = Z_DEFLATED + ((self.config.window_bits as u32 - 8) << 4);
                let level_flags = (self.config.level.saturating_sub(1) >> 1).min(3) as u32;
                let mut header = (cmf << 8) | (level_flags << 6);
                if self.dictionary {
                    header |= PRESET_DICT;
                }
                header += 31 - header % 31;
                self.bits.put_short_msb(header as u16);

                if self.dictionary {
                    let dict_id = self.checksum.value();
                    self.bits.put_short_msb((dict_id >> 16) as u16);
                    self.bits.put_short_msb(dict_id as u16);
                }
            }
            Format::Gzip => {
                let header = match &self.gzip_header {
                    Some(header) => header.to_bytes(self.config.level),
                    None => GzipHeader::default().to_bytes(self.config.level),
                };
                self.bits.put_bytes(&header);
            }
            Format::Raw => {}
        }

        self.checksum.reset();
        self.status = Status::Busy;
        tracing::debug!(format = ?self.config.format, dictionary = self.dictionary, "header written");
    }

    fn write_trailer(&mut self, consumed_now: usize) {
        let value = self.checksum.value();
        match self.config.format {
            Format::Zlib => {
                self.bits.put_short_msb((value >> 16) as u16);
                self.bits.put_short_msb(value as u16);
            }
            Format::Gzip => {
                let isize = (self.total_in + consumed_now as u64) as u32;
                self.bits.put_bytes(&value.to_le_bytes());
                self.bits.put_bytes(&isize.to_le_bytes());
            }
            Format::Raw => {}
        }
    }

    fn fill_window(&mut self, io: &mut StreamIo<'_>) {
        let checksum: Option<&mut dyn Checksum> = match self.config.format {
            Format::Raw => None,
            Format::Zlib | Format::Gzip => Some(self.checksum.as_mut()),
        };
        self.window.fill_window(io, checksum);
    }

    /// End the current block and move pending bytes to the output.
    fn flush_block_only(&mut self, io: &mut StreamIo<'_>, eof: bool) {
        let stored_len = self.window.block_len();
        self.blocks.flush_block(
            &mut self.bits,
            self.window.block_bytes(),
            stored_len,
            eof,
        );
        self.window.block_start = self.window.str_start as isize;
        io.flush_pending(&mut self.bits);
    }

    /// Common tail of the block routines once the lookahead is used up.
    /// The final block is always written; an empty non-final one is not.
    fn finish_block(&mut self, io: &mut StreamIo<'_>, flush: FlushMode) -> BlockState {
        if flush == FlushMode::Finish {
            self.flush_block_only(io, true);
            return if io.avail_out() == 0 {
                BlockState::FinishStarted
            } else {
                BlockState::FinishDone
            };
        }

        if self.window.block_len() != 0 {
            self.flush_block_only(io, false);
            if io.avail_out() == 0 {
                return BlockState::NeedMore;
            }
        }
        BlockState::BlockDone
    }

    /// Copy input into stored blocks without compression.
    fn deflate_stored(&mut self, io: &mut StreamIo<'_>, flush: FlushMode) -> BlockState {
        let max_block_size = 0xffff.min(self.pending_buf_size - 5) as isize;

        loop {
            if self.window.lookahead <= 1 {
                self.fill_window(io);
                if self.window.lookahead == 0 {
                    if flush == FlushMode::None {
                        return BlockState::NeedMore;
                    }
                    break;
                }
            }

            self.window.str_start += self.window.lookahead;
            self.window.lookahead = 0;

            // Emit a stored block once the pending buffer would be full.
            let max_start = self.window.block_start + max_block_size;
            if self.window.str_start as isize >= max_start {
                self.window.lookahead = (self.window.str_start as isize - max_start) as usize;
                self.window.str_start = max_start as usize;
                self.flush_block_only(io, false);
                if io.avail_out() == 0 {
                    return BlockState::NeedMore;
                }
            }

            // Flush before the block start would slide out of the window.
            if self.window.block_len() >= self.window.max_dist() {
                self.flush_block_only(io, false);
                if io.avail_out() == 0 {
                    return BlockState::NeedMore;
                }
            }
        }

        self.finish_block(io, flush)
    }

    /// Greedy matching: take the longest match at each position.
    fn deflate_fast(&mut self, io: &mut StreamIo<'_>, flush: FlushMode) -> BlockState {
        let huffman_only = self.config.strategy == Strategy::HuffmanOnly;

        loop {
            if self.window.lookahead < MIN_LOOKAHEAD {
                self.fill_window(io);
                if self.window.lookahead < MIN_LOOKAHEAD && flush == FlushMode::None {
                    return BlockState::NeedMore;
                }
                if self.window.lookahead == 0 {
                    break;
                }
            }

            let mut hash_head = 0;
            if self.window.lookahead >= MIN_MATCH {
                hash_head = self.window.insert_string();
            }

            if !huffman_only && self.window.in_range(hash_head) {
                self.window.match_length = self.window.longest_match(hash_head);
            }

            let bflush;
            let w = &mut self.window;
            if w.match_length >= MIN_MATCH {
                bflush = self.blocks.tally_match(
                    w.str_start - w.match_start,
                    w.match_length - MIN_MATCH,
                    w.block_len(),
                );
                w.lookahead -= w.match_length;

                if w.match_length <= w.max_lazy_match() && w.lookahead >= MIN_MATCH {
                    // Hash every position the match covers.
                    w.match_length -= 1;
                    while w.match_length != 0 {
                        w.str_start += 1;
                        w.insert_string();
                        w.match_length -= 1;
                    }
                    w.str_start += 1;
                } else {
                    w.str_start += w.match_length;
                    w.match_length = 0;
                    w.prime_hash();
                }
            } else {
                bflush = self.blocks.tally_lit(w.byte(w.str_start), w.block_len());
                w.lookahead -= 1;
                w.str_start += 1;
            }

            if bflush {
                self.flush_block_only(io, false);
                if io.avail_out() == 0 {
                    return BlockState::NeedMore;
                }
            }
        }

        self.finish_block(io, flush)
    }

    /// Lazy matching: a match is only taken when the next position does
    /// not start a longer one.
    fn deflate_slow(&mut self, io: &mut StreamIo<'_>, flush: FlushMode) -> BlockState {
        let strategy = self.config.strategy;

        loop {
            if self.window.lookahead < MIN_LOOKAHEAD {
                self.fill_window(io);
                if self.window.lookahead < MIN_LOOKAHEAD && flush == FlushMode::None {
                    return BlockState::NeedMore;
                }
                if self.window.lookahead == 0 {
                    break;
                }
            }

            let mut hash_head = 0;
            if self.window.lookahead >= MIN_MATCH {
                hash_head = self.window.insert_string();
            }

            let w = &mut self.window;
            w.prev_length = w.match_length;
            w.prev_match = w.match_start;
            w.match_length = MIN_MATCH - 1;

            if w.in_range(hash_head) && w.prev_length < w.max_lazy_match() {
                if strategy != Strategy::HuffmanOnly {
                    w.match_length = w.longest_match(hash_head);
                }
                if w.match_length <= 5
                    && (strategy == Strategy::Filtered
                        || (w.match_length == MIN_MATCH
                            && w.str_start.wrapping_sub(w.match_start) > TOO_FAR))
                {
                    w.match_length = MIN_MATCH - 1;
                }
            }

            if w.prev_length >= MIN_MATCH && w.match_length <= w.prev_length {
                // The previous match is at least as good: emit it.
                let max_insert = w.str_start + w.lookahead - MIN_MATCH;
                let bflush = self.blocks.tally_match(
                    (w.str_start - 1).wrapping_sub(w.prev_match),
                    w.prev_length - MIN_MATCH,
                    w.block_len(),
                );

                // Insert the covered strings; the first two are already in.
                w.lookahead -= w.prev_length - 1;
                w.prev_length -= 2;
                while w.prev_length != 0 {
                    w.str_start += 1;
                    if w.str_start <= max_insert {
                        w.insert_string();
                    }
                    w.prev_length -= 1;
                }
                w.match_available = false;
                w.match_length = MIN_MATCH - 1;
                w.str_start += 1;

                if bflush {
                    self.flush_block_only(io, false);
                    if io.avail_out() == 0 {
                        return BlockState::NeedMore;
                    }
                }
            } else if w.match_available {
                // No better match: emit the deferred literal.
                let bflush = self
                    .blocks
                    .tally_lit(w.byte(w.str_start - 1), w.block_len());
                if bflush {
                    self.flush_block_only(io, false);
                }
                self.window.str_start += 1;
                self.window.lookahead -= 1;
                if io.avail_out() == 0 {
                    return BlockState::NeedMore;
                }
            } else {
                w.match_available = true;
                w.str_start += 1;
                w.lookahead -= 1;
            }
        }

        if self.window.match_available {
            let w = &mut self.window;
            self.blocks
                .tally_lit(w.byte(w.str_start - 1), w.block_len());
            w.match_available = false;
        }

        self.finish_block(io, flush)
    }
}

impl Default for Deflater {
    /// Level 6 zlib session.
    fn default() -> Self {
        Self::build(DeflateConfig::default(), Box::new(Adler32::new()))
    }
}

impl Compressor for Deflater {
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)> {
        Deflater::compress(self, input, output, flush)
    }

    fn reset(&mut self) {
        Deflater::reset(self);
    }

    fn is_finished(&self) -> bool {
        self.done
    }
}

fn initial_status(format: Format) -> Status {
    match format {
        Format::Raw => Status::Busy,
        Format::Zlib | Format::Gzip => Status::Init,
    }
}

/// Upper bound of the raw DEFLATE size of `source_len` bytes, without any
/// wrapper.
pub fn compress_bound(source_len: usize) -> usize {
    source_len + source_len.div_ceil(8) + source_len.div_ceil(64) + 5
}
