//! Compression configuration.
//!
//! [`DeflateConfig`] collects the knobs of a session: level, window size,
//! memory level, strategy and output format. The level selects a row of
//! the tuning table ([`LevelConfig`]) that drives the match finder.

use oxiflate_core::error::{OxiFlateError, Result};
use oxiflate_core::traits::CompressionLevel;

/// Smallest supported base-two logarithm of the window size.
pub const MIN_WINDOW_BITS: u8 = 9;
/// Largest supported base-two logarithm of the window size (32 KiB).
pub const MAX_WINDOW_BITS: u8 = 15;
/// Smallest memory level.
pub const MIN_MEM_LEVEL: u8 = 1;
/// Largest memory level.
pub const MAX_MEM_LEVEL: u8 = 9;
/// Memory level used by default.
pub const DEFAULT_MEM_LEVEL: u8 = 8;

/// Match-finding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Normal LZ77 matching.
    #[default]
    Default,
    /// Favour literals over short matches; for data produced by a filter
    /// or predictor with small values and a somewhat random distribution.
    Filtered,
    /// Huffman coding only, no string matching.
    HuffmanOnly,
}

impl TryFrom<i32> for Strategy {
    type Error = OxiFlateError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Default),
            1 => Ok(Self::Filtered),
            2 => Ok(Self::HuffmanOnly),
            other => Err(OxiFlateError::invalid_parameter(
                "strategy",
                other as i64,
                "0..=2",
            )),
        }
    }
}

/// Stream wrapping around the DEFLATE data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Bare DEFLATE blocks, no header, no checksum.
    Raw,
    /// zlib header and Adler-32 trailer (RFC 1950).
    #[default]
    Zlib,
    /// gzip header and CRC-32 trailer (RFC 1952).
    Gzip,
}

impl Format {
    /// Bytes of header and trailer added around the DEFLATE data, without
    /// optional gzip header fields or a dictionary id.
    pub fn overhead(self) -> usize {
        match self {
            Self::Raw => 0,
            Self::Zlib => 2 + 4,
            Self::Gzip => 10 + 8,
        }
    }
}

/// Block routine a level runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFunction {
    /// No compression, stored blocks only.
    Stored,
    /// Greedy matching.
    Fast,
    /// Lazy matching.
    Slow,
}

/// Matcher tuning for one compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    /// Reduce the lazy search above this match length.
    pub good_length: u16,
    /// Do not perform a lazy search above this match length. For the fast
    /// routine, the longest match whose positions are all hashed.
    pub max_lazy: u16,
    /// Quit the search above this match length.
    pub nice_length: u16,
    /// Longest hash chain walked per search.
    pub max_chain: u16,
    /// Block routine.
    pub func: BlockFunction,
}

const fn row(good: u16, lazy: u16, nice: u16, chain: u16, func: BlockFunction) -> LevelConfig {
    LevelConfig {
        good_length: good,
        max_lazy: lazy,
        nice_length: nice,
        max_chain: chain,
        func,
    }
}

/// Tuning table indexed by level.
pub const CONFIG_TABLE: [LevelConfig; 10] = [
    row(0, 0, 0, 0, BlockFunction::Stored),
    row(4, 4, 8, 4, BlockFunction::Fast),
    row(4, 5, 16, 8, BlockFunction::Fast),
    row(4, 6, 32, 32, BlockFunction::Fast),
    row(4, 4, 16, 16, BlockFunction::Slow),
    row(8, 16, 32, 32, BlockFunction::Slow),
    row(8, 16, 128, 128, BlockFunction::Slow),
    row(8, 32, 128, 256, BlockFunction::Slow),
    row(32, 128, 258, 1024, BlockFunction::Slow),
    row(32, 258, 258, 4096, BlockFunction::Slow),
];

impl LevelConfig {
    /// Table row of `level` (0..=9).
    pub fn for_level(level: u8) -> Self {
        CONFIG_TABLE[level.min(9) as usize]
    }
}

/// Settings of a compression session.
///
/// # Example
///
/// ```
/// use oxiflate_deflate::config::{DeflateConfig, Format, Strategy};
///
/// let config = DeflateConfig::new()
///     .level(9)
///     .format(Format::Gzip)
///     .strategy(Strategy::Filtered);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.window_size(), 32768);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeflateConfig {
    /// Compression level 0..=9.
    pub level: u8,
    /// Base-two logarithm of the window size, 9..=15.
    pub window_bits: u8,
    /// Memory level 1..=9; sizes the hash table and the symbol buffer.
    pub mem_level: u8,
    /// Match-finding strategy.
    pub strategy: Strategy,
    /// Stream wrapping.
    pub format: Format,
}

impl Default for DeflateConfig {
    fn default() -> Self {
        Self {
            level: CompressionLevel::DEFAULT.level(),
            window_bits: MAX_WINDOW_BITS,
            mem_level: DEFAULT_MEM_LEVEL,
            strategy: Strategy::Default,
            format: Format::Zlib,
        }
    }
}

impl From<CompressionLevel> for DeflateConfig {
    fn from(level: CompressionLevel) -> Self {
        Self::default().level(level.level())
    }
}

impl DeflateConfig {
    /// Default settings: level 6, 32 KiB window, memory level 8, zlib.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression level.
    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Set the window size as a base-two logarithm.
    pub fn window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = window_bits;
        self
    }

    /// Set the memory level.
    pub fn mem_level(mut self, mem_level: u8) -> Self {
        self.mem_level = mem_level;
        self
    }

    /// Set the strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the stream format.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<()> {
        validate_level(self.level)?;
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&self.window_bits) {
            return Err(OxiFlateError::invalid_parameter(
                "window_bits",
                self.window_bits as i64,
                "9..=15",
            ));
        }
        if !(MIN_MEM_LEVEL..=MAX_MEM_LEVEL).contains(&self.mem_level) {
            return Err(OxiFlateError::invalid_parameter(
                "mem_level",
                self.mem_level as i64,
                "1..=9",
            ));
        }
        Ok(())
    }

    /// Window size in bytes.
    pub fn window_size(&self) -> usize {
        1 << self.window_bits
    }

    /// Base-two logarithm of the hash table size.
    pub fn hash_bits(&self) -> u32 {
        self.mem_level as u32 + 7
    }

    /// Symbols buffered per block, plus one.
    pub fn lit_bufsize(&self) -> usize {
        1 << (self.mem_level + 6)
    }

    /// Initial capacity of the pending output buffer.
    pub fn pending_buf_size(&self) -> usize {
        self.lit_bufsize() * 4
    }
}

/// Check a compression level.
pub fn validate_level(level: u8) -> Result<()> {
    CompressionLevel::new(level).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeflateConfig::default();
        assert_eq!(config.level, 6);
        assert_eq!(config.window_bits, 15);
        assert_eq!(config.mem_level, 8);
        assert_eq!(config.strategy, Strategy::Default);
        assert_eq!(config.format, Format::Zlib);
        assert_eq!(config.lit_bufsize(), 16384);
        assert_eq!(config.pending_buf_size(), 65536);
        assert_eq!(config.hash_bits(), 15);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(DeflateConfig::new().level(10).validate().is_err());
        assert!(DeflateConfig::new().window_bits(8).validate().is_err());
        assert!(DeflateConfig::new().window_bits(16).validate().is_err());
        assert!(DeflateConfig::new().mem_level(0).validate().is_err());
        assert!(DeflateConfig::new().mem_level(10).validate().is_err());
        assert!(
            DeflateConfig::new()
                .window_bits(9)
                .mem_level(1)
                .level(0)
                .validate()
                .is_ok()
        );

        let err = DeflateConfig::new().level(42).validate().unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("level"));
    }

    #[test]
    fn test_level_table() {
        assert_eq!(LevelConfig::for_level(0).func, BlockFunction::Stored);
        assert_eq!(LevelConfig::for_level(3).func, BlockFunction::Fast);
        assert_eq!(LevelConfig::for_level(4).func, BlockFunction::Slow);
        let best = LevelConfig::for_level(9);
        assert_eq!(
            (best.good_length, best.max_lazy, best.nice_length, best.max_chain),
            (32, 258, 258, 4096)
        );
        let default = LevelConfig::for_level(6);
        assert_eq!(
            (
                default.good_length,
                default.max_lazy,
                default.nice_length,
                default.max_chain
            ),
            (8, 16, 128, 128)
        );
    }

    #[test]
    fn test_strategy_from_i32() {
        assert_eq!(Strategy::try_from(0).unwrap(), Strategy::Default);
        assert_eq!(Strategy::try_from(2).unwrap(), Strategy::HuffmanOnly);
        assert!(Strategy::try_from(3).is_err());
        assert!(Strategy::try_from(-1).is_err());
    }

    #[test]
    fn test_from_compression_level() {
        let config = DeflateConfig::from(CompressionLevel::BEST);
        assert_eq!(config.level, 9);
        assert_eq!(config.format, Format::Zlib);
    }
}
