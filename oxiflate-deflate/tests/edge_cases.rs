//! Edge case tests for DEFLATE compression.

mod support;

use oxiflate_deflate::config::{DeflateConfig, Format, Strategy};
use oxiflate_deflate::deflate::Deflater;
use oxiflate_deflate::{compress_with, deflate, zlib_compress};
use support::{compress_chunked, inflate, random};

fn roundtrip(input: &[u8], level: u8) -> Vec<u8> {
    let compressed = deflate(input, level).unwrap();
    assert_eq!(inflate(Format::Raw, &compressed), input, "level {level}");
    compressed
}

#[test]
fn test_empty_input() {
    for level in 0..=9 {
        roundtrip(b"", level);
    }
}

#[test]
fn test_single_byte() {
    let compressed = roundtrip(b"A", 6);
    // One static block: header, literal, end of block.
    assert_eq!(compressed.len(), 3);
}

#[test]
fn test_all_zeros() {
    let input = vec![0u8; 1000];
    let compressed = roundtrip(&input, 6);
    assert!(compressed.len() < input.len() / 10);
}

#[test]
fn test_all_same_byte() {
    let input = vec![255u8; 5000];
    let compressed = roundtrip(&input, 6);
    assert!(compressed.len() < input.len() / 20);
}

#[test]
fn test_max_match_length() {
    let input = vec![42u8; 258 * 10];
    for level in [1, 4, 9] {
        roundtrip(&input, level);
    }
}

#[test]
fn test_three_hundred_a() {
    let input = vec![b'A'; 300];
    let compressed = zlib_compress(&input, 6).unwrap();
    assert!(compressed.len() < 20, "{} bytes", compressed.len());
    assert_eq!(inflate(Format::Zlib, &compressed), input);
}

#[test]
fn test_alternating_pattern() {
    let input: Vec<u8> = (0..1000)
        .map(|i| if i % 2 == 0 { b'A' } else { b'B' })
        .collect();
    roundtrip(&input, 6);
}

#[test]
fn test_large_input() {
    let input = b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(1024 * 1024)
        .collect::<Vec<u8>>();
    let compressed = roundtrip(&input, 5);
    assert!(compressed.len() < input.len() / 100);
}

#[test]
fn test_incremental_pattern() {
    let input: Vec<u8> = (0..=255u8)
        .flat_map(|b| std::iter::repeat_n(b, 10))
        .collect();
    for level in 0..=9 {
        roundtrip(&input, level);
    }
}

#[test]
fn test_stored_level_is_larger() {
    let input = b"Hello, world! This is a test of DEFLATE compression with various levels.";
    let stored = roundtrip(input, 0);
    assert_eq!(stored.len(), input.len() + 5);
}

#[test]
fn test_binary_data() {
    let input: Vec<u8> = (0..=255).cycle().take(5000).collect();
    roundtrip(&input, 6);
}

#[test]
fn test_long_distance_match() {
    let mut input = vec![0u8; 32768];
    let pattern = b"PATTERN_TO_MATCH";
    input[..pattern.len()].copy_from_slice(pattern);
    input[32768 - pattern.len()..].copy_from_slice(pattern);
    for level in [1, 6, 9] {
        roundtrip(&input, level);
    }
}

#[test]
fn test_window_slides_many_times() {
    let input = support::text_like(300_000, 7);
    for level in [0, 1, 3, 6, 9] {
        roundtrip(&input, level);
    }
}

#[test]
fn test_utf8_text() {
    let input = "Grüße, 世界! Здравствуй, мир! 🌍🌎🌏 ".repeat(200);
    for level in [1, 6, 9] {
        roundtrip(input.as_bytes(), level);
    }
}

#[test]
fn test_small_window_and_memory() {
    let input = support::text_like(100_000, 3);
    for window_bits in [9, 12, 15] {
        for mem_level in [1, 5, 9] {
            let config = DeflateConfig::new()
                .window_bits(window_bits)
                .mem_level(mem_level)
                .format(Format::Zlib);
            let compressed = compress_with(config, &input).unwrap();
            assert_eq!(compressed[0], 0x08 | ((window_bits - 8) << 4));
            assert_eq!(inflate(Format::Zlib, &compressed), input);
        }
    }
}

#[test]
fn test_strategies() {
    let input = support::text_like(50_000, 11);
    for strategy in [Strategy::Default, Strategy::Filtered, Strategy::HuffmanOnly] {
        for level in [1, 6] {
            let config = DeflateConfig::new()
                .level(level)
                .strategy(strategy)
                .format(Format::Raw);
            let compressed = compress_with(config, &input).unwrap();
            assert_eq!(inflate(Format::Raw, &compressed), input, "{strategy:?}");
        }
    }

    // Huffman-only output has no matches, so it only shrinks by entropy.
    let runs = vec![b'x'; 10_000];
    let huffman = compress_with(
        DeflateConfig::new().strategy(Strategy::HuffmanOnly).format(Format::Raw),
        &runs,
    )
    .unwrap();
    let matched = deflate(&runs, 6).unwrap();
    assert!(huffman.len() > matched.len());
    assert!(huffman.len() > 10_000 / 8);
}

/// A repeat at the longest allowed distance whose second copy starts right
/// before the window slides, so the lazy matcher carries the match across
/// the slide.
#[test]
fn test_farthest_match_across_slide() {
    let patterns: [(u32, &[u8]); 3] = [(1, b"QRSTUV"), (2, b"xyz"), (3, b"0123456789abcdefghij")];

    for window_bits in [9u8, 10, 12] {
        let w_size = 1usize << window_bits;
        let max_dist = w_size - 262;

        for second in [w_size + max_dist - 1, w_size + max_dist] {
            let first = second - max_dist;
            for (seed, pattern) in patterns {
                let mut input = random(2 * w_size, seed);
                input[first..first + pattern.len()].copy_from_slice(pattern);
                input[second..second + pattern.len()].copy_from_slice(pattern);

                for level in 4..=9 {
                    let config = DeflateConfig::new()
                        .level(level)
                        .window_bits(window_bits)
                        .format(Format::Zlib);
                    let one_shot = compress_with(config, &input).unwrap();
                    assert_eq!(
                        inflate(Format::Zlib, &one_shot),
                        input,
                        "window_bits {window_bits} level {level} at {second}"
                    );

                    let mut deflater = Deflater::new(config).unwrap();
                    let bytewise = compress_chunked(&mut deflater, &input, 1, 64);
                    assert_eq!(bytewise, one_shot, "window_bits {window_bits} level {level}");
                }
            }
        }
    }
}
