//! Shared helpers for the integration tests: deterministic data generators
//! and decoders backed by an independent inflate implementation.

#![allow(dead_code)]

use std::io::Read;

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use oxiflate_core::traits::{CompressStatus, FlushMode};
use oxiflate_deflate::config::Format;
use oxiflate_deflate::deflate::Deflater;

/// LCG bytes; high entropy, reproducible.
pub fn random(size: usize, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed = seed;
    for _ in 0..size {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
        data.push((seed >> 16) as u8);
    }
    data
}

/// Word salad that compresses like English text.
pub fn text_like(size: usize, seed: u32) -> Vec<u8> {
    let words: &[&[u8]] = &[
        b"the", b"quick", b"brown", b"fox", b"jumps", b"over", b"lazy", b"dog", b"and", b"runs",
        b"through", b"forest", b"near", b"river", b"under", b"blue", b"sky", b"with", b"wind",
        b"blowing",
    ];
    let mut data = Vec::with_capacity(size + 8);
    let mut seed = seed;
    while data.len() < size {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
        data.extend_from_slice(words[(seed >> 16) as usize % words.len()]);
        data.push(if seed & 0x0F00 == 0 { b'\n' } else { b' ' });
    }
    data.truncate(size);
    data
}

/// Decode a complete stream of the given format.
pub fn inflate(format: Format, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    match format {
        Format::Raw => DeflateDecoder::new(data).read_to_end(&mut out),
        Format::Zlib => ZlibDecoder::new(data).read_to_end(&mut out),
        Format::Gzip => GzDecoder::new(data).read_to_end(&mut out),
    }
    .expect("stream should decode");
    out
}

/// Decode raw DEFLATE data compressed against `dictionary`, by prefixing a
/// non-final stored block that holds the dictionary.
pub fn inflate_with_dictionary(raw: &[u8], dictionary: &[u8]) -> Vec<u8> {
    let len = dictionary.len() as u16;
    let mut stream = vec![0x00];
    stream.extend_from_slice(&len.to_le_bytes());
    stream.extend_from_slice(&(!len).to_le_bytes());
    stream.extend_from_slice(dictionary);
    stream.extend_from_slice(raw);
    let mut out = inflate(Format::Raw, &stream);
    out.split_off(dictionary.len())
}

/// Feed `input` in `in_chunk` pieces, then finish, collecting output
/// through a buffer of `out_chunk` bytes.
pub fn compress_chunked(
    deflater: &mut Deflater,
    input: &[u8],
    in_chunk: usize,
    out_chunk: usize,
) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; out_chunk];

    for piece in input.chunks(in_chunk.max(1)) {
        let mut pos = 0;
        loop {
            let (consumed, produced, status) = deflater
                .compress(&piece[pos..], &mut buf, FlushMode::None)
                .expect("compress");
            pos += consumed;
            out.extend_from_slice(&buf[..produced]);
            if status == CompressStatus::NeedsInput && pos == piece.len() {
                break;
            }
        }
    }

    finish(deflater, &mut out, &mut buf);
    out
}

/// Drive `deflater` with `flush` and no new input until it asks for input.
pub fn flush(deflater: &mut Deflater, mode: FlushMode, out: &mut Vec<u8>, buf: &mut [u8]) {
    loop {
        let (_, produced, status) = deflater.compress(&[], buf, mode).expect("flush");
        out.extend_from_slice(&buf[..produced]);
        if status != CompressStatus::NeedsOutput {
            return;
        }
    }
}

/// Drive `deflater` to the end of the stream.
pub fn finish(deflater: &mut Deflater, out: &mut Vec<u8>, buf: &mut [u8]) {
    loop {
        let (_, produced, status) = deflater
            .compress(&[], buf, FlushMode::Finish)
            .expect("finish");
        out.extend_from_slice(&buf[..produced]);
        if status == CompressStatus::Done {
            return;
        }
    }
}
