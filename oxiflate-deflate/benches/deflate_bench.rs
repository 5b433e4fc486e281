//! Compression throughput across levels, data shapes and output chunking.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxiflate_core::traits::{CompressStatus, FlushMode};
use oxiflate_deflate::config::{DeflateConfig, Format, Strategy};
use oxiflate_deflate::deflate::Deflater;
use oxiflate_deflate::zlib::compress_with;
use std::hint::black_box;

mod test_data {
    /// LCG noise; mostly stored blocks.
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed = 12345u32;
        for _ in 0..size {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            data.push((seed >> 16) as u8);
        }
        data
    }

    /// Short period pattern; long matches everywhere.
    pub fn repeated(size: usize) -> Vec<u8> {
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
            .iter()
            .copied()
            .cycle()
            .take(size)
            .collect()
    }

    /// Words drawn at random from a small vocabulary.
    pub fn text_like(size: usize) -> Vec<u8> {
        let words: [&[u8]; 12] = [
            b"the ", b"of ", b"and ", b"compression ", b"window ", b"match ", b"literal ",
            b"block ", b"huffman ", b"stream ", b"data ", b"\n",
        ];
        let mut data = Vec::with_capacity(size + 16);
        let mut seed = 42u32;
        while data.len() < size {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            data.extend_from_slice(words[(seed >> 16) as usize % words.len()]);
        }
        data.truncate(size);
        data
    }
}

const SIZE: usize = 256 * 1024;

fn bench_levels(c: &mut Criterion) {
    let inputs = [
        ("random", test_data::random(SIZE)),
        ("repeated", test_data::repeated(SIZE)),
        ("text", test_data::text_like(SIZE)),
    ];

    for (name, data) in &inputs {
        let mut group = c.benchmark_group(format!("deflate_{name}"));
        group.throughput(Throughput::Bytes(data.len() as u64));
        for level in [0u8, 1, 6, 9] {
            let config = DeflateConfig::new().level(level).format(Format::Raw);
            group.bench_with_input(BenchmarkId::new("level", level), data, |b, data| {
                b.iter(|| black_box(compress_with(config, black_box(data)).unwrap()));
            });
        }
        group.finish();
    }
}

fn bench_strategies(c: &mut Criterion) {
    let data = test_data::text_like(SIZE);
    let mut group = c.benchmark_group("deflate_strategy");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for strategy in [Strategy::Default, Strategy::Filtered, Strategy::HuffmanOnly] {
        let config = DeflateConfig::new().strategy(strategy);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{strategy:?}")),
            &data,
            |b, data| {
                b.iter(|| black_box(compress_with(config, black_box(data)).unwrap()));
            },
        );
    }

    group.finish();
}

/// Streaming through small output buffers exercises the pending-output
/// path on every call.
fn bench_output_chunks(c: &mut Criterion) {
    let data = test_data::text_like(SIZE);
    let mut group = c.benchmark_group("deflate_output_chunk");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk in [64usize, 1024, 16 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &data, |b, data| {
            let mut buf = vec![0u8; chunk];
            b.iter(|| {
                let mut deflater = Deflater::new(DeflateConfig::new()).unwrap();
                let mut input = &data[..];
                let mut total = 0;
                loop {
                    let (consumed, produced, status) = deflater
                        .compress(input, &mut buf, FlushMode::Finish)
                        .unwrap();
                    input = &input[consumed..];
                    total += produced;
                    if status == CompressStatus::Done {
                        break;
                    }
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_levels, bench_strategies, bench_output_chunks);
criterion_main!(benches);
