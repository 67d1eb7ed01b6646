//! Benchmarks for refbuf.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use refbuf::layout::INLINE_CAPACITY;
use refbuf::{ReadOptions, RefBuffer, RegionConfig};

fn bench_append_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_pop");

    // Record sizes around the inline capacity and well past it
    for size in [1, INLINE_CAPACITY, 2 * INLINE_CAPACITY, 1024] {
        let record: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
        let mut region = RegionConfig::new(64).unwrap().allocate();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("record_{}b", size), |b| {
            let mut buffer = RefBuffer::init(&mut region[..]).unwrap();
            let mut out = vec![0u8; size];
            b.iter(|| {
                let outcome = buffer.append(black_box(&record));
                let read = buffer.read(&mut out, ReadOptions::pop());
                black_box((outcome, read.copied))
            });
        });
    }

    group.finish();
}

fn bench_fill_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_and_drain");
    let records: Vec<Vec<u8>> = (0..256).map(|i| vec![i as u8; 1 + i % 40]).collect();
    let total: usize = records.iter().map(Vec::len).sum();
    let mut region = RegionConfig::new(1024).unwrap().allocate();

    group.throughput(Throughput::Bytes(total as u64));
    group.bench_function("mixed_records", |b| {
        let mut buffer = RefBuffer::init(&mut region[..]).unwrap();
        let mut frame = [0u8; 128];
        b.iter(|| {
            for record in &records {
                let _ = buffer.append(black_box(record));
            }
            let mut drained = 0;
            while !buffer.is_empty() {
                drained += buffer.read(&mut frame, ReadOptions::pop()).copied;
            }
            black_box(drained)
        });
    });

    group.bench_function("peek_with_offset", |b| {
        let mut buffer = RefBuffer::init(&mut region[..]).unwrap();
        for record in &records {
            let _ = buffer.append(record);
        }
        let mut frame = [0u8; 128];
        b.iter(|| {
            let outcome = buffer.peek(&mut frame, black_box(total / 2));
            black_box(outcome.copied)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_append_pop, bench_fill_and_drain);
criterion_main!(benches);
