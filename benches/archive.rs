#![allow(clippy::unwrap_used)]
//! Benchmarks for batch archive assembly

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use fabbanana::archive::{BatchArchive, processed_entry_name};
use std::hint::black_box;

/// Synthetic PNG-sized payloads for a medium batch
fn create_batch_results(count: usize) -> Vec<(String, Vec<u8>)> {
    (0..count)
        .map(|i| {
            let name = format!("photo_{i:03}.jpg");
            // Repeating payload compresses like flat image data
            let bytes = vec![(i % 251) as u8; 64 * 1024];
            (name, bytes)
        })
        .collect()
}

fn bench_archive_assembly(c: &mut Criterion) {
    let results = create_batch_results(20);

    c.bench_function("archive_assemble_20x64k", |b| {
        b.iter(|| {
            let mut archive = BatchArchive::new();
            for (name, bytes) in &results {
                archive.add_image(black_box(name), black_box(bytes)).unwrap();
            }
            let bytes = archive.finish().unwrap();
            black_box(bytes);
        });
    });
}

fn bench_entry_naming(c: &mut Criterion) {
    c.bench_function("archive_entry_name", |b| {
        b.iter(|| {
            let name = processed_entry_name(black_box("holiday.2024.photo.jpeg"));
            black_box(name);
        });
    });
}

criterion_group!(benches, bench_archive_assembly, bench_entry_naming);
criterion_main!(benches);
