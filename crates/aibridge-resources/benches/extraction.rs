use aibridge_core::{BridgeMetrics, ModelPathCell, ModelPathValidator, TracingDispatcher, Variant, VariantConfig, SCHEME};
use aibridge_resources::{MemoryAssets, ModelResourceRouter, ZipArchiveReader};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::{Cursor, Write};
use std::sync::Arc;

fn build_archive(entries: usize, entry_len: usize) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for i in 0..entries {
        writer
            .start_file(format!("group1-shard{}of{}.bin", i + 1, entries), zip::write::FileOptions::default())
            .unwrap();
        let data: Vec<u8> = (0..entry_len).map(|j| ((i * 31 + j) % 251) as u8).collect();
        writer.write_all(&data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_last_entry");

    for entries in [4usize, 32, 128] {
        let bytes = bytes::Bytes::from(build_archive(entries, 64 * 1024));
        let target = format!("group1-shard{}of{}.bin", entries, entries);

        group.bench_with_input(BenchmarkId::from_parameter(entries), &entries, |b, _| {
            b.iter(|| {
                let mut reader = ZipArchiveReader::open(bytes.clone()).unwrap();
                black_box(reader.extract(&target).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let assets = MemoryAssets::new()
        .with("flowers.zip", build_archive(8, 256 * 1024))
        .with("labels.txt", &b"rose\ntulip\n"[..]);
    let metrics = BridgeMetrics::new();
    let cell = ModelPathCell::new();
    let router = ModelResourceRouter::new(SCHEME, Arc::new(assets), cell.clone(), metrics.clone());
    router
        .configure_for(&VariantConfig::new(Variant::PersonalImageClassifier))
        .unwrap();
    ModelPathValidator::new("PersonalImageClassifier", cell, Arc::new(TracingDispatcher), metrics)
        .set_model_path("flowers.mdl");

    c.bench_function("resolve_bundled", |b| {
        b.iter(|| black_box(router.resolve("appinventor:personal-image-classifier/transfer/labels.txt")))
    });

    c.bench_function("resolve_personal", |b| {
        b.iter(|| {
            black_box(router.resolve("appinventor:personal-image-classifier/personal/group1-shard8of8.bin"))
        })
    });
}

criterion_group!(benches, bench_extract, bench_resolve);
criterion_main!(benches);
