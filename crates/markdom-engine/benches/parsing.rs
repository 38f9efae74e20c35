use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use markdom_engine::parse;
mod common;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    group.bench_function("simple", |b| {
        b.iter(|| {
            let doc = parse(black_box(&content)).unwrap();
            black_box(doc);
        });
    });

    let full = common::generate_full_document(50);
    group.bench_function("full", |b| {
        b.iter(|| {
            let doc = parse(black_box(&full)).unwrap();
            black_box(doc);
        });
    });

    let degraded = common::generate_degraded_document(200);
    group.bench_function("degraded", |b| {
        b.iter(|| {
            let doc = parse(black_box(&degraded)).unwrap();
            black_box(doc);
        });
    });

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    group.sample_size(20);

    let content = common::generate_full_document(50);
    let doc = parse(&content).unwrap();

    group.bench_function("html", |b| b.iter(|| black_box(doc.to_html())));
    group.bench_function("plain_text", |b| b.iter(|| black_box(doc.to_string())));
    group.bench_function("markdown", |b| b.iter(|| black_box(doc.to_markdown())));

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_rendering);
criterion_main!(benches);
