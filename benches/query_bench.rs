use std::hint::black_box;
use std::sync::Arc;

use concord::postings::memory::MemoryPostings;
use concord::query::set_algebra::{intersect, union};
use concord::{QueryEngine, QueryRequest};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const VOCABULARY: [&str; 8] = ["the", "of", "and", "to", "in", "a", "is", "that"];

fn stepped(count: u32, step: u32) -> Vec<u32> {
    (0..count).map(|i| i * step).collect()
}

/// Sentences of twelve tokens drawn from a small vocabulary with a fixed stride.
fn generate_corpus(sentences: u32) -> MemoryPostings {
    let mut builder = MemoryPostings::builder();
    for doc in 0..sentences {
        let tokens: Vec<&str> = (0..12)
            .map(|i| VOCABULARY[((doc * 7 + i * 3 + doc / 5) % VOCABULARY.len() as u32) as usize])
            .collect();
        builder = builder.add_document(doc, tokens.as_slice());
    }
    builder.build().unwrap()
}

fn bench_set_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("Set Algebra");
    let sizes = [1_000u32, 100_000];

    for size in sizes.iter() {
        let a = stepped(*size, 2);
        let b = stepped(*size, 3);
        group.throughput(Throughput::Elements((*size as u64) * 2));
        group.bench_with_input(BenchmarkId::new("intersect", size), size, |bench, _| {
            bench.iter(|| intersect(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("union", size), size, |bench, _| {
            bench.iter(|| union(black_box(&a), black_box(&b)))
        });
    }
    group.finish();
}

fn bench_query_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("Query Engine");
    group.sample_size(20);
    let engine = QueryEngine::new(Arc::new(generate_corpus(20_000)));

    group.bench_function("and_three_terms", |b| {
        b.iter(|| engine.query_and(black_box(&["the", "of", "and"])).unwrap())
    });
    group.bench_function("exact_order_two_terms", |b| {
        b.iter(|| engine.query_exact_order(black_box(&["the", "to"])).unwrap())
    });
    group.bench_function("extend_on_left", |b| {
        let cached = engine
            .evaluate(&QueryRequest::exact_order(["the", "to"]))
            .unwrap();
        b.iter(|| {
            let mut extended = engine.extend_on_left(&cached, "a").unwrap();
            engine.cache(&mut extended).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_set_algebra, bench_query_engine);
criterion_main!(benches);
