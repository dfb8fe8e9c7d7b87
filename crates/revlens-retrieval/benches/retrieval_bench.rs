use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use revlens_core::traits::IEmbeddingProvider;
use revlens_index::{EmbeddingBuilder, IndexBuilder};
use revlens_providers::{HashedTfEmbedder, ProviderAdapter, RetryPolicy, Truncator};
use revlens_retrieval::{cosine_similarity, SemanticSearcher};
use test_fixtures::synthetic_records;

fn adapter() -> revlens_providers::EmbeddingAdapter {
    let provider: Arc<dyn IEmbeddingProvider> = Arc::new(HashedTfEmbedder::new(384));
    ProviderAdapter::new(provider, RetryPolicy::immediate(1), Truncator::new(8000))
}

fn bench_cosine(c: &mut Criterion) {
    let a: Vec<f32> = (0..1536).map(|i| (i as f32).sin()).collect();
    let b: Vec<f32> = (0..1536).map(|i| (i as f32).cos()).collect();
    c.bench_function("cosine_1536", |bench| bench.iter(|| cosine_similarity(&a, &b)));
}

fn bench_search(c: &mut Criterion) {
    let records = synthetic_records(5_000);
    let builder: EmbeddingBuilder = IndexBuilder::new(adapter(), 500);
    let index = builder.build(&records, None).index;
    let searcher = SemanticSearcher::new(adapter(), 100);

    // Prime the query cache.
    searcher.search(&index, "friendly host", 10).unwrap();

    c.bench_function("search_top10_5000", |b| {
        b.iter(|| searcher.search(&index, "friendly host", 10).unwrap())
    });
}

criterion_group!(benches, bench_cosine, bench_search);
criterion_main!(benches);
