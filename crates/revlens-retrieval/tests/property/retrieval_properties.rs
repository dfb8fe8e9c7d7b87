//! Property tests for revlens-retrieval: similarity symmetry, self-similarity,
//! ranking order, idempotent search.

use std::sync::Arc;

use proptest::prelude::*;

use revlens_core::models::{EmbeddingEntry, EntryStatus};
use revlens_core::traits::IEmbeddingProvider;
use revlens_index::EmbeddingIndex;
use revlens_providers::{ProviderAdapter, RetryPolicy, Truncator};
use revlens_retrieval::{cosine_similarity, SemanticSearcher};
use test_fixtures::FixedVectorEmbedder;

const DIMS: usize = 6;

fn vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-10.0f32..10.0, DIMS)
}

fn nonzero_vector() -> impl Strategy<Value = Vec<f32>> {
    vector().prop_filter("non-zero norm", |v| v.iter().any(|x| x.abs() > 1e-3))
}

fn index_of(vectors: &[Vec<f32>]) -> EmbeddingIndex {
    let entries = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| EmbeddingEntry {
            record_id: i as u64 + 1,
            vector: v.clone(),
            model_id: Arc::from("mock-fixed"),
            status: EntryStatus::Scored,
        })
        .collect();
    EmbeddingIndex::from_entries("mock-fixed", DIMS, entries)
}

fn searcher(query: &[f32]) -> SemanticSearcher {
    let provider: Arc<dyn IEmbeddingProvider> =
        Arc::new(FixedVectorEmbedder::new(DIMS).with("q", query.to_vec()));
    SemanticSearcher::new(
        ProviderAdapter::new(provider, RetryPolicy::immediate(1), Truncator::new(100)),
        8,
    )
}

proptest! {
    #[test]
    fn prop_similarity_symmetric(a in vector(), b in vector()) {
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-12);
        prop_assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn prop_self_similarity_is_one(a in nonzero_vector()) {
        prop_assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn prop_hits_sorted_and_bounded(
        vectors in prop::collection::vec(vector(), 0..30),
        query in nonzero_vector(),
        k in 0usize..40,
    ) {
        let index = index_of(&vectors);
        let hits = searcher(&query).search(&index, "q", k).unwrap();
        prop_assert_eq!(hits.len(), k.min(vectors.len()));
        for pair in hits.windows(2) {
            let ordered = pair[0].similarity > pair[1].similarity
                || (pair[0].similarity == pair[1].similarity
                    && pair[0].record_id < pair[1].record_id);
            prop_assert!(ordered);
        }
        // Nothing left out scores higher than the last hit.
        if let Some(last) = hits.last() {
            for (i, v) in vectors.iter().enumerate() {
                let id = i as u64 + 1;
                if hits.iter().all(|h| h.record_id != id) {
                    prop_assert!(cosine_similarity(&query, v) <= last.similarity);
                }
            }
        }
    }

    #[test]
    fn prop_search_idempotent(
        vectors in prop::collection::vec(vector(), 1..20),
        query in nonzero_vector(),
        k in 1usize..10,
    ) {
        let index = index_of(&vectors);
        let s = searcher(&query);
        let first = s.search(&index, "q", k).unwrap();
        let second = s.search(&index, "q", k).unwrap();
        prop_assert_eq!(first, second);
    }
}
