use std::sync::Arc;

use proptest::prelude::*;
use revlens_core::traits::ISentimentProvider;
use revlens_index::{IndexBuilder, SentimentBuilder};
use revlens_providers::{LexiconScorer, ProviderAdapter, RetryPolicy, Truncator};
use test_fixtures::synthetic_records;

fn builder(chunk: usize) -> SentimentBuilder {
    let provider: Arc<dyn ISentimentProvider> = Arc::new(LexiconScorer::new());
    IndexBuilder::new(
        ProviderAdapter::new(provider, RetryPolicy::immediate(1), Truncator::new(8000)),
        chunk,
    )
}

proptest! {
    #[test]
    fn two_step_build_matches_single_step(n in 0usize..40, m in 0usize..40, chunk in 1usize..12) {
        let records = synthetic_records(n + m);
        let b = builder(chunk);

        let single = b.build(&records[..n], None).index;
        let first = b.build(&records[..n], None).index;
        let grown = b.build(&records, Some(&first)).index;

        prop_assert_eq!(grown.version(), n + m);
        for (a, g) in single.iter().zip(grown.iter()) {
            prop_assert_eq!(a, g);
        }
        for (entry, record) in grown.iter().zip(&records) {
            prop_assert_eq!(entry.record_id, record.id);
        }
    }

    #[test]
    fn prefix_of_index_is_aligned(n in 1usize..40, cut in 0usize..40) {
        let records = synthetic_records(n);
        let index = builder(5).build(&records, None).index;
        let p = index.prefix(cut);
        prop_assert_eq!(p.version(), cut.min(n));
        prop_assert!(p.is_prefix_of(&records));
    }
}
