pub mod cancellation;
pub mod corpus;
pub mod embedding;
pub mod sentiment;

pub use cancellation::{Cancellable, CancellationToken};
pub use corpus::ICorpusSource;
pub use embedding::IEmbeddingProvider;
pub use sentiment::ISentimentProvider;
