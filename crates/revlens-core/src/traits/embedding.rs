use crate::errors::ProviderError;

/// Embedding generation provider.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of `dimensions()` floats.
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Identity of the underlying model.
    fn model_id(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool {
        true
    }
}
