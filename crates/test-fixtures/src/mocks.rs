//! Mock scoring providers.
//!
//! Every mock counts its calls so tests can assert that cached or already
//! scored records are not sent to the provider again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

use revlens_core::errors::ProviderError;
use revlens_core::models::SentimentScores;
use revlens_core::traits::{IEmbeddingProvider, ISentimentProvider};

fn keyword_scores(text: &str) -> SentimentScores {
    let lower = text.to_lowercase();
    let compound = if lower.contains("great") || lower.contains("good") {
        0.6
    } else if lower.contains("bad") || lower.contains("terrible") {
        -0.6
    } else {
        0.0
    };
    SentimentScores {
        compound,
        positive: compound.max(0.0),
        neutral: 1.0 - compound.abs(),
        negative: (-compound).max(0.0),
        subjectivity: compound.abs(),
    }
}

fn hashed_vector(text: &str, dims: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dims];
    for word in text.to_lowercase().split_whitespace() {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in word.bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        v[(h as usize) % dims] += 1.0;
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

/// Keyword sentiment scorer that records every text it sees.
#[derive(Default)]
pub struct CountingSentiment {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl CountingSentiment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ISentimentProvider for CountingSentiment {
    fn score(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }
        Ok(keyword_scores(text))
    }

    fn model_id(&self) -> &str {
        "mock-sentiment"
    }
}

/// Bag-of-words embedder that counts calls.
pub struct CountingEmbedder {
    dims: usize,
    model_id: String,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            model_id: format!("mock-embed-{dims}"),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_model_id(dims: usize, model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            ..Self::new(dims)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IEmbeddingProvider for CountingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(hashed_vector(text, self.dims))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Embedder returning preset vectors per exact text; unknown texts get a
/// vector of ones.
pub struct FixedVectorEmbedder {
    dims: usize,
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl FixedVectorEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            table: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IEmbeddingProvider for FixedVectorEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![1.0; self.dims]))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_id(&self) -> &str {
        "mock-fixed"
    }
}

/// Wraps a provider and fails transiently the first `failures` times it is
/// called with a text containing `trigger`.
pub struct Flaky<P> {
    inner: P,
    trigger: String,
    remaining: AtomicUsize,
    attempts: AtomicUsize,
}

impl<P> Flaky<P> {
    pub fn new(inner: P, trigger: &str, failures: usize) -> Self {
        Self {
            inner,
            trigger: trigger.to_string(),
            remaining: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Calls made with the trigger text, failed or not.
    pub fn trigger_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn should_fail(&self, text: &str) -> bool {
        if !text.contains(&self.trigger) {
            return false;
        }
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl<P: ISentimentProvider> ISentimentProvider for Flaky<P> {
    fn score(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        if self.should_fail(text) {
            return Err(ProviderError::transient("flaky", "429 Too Many Requests"));
        }
        self.inner.score(text)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

impl<P: IEmbeddingProvider> IEmbeddingProvider for Flaky<P> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        if self.should_fail(text) {
            return Err(ProviderError::transient("flaky", "429 Too Many Requests"));
        }
        self.inner.embed(text)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

/// Wraps a provider and starts failing transiently for every call once
/// `healthy_calls` calls have succeeded.
pub struct Outage<P> {
    inner: P,
    healthy_left: AtomicUsize,
}

impl<P> Outage<P> {
    pub fn after(inner: P, healthy_calls: usize) -> Self {
        Self {
            inner,
            healthy_left: AtomicUsize::new(healthy_calls),
        }
    }

    /// Allow `calls` more successful calls.
    pub fn restore(&self, calls: usize) {
        self.healthy_left.store(calls, Ordering::SeqCst);
    }

    fn is_down(&self) -> bool {
        self.healthy_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
    }
}

impl<P: ISentimentProvider> ISentimentProvider for Outage<P> {
    fn score(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        if self.is_down() {
            return Err(ProviderError::transient("outage", "connection refused"));
        }
        self.inner.score(text)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

impl<P: IEmbeddingProvider> IEmbeddingProvider for Outage<P> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        if self.is_down() {
            return Err(ProviderError::transient("outage", "connection refused"));
        }
        self.inner.embed(text)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

/// Always fails transiently.
pub struct AlwaysTransient {
    dims: usize,
    calls: AtomicUsize,
}

impl AlwaysTransient {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISentimentProvider for AlwaysTransient {
    fn score(&self, _text: &str) -> Result<SentimentScores, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::transient("always-transient", "503 Service Unavailable"))
    }

    fn model_id(&self) -> &str {
        "mock-sentiment"
    }
}

impl IEmbeddingProvider for AlwaysTransient {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::transient("always-transient", "503 Service Unavailable"))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_id(&self) -> &str {
        "mock-embed"
    }
}

/// Fails permanently for texts containing `marker` (every text when the
/// marker is empty) and delegates otherwise.
pub struct PermanentFailing<P> {
    inner: P,
    marker: String,
}

impl<P> PermanentFailing<P> {
    pub fn new(inner: P, marker: &str) -> Self {
        Self {
            inner,
            marker: marker.to_string(),
        }
    }
}

impl<P: ISentimentProvider> ISentimentProvider for PermanentFailing<P> {
    fn score(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        if text.contains(&self.marker) {
            return Err(ProviderError::permanent("permanent", "400 Bad Request"));
        }
        self.inner.score(text)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

impl<P: IEmbeddingProvider> IEmbeddingProvider for PermanentFailing<P> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        if text.contains(&self.marker) {
            return Err(ProviderError::permanent("permanent", "400 Bad Request"));
        }
        self.inner.embed(text)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

/// Blocks the first call whose text contains `trigger` until `release` is
/// called. Lets a test act while a build is parked at a known record.
pub struct Gate<P> {
    inner: P,
    trigger: String,
    state: Mutex<GateState>,
    signal: Condvar,
}

#[derive(Default)]
struct GateState {
    reached: bool,
    released: bool,
}

impl<P> Gate<P> {
    pub fn new(inner: P, trigger: &str) -> Self {
        Self {
            inner,
            trigger: trigger.to_string(),
            state: Mutex::new(GateState::default()),
            signal: Condvar::new(),
        }
    }

    /// Block until a call has reached the gate.
    pub fn wait_until_reached(&self) {
        let mut state = self.state.lock().unwrap();
        while !state.reached {
            state = self.signal.wait(state).unwrap();
        }
    }

    pub fn release(&self) {
        self.state.lock().unwrap().released = true;
        self.signal.notify_all();
    }

    fn pass(&self, text: &str) {
        if !text.contains(&self.trigger) {
            return;
        }
        let mut state = self.state.lock().unwrap();
        state.reached = true;
        self.signal.notify_all();
        while !state.released {
            state = self.signal.wait(state).unwrap();
        }
    }
}

impl<P: ISentimentProvider> ISentimentProvider for Gate<P> {
    fn score(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        self.pass(text);
        self.inner.score(text)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
