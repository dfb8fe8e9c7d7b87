//! # revlens-service
//!
//! [`ReviewService`] wires the corpus manager, both index builders, the
//! snapshot cache, semantic retrieval and analytics behind one request API.
//! Requests are validated before any provider call; growth runs on a
//! background thread while queries keep reading the last published window.

pub mod service;
pub mod types;

pub use service::{ReviewService, ServiceParts};
pub use types::{
    GrowResponse, KeywordResponse, ReviewPage, ReviewQuery, ReviewView, SemanticHit,
    SemanticResponse, SentimentView, TextAnalysis, WindowInfo,
};
