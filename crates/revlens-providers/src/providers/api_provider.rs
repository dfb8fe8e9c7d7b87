//! OpenAI-compatible HTTP embedding provider.
//!
//! One HTTP attempt per call; retries belong to the adapter. Failures are
//! classified so the adapter knows which ones to retry.

use std::time::Duration;

use reqwest::StatusCode;
use revlens_core::config::ApiProviderConfig;
use revlens_core::errors::ProviderError;
use revlens_core::traits::IEmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PROVIDER: &str = "embedding-api";

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

pub struct ApiEmbeddingProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
}

impl std::fmt::Debug for ApiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEmbeddingProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl ApiEmbeddingProvider {
    /// Build a provider whose every HTTP attempt is bounded by `attempt_timeout`.
    pub fn new(
        config: &ApiProviderConfig,
        api_key: String,
        attempt_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(attempt_timeout)
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::permanent(PROVIDER, format!("client setup: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            dimensions: config.dimensions,
        })
    }

    /// Only a rejected request body degrades the record. Auth, routing and
    /// throttling failures leave it pending so it is scored once they clear.
    fn classify_status(status: StatusCode, body: &str) -> ProviderError {
        let reason = format!("HTTP {status}: {}", body.chars().take(200).collect::<String>());
        match status {
            StatusCode::BAD_REQUEST
            | StatusCode::PAYLOAD_TOO_LARGE
            | StatusCode::UNPROCESSABLE_ENTITY => ProviderError::permanent(PROVIDER, reason),
            s if s.is_client_error() || s.is_server_error() => {
                ProviderError::transient(PROVIDER, reason)
            }
            _ => ProviderError::permanent(PROVIDER, reason),
        }
    }

    fn classify_transport(e: &reqwest::Error) -> ProviderError {
        if e.is_builder() {
            ProviderError::permanent(PROVIDER, e.to_string())
        } else {
            // Timeouts, refused connections and dropped streams.
            ProviderError::transient(PROVIDER, e.to_string())
        }
    }
}

impl IEmbeddingProvider for ApiEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request = EmbedRequest {
            model: &self.model,
            input: [text],
        };
        debug!(model = %self.model, chars = text.len(), "embedding request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| Self::classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }

        let parsed: EmbedResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                ProviderError::transient(PROVIDER, e.to_string())
            } else {
                ProviderError::permanent(PROVIDER, format!("bad response body: {e}"))
            }
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::permanent(PROVIDER, "response contained no embedding"))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        assert!(ApiEmbeddingProvider::classify_status(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(ApiEmbeddingProvider::classify_status(StatusCode::BAD_GATEWAY, "").is_transient());
    }

    #[test]
    fn malformed_input_is_permanent() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::PAYLOAD_TOO_LARGE,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            assert!(!ApiEmbeddingProvider::classify_status(status, "").is_transient(), "{status}");
        }
    }

    #[test]
    fn auth_and_routing_failures_are_transient() {
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::REQUEST_TIMEOUT,
        ] {
            assert!(ApiEmbeddingProvider::classify_status(status, "").is_transient(), "{status}");
        }
    }

    #[test]
    fn request_body_matches_embeddings_api() {
        let body = serde_json::to_value(EmbedRequest {
            model: "text-embedding-3-small",
            input: ["hello"],
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "text-embedding-3-small", "input": ["hello"]})
        );
    }

    #[test]
    fn unreachable_endpoint_is_transient() {
        let config = ApiProviderConfig {
            endpoint: "http://127.0.0.1:9/v1/embeddings".to_string(),
            ..ApiProviderConfig::default()
        };
        let provider =
            ApiEmbeddingProvider::new(&config, "test-key".to_string(), Duration::from_millis(500))
                .unwrap();
        let err = provider.embed("hello").unwrap_err();
        assert!(err.is_transient(), "{err}");
    }
}
