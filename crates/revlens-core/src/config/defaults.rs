// Single source of truth for all default values.

// --- Provider ---
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 200;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 5_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 8_000;
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashed-tf";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 256;
pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_API_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_API_DIMENSIONS: usize = 1536;
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

// --- Sentiment ---
pub const DEFAULT_SENTIMENT_PROVIDER: &str = "lexicon";

// --- Index ---
pub const DEFAULT_CHUNK_SIZE: usize = 100;

// --- Corpus ---
pub const DEFAULT_STEP_SIZE: usize = 500;
pub const DEFAULT_INITIAL_WINDOW: usize = 0;
pub const DEFAULT_ACCEPT_PARTIAL_BUILDS: bool = false;
pub const DEFAULT_ASSUMED_PER_RECORD_MS: f64 = 25.0;
pub const DEFAULT_LATENCY_SMOOTHING: f64 = 0.3;

// --- Cache ---
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_CACHE_DIR: &str = ".revlens/cache";

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 20;
pub const DEFAULT_QUERY_CACHE_SIZE: u64 = 1_000;

// --- Listing ---
pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
