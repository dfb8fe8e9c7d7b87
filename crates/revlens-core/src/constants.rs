/// revlens system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compound score at or above which a record is labelled positive.
pub const POSITIVE_THRESHOLD: f32 = 0.05;

/// Compound score at or below which a record is labelled negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.05;

/// Number of sentiment values stored per entry in a snapshot payload:
/// compound, positive, neutral, negative, subjectivity.
pub const SENTIMENT_STRIDE: usize = 5;

/// Maximum characters kept from a record in analytics excerpts.
pub const EXCERPT_CHARS: usize = 200;
