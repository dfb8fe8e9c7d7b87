pub mod degradation_event;
pub mod embedding;
pub mod record;
pub mod sentiment;
pub mod status;

pub use degradation_event::DegradationEvent;
pub use embedding::EmbeddingEntry;
pub use record::Record;
pub use sentiment::{SentimentComponents, SentimentEntry, SentimentLabel, SentimentScores};
pub use status::EntryStatus;
