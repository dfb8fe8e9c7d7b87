use chrono::NaiveDate;
use revlens_core::models::*;

#[test]
fn record_accepts_source_dataset_columns() {
    let line = r#"{"id": 7, "listing_id": 2818, "date": "2019-05-21", "reviewer_name": "Ana", "comments": "Lovely flat"}"#;
    let record: Record = serde_json::from_str(line).unwrap();
    assert_eq!(record.id, 7);
    assert_eq!(record.listing_id, Some(2818));
    assert_eq!(record.text, "Lovely flat");
    assert_eq!(record.author, "Ana");
    assert_eq!(record.timestamp, NaiveDate::from_ymd_opt(2019, 5, 21).unwrap());
    assert_eq!(record.month_key(), "2019-05");
}

#[test]
fn record_accepts_canonical_field_names() {
    let line = r#"{"id": 1, "text": "ok", "timestamp": "2020-01-02", "author": "Bo"}"#;
    let record: Record = serde_json::from_str(line).unwrap();
    assert_eq!(record.listing_id, None);
    assert_eq!(record.text, "ok");
}

#[test]
fn excerpt_cuts_on_char_boundary() {
    let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let record = Record::new(1, "héllo wörld", date, "x");
    assert_eq!(record.excerpt(5), "héllo...");
    assert_eq!(record.excerpt(100), "héllo wörld");
}

#[test]
fn status_codes_roundtrip() {
    for status in [EntryStatus::Scored, EntryStatus::Degraded, EntryStatus::Pending] {
        assert_eq!(EntryStatus::from_u8(status.as_u8()), Some(status));
    }
    assert_eq!(EntryStatus::from_u8(9), None);
}

#[test]
fn neutral_scores_label_neutral() {
    let entry = SentimentEntry::new(3, SentimentScores::neutral(), EntryStatus::Degraded);
    assert_eq!(entry.label, SentimentLabel::Neutral);
    assert_eq!(entry.compound_score, 0.0);
}

#[test]
fn embedding_entry_deserializes_shared_model_id() {
    let entry = EmbeddingEntry {
        record_id: 3,
        vector: vec![0.5, -0.5],
        model_id: std::sync::Arc::from("hashed-tf-2"),
        status: EntryStatus::Scored,
    };
    let json = serde_json::to_string(&entry).unwrap();
    let back: EmbeddingEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
    assert_eq!(&*back.model_id, "hashed-tf-2");
}
