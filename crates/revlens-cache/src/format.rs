//! Binary snapshot layout (all integers little-endian):
//!
//! ```text
//! magic        [u8; 4]   "RVLS"
//! format       u16
//! kind         u8        1 = sentiment, 2 = embedding
//! model_id     u16 length + UTF-8 bytes
//! created_at   i64       unix millis
//! dimension    u32       values per entry
//! count        u64       entries (= index version)
//! record_ids   [u64; count]
//! statuses     [u8; count]
//! payload      [f32; count * dimension]
//! checksum     [u8; 32]  blake3 of everything above
//! ```

use chrono::{DateTime, TimeZone, Utc};
use revlens_core::models::EntryStatus;
use revlens_index::{DerivedIndex, IndexEntry, IndexKind};
use serde::{Deserialize, Serialize};

pub const MAGIC: [u8; 4] = *b"RVLS";
pub const FORMAT_VERSION: u16 = 1;

const CHECKSUM_LEN: usize = 32;

/// Header of a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub kind: String,
    /// Number of records covered.
    pub version: usize,
    pub model_id: String,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
}

/// A loaded snapshot.
#[derive(Debug, Clone)]
pub struct CacheSnapshot<E> {
    pub meta: SnapshotMeta,
    pub index: DerivedIndex<E>,
}

pub(crate) fn kind_code(kind: IndexKind) -> u8 {
    match kind {
        IndexKind::Sentiment => 1,
        IndexKind::Embedding => 2,
    }
}

pub(crate) fn encode<E: IndexEntry>(
    index: &DerivedIndex<E>,
    created_at: DateTime<Utc>,
) -> Result<Vec<u8>, String> {
    let model = index.model_id().as_bytes();
    let model_len =
        u16::try_from(model.len()).map_err(|_| "model id longer than 65535 bytes".to_string())?;
    let dimension =
        u32::try_from(index.dimension()).map_err(|_| "dimension does not fit u32".to_string())?;
    let count = index.version();

    let mut payload = Vec::with_capacity(count * index.dimension());
    for entry in index.iter() {
        let before = payload.len();
        entry.write_values(&mut payload);
        if payload.len() - before != index.dimension() {
            return Err(format!(
                "entry {} has {} values, index dimension is {}",
                entry.record_id(),
                payload.len() - before,
                index.dimension()
            ));
        }
    }

    let mut buf = Vec::with_capacity(64 + model.len() + count * 9 + payload.len() * 4);
    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.push(kind_code(E::KIND));
    buf.extend_from_slice(&model_len.to_le_bytes());
    buf.extend_from_slice(model);
    buf.extend_from_slice(&created_at.timestamp_millis().to_le_bytes());
    buf.extend_from_slice(&dimension.to_le_bytes());
    buf.extend_from_slice(&(count as u64).to_le_bytes());
    for entry in index.iter() {
        buf.extend_from_slice(&entry.record_id().to_le_bytes());
    }
    for entry in index.iter() {
        buf.push(entry.status().as_u8());
    }
    for v in &payload {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    let checksum = blake3::hash(&buf);
    buf.extend_from_slice(checksum.as_bytes());
    Ok(buf)
}

/// Decode and validate a snapshot. Errors carry the reason the file is corrupt.
pub(crate) fn decode<E: IndexEntry>(bytes: &[u8]) -> Result<CacheSnapshot<E>, String> {
    if bytes.len() < MAGIC.len() + 2 + CHECKSUM_LEN {
        return Err(format!("file too short ({} bytes)", bytes.len()));
    }
    let mut r = Reader::new(bytes);
    if r.take(4)? != MAGIC {
        return Err("bad magic".to_string());
    }
    let format = r.u16()?;
    if format != FORMAT_VERSION {
        return Err(format!("unsupported format version {format}"));
    }

    let (body, stored_sum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if blake3::hash(body).as_bytes() != stored_sum {
        return Err("checksum mismatch".to_string());
    }
    let mut r = Reader::new(body);
    r.take(6)?;

    let kind = r.u8()?;
    if kind != kind_code(E::KIND) {
        return Err(format!(
            "snapshot kind {kind} does not hold a {} index",
            E::KIND.as_str()
        ));
    }
    let model_len = r.u16()? as usize;
    let model_id = String::from_utf8(r.take(model_len)?.to_vec())
        .map_err(|_| "model id is not UTF-8".to_string())?;
    let created_at = Utc
        .timestamp_millis_opt(r.i64()?)
        .single()
        .ok_or_else(|| "invalid creation timestamp".to_string())?;
    let dimension = r.u32()? as usize;
    let count = usize::try_from(r.u64()?).map_err(|_| "entry count overflow".to_string())?;

    let values = count
        .checked_mul(dimension)
        .ok_or_else(|| "payload size overflow".to_string())?;
    let expected = count
        .checked_mul(9)
        .and_then(|n| values.checked_mul(4).and_then(|p| n.checked_add(p)))
        .ok_or_else(|| "payload size overflow".to_string())?;
    if r.remaining() != expected {
        return Err(format!(
            "payload length {} does not match {count} entries x {dimension} values",
            r.remaining()
        ));
    }

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(r.u64()?);
    }
    let mut statuses = Vec::with_capacity(count);
    for _ in 0..count {
        let code = r.u8()?;
        statuses.push(EntryStatus::from_u8(code).ok_or_else(|| format!("bad status {code}"))?);
    }
    let mut payload = Vec::with_capacity(values);
    for _ in 0..values {
        payload.push(r.f32()?);
    }

    let model_arc: std::sync::Arc<str> = std::sync::Arc::from(model_id.as_str());
    let entries: Vec<E> = ids
        .iter()
        .zip(&statuses)
        .enumerate()
        .map(|(i, (&id, &status))| {
            let start = i * dimension;
            E::from_values(id, status, &payload[start..start + dimension], &model_arc)
        })
        .collect();

    Ok(CacheSnapshot {
        meta: SnapshotMeta {
            kind: E::KIND.as_str().to_string(),
            version: count,
            model_id,
            dimension,
            created_at,
        },
        index: DerivedIndex::from_entries(model_arc, dimension, entries),
    })
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], String> {
        if self.remaining() < n {
            return Err(format!("truncated at byte {}", self.pos));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], String> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, String> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32, String> {
        self.array().map(u32::from_le_bytes)
    }

    fn u64(&mut self) -> Result<u64, String> {
        self.array().map(u64::from_le_bytes)
    }

    fn i64(&mut self) -> Result<i64, String> {
        self.array().map(i64::from_le_bytes)
    }

    fn f32(&mut self) -> Result<f32, String> {
        self.array().map(f32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revlens_core::models::{EmbeddingEntry, SentimentEntry, SentimentScores};
    use std::sync::Arc;

    fn embedding_index() -> DerivedIndex<EmbeddingEntry> {
        let model: Arc<str> = Arc::from("m");
        let entries = (0..3u64)
            .map(|i| EmbeddingEntry {
                record_id: 10 + i,
                vector: vec![i as f32, 0.5, -1.0],
                model_id: Arc::clone(&model),
                status: if i == 1 {
                    EntryStatus::Pending
                } else {
                    EntryStatus::Scored
                },
            })
            .collect();
        DerivedIndex::from_entries(model, 3, entries)
    }

    #[test]
    fn encode_decode_preserves_entries() {
        let index = embedding_index();
        let bytes = encode(&index, Utc::now()).unwrap();
        let snap = decode::<EmbeddingEntry>(&bytes).unwrap();
        assert_eq!(snap.meta.version, 3);
        assert_eq!(snap.meta.model_id, "m");
        assert_eq!(snap.index.entries().to_vec(), index.entries().to_vec());
    }

    #[test]
    fn flipped_payload_byte_fails_checksum() {
        let mut bytes = encode(&embedding_index(), Utc::now()).unwrap();
        let n = bytes.len();
        bytes[n - CHECKSUM_LEN - 1] ^= 0xff;
        let err = decode::<EmbeddingEntry>(&bytes).unwrap_err();
        assert!(err.contains("checksum"), "{err}");
    }

    #[test]
    fn kind_is_checked() {
        let bytes = encode(&embedding_index(), Utc::now()).unwrap();
        let err = decode::<SentimentEntry>(&bytes).unwrap_err();
        assert!(err.contains("kind"), "{err}");
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let model: Arc<str> = Arc::from("lexicon-v1");
        let index = DerivedIndex::from_entries(
            model,
            5,
            vec![SentimentEntry::new(1, SentimentScores::neutral(), EntryStatus::Scored)],
        );
        let mut bytes = encode(&index, Utc::now()).unwrap();
        bytes[0] = b'X';
        assert_eq!(decode::<SentimentEntry>(&bytes).unwrap_err(), "bad magic");
    }
}
