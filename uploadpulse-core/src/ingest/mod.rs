//! Ingestion layer: raw upload records to canonical events
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  Upload export  │ ──► │    normalize     │ ──► │  UploadEvent[]  │
//! │ (JSON records)  │     │ (validate/parse) │     │  + discarded    │
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//! ```
//!
//! ## Resilience
//!
//! A record whose `createdAt` is missing or unparseable is dropped, counted in
//! [`NormalizedEvents::discarded`], described in
//! [`NormalizedEvents::warnings`] and logged. It never fails the batch.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use uploadpulse_core::ingest::parse_export;
//!
//! let export = r#"[
//!     {"createdAt": "2024-01-05T10:00:00Z", "contentType": "image/png", "size": 2048},
//!     {"createdAt": "not a date", "contentType": "image/png"}
//! ]"#;
//! let normalized = parse_export(export, &Utc).unwrap();
//! assert_eq!(normalized.events.len(), 1);
//! assert_eq!(normalized.discarded, 1);
//! ```

mod timestamp;

pub use timestamp::parse_timestamp;

use crate::error::Result;
use crate::types::{normalize_content_type, RawUpload, UploadEvent};
use chrono::TimeZone;
use serde::Deserialize;

/// Result of normalizing a batch of upload records.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEvents {
    /// Valid events, in input order (callers must not rely on the order)
    pub events: Vec<UploadEvent>,
    /// Number of records dropped as malformed
    pub discarded: usize,
    /// One message per dropped record (non-fatal)
    pub warnings: Vec<String>,
}

impl NormalizedEvents {
    /// Total number of records seen, valid or not.
    pub fn total_records(&self) -> usize {
        self.events.len() + self.discarded
    }

    fn discard(&mut self, index: usize, reason: String) {
        tracing::warn!(index, reason = %reason, "Dropping malformed upload record");
        self.discarded += 1;
        self.warnings.push(format!("record {}: {}", index, reason));
    }
}

/// Normalize typed upload records.
///
/// Wall-clock fields of each event (`local`) are computed in `tz`; pass
/// [`chrono::Local`] for the host's zone or [`chrono::Utc`] for stable output.
pub fn normalize<Tz: TimeZone>(records: &[RawUpload], tz: &Tz) -> NormalizedEvents {
    let mut result = NormalizedEvents::default();

    for (index, record) in records.iter().enumerate() {
        push_record(&mut result, index, record, tz);
    }

    tracing::debug!(
        events = result.events.len(),
        discarded = result.discarded,
        "Normalized upload records"
    );
    result
}

/// Normalize loosely shaped JSON records.
///
/// A value that is not an object, or whose `createdAt` / `contentType` are not
/// strings, is discarded like a malformed timestamp.
pub fn normalize_json<Tz: TimeZone>(values: &[serde_json::Value], tz: &Tz) -> NormalizedEvents {
    let mut result = NormalizedEvents::default();

    for (index, value) in values.iter().enumerate() {
        match RawUpload::deserialize(value) {
            Ok(record) => push_record(&mut result, index, &record, tz),
            Err(e) => result.discard(index, format!("invalid record shape: {}", e)),
        }
    }

    tracing::debug!(
        events = result.events.len(),
        discarded = result.discarded,
        "Normalized upload export"
    );
    result
}

/// Parse an upload export (a JSON array of records) and normalize it.
///
/// Only a document that is not a JSON array is an error; bad records inside
/// the array are discarded.
pub fn parse_export<Tz: TimeZone>(json: &str, tz: &Tz) -> Result<NormalizedEvents> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(normalize_json(&values, tz))
}

fn push_record<Tz: TimeZone>(
    result: &mut NormalizedEvents,
    index: usize,
    record: &RawUpload,
    tz: &Tz,
) {
    let Some(raw_ts) = record.created_at.as_deref() else {
        result.discard(index, "missing createdAt".to_string());
        return;
    };

    let Some(timestamp) = parse_timestamp(raw_ts, tz) else {
        result.discard(index, format!("unparseable createdAt {:?}", raw_ts));
        return;
    };

    result.events.push(UploadEvent {
        local: timestamp.with_timezone(tz).naive_local(),
        timestamp,
        content_type: normalize_content_type(record.content_type.as_deref()),
        source_index: index,
    });
}
