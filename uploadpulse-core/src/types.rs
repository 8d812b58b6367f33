//! Core domain types for uploadpulse
//!
//! These types represent the canonical data model that every analytics
//! component consumes.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Raw upload** | A record as exported by the storage backend; only `createdAt` and `contentType` are read |
//! | **Upload event** | A validated raw upload with a parsed timestamp and a normalized content type |
//! | **Local date** | The calendar date of an event in the time zone chosen at normalization |
//! | **Category** | The top-level part of a content type (`image` in `image/png`), or `other` |

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Category used when a content type is missing, empty, or has an empty
/// top-level part.
pub const OTHER_CATEGORY: &str = "other";

// ============================================
// Raw input
// ============================================

/// An upload record as it arrives from the storage collaborator.
///
/// Only the two fields the engine interprets are modelled; file ids, names,
/// sizes and anything else in the export are ignored here and stay with the
/// caller, who can find them again through [`UploadEvent::source_index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUpload {
    /// ISO-8601 creation timestamp
    pub created_at: Option<String>,
    /// MIME-like content type; may lack a `/`
    pub content_type: Option<String>,
}

impl RawUpload {
    pub fn new(created_at: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            created_at: Some(created_at.into()),
            content_type: Some(content_type.into()),
        }
    }
}

// ============================================
// Upload events
// ============================================

/// A validated upload.
///
/// `timestamp` keeps the instant with its original offset; `local` is the
/// same instant projected into the time zone chosen during normalization.
/// Every calendar computation (days, hours, streaks) reads `local`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEvent {
    /// When the upload happened, with the offset it was recorded in
    pub timestamp: DateTime<FixedOffset>,
    /// Wall-clock time of the upload in the reporting time zone
    pub local: NaiveDateTime,
    /// Lowercased content type, `other` when the record had none
    pub content_type: String,
    /// Position of the originating record in the input batch
    pub source_index: usize,
}

impl UploadEvent {
    /// Build an event from an instant already expressed in the reporting
    /// time zone.
    pub fn at<Tz: TimeZone>(timestamp: DateTime<Tz>, content_type: &str) -> Self {
        let local = timestamp.naive_local();
        let offset = timestamp.offset().fix();
        Self {
            timestamp: timestamp.with_timezone(&offset),
            local,
            content_type: normalize_content_type(Some(content_type)),
            source_index: 0,
        }
    }

    /// Local calendar date of the upload.
    pub fn date(&self) -> NaiveDate {
        self.local.date()
    }

    /// Local hour of day (0-23).
    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    /// Top-level content-type category.
    pub fn category(&self) -> &str {
        content_category(&self.content_type)
    }
}

/// Trim and lowercase a content type, mapping missing or blank values to
/// [`OTHER_CATEGORY`].
pub fn normalize_content_type(content_type: Option<&str>) -> String {
    match content_type.map(str::trim) {
        Some(ct) if !ct.is_empty() => ct.to_ascii_lowercase(),
        _ => OTHER_CATEGORY.to_string(),
    }
}

/// Substring before the first `/`, or [`OTHER_CATEGORY`] when that part is
/// empty.
pub fn content_category(content_type: &str) -> &str {
    match content_type.split('/').next().map(str::trim) {
        Some(category) if !category.is_empty() => category,
        _ => OTHER_CATEGORY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_content_category() {
        assert_eq!(content_category("image/png"), "image");
        assert_eq!(content_category("application/vnd.ms-excel"), "application");
        assert_eq!(content_category("text"), "text");
        assert_eq!(content_category("/png"), "other");
        assert_eq!(content_category(""), "other");
    }

    #[test]
    fn test_normalize_content_type() {
        assert_eq!(normalize_content_type(Some(" Image/PNG ")), "image/png");
        assert_eq!(normalize_content_type(Some("   ")), "other");
        assert_eq!(normalize_content_type(None), "other");
    }

    #[test]
    fn test_event_at_projects_local_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 23, 15, 0).unwrap();
        let event = UploadEvent::at(ts, "video/mp4");
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(event.hour(), 23);
        assert_eq!(event.category(), "video");
        assert_eq!(event.timestamp.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_raw_upload_ignores_opaque_fields() {
        let raw: RawUpload = serde_json::from_str(
            r#"{"createdAt":"2024-01-01T00:00:00Z","contentType":"image/png","size":12,"name":"a.png"}"#,
        )
        .unwrap();
        assert_eq!(raw, RawUpload::new("2024-01-01T00:00:00Z", "image/png"));
    }
}
