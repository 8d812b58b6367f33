//! # uploadpulse-core
//!
//! Core library for uploadpulse - upload activity analytics.
//!
//! This library provides:
//! - Validation of raw upload records into canonical events
//! - Period windows (week / month / year) with navigation
//! - Day, month, hour and file-type buckets for charts
//! - Consecutive-day streaks and a year calendar heatmap
//! - Headline insights (busiest day, busiest hour, top file type)
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through two layers:
//! - **Layer 0 (Raw):** Upload records as exported by the storage backend
//! - **Layer 1 (Derived):** Buckets, streaks, grids and insights, recomputed
//!   from a full snapshot on every call
//!
//! Every computation is a pure function. "Today" and the time zone used for
//! calendar dates are passed in explicitly.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use uploadpulse_core::analytics::{ActivityReport, Granularity, ReportRequest};
//! use uploadpulse_core::ingest::normalize;
//! use uploadpulse_core::RawUpload;
//!
//! let raw = vec![RawUpload::new("2024-01-05T10:00:00Z", "image/png")];
//! let normalized = normalize(&raw, &Utc);
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//! let request = ReportRequest::new(today, Granularity::Month, today);
//! let report = ActivityReport::compute(&normalized.events, &request).unwrap();
//!
//! assert_eq!(report.insights.total_uploads, 1);
//! assert_eq!(report.streak.current, 1);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{normalize, normalize_json, NormalizedEvents};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;
