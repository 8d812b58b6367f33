//! Integration tests for the uploadpulse ingestion and analytics pipeline
//!
//! These tests use the export in `tests/fixtures/uploads.json` to verify the
//! end-to-end flow from raw records to buckets, streaks, calendar and insights.

use std::path::PathBuf;

use chrono::{Datelike, FixedOffset, NaiveDate, Utc};
use uploadpulse_core::analytics::{
    activity_days, bucket_by_day, bucket_by_hour, build_year, calculate_streaks,
    events_in_range, summarize, window, ActivityReport, Granularity, ReportRequest,
};
use uploadpulse_core::ingest::parse_export;
use uploadpulse_core::{logging, NormalizedEvents};

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load_fixture_in<Tz: chrono::TimeZone>(tz: &Tz) -> NormalizedEvents {
    logging::init_test();
    let json = std::fs::read_to_string(fixture_path("uploads.json")).expect("fixture should exist");
    parse_export(&json, tz).expect("fixture should be a JSON array")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ============================================
// Ingestion
// ============================================

#[test]
fn test_fixture_normalization() {
    let normalized = load_fixture_in(&Utc);

    assert_eq!(normalized.total_records(), 11);
    assert_eq!(normalized.events.len(), 8);
    assert_eq!(normalized.discarded, 3);
    assert_eq!(normalized.warnings.len(), 3);

    // Source indexes let callers reach the opaque fields of each record.
    let indexes: Vec<usize> = normalized.events.iter().map(|e| e.source_index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3, 4, 5, 7, 9]);

    let untyped = normalized.events.iter().find(|e| e.source_index == 5).unwrap();
    assert_eq!(untyped.category(), "other");
}

#[test]
fn test_reporting_zone_moves_day_boundaries() {
    let sydney = FixedOffset::east_opt(10 * 3600).unwrap();
    let normalized = load_fixture_in(&sydney);

    // 2023-12-31T23:59:59Z is already New Year's Day at UTC+10.
    let days = activity_days(&normalized.events);
    let jan1 = days.iter().find(|day| day.date == d(2024, 1, 1)).unwrap();
    assert_eq!(jan1.count, 2);
    assert!(days.iter().all(|day| day.date.year() == 2024));
}

// ============================================
// Aggregation properties
// ============================================

#[test]
fn test_day_buckets_sum_to_windowed_count() {
    let events = load_fixture_in(&Utc).events;

    for anchor in [d(2023, 12, 31), d(2024, 1, 3), d(2024, 1, 20), d(2024, 2, 10)] {
        for granularity in [Granularity::Week, Granularity::Month, Granularity::Year] {
            let range = window(anchor, granularity).unwrap();
            let total: u64 = bucket_by_day(&events, &range).iter().map(|b| b.count).sum();
            let expected = events.iter().filter(|e| range.contains(e.date())).count() as u64;
            assert_eq!(total, expected, "{} {}", granularity, range.label);
        }
    }
}

#[test]
fn test_hour_buckets_sum_to_windowed_count() {
    let events = load_fixture_in(&Utc).events;
    let range = window(d(2024, 1, 10), Granularity::Month).unwrap();
    let windowed = events_in_range(&events, &range);

    let buckets = bucket_by_hour(&windowed);
    assert_eq!(buckets.len(), 24);
    assert!(buckets.iter().all(|b| b.key.parse::<u32>().unwrap() < 24));
    assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), windowed.len() as u64);
    assert_eq!(buckets[14].count, 2);
}

// ============================================
// Streaks, calendar, insights
// ============================================

#[test]
fn test_streak_over_full_history() {
    let events = load_fixture_in(&Utc).events;
    let streak = calculate_streaks(&events, d(2024, 2, 11));

    assert!(streak.is_active);
    assert_eq!(streak.current, 1);
    assert_eq!(streak.longest, 4);
    assert_eq!(streak.longest_start, Some(d(2023, 12, 31)));
    assert_eq!(streak.longest_end, Some(d(2024, 1, 3)));
    assert_eq!(streak.active_days, 6);
}

#[test]
fn test_calendar_for_fixture_year() {
    let events = load_fixture_in(&Utc).events;
    let weeks = build_year(2024, &activity_days(&events), Some(d(2024, 1, 5))).unwrap();

    let jan5 = weeks
        .iter()
        .flat_map(|w| w.days.iter())
        .find(|c| c.date == d(2024, 1, 5))
        .unwrap();
    assert_eq!(jan5.count, 3);
    assert!(jan5.is_selected);

    let in_year: u64 = weeks.iter().map(|w| w.total()).sum();
    assert_eq!(in_year, 7);
}

#[test]
fn test_january_insights() {
    let events = load_fixture_in(&Utc).events;
    let range = window(d(2024, 1, 1), Granularity::Month).unwrap();
    let insights = summarize(&events, &range, calculate_streaks(&events, d(2024, 2, 11)));

    assert_eq!(insights.total_uploads, 6);
    assert!((insights.average_per_day - 6.0 / 31.0).abs() < 1e-9);
    let busiest = insights.most_active_day.unwrap();
    assert_eq!((busiest.date, busiest.count), (d(2024, 1, 5), 3));
    assert_eq!(insights.most_active_hour, Some(14));
    let top = insights.top_file_type.unwrap();
    assert_eq!((top.file_type.as_str(), top.count), ("image", 3));
    assert_eq!(insights.streak.longest, 4);
}

// ============================================
// Full report
// ============================================

#[test]
fn test_full_report_is_deterministic() {
    let events = load_fixture_in(&Utc).events;
    let request = ReportRequest::new(d(2024, 1, 4), Granularity::Week, d(2024, 2, 11))
        .with_selected_date(d(2024, 1, 5));

    let first = ActivityReport::compute(&events, &request).unwrap();
    let second = ActivityReport::compute(&events, &request).unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(first.range.label, "Dec 31 - Jan 6, 2024");
    assert!(first.can_advance);
    assert_eq!(first.insights.total_uploads, 7);
    assert_eq!(first.selected_uploads.len(), 3);
    assert_eq!(first.selected_uploads[0].source_index, 5);
}

#[test]
fn test_report_rejects_unrepresentable_calendar_year() {
    let request = ReportRequest::new(d(2024, 1, 4), Granularity::Month, d(2024, 1, 4))
        .with_calendar_year(400_000);
    assert!(ActivityReport::compute(&[], &request).is_err());
}
