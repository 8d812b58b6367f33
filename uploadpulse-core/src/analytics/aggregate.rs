//! Bucketing of upload events for charts.
//!
//! Every function here is a counting pass over the events it is given. Day and
//! month buckets are keyed by the event's local date; hour buckets ignore the
//! date entirely, so callers window the events first when they need to.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::window::{DateRange, Granularity};
use crate::format::hour_label;
use crate::types::UploadEvent;

/// Count of events in one sub-interval (a day, a month or an hour of day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Stable key: `YYYY-MM-DD`, `YYYY-MM` or the hour `0`..`23`
    pub key: String,
    /// Short display label
    pub label: String,
    /// Number of events
    pub count: u64,
}

/// A calendar day with at least one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub count: u64,
}

/// Number of uploads in one top-level content-type category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeCount {
    #[serde(rename = "type")]
    pub file_type: String,
    pub count: u64,
}

impl FileTypeCount {
    /// Category with its first letter capitalized (e.g., "Image").
    pub fn display_name(&self) -> String {
        let mut chars = self.file_type.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// One bucket per day of `range`, labelled like "Jan 05".
pub fn bucket_by_day(events: &[UploadEvent], range: &DateRange) -> Vec<Bucket> {
    day_buckets(events, range, "%b %d")
}

/// One bucket per calendar month touching `range`, labelled like "Jan".
///
/// A month counts every event dated within that month, including days that
/// fall outside `range` when the range starts or ends mid-month.
pub fn bucket_by_month(events: &[UploadEvent], range: &DateRange) -> Vec<Bucket> {
    let mut counts: HashMap<(i32, u32), u64> = HashMap::new();
    for event in events {
        let date = event.date();
        *counts.entry((date.year(), date.month())).or_insert(0) += 1;
    }

    let mut buckets = Vec::new();
    let mut month = range.start.with_day(1);
    while let Some(start) = month.filter(|m| *m <= range.end) {
        buckets.push(Bucket {
            key: start.format("%Y-%m").to_string(),
            label: start.format("%b").to_string(),
            count: counts
                .get(&(start.year(), start.month()))
                .copied()
                .unwrap_or(0),
        });
        month = start.checked_add_months(Months::new(1));
    }
    buckets
}

/// Exactly 24 buckets, one per local hour of day.
pub fn bucket_by_hour(events: &[UploadEvent]) -> Vec<Bucket> {
    hourly_distribution(events)
        .iter()
        .enumerate()
        .map(|(hour, &count)| Bucket {
            key: hour.to_string(),
            label: hour_label(hour as u32),
            count,
        })
        .collect()
}

/// Event count by local hour (index 0-23).
pub fn hourly_distribution(events: &[UploadEvent]) -> [u64; 24] {
    let mut hours = [0u64; 24];
    for event in events {
        hours[event.hour() as usize] += 1;
    }
    hours
}

/// Buckets shaped for the activity chart of a period: weekdays ("Sun") for a
/// week, days of month ("5") for a month, months for a year.
pub fn bucket_period(events: &[UploadEvent], range: &DateRange, granularity: Granularity) -> Vec<Bucket> {
    match granularity {
        Granularity::Week => day_buckets(events, range, "%a"),
        Granularity::Month => day_buckets(events, range, "%-d"),
        Granularity::Year => bucket_by_month(events, range),
    }
}

/// Days with at least one upload, in the order each day is first seen.
pub fn activity_days(events: &[UploadEvent]) -> Vec<ActivityDay> {
    tally_first_seen(events.iter().map(UploadEvent::date))
        .into_iter()
        .map(|(date, count)| ActivityDay { date, count })
        .collect()
}

/// Uploads per category, most common first. Ties keep first-seen order.
pub fn file_type_distribution(events: &[UploadEvent]) -> Vec<FileTypeCount> {
    let mut types: Vec<FileTypeCount> = tally_first_seen(events.iter().map(UploadEvent::category))
        .into_iter()
        .map(|(file_type, count)| FileTypeCount {
            file_type: file_type.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    types.sort_by(|a, b| b.count.cmp(&a.count));
    types
}

/// Events whose local date falls inside `range`.
pub fn events_in_range(events: &[UploadEvent], range: &DateRange) -> Vec<UploadEvent> {
    events
        .iter()
        .filter(|e| range.contains(e.date()))
        .cloned()
        .collect()
}

/// Uploads made on `date`, newest first.
pub fn uploads_on(events: &[UploadEvent], date: NaiveDate) -> Vec<&UploadEvent> {
    let mut day: Vec<&UploadEvent> = events.iter().filter(|e| e.date() == date).collect();
    day.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    day
}

fn day_buckets(events: &[UploadEvent], range: &DateRange, label_format: &str) -> Vec<Bucket> {
    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    for event in events.iter().filter(|e| range.contains(e.date())) {
        *counts.entry(event.date()).or_insert(0) += 1;
    }

    range
        .days()
        .map(|date| Bucket {
            key: date.format("%Y-%m-%d").to_string(),
            label: date.format(label_format).to_string(),
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Count keys, preserving the order in which each key first appears.
fn tally_first_seen<K: Hash + Eq + Clone>(keys: impl Iterator<Item = K>) -> Vec<(K, u64)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut tally: Vec<(K, u64)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => tally[i].1 += 1,
            None => {
                index.insert(key.clone(), tally.len());
                tally.push((key, 1));
            }
        }
    }
    tally
}
