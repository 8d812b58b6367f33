//! Headline insights for the selected window.
//!
//! "Most active" picks keep the first maximum in iteration order: days and
//! file types in the order first seen in the input, hours from 0 to 23.

use serde::{Deserialize, Serialize};

use super::aggregate::{
    activity_days, events_in_range, file_type_distribution, hourly_distribution, ActivityDay,
    FileTypeCount,
};
use super::streak::StreakResult;
use super::window::DateRange;
use crate::format::hour_label;
use crate::types::UploadEvent;

/// Summary metrics for a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Uploads inside the window
    pub total_uploads: u64,
    /// Uploads per calendar day of the window
    pub average_per_day: f64,
    /// Busiest day in the window
    pub most_active_day: Option<ActivityDay>,
    /// Busiest local hour (0-23)
    pub most_active_hour: Option<u32>,
    /// Most common top-level content type
    pub top_file_type: Option<FileTypeCount>,
    /// Full-history streaks
    pub streak: StreakResult,
}

impl Insights {
    /// Busiest hour as a 12-hour label ("3 PM").
    pub fn most_active_time(&self) -> Option<String> {
        self.most_active_hour.map(hour_label)
    }
}

/// Summarize the events of `range`.
///
/// Events outside the range are ignored, so passing the full history or an
/// already-windowed slice gives the same result.
pub fn summarize(events: &[UploadEvent], range: &DateRange, streak: StreakResult) -> Insights {
    let windowed = events_in_range(events, range);
    let total_uploads = windowed.len() as u64;

    let days = range.num_days();
    let average_per_day = if days == 0 {
        0.0
    } else {
        total_uploads as f64 / days as f64
    };

    let mut most_active_day: Option<ActivityDay> = None;
    for day in activity_days(&windowed) {
        if most_active_day.map_or(true, |best| day.count > best.count) {
            most_active_day = Some(day);
        }
    }

    let mut most_active_hour: Option<(u32, u64)> = None;
    for (hour, &count) in hourly_distribution(&windowed).iter().enumerate() {
        if count > 0 && most_active_hour.map_or(true, |(_, best)| count > best) {
            most_active_hour = Some((hour as u32, count));
        }
    }

    let top_file_type = file_type_distribution(&windowed).into_iter().next();

    tracing::debug!(
        window = %range.label,
        total_uploads,
        "Summarized window"
    );

    Insights {
        total_uploads,
        average_per_day,
        most_active_day,
        most_active_hour: most_active_hour.map(|(hour, _)| hour),
        top_file_type,
        streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::window::{window, Granularity};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn event(m: u32, d: u32, h: u32, ct: &str) -> UploadEvent {
        UploadEvent::at(Utc.with_ymd_and_hms(2024, m, d, h, 0, 0).unwrap(), ct)
    }

    fn january() -> DateRange {
        window(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), Granularity::Month).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let insights = summarize(&[], &january(), StreakResult::default());
        assert_eq!(insights.total_uploads, 0);
        assert_eq!(insights.average_per_day, 0.0);
        assert!(insights.most_active_day.is_none());
        assert!(insights.most_active_hour.is_none());
        assert!(insights.top_file_type.is_none());
        assert!(insights.most_active_time().is_none());
    }

    #[test]
    fn test_top_file_type_groups_by_category() {
        let events = vec![
            event(1, 2, 10, "image/png"),
            event(1, 3, 10, "image/jpeg"),
            event(1, 4, 10, "video/mp4"),
        ];
        let insights = summarize(&events, &january(), StreakResult::default());
        assert_eq!(
            insights.top_file_type,
            Some(FileTypeCount {
                file_type: "image".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn test_window_metrics() {
        let events = vec![
            event(1, 5, 9, "image/png"),
            event(1, 5, 15, "image/png"),
            event(1, 5, 15, "text/plain"),
            event(1, 20, 15, "video/mp4"),
            event(1, 21, 8, "image/gif"),
            // Outside the window
            event(2, 1, 15, "video/mp4"),
            event(2, 1, 15, "video/mp4"),
        ];
        let insights = summarize(&events, &january(), StreakResult::default());

        assert_eq!(insights.total_uploads, 5);
        assert!((insights.average_per_day - 5.0 / 31.0).abs() < 1e-9);
        assert_eq!(
            insights.most_active_day,
            Some(ActivityDay {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                count: 3
            })
        );
        assert_eq!(insights.most_active_hour, Some(15));
        assert_eq!(insights.most_active_time().as_deref(), Some("3 PM"));
        assert_eq!(insights.top_file_type.unwrap().file_type, "image");
    }

    #[test]
    fn test_streak_passes_through() {
        let streak = StreakResult {
            current: 4,
            longest: 9,
            is_active: true,
            ..Default::default()
        };
        let insights = summarize(&[], &january(), streak);
        assert_eq!(insights.streak, streak);
    }

    #[test]
    fn test_prewindowed_input_gives_same_result() {
        let events = vec![
            event(1, 5, 9, "image/png"),
            event(2, 5, 9, "image/png"),
            event(1, 6, 11, "audio/mpeg"),
        ];
        let range = january();
        let windowed = events_in_range(&events, &range);
        assert_eq!(
            summarize(&events, &range, StreakResult::default()),
            summarize(&windowed, &range, StreakResult::default())
        );
    }
}
