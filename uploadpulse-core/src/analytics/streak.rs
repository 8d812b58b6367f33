//! Consecutive-day upload streaks.
//!
//! Streaks are always computed over the full event history so the selected
//! chart period never clips them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::UploadEvent;

/// Streak statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Length of the run ending at the most recent upload day (0 if inactive)
    pub current: u64,
    /// Longest run anywhere in the history
    pub longest: u64,
    /// Whether there was an upload today or yesterday
    pub is_active: bool,
    /// First day of the longest run (most recent one on ties)
    pub longest_start: Option<NaiveDate>,
    /// Last day of the longest run
    pub longest_end: Option<NaiveDate>,
    /// Number of distinct upload days
    pub active_days: u64,
}

impl StreakResult {
    /// Whether the streak grew compared to the value last shown.
    ///
    /// Callers keep `previous_current` themselves and fire their one-shot
    /// celebration only when this returns true. A first render with an active
    /// streak counts as growth from 0.
    pub fn increased_since(&self, previous_current: u64) -> bool {
        self.is_active && self.current > previous_current
    }
}

/// A run of consecutive days, walked newest to oldest.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: NaiveDate,
    end: NaiveDate,
    len: u64,
}

/// Compute streaks from the full upload history.
pub fn calculate_streaks(events: &[UploadEvent], today: NaiveDate) -> StreakResult {
    streaks_from_dates(events.iter().map(UploadEvent::date), today)
}

/// Compute streaks from upload dates; duplicates count once.
pub fn streaks_from_dates(
    dates: impl IntoIterator<Item = NaiveDate>,
    today: NaiveDate,
) -> StreakResult {
    let unique: BTreeSet<NaiveDate> = dates.into_iter().collect();
    if unique.is_empty() {
        return StreakResult::default();
    }

    let yesterday = today.pred_opt();
    let is_active = unique.contains(&today) || yesterday.is_some_and(|y| unique.contains(&y));

    // Walk newest to oldest. A gap of exactly one day extends the run; any
    // larger gap starts a new one.
    let mut runs: Vec<Run> = Vec::new();
    for &date in unique.iter().rev() {
        match runs.last_mut() {
            Some(run) if (run.start - date).num_days() == 1 => {
                run.start = date;
                run.len += 1;
            }
            _ => runs.push(Run {
                start: date,
                end: date,
                len: 1,
            }),
        }
    }

    let mut longest: Option<Run> = None;
    for run in &runs {
        if longest.map_or(true, |best| run.len > best.len) {
            longest = Some(*run);
        }
    }

    let current = if is_active {
        runs.first().map_or(0, |run| run.len)
    } else {
        0
    };

    let result = StreakResult {
        current,
        longest: longest.map_or(0, |run| run.len),
        is_active,
        longest_start: longest.map(|run| run.start),
        longest_end: longest.map(|run| run.end),
        active_days: unique.len() as u64,
    };

    tracing::debug!(
        current = result.current,
        longest = result.longest,
        is_active = result.is_active,
        runs = runs.len(),
        "Computed streaks"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_gap_breaks_current_streak() {
        let dates = [d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 5)];
        let streak = streaks_from_dates(dates, d(2024, 1, 5));

        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 3);
        assert!(streak.is_active);
        assert_eq!(streak.longest_start, Some(d(2024, 1, 1)));
        assert_eq!(streak.longest_end, Some(d(2024, 1, 3)));
        assert_eq!(streak.active_days, 4);
    }

    #[test]
    fn test_inactive_streak() {
        let streak = streaks_from_dates([d(2024, 1, 1), d(2024, 1, 2)], d(2024, 1, 10));
        assert!(!streak.is_active);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn test_yesterday_keeps_streak_alive() {
        let dates = [d(2024, 1, 7), d(2024, 1, 8), d(2024, 1, 9)];
        let streak = streaks_from_dates(dates, d(2024, 1, 10));
        assert!(streak.is_active);
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);

        // Two missed days end it.
        let streak = streaks_from_dates(dates, d(2024, 1, 11));
        assert!(!streak.is_active);
        assert_eq!(streak.current, 0);
    }

    #[test]
    fn test_empty_history() {
        let streak = streaks_from_dates(std::iter::empty(), d(2024, 1, 10));
        assert_eq!(streak, StreakResult::default());
        assert_eq!((streak.current, streak.longest, streak.is_active), (0, 0, false));
    }

    #[test]
    fn test_single_day() {
        let active = streaks_from_dates([d(2024, 1, 10)], d(2024, 1, 10));
        assert_eq!((active.current, active.longest, active.is_active), (1, 1, true));

        let stale = streaks_from_dates([d(2024, 1, 1)], d(2024, 1, 10));
        assert_eq!((stale.current, stale.longest, stale.is_active), (0, 1, false));
    }

    #[test]
    fn test_duplicate_uploads_count_once() {
        let events: Vec<UploadEvent> = [(1, 9), (1, 17), (2, 8), (2, 9), (2, 10)]
            .iter()
            .map(|&(day, hour)| {
                UploadEvent::at(Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(), "image/png")
            })
            .collect();

        let streak = calculate_streaks(&events, d(2024, 3, 2));
        assert_eq!(streak.current, 2);
        assert_eq!(streak.longest, 2);
        assert_eq!(streak.active_days, 2);
    }

    #[test]
    fn test_longest_tie_prefers_most_recent_run() {
        let dates = [d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 10), d(2024, 1, 11)];
        let streak = streaks_from_dates(dates, d(2024, 2, 1));
        assert_eq!(streak.longest, 2);
        assert_eq!(streak.longest_start, Some(d(2024, 1, 10)));
    }

    #[test]
    fn test_month_and_year_boundaries_are_consecutive() {
        let dates = [d(2023, 12, 31), d(2024, 1, 1), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)];
        let streak = streaks_from_dates(dates, d(2024, 3, 1));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn test_longest_never_below_current() {
        let histories: Vec<Vec<NaiveDate>> = vec![
            vec![],
            vec![d(2024, 5, 1)],
            vec![d(2024, 5, 1), d(2024, 5, 3), d(2024, 5, 4)],
            (1..=20).map(|day| d(2024, 5, day)).collect(),
            (1..=20).step_by(2).map(|day| d(2024, 5, day)).collect(),
        ];
        for history in histories {
            for today in [d(2024, 5, 4), d(2024, 5, 20), d(2024, 5, 21), d(2024, 6, 30)] {
                let streak = streaks_from_dates(history.iter().copied(), today);
                assert!(streak.longest >= streak.current, "{:?} at {}", history, today);
            }
        }
    }

    #[test]
    fn test_increased_since() {
        let streak = streaks_from_dates([d(2024, 1, 9), d(2024, 1, 10)], d(2024, 1, 10));
        assert!(streak.increased_since(0));
        assert!(streak.increased_since(1));
        assert!(!streak.increased_since(2));

        let inactive = streaks_from_dates([d(2024, 1, 1)], d(2024, 1, 10));
        assert!(!inactive.increased_since(0));
    }
}
