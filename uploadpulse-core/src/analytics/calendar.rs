//! Year calendar heatmap.
//!
//! The grid is a run of Sunday-first weeks covering January 1 through
//! December 31 of one year. Leading and trailing cells from the neighbouring
//! years are kept so every week has seven days; they are flagged with
//! `in_selected_year = false`.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::aggregate::ActivityDay;
use crate::error::{Error, Result};

/// One day of the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for padding days from the previous or next year
    pub in_selected_year: bool,
    /// Raw upload count for the day
    pub count: u64,
    /// Whether this is the caller's selected date
    pub is_selected: bool,
}

impl CalendarCell {
    /// Heatmap intensity of this cell.
    pub fn level(&self, thresholds: &LevelThresholds) -> ActivityLevel {
        ActivityLevel::from_count(self.count, thresholds)
    }
}

/// Seven cells, Sunday through Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: [CalendarCell; 7],
}

impl CalendarWeek {
    /// Uploads in this week that belong to the selected year.
    pub fn total(&self) -> u64 {
        self.days
            .iter()
            .filter(|cell| cell.in_selected_year)
            .map(|cell| cell.count)
            .sum()
    }
}

/// Heatmap intensity buckets layered on top of raw counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl ActivityLevel {
    /// Map a count onto a level using ascending thresholds.
    pub fn from_count(count: u64, thresholds: &LevelThresholds) -> Self {
        let [low, medium, high, max] = thresholds.0;
        if count >= max {
            ActivityLevel::Max
        } else if count >= high {
            ActivityLevel::High
        } else if count >= medium {
            ActivityLevel::Medium
        } else if count >= low {
            ActivityLevel::Low
        } else {
            ActivityLevel::None
        }
    }

    /// Intensity as 0-4.
    pub fn as_index(&self) -> u8 {
        *self as u8
    }
}

/// Minimum counts for the Low, Medium, High and Max levels.
///
/// The default `[1, 2, 4, 7]` gives the scale 0 / 1 / 2-3 / 4-6 / 7+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelThresholds(pub [u64; 4]);

impl Default for LevelThresholds {
    fn default() -> Self {
        LevelThresholds([1, 2, 4, 7])
    }
}

impl LevelThresholds {
    /// Thresholds must start at 1 or more and strictly increase.
    pub fn validate(&self) -> Result<()> {
        let levels = self.0;
        if levels[0] == 0 {
            return Err(Error::Config(
                "calendar.levels must start at 1 or more".to_string(),
            ));
        }
        if levels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::Config(
                "calendar.levels must be strictly increasing".to_string(),
            ));
        }
        Ok(())
    }
}

/// Position of a month label above the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthColumn {
    /// Month number (1-12)
    pub month: u32,
    /// Short month name ("Jan")
    pub label: String,
    /// Index of the first week containing the 1st of the month
    pub week_index: usize,
}

/// Build the calendar grid for `year`.
///
/// Counts are looked up from `activity` by exact date; days without an entry
/// get 0. `selected` marks one cell as selected when it falls in the grid.
pub fn build_year(
    year: i32,
    activity: &[ActivityDay],
    selected: Option<NaiveDate>,
) -> Result<Vec<CalendarWeek>> {
    let invalid = || Error::InvalidWindow(format!("year {} cannot be represented", year));

    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;

    // Sunday on or before Jan 1 through the Saturday on or after Dec 31.
    let grid_start = first
        .checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_sunday())))
        .ok_or_else(invalid)?;
    let grid_end = last
        .checked_add_days(Days::new(u64::from(6 - last.weekday().num_days_from_sunday())))
        .ok_or_else(invalid)?;

    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    for day in activity {
        *counts.entry(day.date).or_insert(0) += day.count;
    }

    let week_count = ((grid_end - grid_start).num_days() + 1) / 7;
    let weeks: Vec<CalendarWeek> = (0..week_count as u64)
        .map(|week| {
            let week_start = grid_start + Days::new(week * 7);
            CalendarWeek {
                days: std::array::from_fn(|offset| {
                    let date = week_start + Days::new(offset as u64);
                    CalendarCell {
                        date,
                        in_selected_year: date.year() == year,
                        count: counts.get(&date).copied().unwrap_or(0),
                        is_selected: selected == Some(date),
                    }
                }),
            }
        })
        .collect();

    tracing::debug!(year, weeks = weeks.len(), "Built calendar grid");
    Ok(weeks)
}

/// Where each month of the grid's year begins, for axis labels.
pub fn month_columns(weeks: &[CalendarWeek]) -> Vec<MonthColumn> {
    weeks
        .iter()
        .enumerate()
        .flat_map(|(index, week)| {
            week.days
                .iter()
                .filter(|cell| cell.in_selected_year && cell.date.day() == 1)
                .map(move |cell| MonthColumn {
                    month: cell.date.month(),
                    label: cell.date.format("%b").to_string(),
                    week_index: index,
                })
        })
        .collect()
}
