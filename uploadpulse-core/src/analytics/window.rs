//! Period windows - week / month / year ranges and navigation
//!
//! A window is the concrete, inclusive date range of the period containing an
//! anchor date, plus the label shown above the charts.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Granularity of the selected period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Sunday through Saturday
    Week,
    /// A calendar month
    #[default]
    Month,
    /// January 1 through December 31
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            _ => Err(format!("unknown period: {} (expected week, month or year)", s)),
        }
    }
}

/// Navigation direction between adjacent windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Inclusive date range of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive)
    pub start: NaiveDate,
    /// Last day (inclusive)
    pub end: NaiveDate,
    /// Display label, e.g. "October 2026"
    pub label: String,
}

impl DateRange {
    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered (0 for an inverted range).
    pub fn num_days(&self) -> u64 {
        let days = (self.end - self.start).num_days() + 1;
        days.max(0) as u64
    }

    /// Every day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Compute the window of `granularity` containing `anchor`.
pub fn window(anchor: NaiveDate, granularity: Granularity) -> Result<DateRange> {
    match granularity {
        Granularity::Week => {
            let offset = u64::from(anchor.weekday().num_days_from_sunday());
            let start = anchor
                .checked_sub_days(Days::new(offset))
                .ok_or_else(|| out_of_range(anchor))?;
            let end = start
                .checked_add_days(Days::new(6))
                .ok_or_else(|| out_of_range(anchor))?;
            Ok(DateRange {
                start,
                end,
                label: format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y")),
            })
        }
        Granularity::Month => {
            let start = anchor.with_day(1).ok_or_else(|| out_of_range(anchor))?;
            let end = start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .ok_or_else(|| out_of_range(anchor))?;
            Ok(DateRange {
                start,
                end,
                label: anchor.format("%B %Y").to_string(),
            })
        }
        Granularity::Year => {
            let year = anchor.year();
            let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| out_of_range(anchor))?;
            let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| out_of_range(anchor))?;
            Ok(DateRange {
                start,
                end,
                label: year.to_string(),
            })
        }
    }
}

/// Compute a window from a `YYYY-MM-DD` anchor string.
///
/// An anchor that does not parse is a caller error and is reported as
/// [`Error::InvalidWindow`] rather than coerced to some default date.
pub fn window_from_str(anchor: &str, granularity: Granularity) -> Result<DateRange> {
    window(parse_date(anchor)?, granularity)
}

/// Parse a `YYYY-MM-DD` date supplied by a caller.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidWindow(format!("unparseable date {:?}: {}", raw, e)))
}

/// Anchor of the window one unit before or after `range`.
///
/// Moves from `range.start`, so month and year steps never hit a short month.
/// The result may lie in the future; use [`can_advance`] to gate "next".
pub fn advance(range: &DateRange, granularity: Granularity, direction: Direction) -> Result<NaiveDate> {
    let start = range.start;
    let moved = match (granularity, direction) {
        (Granularity::Week, Direction::Next) => start.checked_add_days(Days::new(7)),
        (Granularity::Week, Direction::Prev) => start.checked_sub_days(Days::new(7)),
        (Granularity::Month, Direction::Next) => start.checked_add_months(Months::new(1)),
        (Granularity::Month, Direction::Prev) => start.checked_sub_months(Months::new(1)),
        (Granularity::Year, Direction::Next) => start.checked_add_months(Months::new(12)),
        (Granularity::Year, Direction::Prev) => start.checked_sub_months(Months::new(12)),
    };
    moved.ok_or_else(|| out_of_range(start))
}

/// Whether "next" is allowed from `range`.
///
/// Only while the window ends before today: the window containing today is the
/// last one reachable, so navigation never lands in a period that lies wholly
/// in the future.
pub fn can_advance(range: &DateRange, today: NaiveDate) -> bool {
    range.end < today
}

/// Whether `range` is the window containing today.
pub fn is_current_period(range: &DateRange, today: NaiveDate) -> bool {
    range.contains(today)
}

/// Move `steps` windows from the one containing `anchor`.
///
/// Moving forward stops at the window containing `today`.
pub fn navigate(
    anchor: NaiveDate,
    granularity: Granularity,
    direction: Direction,
    steps: u32,
    today: NaiveDate,
) -> Result<DateRange> {
    let mut range = window(anchor, granularity)?;
    for _ in 0..steps {
        if direction == Direction::Next && !can_advance(&range, today) {
            tracing::debug!(label = %range.label, "Reached current period, not advancing");
            break;
        }
        range = window(advance(&range, granularity, direction)?, granularity)?;
    }
    Ok(range)
}

/// Years offered by a year picker: this year and the `count - 1` before it,
/// newest first.
pub fn year_options(today: NaiveDate, count: usize) -> Vec<i32> {
    (0..count as i32).map(|i| today.year() - i).collect()
}

fn out_of_range(date: NaiveDate) -> Error {
    Error::InvalidWindow(format!("date arithmetic out of range near {}", date))
}
