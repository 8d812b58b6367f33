//! Analytics module for uploadpulse
//!
//! Turns normalized upload events into:
//! - Period windows with navigation ([`window`])
//! - Day / month / hour / file-type buckets ([`aggregate`])
//! - Consecutive-day streaks ([`streak`])
//! - A year calendar heatmap ([`calendar`])
//! - Headline insights ([`insights`])
//!
//! [`report::ActivityReport`] runs all of them for one request.
//!
//! Every function is pure: the same events and parameters always produce the
//! same output, and nothing is cached between calls.

pub mod aggregate;
pub mod calendar;
pub mod insights;
pub mod report;
pub mod streak;
pub mod window;

pub use aggregate::{
    activity_days, bucket_by_day, bucket_by_hour, bucket_by_month, bucket_period,
    events_in_range, file_type_distribution, hourly_distribution, uploads_on, ActivityDay, Bucket,
    FileTypeCount,
};
pub use calendar::{
    build_year, month_columns, ActivityLevel, CalendarCell, CalendarWeek, LevelThresholds,
    MonthColumn,
};
pub use insights::{summarize, Insights};
pub use report::{ActivityReport, ReportRequest};
pub use streak::{calculate_streaks, streaks_from_dates, StreakResult};
pub use window::{
    advance, can_advance, is_current_period, navigate, parse_date, window, window_from_str,
    year_options, DateRange, Direction, Granularity,
};
