//! Activity report - everything the analytics view needs in one pass.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::aggregate::{
    activity_days, bucket_by_hour, bucket_period, events_in_range, file_type_distribution,
    uploads_on, Bucket, FileTypeCount,
};
use super::calendar::{build_year, month_columns, CalendarWeek, MonthColumn};
use super::insights::{summarize, Insights};
use super::streak::{calculate_streaks, StreakResult};
use super::window::{can_advance, window, DateRange, Granularity};
use crate::error::Result;
use crate::types::UploadEvent;

/// What to compute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// Any date inside the period to chart
    pub anchor: NaiveDate,
    /// Period granularity
    pub granularity: Granularity,
    /// The current date, used for streaks and navigation
    pub today: NaiveDate,
    /// Year of the calendar grid (defaults to the anchor's year)
    pub calendar_year: Option<i32>,
    /// Day highlighted in the calendar and listed in detail
    pub selected_date: Option<NaiveDate>,
}

impl ReportRequest {
    pub fn new(anchor: NaiveDate, granularity: Granularity, today: NaiveDate) -> Self {
        Self {
            anchor,
            granularity,
            today,
            calendar_year: None,
            selected_date: None,
        }
    }

    pub fn with_calendar_year(mut self, year: i32) -> Self {
        self.calendar_year = Some(year);
        self
    }

    pub fn with_selected_date(mut self, date: NaiveDate) -> Self {
        self.selected_date = Some(date);
        self
    }
}

/// Complete analytics for one request.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    /// Period granularity
    pub granularity: Granularity,
    /// Window being charted
    pub range: DateRange,
    /// Whether a "next" window may be shown
    pub can_advance: bool,
    /// Activity chart buckets for the window
    pub period_buckets: Vec<Bucket>,
    /// Uploads per hour of day within the window
    pub hourly_buckets: Vec<Bucket>,
    /// Uploads per category within the window
    pub file_types: Vec<FileTypeCount>,
    /// Full-history streaks
    pub streak: StreakResult,
    /// Headline metrics for the window
    pub insights: Insights,
    /// Year shown in the calendar
    pub calendar_year: i32,
    /// Calendar heatmap weeks
    pub calendar: Vec<CalendarWeek>,
    /// Month label positions for the calendar
    pub month_columns: Vec<MonthColumn>,
    /// Selected day, if any
    pub selected_date: Option<NaiveDate>,
    /// Uploads on the selected day, newest first
    pub selected_uploads: Vec<UploadEvent>,
}

impl ActivityReport {
    /// Compute every view from a full snapshot of events.
    pub fn compute(events: &[UploadEvent], request: &ReportRequest) -> Result<Self> {
        let range = window(request.anchor, request.granularity)?;
        let windowed = events_in_range(events, &range);

        // Streaks and the calendar look at the whole history.
        let streak = calculate_streaks(events, request.today);
        let insights = summarize(&windowed, &range, streak);

        let calendar_year = request.calendar_year.unwrap_or(request.anchor.year());
        let calendar = build_year(calendar_year, &activity_days(events), request.selected_date)?;
        let month_columns = month_columns(&calendar);

        let selected_uploads = request
            .selected_date
            .map(|date| uploads_on(events, date).into_iter().cloned().collect())
            .unwrap_or_default();

        tracing::info!(
            window = %range.label,
            events = events.len(),
            windowed = windowed.len(),
            current_streak = streak.current,
            "Computed activity report"
        );

        Ok(Self {
            granularity: request.granularity,
            can_advance: can_advance(&range, request.today),
            period_buckets: bucket_period(&windowed, &range, request.granularity),
            hourly_buckets: bucket_by_hour(&windowed),
            file_types: file_type_distribution(&windowed),
            range,
            streak,
            insights,
            calendar_year,
            calendar,
            month_columns,
            selected_date: request.selected_date,
            selected_uploads,
        })
    }

    /// Whether the window holds no uploads.
    pub fn is_empty(&self) -> bool {
        self.insights.total_uploads == 0
    }
}
