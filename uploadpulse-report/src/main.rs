//! uploadpulse-report - Upload Activity Report CLI
//!
//! Reads an upload export (a JSON array of upload records) and prints period
//! charts, streaks and a year calendar heatmap.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Parser;
use serde_json::Value;
use uploadpulse_core::analytics::{
    is_current_period, navigate, parse_date, year_options, ActivityLevel, ActivityReport, Bucket,
    Direction, Granularity, LevelThresholds, ReportRequest,
};
use uploadpulse_core::config::TimeZoneChoice;
use uploadpulse_core::format::{
    format_average, format_day_long, format_file_size, hour_range_label, plural_days,
};
use uploadpulse_core::{normalize_json, Config, NormalizedEvents, UploadEvent};

const BAR_WIDTH: u64 = 30;
const LEVEL_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];
const PICKER_YEARS: usize = 5;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Parser, Debug)]
#[command(name = "uploadpulse-report")]
#[command(about = "Upload activity report: charts, streaks and a calendar heatmap")]
#[command(version)]
struct Args {
    /// Upload export to read (JSON array), or "-" for stdin
    #[arg(long, short, default_value = "-")]
    input: String,

    /// Period to chart: week, month or year (default from config)
    #[arg(long)]
    period: Option<Granularity>,

    /// Any date inside the period to chart (YYYY-MM-DD, default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Year shown in the calendar heatmap (default: year of --date)
    #[arg(long)]
    year: Option<i32>,

    /// Day to highlight in the calendar and list in detail (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    select: Option<NaiveDate>,

    /// Step this many periods back
    #[arg(long, default_value_t = 0, conflicts_with = "next")]
    prev: u32,

    /// Step this many periods forward (stops at the current period)
    #[arg(long, default_value_t = 0)]
    next: u32,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Bucket days and hours in UTC instead of the configured time zone
    #[arg(long)]
    utc: bool,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,
}

/// Everything the printers need besides the report itself.
struct Output<'a> {
    report: &'a ActivityReport,
    normalized: &'a NormalizedEvents,
    records: &'a [Value],
    today: NaiveDate,
    top_file_types: usize,
    levels: LevelThresholds,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = uploadpulse_core::logging::init(&config.logging).ok();

    let records = read_export(&args.input)?;

    let timezone = if args.utc {
        TimeZoneChoice::Utc
    } else {
        config.report.timezone
    };
    let (normalized, clock_today) = match timezone {
        TimeZoneChoice::Local => (normalize_json(&records, &Local), Local::now().date_naive()),
        TimeZoneChoice::Utc => (normalize_json(&records, &Utc), Utc::now().date_naive()),
    };
    if normalized.discarded > 0 {
        eprintln!(
            "warning: skipped {} malformed record(s) of {}",
            normalized.discarded,
            normalized.total_records()
        );
    }

    let today = args.today.unwrap_or(clock_today);
    let granularity = args.period.unwrap_or(config.report.default_period);
    let anchor = args.date.unwrap_or(today);

    let range = if args.prev > 0 {
        navigate(anchor, granularity, Direction::Prev, args.prev, today)
    } else {
        navigate(anchor, granularity, Direction::Next, args.next, today)
    }
    .context("failed to select period")?;

    // A window reached by navigation no longer contains the requested date.
    let period_anchor = if range.contains(anchor) {
        anchor
    } else {
        range.start
    };
    let mut request = ReportRequest::new(period_anchor, granularity, today)
        .with_calendar_year(args.year.unwrap_or(period_anchor.year()));
    if let Some(date) = args.select {
        request = request.with_selected_date(date);
    }

    tracing::info!(
        input = %args.input,
        period = %granularity,
        window = %range.label,
        "Generating upload report"
    );

    let report = ActivityReport::compute(&normalized.events, &request)
        .context("failed to compute activity report")?;

    let output = Output {
        report: &report,
        normalized: &normalized,
        records: &records,
        today,
        top_file_types: config.report.top_file_types,
        levels: config.calendar.levels,
    };

    match args.export.as_deref() {
        Some("json") => print_json(&output)?,
        Some("md") => print_markdown(&output),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&output),
    }

    Ok(())
}

/// Read the export from a file, or from stdin when `input` is "-".
fn read_export(input: &str) -> Result<Vec<Value>> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read upload export from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read upload export {}", input))?
    };

    serde_json::from_str(&content).context("upload export must be a JSON array of records")
}

fn print_terminal(out: &Output) {
    let report = out.report;
    let title = format!("Upload activity: {}", report.range.label);

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if report.is_empty() {
        println!("  No uploads found for this period.");
        println!();
    } else {
        let insights = &report.insights;
        println!("SUMMARY");
        println!(
            "   Uploads:      {:<10} Avg/day: {}",
            insights.total_uploads,
            format_average(insights.average_per_day)
        );
        if let Some(day) = &insights.most_active_day {
            println!("   Busiest day:  {} ({})", day.date.format("%b %d"), day.count);
        }
        if let (Some(time), Some(hour)) = (insights.most_active_time(), insights.most_active_hour) {
            println!("   Busiest time: {} ({})", time, hour_range_label(hour));
        }
        if let Some(top) = &insights.top_file_type {
            println!("   Top type:     {} ({})", top.display_name(), top.count);
        }
        println!();

        println!("ACTIVITY");
        print_bars(&report.period_buckets, false);
        println!();

        println!("HOURS");
        print_bars(&report.hourly_buckets, true);
        println!();

        println!("FILE TYPES");
        for (i, file_type) in report.file_types.iter().take(out.top_file_types).enumerate() {
            println!(
                "   {}. {:<14} {:>6}",
                i + 1,
                file_type.display_name(),
                file_type.count
            );
        }
        println!();
    }

    // Streaks
    let streak = &report.streak;
    println!("STREAKS");
    println!(
        "   Current:  {}{}",
        plural_days(streak.current),
        if streak.is_active { " (active)" } else { "" }
    );
    if streak.longest > 0 {
        let dates = match (streak.longest_start, streak.longest_end) {
            (Some(start), Some(end)) => {
                format!(" ({} - {})", start.format("%b %d"), end.format("%b %d"))
            }
            _ => String::new(),
        };
        println!("   Longest:  {}{}", plural_days(streak.longest), dates);
    }
    println!("   Active:   {}", plural_days(streak.active_days));
    println!();

    // Calendar
    println!("CALENDAR {}", report.calendar_year);
    println!("       {}", calendar_header(report));
    for (weekday, name) in WEEKDAYS.iter().enumerate() {
        let row: String = report
            .calendar
            .iter()
            .map(|week| {
                let cell = &week.days[weekday];
                if cell.is_selected {
                    '◆'
                } else if !cell.in_selected_year {
                    ' '
                } else {
                    LEVEL_GLYPHS[usize::from(cell.level(&out.levels).as_index())]
                }
            })
            .collect();
        println!("   {} {}", name, row);
    }
    println!(
        "       less {} more",
        LEVEL_GLYPHS.iter().collect::<String>()
    );
    println!();

    if let Some(date) = report.selected_date {
        println!("{}", format_day_long(date).to_uppercase());
        if report.selected_uploads.is_empty() {
            println!("   No uploads on this day.");
        }
        for event in &report.selected_uploads {
            let (name, size) = record_details(out.records, event);
            println!(
                "   {}  {:<24} {:<18} {}",
                event.local.format("%l:%M %p"),
                name,
                event.content_type,
                size
            );
        }
        println!();
    }

    let years: Vec<String> = year_options(out.today, PICKER_YEARS)
        .into_iter()
        .map(|year| {
            if year == report.calendar_year {
                format!("[{}]", year)
            } else {
                year.to_string()
            }
        })
        .collect();
    println!("   Years: {} (--year)", years.join(" "));
    if is_current_period(&report.range, out.today) {
        println!("   This is the current period.");
    } else if report.can_advance {
        println!("   Newer periods available (--next 1).");
    }
    println!();
}

fn print_bars(buckets: &[Bucket], skip_empty: bool) {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    for bucket in buckets {
        if skip_empty && bucket.count == 0 {
            continue;
        }
        let width = if max == 0 {
            0
        } else {
            (bucket.count * BAR_WIDTH + max - 1) / max
        };
        println!(
            "   {:>6} {:<30} {}",
            bucket.label,
            "█".repeat(width as usize),
            bucket.count
        );
    }
}

/// Month labels positioned over the week columns of the calendar.
fn calendar_header(report: &ActivityReport) -> String {
    let mut header = vec![' '; report.calendar.len()];
    for column in &report.month_columns {
        for (offset, ch) in column.label.chars().enumerate() {
            if let Some(slot) = header.get_mut(column.week_index + offset) {
                *slot = ch;
            }
        }
    }
    header.into_iter().collect::<String>().trim_end().to_string()
}

/// Filename and size of the export record behind `event`.
fn record_details(records: &[Value], event: &UploadEvent) -> (String, String) {
    let record = records.get(event.source_index);
    let name = record
        .and_then(|r| r.get("filename"))
        .and_then(Value::as_str)
        .unwrap_or("(unnamed)")
        .to_string();
    let size = record
        .and_then(|r| r.get("size"))
        .and_then(Value::as_u64)
        .map(format_file_size)
        .unwrap_or_default();
    (name, size)
}

fn print_markdown(out: &Output) {
    let report = out.report;

    println!("# Upload activity: {}", report.range.label);
    println!();

    if report.is_empty() {
        println!("*No uploads found for this period.*");
        println!();
    } else {
        let insights = &report.insights;

        // Summary table
        println!("## Summary");
        println!();
        println!("| Metric | Value |");
        println!("|--------|-------|");
        println!("| Uploads | {} |", insights.total_uploads);
        println!(
            "| Average per day | {} |",
            format_average(insights.average_per_day)
        );
        if let Some(day) = &insights.most_active_day {
            println!(
                "| Most active day | {} ({}) |",
                day.date.format("%b %d, %Y"),
                day.count
            );
        }
        if let Some(time) = insights.most_active_time() {
            println!("| Most active time | {} |", time);
        }
        if let Some(top) = &insights.top_file_type {
            println!("| Top file type | {} |", top.display_name());
        }
        println!();

        println!("## Activity");
        println!();
        let unit = match report.granularity {
            Granularity::Year => "Month",
            Granularity::Week | Granularity::Month => "Day",
        };
        println!("| {} | Uploads |", unit);
        println!("|------|---------|");
        for bucket in &report.period_buckets {
            println!("| {} | {} |", bucket.label, bucket.count);
        }
        println!();

        println!("## File Types");
        println!();
        for (i, file_type) in report.file_types.iter().take(out.top_file_types).enumerate() {
            println!(
                "{}. **{}** - {} uploads",
                i + 1,
                file_type.display_name(),
                file_type.count
            );
        }
        println!();
    }

    // Streaks
    let streak = &report.streak;
    println!("## Streaks");
    println!();
    println!("- **Current streak:** {}", plural_days(streak.current));
    println!("- **Longest streak:** {}", plural_days(streak.longest));
    println!("- **Active days:** {}", streak.active_days);
    println!();

    let busiest = report
        .calendar
        .iter()
        .flat_map(|week| week.days.iter())
        .filter(|cell| cell.in_selected_year)
        .filter(|cell| cell.level(&out.levels) == ActivityLevel::Max)
        .count();
    println!("## Calendar {}", report.calendar_year);
    println!();
    println!(
        "- **Uploads:** {}",
        report.calendar.iter().map(|week| week.total()).sum::<u64>()
    );
    println!("- **Peak days:** {}", busiest);
    println!();

    if let Some(date) = report.selected_date {
        println!("## {}", format_day_long(date));
        println!();
        if report.selected_uploads.is_empty() {
            println!("*No uploads on this day.*");
        }
        for event in &report.selected_uploads {
            let (name, size) = record_details(out.records, event);
            println!(
                "- {} **{}** ({}) {}",
                event.local.format("%H:%M"),
                name,
                event.content_type,
                size
            );
        }
        println!();
    }

    println!("---");
    println!("*Generated by uploadpulse-report*");
}

fn print_json(out: &Output) -> Result<()> {
    let json = serde_json::json!({
        "records": out.normalized.total_records(),
        "discarded": out.normalized.discarded,
        "warnings": out.normalized.warnings,
        "report": out.report,
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
