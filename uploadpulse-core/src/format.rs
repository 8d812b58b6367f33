//! Formatting helpers shared across reports.

use chrono::NaiveDate;

/// 12-hour clock label for an hour of day (e.g., "3 PM").
pub fn hour_label(hour: u32) -> String {
    let h = hour % 12;
    let h = if h == 0 { 12 } else { h };
    let period = if hour % 24 < 12 { "AM" } else { "PM" };
    format!("{} {}", h, period)
}

/// Hour span label (e.g., "10am–11am").
pub fn hour_range_label(hour: u32) -> String {
    let short = |h: u32| {
        let twelve = if h % 12 == 0 { 12 } else { h % 12 };
        let period = if h % 24 < 12 { "am" } else { "pm" };
        format!("{}{}", twelve, period)
    };
    format!("{}–{}", short(hour), short((hour + 1) % 24))
}

/// "1 day", "3 days".
pub fn plural_days(n: u64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

/// Average with one decimal place, as shown on the dashboard.
pub fn format_average(value: f64) -> String {
    format!("{:.1}", value)
}

/// Long date for the selected-day heading (e.g., "Friday, January 5, 2024").
pub fn format_day_long(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Human-readable file size (e.g., "1.5 MB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
