//! Formatting helpers for dashboard views.

use chrono::{DateTime, Utc};

pub const CURRENCY_SYMBOL: &str = "$";

/// Order amount as shown in the orders table: `$` and two decimals, no grouping.
pub fn format_amount(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{fixed}")
}

/// Human duration such as `"1 hr & 30 min"` or `"2 min & 5 sec"`.
pub fn duration_string(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    match (hours, mins, secs) {
        (0, 0, 0) => "0 sec".to_string(),
        (0, 0, s) => format!("{s} sec"),
        (0, m, 0) => format!("{m} min"),
        (0, m, s) => format!("{m} min & {s} sec"),
        (h, 0, 0) => format!("{h} hr"),
        (h, 0, s) => format!("{h} hr & {s} sec"),
        (h, m, 0) => format!("{h} hr & {m} min"),
        (h, m, s) => format!("{h} hr {m} min & {s} sec"),
    }
}

/// Relative age of `then` as seen from `now`. Future timestamps read as "just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    }
    if elapsed.num_hours() < 1 {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed.num_days() < 1 {
        return format!("{}h ago", elapsed.num_hours());
    }
    match elapsed.num_days() {
        1 => "1 day ago".to_string(),
        days => format!("{days} days ago"),
    }
}

/// `"05 Jan, 14:03"` in UTC.
pub fn short_date_time(at: DateTime<Utc>) -> String {
    at.format("%d %b, %H:%M").to_string()
}

/// `"January-2024"`.
pub fn month_string(at: DateTime<Utc>) -> String {
    at.format("%B-%Y").to_string()
}
