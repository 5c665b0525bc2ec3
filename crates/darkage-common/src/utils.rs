//! Shared utility functions.

use chrono::{DateTime, Utc};

/// Formats a timestamp as a calendar date.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Splits a multi-line text field into trimmed, non-empty lines.
pub fn non_empty_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Formats a duration in whole seconds as `Nd Nh`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    format!("{days}d {hours}h")
}
