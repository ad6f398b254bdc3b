//! Formatting helpers for durations and distances shown in tables.
//!
//! ```rust
//! use chrono::Duration;
//! use sportlog::libs::formatter::{format_distance, format_duration};
//!
//! assert_eq!(format_duration(&Duration::seconds(3725)), "1:02:05");
//! assert_eq!(format_distance(9.0), "9.0 km");
//! ```

use chrono::Duration;

/// Renders a duration as `H:MM:SS`. Negative durations render as zero.
pub fn format_duration(duration: &Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

/// Freefall and similar times are stored in whole seconds.
pub fn format_seconds(seconds: i64) -> String {
    format_duration(&Duration::seconds(seconds))
}

/// Stored totals are already rounded; this only fixes the display width.
pub fn format_distance(kilometres: f64) -> String {
    format!("{:.1} km", kilometres)
}
