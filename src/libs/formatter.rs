//! Duration formatting for tables, status lines and the tracking clock.
//!
//! ## Format Specifications
//!
//! - [`format_minutes`]: `"H hours M minutes"`, the text shown next to a
//!   finished sleep session (`510` → `"8 hours 30 minutes"`)
//! - [`format_elapsed`]: `"HH:MM:SS"`, the running clock while tracking
//! - [`format_duration`]: `"HH:MM"`, compact totals in tables
//!
//! Negative inputs are clamped to zero; formatting never fails.
//!
//! ```rust
//! use babylog::libs::formatter::{format_duration, format_elapsed, format_minutes};
//! use chrono::Duration;
//!
//! assert_eq!(format_minutes(510), "8 hours 30 minutes");
//! assert_eq!(format_elapsed(&Duration::seconds(3725)), "01:02:05");
//! assert_eq!(format_duration(&Duration::minutes(90)), "01:30");
//! ```

use chrono::Duration;

/// Formats whole minutes as "H hours M minutes".
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{} hours {} minutes", minutes / 60, minutes % 60)
}

/// Formats an elapsed duration as a "HH:MM:SS" clock.
pub fn format_elapsed(duration: &Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Formats a chrono::Duration into a "HH:MM" string.
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    // Clamp so a negative duration prints as 00:00
    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}
