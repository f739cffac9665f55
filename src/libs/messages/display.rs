//! Display implementation for application messages.
//!
//! All user-facing text lives here so wording stays consistent between the
//! store's log lines and the terminal front end.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === SCHEMA MESSAGES ===
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
            Message::StorageUnavailable(reason) => format!("Cannot open the record store: {}", reason),

            // === FEEDING MESSAGES ===
            Message::FeedingLogged(id, time) => format!("Feeding #{} logged at {}", id, time),

            // === SLEEP MESSAGES ===
            Message::SleepTrackingStarted(start) => format!("Sleep tracking started at {}", start),
            Message::SleepTrackingStopped(duration) => format!("Sleep tracking stopped, slept {}", duration),
            Message::SleepTrackingRunning(start, elapsed) => {
                format!("Tracking sleep since {} (elapsed {})", start, elapsed)
            }
            Message::SleepTrackingIdle => "Sleep tracking is not running".to_string(),
            Message::SleepLogged(id) => format!("Sleep record #{} logged", id),
            Message::MultipleOpenSleepSessions(count) => {
                format!("{} sleep sessions are still open; using the most recent one", count)
            }
            Message::SleepReminder(name) => format!("Is {} still asleep?", name),

            // === GROWTH MESSAGES ===
            Message::GrowthRecorded(id) => format!("Growth record {} saved", id),

            // === RECORD MESSAGES ===
            Message::RecordUpdated(kind, id) => format!("Updated {} record {}", kind, id),
            Message::RecordDeleted(kind, id) => format!("Deleted {} record with ID {}", kind, id),
            Message::RecordsNotFound(kind) => format!("No {} records found", kind),
            Message::RecordsHeader(kind, view) => format!("{} records ({})", capitalize(kind), view),
            Message::ChartHeader(series, view) => format!("{} ({})", series, view),
            Message::ConfirmDeleteRecord(kind, id) => {
                format!("Are you sure you want to delete {} record {}?", kind, id)
            }
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::NoChangesProvided => "Nothing to update: no fields given".to_string(),

            // === ANOMALY MESSAGES ===
            Message::UnrecognizedAmount(raw) => format!("Unrecognized feeding amount '{}', charted as 0", raw),
            Message::NegativeSleepDuration(start, end) => {
                format!("Sleep session ends ({}) before it starts ({})", end, start)
            }

            // === PROFILE MESSAGES ===
            Message::ProfileName(name) => format!("Name: {}", name),
            Message::ProfileNameNotSet => "No name saved yet".to_string(),
            Message::ProfileSaved => "Profile saved!".to_string(),
            Message::PromptProfileName => "Baby's name".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found, using defaults".to_string(),
        };
        write!(f, "{}", s)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
