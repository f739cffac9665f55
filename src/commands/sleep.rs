//! Sleep tracking and manual sleep logging.
//!
//! `start` and `stop` drive the tracker; the open session lives in the
//! database between invocations. `log` records a session after the fact.

use crate::db::shared::SharedStore;
use crate::libs::error::StoreError;
use crate::libs::formatter::{format_elapsed, format_minutes};
use crate::libs::messages::Message;
use crate::libs::metrics::{sleep_duration_minutes, SleepDuration};
use crate::libs::record::{format_timestamp, parse_timestamp, RecordFields, RecordId};
use crate::libs::settings::Settings;
use crate::libs::tracker::SleepTracker;
use crate::{msg_bail_anyhow, msg_info, msg_success, msg_warning};
use anyhow::Result;
use chrono::{Duration, Local};
use clap::{Args, Subcommand};

/// Sessions running longer than this prompt the "still asleep?" check.
const REMINDER_AFTER_MINUTES: i64 = 60;

#[derive(Debug, Args)]
pub struct SleepArgs {
    #[command(subcommand)]
    command: SleepCommand,
}

#[derive(Debug, Subcommand)]
enum SleepCommand {
    #[command(about = "Start tracking a sleep session now")]
    Start,
    #[command(about = "Stop the running sleep session")]
    Stop,
    #[command(about = "Show whether a session is running")]
    Status,
    #[command(about = "Log a sleep session with explicit times")]
    Log {
        /// Start time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        start: String,
        /// End time; omit for a session that is still running
        #[arg(long)]
        end: Option<String>,
    },
}

pub async fn cmd(args: SleepArgs) -> Result<()> {
    let store = SharedStore::open_default().await?;

    match args.command {
        SleepCommand::Start => {
            let open = store.open_sleep_sessions().await?;
            if open.len() > 1 {
                msg_warning!(Message::MultipleOpenSleepSessions(open.len()));
            }

            let now = Local::now().naive_local();
            let result = store
                .with_store(move |s| {
                    let mut tracker = SleepTracker::resume(s)?;
                    tracker.start_tracking(s, now)
                })
                .await;

            if let Err(StoreError::AlreadyTracking) = result {
                let since = store
                    .open_sleep_sessions()
                    .await?
                    .first()
                    .map(|session| format_timestamp(&session.start))
                    .unwrap_or_default();
                msg_bail_anyhow!(format!("{} (since {})", StoreError::AlreadyTracking, since));
            }
            result?;
            msg_success!(Message::SleepTrackingStarted(format_timestamp(&now)));
        }
        SleepCommand::Stop => {
            let now = Local::now().naive_local();
            let record = store
                .with_store(move |s| {
                    let mut tracker = SleepTracker::resume(s)?;
                    tracker.stop_tracking(s, now)
                })
                .await?;

            let label = match sleep_duration_minutes(record.start, record.end)? {
                SleepDuration::Minutes(m) => format_minutes(m),
                SleepDuration::NotAvailable => SleepDuration::NotAvailable.to_string(),
            };
            msg_success!(Message::SleepTrackingStopped(label));
        }
        SleepCommand::Status => {
            let tracker = store.with_store(|s| SleepTracker::resume(s)).await?;
            let now = Local::now().naive_local();

            match (tracker.started_at(), tracker.elapsed(now)) {
                (Some(start), Some(elapsed)) => {
                    msg_info!(Message::SleepTrackingRunning(format_timestamp(&start), format_elapsed(&elapsed)));
                    if elapsed >= Duration::minutes(REMINDER_AFTER_MINUTES) {
                        let name = Settings::new()?.display_name();
                        msg_info!(Message::SleepReminder(name));
                    }
                }
                _ => msg_info!(Message::SleepTrackingIdle),
            }
        }
        SleepCommand::Log { start, end } => {
            let start = parse_timestamp(&start)?;
            let end = end.as_deref().map(parse_timestamp).transpose()?;
            let id = store.insert(RecordFields::sleep(start, end)).await?;

            if let RecordId::Row(id) = id {
                msg_success!(Message::SleepLogged(id));
            }
        }
    }

    Ok(())
}
