//! Sleep tracking state machine: `Idle -> Tracking -> Idle`.
//!
//! Starting writes an open sleep row (no end time) right away, so a session
//! survives the process being killed; stopping fills in the end time.
//! [`SleepTracker::resume`] picks an open session back up, which is how the
//! terminal front end carries a session across invocations.
//!
//! ```rust
//! use babylog::db::records::RecordStore;
//! use babylog::libs::tracker::SleepTracker;
//! use chrono::{Duration, NaiveDate};
//!
//! let mut store = RecordStore::open_in_memory()?;
//! let mut tracker = SleepTracker::new();
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(22, 0, 0).unwrap();
//!
//! tracker.start_tracking(&mut store, start)?;
//! let record = tracker.stop_tracking(&mut store, start + Duration::minutes(510))?;
//! assert_eq!(record.end, Some(start + Duration::minutes(510)));
//! # Ok::<(), babylog::libs::error::StoreError>(())
//! ```

use crate::db::records::RecordStore;
use crate::libs::error::{Result, StoreError};
use crate::libs::record::{format_timestamp, Record, RecordFields, RecordId, RecordKind, SleepFields, SleepRecord};
use chrono::{Duration, Local, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Tracking { record_id: i64, start: NaiveDateTime },
}

#[derive(Debug, Clone)]
pub struct SleepTracker {
    state: TrackerState,
}

impl Default for SleepTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepTracker {
    pub fn new() -> Self {
        Self { state: TrackerState::Idle }
    }

    /// Rebuilds the tracker from the newest open sleep session, if any.
    pub fn resume(store: &RecordStore) -> Result<Self> {
        let state = match store.open_sleep_sessions()?.first() {
            Some(session) => TrackerState::Tracking { record_id: session.id, start: session.start },
            None => TrackerState::Idle,
        };
        Ok(Self { state })
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackerState::Tracking { .. })
    }

    /// Start time of the running session.
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        match self.state {
            TrackerState::Tracking { start, .. } => Some(start),
            TrackerState::Idle => None,
        }
    }

    /// Time elapsed since the session started, `None` when idle.
    pub fn elapsed(&self, now: NaiveDateTime) -> Option<Duration> {
        self.started_at().map(|start| now - start)
    }

    /// Idle → Tracking. Persists an open sleep row starting at `now`.
    ///
    /// Fails with `AlreadyTracking` if this tracker, or another one on the
    /// same store, already has a session running.
    pub fn start_tracking(&mut self, store: &mut RecordStore, now: NaiveDateTime) -> Result<RecordId> {
        if self.is_tracking() || !store.open_sleep_sessions()?.is_empty() {
            return Err(StoreError::AlreadyTracking);
        }

        let id = store.insert(RecordFields::sleep(now, None))?;
        let RecordId::Row(record_id) = id else {
            return Err(StoreError::validation(format!("unexpected sleep record id {}", id)));
        };

        tracing::info!(record = record_id, start = %format_timestamp(&now), "sleep tracking started");
        self.state = TrackerState::Tracking { record_id, start: now };
        Ok(id)
    }

    /// Tracking → Idle. Requires `now` strictly after the start time.
    ///
    /// On failure the tracker stays in `Tracking`, except when the open row
    /// was deleted underneath it, in which case it falls back to `Idle`.
    pub fn stop_tracking(&mut self, store: &mut RecordStore, now: NaiveDateTime) -> Result<SleepRecord> {
        let TrackerState::Tracking { record_id, start } = self.state else {
            return Err(StoreError::NotTracking);
        };

        if now <= start {
            return Err(StoreError::validation(format!(
                "sleep cannot end at {} when it started at {}",
                format_timestamp(&now),
                format_timestamp(&start)
            )));
        }

        let fields = RecordFields::Sleep(SleepFields { start: None, end: Some(Some(now)) });
        match store.update(RecordKind::Sleep, &RecordId::Row(record_id), fields) {
            Ok(Record::Sleep(record)) => {
                tracing::info!(record = record_id, end = %format_timestamp(&now), "sleep tracking stopped");
                self.state = TrackerState::Idle;
                Ok(record)
            }
            Ok(other) => Err(StoreError::validation(format!("expected a sleep record, got {}", other.kind()))),
            Err(e) if e.is_not_found() => {
                self.state = TrackerState::Idle;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn start(&mut self, store: &mut RecordStore) -> Result<RecordId> {
        self.start_tracking(store, Local::now().naive_local())
    }

    pub fn stop(&mut self, store: &mut RecordStore) -> Result<SleepRecord> {
        self.stop_tracking(store, Local::now().naive_local())
    }
}
