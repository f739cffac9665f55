//! Named time windows and range-filtered record selection.
//!
//! Screens ask for "today" or "the past 7 days"; this module turns that into
//! a concrete `[start, end]` window and asks the store for the records of
//! the requested kind inside it. The upper bound is always `now`, so a
//! record dated in the future never shows up in today's list.

use crate::db::records::RecordStore;
use crate::libs::error::{Result, StoreError};
use crate::libs::record::{Record, RecordKind};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named time window used to filter records for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeView {
    #[serde(rename = "today")]
    Today,
    #[default]
    #[serde(rename = "past7days")]
    Past7Days,
}

impl RangeView {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeView::Today => "today",
            RangeView::Past7Days => "past7days",
        }
    }

    /// Heading text for the view.
    pub fn label(self) -> &'static str {
        match self {
            RangeView::Today => "Today",
            RangeView::Past7Days => "Past 7 Days",
        }
    }
}

impl fmt::Display for RangeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeView {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(RangeView::Today),
            "past7days" | "past-7-days" | "week" | "7d" => Ok(RangeView::Past7Days),
            other => Err(StoreError::validation(format!("unknown range view '{}'", other))),
        }
    }
}

/// Inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Window for `view` as seen at `now`.
///
/// `Today` is `[midnight, now]`; `Past7Days` is `[now - 7 days, now]`.
pub fn range_for(view: RangeView, now: NaiveDateTime) -> DateRange {
    let start = match view {
        RangeView::Today => now.date().and_time(NaiveTime::MIN),
        RangeView::Past7Days => now - Duration::days(7),
    };
    DateRange { start, end: now }
}

/// [`range_for`] at the current local time.
pub fn range_for_now(view: RangeView) -> DateRange {
    range_for(view, Local::now().naive_local())
}

/// Records of `kind` inside `range`, newest first.
pub fn filter_by_range(store: &RecordStore, kind: RecordKind, range: &DateRange) -> Result<Vec<Record>> {
    store.list_between(kind, range)
}
