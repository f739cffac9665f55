//! Derived metrics: values computed from stored records for display.
//!
//! All functions are pure. Data-quality problems (an amount nobody
//! recognises, a session that ends before it starts) are never allowed to
//! crash a screen; they degrade to a default value and are pushed into an
//! [`AnomalyLog`], which also reports them through `tracing`.

use crate::libs::error::{Result, StoreError};
use crate::libs::formatter::format_minutes;
use crate::libs::messages::Message;
use crate::libs::record::{format_timestamp, Amount, FeedingRecord, GrowthRecord, Record, SleepRecord};
use chrono::NaiveDateTime;
use std::fmt;

/// Label format for feeding chart points (`DD M`).
pub const FEEDING_LABEL_FORMAT: &str = "%d %-m";
/// Label format for sleep chart points (`MM DD`).
pub const SLEEP_LABEL_FORMAT: &str = "%m %d";
/// Label format for growth chart points (`Mon DD`).
pub const GROWTH_LABEL_FORMAT: &str = "%b %d";

/// Length of a sleep session, or `N/A` while it is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepDuration {
    Minutes(i64),
    NotAvailable,
}

impl SleepDuration {
    pub fn minutes(self) -> Option<i64> {
        match self {
            SleepDuration::Minutes(m) => Some(m),
            SleepDuration::NotAvailable => None,
        }
    }
}

impl fmt::Display for SleepDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepDuration::Minutes(m) => write!(f, "{} minutes", m),
            SleepDuration::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Data anomalies noticed while computing metrics.
#[derive(Debug, Default)]
pub struct AnomalyLog {
    entries: Vec<StoreError>,
}

impl AnomalyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an anomaly and logs it as a warning.
    pub fn record(&mut self, message: Message) {
        self.push(StoreError::DataAnomaly(message.to_string()));
    }

    pub fn push(&mut self, error: StoreError) {
        tracing::warn!(anomaly = %error, "data anomaly");
        self.entries.push(error);
    }

    pub fn entries(&self) -> &[StoreError] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whole minutes between `start` and `end`, rounded down.
///
/// `end == None` gives `N/A`. An end before the start is a `DataAnomaly`
/// error rather than a negative number.
pub fn sleep_duration_minutes(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Result<SleepDuration> {
    let Some(end) = end else {
        return Ok(SleepDuration::NotAvailable);
    };

    if end < start {
        return Err(StoreError::DataAnomaly(
            Message::NegativeSleepDuration(format_timestamp(&start), format_timestamp(&end)).to_string(),
        ));
    }

    let millis = (end - start).num_milliseconds();
    Ok(SleepDuration::Minutes(millis.div_euclid(60_000)))
}

/// Chart ordinal for a feeding amount: none=0, little=1, normal=2, a lot=3.
///
/// Unrecognised amounts map to 0 and are recorded in `anomalies`.
pub fn amount_to_ordinal(amount: &Amount, anomalies: &mut AnomalyLog) -> u8 {
    match amount {
        Amount::None => 0,
        Amount::Little => 1,
        Amount::Normal => 2,
        Amount::ALot => 3,
        Amount::Unrecognized(raw) => {
            anomalies.record(Message::UnrecognizedAmount(raw.clone()));
            0
        }
    }
}

/// Table text for a sleep session's duration.
///
/// `N/A` for open sessions, and also for sessions that end before they
/// start, which are recorded in `anomalies`.
pub fn duration_label(record: &SleepRecord, anomalies: &mut AnomalyLog) -> String {
    match sleep_duration_minutes(record.start, record.end) {
        Ok(duration) => duration.to_string(),
        Err(error) => {
            anomalies.push(error);
            SleepDuration::NotAvailable.to_string()
        }
    }
}

/// Parallel date labels and values, in the order the records were given.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries<V> {
    pub dates: Vec<String>,
    pub values: Vec<V>,
}

impl<V> ChartSeries<V> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds a chart series by mapping every record to a label and a value.
pub fn chart_series<R, V, F, D>(records: &[R], mut value_fn: F, mut date_fn: D) -> ChartSeries<V>
where
    F: FnMut(&R) -> V,
    D: FnMut(&R) -> String,
{
    let mut series = ChartSeries { dates: Vec::with_capacity(records.len()), values: Vec::with_capacity(records.len()) };
    for record in records {
        series.dates.push(date_fn(record));
        series.values.push(value_fn(record));
    }
    series
}

/// Feeding amounts as ordinals 0..=3.
pub fn feeding_amount_series(records: &[FeedingRecord], anomalies: &mut AnomalyLog) -> ChartSeries<f64> {
    chart_series(
        records,
        |r| f64::from(amount_to_ordinal(&r.amount, anomalies)),
        |r| r.datetime.format(FEEDING_LABEL_FORMAT).to_string(),
    )
}

/// Sleep minutes per session. Open or anomalous sessions plot as 0.
pub fn sleep_minutes_series(records: &[SleepRecord], anomalies: &mut AnomalyLog) -> ChartSeries<f64> {
    chart_series(
        records,
        |r| match sleep_duration_minutes(r.start, r.end) {
            Ok(duration) => duration.minutes().unwrap_or(0) as f64,
            Err(error) => {
                anomalies.push(error);
                0.0
            }
        },
        |r| r.start.format(SLEEP_LABEL_FORMAT).to_string(),
    )
}

pub fn height_series(records: &[GrowthRecord]) -> ChartSeries<f64> {
    chart_series(records, |r| r.height, |r| r.date.format(GROWTH_LABEL_FORMAT).to_string())
}

pub fn weight_series(records: &[GrowthRecord]) -> ChartSeries<f64> {
    chart_series(records, |r| r.weight, |r| r.date.format(GROWTH_LABEL_FORMAT).to_string())
}

/// Display value of a record's main metric, used by table rows.
pub fn summary_value(record: &Record, anomalies: &mut AnomalyLog) -> String {
    match record {
        Record::Feeding(r) => r.amount.to_string(),
        Record::Sleep(r) => duration_label(r, anomalies),
        Record::Growth(r) => format!("{:.1} cm / {:.2} kg", r.height, r.weight),
    }
}

/// Total minutes slept across completed, well-formed sessions.
pub fn total_sleep_minutes(records: &[SleepRecord]) -> i64 {
    records
        .iter()
        .filter_map(|r| sleep_duration_minutes(r.start, r.end).ok())
        .filter_map(SleepDuration::minutes)
        .sum()
}

/// `total_sleep_minutes` rendered as "H hours M minutes".
pub fn total_sleep_label(records: &[SleepRecord]) -> String {
    format_minutes(total_sleep_minutes(records))
}
