//! Record shapes shared by the store, the query layer and the metrics.
//!
//! Every logged event is one of three kinds. [`RecordKind`] carries the
//! per-kind table layout so dispatch happens in one place, and
//! [`RecordFields`] doubles as the insert payload and the partial update
//! patch: `None` means "not given".

use crate::libs::error::{Result, StoreError};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Null, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display format used for timestamps in tables and messages.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

const TIMESTAMP_INPUT_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// The kinds of records held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Feeding,
    Sleep,
    Growth,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Feeding, RecordKind::Sleep, RecordKind::Growth];

    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Feeding => "feeding_records",
            RecordKind::Sleep => "sleep_records",
            RecordKind::Growth => "growth_records",
        }
    }

    /// Column the range queries filter and order on.
    pub fn time_column(self) -> &'static str {
        match self {
            RecordKind::Feeding => "datetime",
            RecordKind::Sleep => "start",
            RecordKind::Growth => "date",
        }
    }

    /// Column list in the order the row mappers expect.
    pub fn columns(self) -> &'static str {
        match self {
            RecordKind::Feeding => "id, datetime, amount, notes",
            RecordKind::Sleep => "id, start, \"end\"",
            RecordKind::Growth => "id, height, weight, date",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Feeding => "feeding",
            RecordKind::Sleep => "sleep",
            RecordKind::Growth => "growth",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "feeding" | "feed" => Ok(RecordKind::Feeding),
            "sleep" => Ok(RecordKind::Sleep),
            "growth" => Ok(RecordKind::Growth),
            other => Err(StoreError::validation(format!("unknown record type '{}'", other))),
        }
    }
}

/// Identity of a record: auto-increment row id or time-based key (growth).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Row(i64),
    Key(String),
}

impl RecordId {
    /// Parses an id typed by the user for the given kind.
    pub fn parse_for(kind: RecordKind, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        match kind {
            RecordKind::Growth => {
                if raw.is_empty() {
                    return Err(StoreError::validation("growth record id is empty"));
                }
                Ok(RecordId::Key(raw.to_string()))
            }
            RecordKind::Feeding | RecordKind::Sleep => raw
                .parse::<i64>()
                .map(RecordId::Row)
                .map_err(|_| StoreError::validation(format!("'{}' is not a valid {} record id", raw, kind))),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Row(id) => write!(f, "{}", id),
            RecordId::Key(key) => f.write_str(key),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Row(id)
    }
}

impl From<String> for RecordId {
    fn from(key: String) -> Self {
        RecordId::Key(key)
    }
}

impl From<&str> for RecordId {
    fn from(key: &str) -> Self {
        RecordId::Key(key.to_string())
    }
}

impl ToSql for RecordId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            RecordId::Row(id) => id.to_sql(),
            RecordId::Key(key) => key.to_sql(),
        }
    }
}

/// How much the baby ate.
///
/// Stored text uses the labels the app has always written (`a little`,
/// `a lot`). Text that matches none of them is kept as `Unrecognized` so
/// the row still round-trips and the metrics can flag it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Amount {
    None,
    Little,
    #[default]
    Normal,
    ALot,
    Unrecognized(String),
}

impl Amount {
    /// Lenient parse; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "none" => Amount::None,
            "little" | "a little" | "a_little" => Amount::Little,
            "normal" => Amount::Normal,
            "a lot" | "a_lot" | "alot" | "lot" => Amount::ALot,
            _ => Amount::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Amount::None => "none",
            Amount::Little => "a little",
            Amount::Normal => "normal",
            Amount::ALot => "a lot",
            Amount::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Amount::Unrecognized(_))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A NULL amount reads back as an empty `Unrecognized`, which is written as NULL again.
impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Amount::Unrecognized(raw) if raw.is_empty() => Ok(ToSqlOutput::from(Null)),
            _ => Ok(ToSqlOutput::from(self.as_str())),
        }
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Amount::Unrecognized(String::new())),
            ValueRef::Text(_) => value.as_str().map(Amount::parse),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedingRecord {
    pub id: i64,
    pub datetime: NaiveDateTime,
    pub amount: Amount,
    pub notes: String,
}

/// A sleep session. `end` is `None` while the baby is still asleep.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepRecord {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl SleepRecord {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Height in centimetres and weight in kilograms taken on `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthRecord {
    pub id: String,
    pub height: f64,
    pub weight: f64,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Feeding(FeedingRecord),
    Sleep(SleepRecord),
    Growth(GrowthRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Feeding(_) => RecordKind::Feeding,
            Record::Sleep(_) => RecordKind::Sleep,
            Record::Growth(_) => RecordKind::Growth,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Record::Feeding(r) => RecordId::Row(r.id),
            Record::Sleep(r) => RecordId::Row(r.id),
            Record::Growth(r) => RecordId::Key(r.id.clone()),
        }
    }

    /// The value of the kind's time column.
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Record::Feeding(r) => r.datetime,
            Record::Sleep(r) => r.start,
            Record::Growth(r) => r.date,
        }
    }

    pub fn as_feeding(&self) -> Option<&FeedingRecord> {
        match self {
            Record::Feeding(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sleep(&self) -> Option<&SleepRecord> {
        match self {
            Record::Sleep(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_growth(&self) -> Option<&GrowthRecord> {
        match self {
            Record::Growth(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedingFields {
    pub datetime: Option<NaiveDateTime>,
    pub amount: Option<Amount>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SleepFields {
    pub start: Option<NaiveDateTime>,
    /// Outer `None`: not given. `Some(None)`: session still open.
    pub end: Option<Option<NaiveDateTime>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthFields {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub date: Option<NaiveDateTime>,
}

/// Insert payload or partial update, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFields {
    Feeding(FeedingFields),
    Sleep(SleepFields),
    Growth(GrowthFields),
}

impl RecordFields {
    pub fn feeding(datetime: NaiveDateTime, amount: Amount, notes: impl Into<String>) -> Self {
        RecordFields::Feeding(FeedingFields {
            datetime: Some(datetime),
            amount: Some(amount),
            notes: Some(notes.into()),
        })
    }

    pub fn sleep(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        RecordFields::Sleep(SleepFields { start: Some(start), end: Some(end) })
    }

    pub fn growth(height: f64, weight: f64, date: NaiveDateTime) -> Self {
        RecordFields::Growth(GrowthFields {
            height: Some(height),
            weight: Some(weight),
            date: Some(date),
        })
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            RecordFields::Feeding(_) => RecordKind::Feeding,
            RecordFields::Sleep(_) => RecordKind::Sleep,
            RecordFields::Growth(_) => RecordKind::Growth,
        }
    }
}

/// Parses a user or legacy timestamp into local wall-clock time.
///
/// Accepts `YYYY-MM-DD[ T]HH:MM[:SS[.fff]]`, a bare `YYYY-MM-DD`
/// (midnight) and RFC 3339 with an offset, which is converted to local time.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    for format in TIMESTAMP_INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(StoreError::validation(format!("malformed date '{}'", raw)))
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_DISPLAY_FORMAT).to_string()
}
