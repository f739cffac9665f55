//! CRUD and range queries over feeding, sleep and growth records.
//!
//! One generic store serves all three kinds: table and column names come from
//! [`RecordKind`], payloads from [`RecordFields`]. Every mutating call is a
//! single statement or a single transaction, so an interrupted process never
//! leaves a half-written record behind.
//!
//! ## Usage
//!
//! ```rust
//! use babylog::db::records::RecordStore;
//! use babylog::libs::record::{Amount, RecordFields, RecordKind};
//! use chrono::NaiveDate;
//!
//! let mut store = RecordStore::open_in_memory()?;
//! let at = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(8, 30, 0).unwrap();
//! let id = store.insert(RecordFields::feeding(at, Amount::ALot, "bottle"))?;
//! let record = store.get(RecordKind::Feeding, &id)?;
//! assert_eq!(record.timestamp(), at);
//! # Ok::<(), babylog::libs::error::StoreError>(())
//! ```

use crate::db::db::Db;
use crate::libs::error::{Result, StoreError};
use crate::libs::range::DateRange;
use crate::libs::record::{
    parse_timestamp, FeedingFields, FeedingRecord, GrowthFields, GrowthRecord, Record, RecordFields, RecordId,
    RecordKind, SleepFields, SleepRecord,
};
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const INSERT_FEEDING: &str = "INSERT INTO feeding_records (datetime, amount, notes) VALUES (?1, ?2, ?3)";
const INSERT_SLEEP: &str = "INSERT INTO sleep_records (start, \"end\") VALUES (?1, ?2)";
const INSERT_GROWTH: &str = "INSERT INTO growth_records (id, height, weight, date) VALUES (?1, ?2, ?3, ?4)";

const UPDATE_FEEDING: &str = "UPDATE feeding_records SET datetime = ?1, amount = ?2, notes = ?3 WHERE id = ?4";
const UPDATE_SLEEP: &str = "UPDATE sleep_records SET start = ?1, \"end\" = ?2 WHERE id = ?3";
const UPDATE_GROWTH: &str = "UPDATE growth_records SET height = ?1, weight = ?2, date = ?3 WHERE id = ?4";

const SELECT_OPEN_SLEEP: &str =
    "SELECT id, start, \"end\" FROM sleep_records WHERE \"end\" IS NULL ORDER BY start DESC, id DESC";

/// The record store. Owns its connection; construct one and hand it to
/// whatever needs it.
pub struct RecordStore {
    db: Db,
}

impl RecordStore {
    /// Opens the store in the default data directory.
    pub fn new() -> Result<Self> {
        Ok(Self { db: Db::new()? })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { db: Db::open(path)? })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self { db: Db::open_in_memory()? })
    }

    /// Closes the underlying connection, reporting any error SQLite raises.
    pub fn close(self) -> Result<()> {
        self.db.conn.close().map_err(|(_, e)| StoreError::from(e))
    }

    /// Validates and persists a new record, returning its id.
    pub fn insert(&mut self, fields: RecordFields) -> Result<RecordId> {
        let tx = self.db.conn.transaction()?;
        let id = insert_record(&tx, fields)?;
        tx.commit()?;
        Ok(id)
    }

    /// Applies a partial update. Fields left `None` keep their stored value.
    ///
    /// Returns the record as stored after the update.
    pub fn update(&mut self, kind: RecordKind, id: &RecordId, fields: RecordFields) -> Result<Record> {
        if fields.kind() != kind {
            return Err(StoreError::validation(format!(
                "cannot update a {} record with {} fields",
                kind,
                fields.kind()
            )));
        }

        let tx = self.db.conn.transaction()?;
        let current = fetch_record(&tx, kind, id)?;
        let merged = merge(current, fields)?;
        write_record(&tx, &merged)?;
        tx.commit()?;

        Ok(merged)
    }

    /// Deletes a record. Deleting an id that is already gone is `NotFound`.
    pub fn delete(&mut self, kind: RecordKind, id: &RecordId) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
        let affected_rows = self.db.conn.execute(&sql, params![id])?;

        if affected_rows == 0 {
            return Err(StoreError::not_found(kind, id.clone()));
        }

        Ok(())
    }

    pub fn get(&self, kind: RecordKind, id: &RecordId) -> Result<Record> {
        fetch_record(&self.db.conn, kind, id)
    }

    /// Records whose time column is at or after `since`, newest first.
    pub fn list_since(&self, kind: RecordKind, since: NaiveDateTime) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} >= ?1 ORDER BY {} DESC, id DESC",
            kind.columns(),
            kind.table(),
            kind.time_column(),
            kind.time_column()
        );
        self.query(kind, &sql, params![since])
    }

    /// Records inside `range` (both ends inclusive), newest first.
    pub fn list_between(&self, kind: RecordKind, range: &DateRange) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} >= ?1 AND {} <= ?2 ORDER BY {} DESC, id DESC",
            kind.columns(),
            kind.table(),
            kind.time_column(),
            kind.time_column(),
            kind.time_column()
        );
        self.query(kind, &sql, params![range.start, range.end])
    }

    pub fn list_all(&self, kind: RecordKind) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {} DESC, id DESC",
            kind.columns(),
            kind.table(),
            kind.time_column()
        );
        self.query(kind, &sql, [])
    }

    /// Sleep sessions that have not ended yet, newest first.
    ///
    /// Nothing prevents several open sessions from existing; when that
    /// happens it is logged and all of them are returned.
    pub fn open_sleep_sessions(&self) -> Result<Vec<SleepRecord>> {
        let mut stmt = self.db.conn.prepare(SELECT_OPEN_SLEEP)?;
        let sessions = stmt
            .query_map([], sleep_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if sessions.len() > 1 {
            tracing::warn!(open_sessions = sessions.len(), "multiple open sleep sessions found");
        }

        Ok(sessions)
    }

    fn query<P: rusqlite::Params>(&self, kind: RecordKind, sql: &str, params: P) -> Result<Vec<Record>> {
        let mut stmt = self.db.conn.prepare(sql)?;
        let record_iter = stmt.query_map(params, |row| record_from_row(kind, row))?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }
}

fn insert_record(conn: &Connection, fields: RecordFields) -> Result<RecordId> {
    match fields {
        RecordFields::Feeding(FeedingFields { datetime, amount, notes }) => {
            let datetime = datetime.ok_or_else(|| StoreError::validation("feeding record requires a datetime"))?;
            conn.execute(
                INSERT_FEEDING,
                params![datetime, amount.unwrap_or_default(), notes.unwrap_or_default()],
            )?;
            Ok(RecordId::Row(conn.last_insert_rowid()))
        }
        RecordFields::Sleep(SleepFields { start, end }) => {
            let start = start.ok_or_else(|| StoreError::validation("sleep record requires a start time"))?;
            let end = end.flatten();
            check_sleep_order(start, end)?;
            conn.execute(INSERT_SLEEP, params![start, end])?;
            Ok(RecordId::Row(conn.last_insert_rowid()))
        }
        RecordFields::Growth(GrowthFields { height, weight, date }) => {
            let height = height.ok_or_else(|| StoreError::validation("growth record requires a height"))?;
            let weight = weight.ok_or_else(|| StoreError::validation("growth record requires a weight"))?;
            check_measurement("height", height)?;
            check_measurement("weight", weight)?;
            let date = date.unwrap_or_else(|| Local::now().naive_local());
            let id = next_growth_id(conn)?;
            conn.execute(INSERT_GROWTH, params![id, height, weight, date])?;
            Ok(RecordId::Key(id))
        }
    }
}

/// Time-based growth key: epoch milliseconds, bumped until unused.
fn next_growth_id(conn: &Connection) -> Result<String> {
    let mut millis = Local::now().timestamp_millis();
    loop {
        let candidate = millis.to_string();
        let taken: Option<i64> = conn
            .query_row("SELECT 1 FROM growth_records WHERE id = ?1", params![candidate], |row| row.get(0))
            .optional()?;
        if taken.is_none() {
            return Ok(candidate);
        }
        millis += 1;
    }
}

fn fetch_record(conn: &Connection, kind: RecordKind, id: &RecordId) -> Result<Record> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?1", kind.columns(), kind.table());
    conn.query_row(&sql, params![id], |row| record_from_row(kind, row))
        .optional()?
        .ok_or_else(|| StoreError::not_found(kind, id.clone()))
}

fn merge(current: Record, fields: RecordFields) -> Result<Record> {
    let merged = match (current, fields) {
        (Record::Feeding(mut r), RecordFields::Feeding(f)) => {
            if let Some(datetime) = f.datetime {
                r.datetime = datetime;
            }
            if let Some(amount) = f.amount {
                r.amount = amount;
            }
            if let Some(notes) = f.notes {
                r.notes = notes;
            }
            Record::Feeding(r)
        }
        (Record::Sleep(mut r), RecordFields::Sleep(f)) => {
            if let Some(start) = f.start {
                r.start = start;
            }
            if let Some(end) = f.end {
                r.end = end;
            }
            check_sleep_order(r.start, r.end)?;
            Record::Sleep(r)
        }
        (Record::Growth(mut r), RecordFields::Growth(f)) => {
            if let Some(height) = f.height {
                check_measurement("height", height)?;
                r.height = height;
            }
            if let Some(weight) = f.weight {
                check_measurement("weight", weight)?;
                r.weight = weight;
            }
            if let Some(date) = f.date {
                r.date = date;
            }
            Record::Growth(r)
        }
        (current, fields) => {
            return Err(StoreError::validation(format!(
                "cannot update a {} record with {} fields",
                current.kind(),
                fields.kind()
            )))
        }
    };

    Ok(merged)
}

fn write_record(conn: &Connection, record: &Record) -> Result<()> {
    match record {
        Record::Feeding(r) => conn.execute(UPDATE_FEEDING, params![r.datetime, r.amount, r.notes, r.id])?,
        Record::Sleep(r) => conn.execute(UPDATE_SLEEP, params![r.start, r.end, r.id])?,
        Record::Growth(r) => conn.execute(UPDATE_GROWTH, params![r.height, r.weight, r.date, r.id])?,
    };
    Ok(())
}

fn check_sleep_order(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Result<()> {
    match end {
        Some(end) if end < start => Err(StoreError::validation(format!(
            "sleep end {} is before start {}",
            end.format("%Y-%m-%d %H:%M"),
            start.format("%Y-%m-%d %H:%M")
        ))),
        _ => Ok(()),
    }
}

fn check_measurement(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StoreError::validation(format!("{} must be a positive number, got {}", name, value)))
    }
}

fn record_from_row(kind: RecordKind, row: &Row) -> rusqlite::Result<Record> {
    Ok(match kind {
        RecordKind::Feeding => Record::Feeding(FeedingRecord {
            id: row.get(0)?,
            datetime: timestamp_at(row, 1)?,
            amount: row.get(2)?,
            notes: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        }),
        RecordKind::Sleep => Record::Sleep(sleep_from_row(row)?),
        RecordKind::Growth => Record::Growth(GrowthRecord {
            id: row.get(0)?,
            height: row.get(1)?,
            weight: row.get(2)?,
            date: timestamp_at(row, 3)?,
        }),
    })
}

fn sleep_from_row(row: &Row) -> rusqlite::Result<SleepRecord> {
    Ok(SleepRecord {
        id: row.get(0)?,
        start: timestamp_at(row, 1)?,
        end: optional_timestamp_at(row, 2)?,
    })
}

// Rows written by older builds hold ISO strings with a `T` and a UTC `Z`,
// so timestamps are parsed leniently instead of through rusqlite's chrono impl.
fn timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.to_string().into()))
}

fn optional_timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) if !raw.is_empty() => parse_timestamp(&raw)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.to_string().into())),
        _ => Ok(None),
    }
}
