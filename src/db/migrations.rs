//! Schema management: versioned migrations applied when the store opens.
//!
//! Every migration uses `CREATE ... IF NOT EXISTS`, so running the manager
//! against a database the app created before migrations were tracked adopts
//! the existing tables instead of failing.
//!
//! ## Usage
//!
//! ```rust
//! use babylog::db::migrations::{ensure_schema, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! ensure_schema(&mut conn)?;
//! assert!(get_db_version(&conn)? > 0);
//! # Ok::<(), babylog::libs::error::StoreError>(())
//! ```

use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::libs::record::parse_timestamp;
use crate::{msg_debug, msg_error};
use rusqlite::{params, Connection, Transaction};

/// Text layout of `NaiveDateTime` values written through rusqlite.
const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change.
#[derive(Debug, Clone)]
struct Migration {
    /// Unique version number for ordering and tracking
    version: u32,
    /// Human-readable name describing the migration's purpose
    name: &'static str,
    /// Applies the schema changes within a transaction
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Registry of all migrations and the logic to apply pending ones.
///
/// Migrations are forward-only and run in version order inside a single
/// transaction, so a failure leaves the schema exactly as it was.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: feeding and sleep tables, same layout the app always used
        self.add_migration(1, "create_feeding_and_sleep_records", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS feeding_records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    datetime TEXT,
                    amount TEXT,
                    notes TEXT
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS sleep_records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    start TEXT,
                    \"end\" TEXT
                )",
                [],
            )?;

            // Range views filter and order on the time columns
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_feeding_records_datetime ON feeding_records(datetime)",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_sleep_records_start ON sleep_records(start)", [])?;
            Ok(())
        });

        // Version 2: growth records move from the key-value store into SQLite
        self.add_migration(2, "create_growth_records", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS growth_records (
                    id TEXT NOT NULL PRIMARY KEY,
                    height REAL NOT NULL,
                    weight REAL NOT NULL,
                    date TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_growth_records_date ON growth_records(date)", [])?;
            Ok(())
        });

        // Version 3: open sleep sessions are looked up on every tracker resume
        self.add_migration(3, "index_open_sleep_sessions", |tx| {
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_sleep_records_open ON sleep_records(\"end\") WHERE \"end\" IS NULL",
                [],
            )?;
            Ok(())
        });

        // Version 4: adopted rows hold UTC ISO strings (`2024-03-10T01:00:00.000Z`);
        // range queries compare text, rewrite them in the local form new rows use
        self.add_migration(4, "normalize_legacy_timestamps", |tx| {
            normalize_timestamps(tx, "feeding_records", "datetime")?;
            normalize_timestamps(tx, "sleep_records", "start")?;
            normalize_timestamps(tx, "sleep_records", "\"end\"")?;
            normalize_timestamps(tx, "growth_records", "date")?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the database's current version.
    ///
    /// Safe to call on every launch: with nothing pending it only reads the
    /// version and returns.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e.into());
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    /// Highest applied version, 0 for a fresh database.
    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let tracked: i32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'migrations'",
            [],
            |row| row.get(0),
        )?;
        if tracked == 0 {
            return Ok(0);
        }

        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM migrations WHERE version = ?1",
            params![version],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(history)
    }
}

/// Rewrites every parseable text timestamp in `table.column` into the form
/// rusqlite writes for `NaiveDateTime`. Unparseable values are left alone.
fn normalize_timestamps(tx: &Transaction, table: &str, column: &str) -> rusqlite::Result<()> {
    let rows: Vec<(i64, String)> = {
        let mut stmt = tx.prepare(&format!("SELECT rowid, {} FROM {} WHERE {} IS NOT NULL", column, table, column))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get_ref(1)?.as_str().ok().map(str::to_string))))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().filter_map(|(rowid, raw)| raw.map(|raw| (rowid, raw))).collect()
    };

    let update = format!("UPDATE {} SET {} = ?1 WHERE rowid = ?2", table, column);
    for (rowid, raw) in rows {
        match parse_timestamp(&raw) {
            Ok(ts) => {
                if ts.format(CANONICAL_TIMESTAMP_FORMAT).to_string() != raw {
                    tx.execute(&update, params![ts, rowid])?;
                }
            }
            Err(_) => tracing::warn!(table, column, rowid, value = %raw, "unparseable timestamp left as is"),
        }
    }
    Ok(())
}

/// Creates any missing tables. Idempotent.
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
