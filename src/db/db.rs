use crate::db::migrations::ensure_schema;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::{Result, StoreError};
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "babylog.db";

/// An open SQLite connection with the schema in place.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database in the default data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new()
            .get_path(DB_FILE_NAME)
            .map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;
        Self::open(db_file_path)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let conn = Connection::open(path.as_ref()).map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Db> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;
        Self::init(conn)
    }

    fn init(mut conn: Connection) -> Result<Db> {
        ensure_schema(&mut conn).map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;
        Ok(Db { conn })
    }
}
