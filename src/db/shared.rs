//! Async handle over the record store.
//!
//! SQLite calls block, so each operation runs on tokio's blocking pool
//! against a store guarded by a `parking_lot::Mutex`. Calls from different
//! tasks are serialised by the mutex; the order between them is whatever
//! order they acquire it in.
//!
//! ```rust,no_run
//! use babylog::db::shared::SharedStore;
//! use babylog::libs::range::RangeView;
//! use babylog::libs::record::RecordKind;
//!
//! # async fn run() -> babylog::libs::error::Result<()> {
//! let store = SharedStore::open_in_memory()?;
//! let today = store.filter_view(RecordKind::Feeding, RangeView::Today).await?;
//! println!("{} feedings today", today.len());
//! # Ok(())
//! # }
//! ```

use crate::db::records::RecordStore;
use crate::libs::error::Result;
use crate::libs::range::{range_for_now, DateRange, RangeView};
use crate::libs::record::{Record, RecordFields, RecordId, RecordKind, SleepRecord};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Cloneable async handle; every clone shares one store.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<RecordStore>>,
}

impl SharedStore {
    pub fn new(store: RecordStore) -> Self {
        Self { inner: Arc::new(Mutex::new(store)) }
    }

    /// Opens the store in the default data directory off the async runtime.
    pub async fn open_default() -> Result<Self> {
        let store = tokio::task::spawn_blocking(RecordStore::new).await??;
        Ok(Self::new(store))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(RecordStore::open_in_memory()?))
    }

    /// Opens (and migrates) the database at `path` off the async runtime.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = tokio::task::spawn_blocking(move || RecordStore::open(path)).await??;
        Ok(Self::new(store))
    }

    /// Runs `f` with exclusive access to the store on the blocking pool.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut RecordStore) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut store = inner.lock();
            f(&mut *store)
        })
        .await?
    }

    pub async fn insert(&self, fields: RecordFields) -> Result<RecordId> {
        self.with_store(move |store| store.insert(fields)).await
    }

    pub async fn update(&self, kind: RecordKind, id: RecordId, fields: RecordFields) -> Result<Record> {
        self.with_store(move |store| store.update(kind, &id, fields)).await
    }

    pub async fn delete(&self, kind: RecordKind, id: RecordId) -> Result<()> {
        self.with_store(move |store| store.delete(kind, &id)).await
    }

    pub async fn get(&self, kind: RecordKind, id: RecordId) -> Result<Record> {
        self.with_store(move |store| store.get(kind, &id)).await
    }

    pub async fn list_since(&self, kind: RecordKind, since: NaiveDateTime) -> Result<Vec<Record>> {
        self.with_store(move |store| store.list_since(kind, since)).await
    }

    pub async fn filter_by_range(&self, kind: RecordKind, range: DateRange) -> Result<Vec<Record>> {
        self.with_store(move |store| store.list_between(kind, &range)).await
    }

    /// Records of `kind` for a named view, evaluated at the current time.
    pub async fn filter_view(&self, kind: RecordKind, view: RangeView) -> Result<Vec<Record>> {
        self.filter_by_range(kind, range_for_now(view)).await
    }

    pub async fn open_sleep_sessions(&self) -> Result<Vec<SleepRecord>> {
        self.with_store(|store| store.open_sleep_sessions()).await
    }
}
