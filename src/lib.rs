//! # babylog
//!
//! A local record store for a baby's feedings, sleep sessions and growth
//! measurements, with range queries, derived metrics for charts and a
//! resumable sleep tracker.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use babylog::db::records::RecordStore;
//! use babylog::libs::range::{range_for_now, RangeView};
//! use babylog::libs::record::{Amount, RecordFields, RecordKind};
//! use chrono::Local;
//!
//! # fn main() -> babylog::libs::error::Result<()> {
//! let mut store = RecordStore::new()?;
//! store.insert(RecordFields::feeding(Local::now().naive_local(), Amount::ALot, "bottle"))?;
//!
//! let today = store.list_between(RecordKind::Feeding, &range_for_now(RangeView::Today))?;
//! println!("{} feedings today", today.len());
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
