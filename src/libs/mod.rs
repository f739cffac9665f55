//! Core library modules: record model, metrics, ranges, the sleep tracker,
//! settings and the terminal presentation helpers.

pub mod config;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod messages;
pub mod metrics;
pub mod range;
pub mod record;
pub mod settings;
pub mod tracker;
pub mod view;
