//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `model`: JSON logistic-regression artifact (serde_json, sha2)
//! - `sqlite`: SQLite for local storage
//! - `sanitize`: Clinical value filtering for logs

pub mod model;
pub mod sanitize;
pub mod sqlite;

pub use model::{LinearModelAdapter, ModelLoadError};
pub use sqlite::{SqliteRecordStore, StorageError};
