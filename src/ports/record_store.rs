//! Record store port: Trait for the append-only prediction log.
//!
//! This trait abstracts the storage backend (SQLite) from the application logic.

use crate::domain::PredictionRecord;

/// Durable, append-only log of prediction records.
///
/// Implementations serialize writes; reads are not required to be
/// snapshot-consistent with concurrent writes.
pub trait RecordStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ensure the backing table exists. Safe to call on every startup.
    ///
    /// # Errors
    /// Returns error if the schema cannot be created.
    fn initialize(&self) -> Result<(), Self::Error>;

    /// Append one record. Committed before returning.
    ///
    /// # Errors
    /// Returns error if the insert fails; nothing is written in that case.
    fn append(&self, record: &PredictionRecord) -> Result<(), Self::Error>;

    /// All records in insertion order. Empty when nothing has been stored.
    ///
    /// # Errors
    /// Returns error if the query fails or a stored row cannot be decoded.
    fn list_all(&self) -> Result<Vec<PredictionRecord>, Self::Error>;

    /// Number of stored records.
    ///
    /// # Errors
    /// Returns error if the query fails.
    fn count(&self) -> Result<usize, Self::Error>;
}
