//! Prediction service: Orchestrates the record-and-predict pipeline.
//!
//! This service coordinates:
//! - Input validation and feature assembly
//! - Classification by the loaded model
//! - Outcome labelling
//! - Storage persistence

use std::sync::Arc;

use crate::adapters::StorageError;
use crate::domain::{Outcome, PatientInput, PredictionRecord, ValidationErrors};
use crate::ports::{Classifier, InferenceError, RecordStore};

/// Error returned by [`PredictionService::predict`].
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Invalid patient data: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Model inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// The model produced an outcome but the record could not be stored.
    #[error("Prediction made but not saved: {source}")]
    Unsaved {
        record: PredictionRecord,
        #[source]
        source: StorageError,
    },
}

impl PredictionError {
    /// The computed record when the failure happened after classification.
    #[must_use]
    pub fn unsaved_record(&self) -> Option<&PredictionRecord> {
        match self {
            Self::Unsaved { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Outcome counts over the stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordSummary {
    pub total: usize,
    pub high_risk: usize,
    pub low_risk: usize,
}

impl RecordSummary {
    #[must_use]
    pub fn from_records(records: &[PredictionRecord]) -> Self {
        let high_risk = records.iter().filter(|r| r.outcome.is_high_risk()).count();
        Self {
            total: records.len(),
            high_risk,
            low_risk: records.len() - high_risk,
        }
    }
}

/// Service for running predictions and reading back the record log.
///
/// The classifier is read-only after load and the store serializes its own
/// writes, so a service can be shared freely between callers.
pub struct PredictionService<C, S>
where
    C: Classifier,
    S: RecordStore,
{
    classifier: Arc<C>,
    store: Arc<S>,
}

impl<C, S> Clone for PredictionService<C, S>
where
    C: Classifier,
    S: RecordStore,
{
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
            store: Arc::clone(&self.store),
        }
    }
}

impl<C, S> PredictionService<C, S>
where
    C: Classifier,
    S: RecordStore,
    S::Error: Into<StorageError>,
{
    /// Create a new prediction service.
    pub fn new(classifier: Arc<C>, store: Arc<S>) -> Self {
        Self { classifier, store }
    }

    /// Run the full pipeline for one submission.
    ///
    /// Performs:
    /// 1. Validate and assemble the 13-feature vector
    /// 2. Classify
    /// 3. Map the class to an outcome
    /// 4. Append the record to storage
    ///
    /// Nothing is written when steps 1-3 fail. A storage failure in step 4
    /// still returns the computed record inside `PredictionError::Unsaved`.
    ///
    /// # Errors
    /// Returns `PredictionError` if any step fails.
    pub fn predict(&self, input: &PatientInput) -> Result<PredictionRecord, PredictionError> {
        let features = input.assemble()?;

        let class = self.classifier.predict(&features)?;
        let outcome = Outcome::from_class(class).ok_or(InferenceError::InvalidClass(class))?;
        let record = PredictionRecord::new(*input, outcome);

        if let Err(e) = self.store.append(&record) {
            let source: StorageError = e.into();
            tracing::warn!("Failed to save prediction record: {}", source);
            return Err(PredictionError::Unsaved { record, source });
        }

        tracing::info!("Prediction complete: outcome={}", outcome);
        Ok(record)
    }

    /// All stored records in insertion order.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn list_all(&self) -> Result<Vec<PredictionRecord>, StorageError> {
        self.store.list_all().map_err(Into::into)
    }

    /// Total stored record count.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn count(&self) -> Result<usize, StorageError> {
        self.store.count().map_err(Into::into)
    }

    /// Outcome counts over every stored record.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn summary(&self) -> Result<RecordSummary, StorageError> {
        Ok(RecordSummary::from_records(&self.list_all()?))
    }

    /// Fingerprint of the loaded model artifact.
    #[must_use]
    pub fn model_fingerprint(&self) -> &str {
        self.classifier.fingerprint()
    }
}
