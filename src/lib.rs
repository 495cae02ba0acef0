//! # Heartcheck
//!
//! Heart disease risk screening from 13 clinical measurements.
//!
//! This crate provides:
//! - Validation and feature assembly for patient measurements
//! - Inference with a pre-trained logistic-regression artifact
//! - An append-only SQLite log of every prediction
//! - Terminal UI for local-only deployment
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientInput, FeatureVector, Outcome)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (JSON model, SQLite, log sanitizer)
//! - `application`: The record-and-predict pipeline
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

use std::sync::Arc;

use adapters::{LinearModelAdapter, ModelLoadError, SqliteRecordStore};

pub use application::{PredictionError, PredictionService};
pub use config::AppConfig;
pub use domain::{Outcome, PatientInput, PredictionRecord};

/// Prediction service over the JSON model and the SQLite store.
pub type DefaultService = PredictionService<LinearModelAdapter, SqliteRecordStore>;

/// Result type for Heartcheck operations
pub type Result<T> = std::result::Result<T, HeartcheckError>;

/// Main error type for Heartcheck
#[derive(Debug, thiserror::Error)]
pub enum HeartcheckError {
    #[error("Failed to load model: {0}")]
    ModelLoad(#[from] adapters::ModelLoadError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Load the model and open the record store named by `config`.
///
/// # Errors
/// Returns error if the model cannot be loaded or the database cannot be opened.
pub fn open_service(config: &AppConfig) -> Result<DefaultService> {
    let classifier = LinearModelAdapter::load(&config.model_path, config.model_sha256.as_deref())
        .map_err(|e| match e {
            ModelLoadError::NotFound(path) => HeartcheckError::Config(format!(
                "model artifact not found at {path:?}; set {} to the model file or its directory",
                config::MODEL_PATH_VAR
            )),
            other => other.into(),
        })?;

    let store = SqliteRecordStore::new(&config.db_path)?;
    tracing::info!("Opened record store at {:?}", config.db_path);

    Ok(PredictionService::new(Arc::new(classifier), Arc::new(store)))
}
