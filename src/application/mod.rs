//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the record-and-predict pipeline.

mod prediction;

pub use prediction::{PredictionError, PredictionService, RecordSummary};
