//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O. Validation, feature assembly and outcome
//! labelling live here so every presentation layer shares them.

mod features;
mod patient;
mod prediction;
mod validation;

pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use patient::{Field, PatientInput, Sex};
pub use prediction::{Outcome, PredictionRecord};
pub use validation::{ValidationError, ValidationErrors};
