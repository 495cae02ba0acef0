//! Classifier port: Trait for the pre-trained risk model.
//!
//! The model is loaded once at startup and then only read, so implementations
//! are shared behind `Arc` across prediction calls.

use crate::domain::FeatureVector;

/// Error raised while scoring a single feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Model produced a non-finite score")]
    NonFiniteScore,

    #[error("Model returned class {0}, expected 0 or 1")]
    InvalidClass(u8),
}

/// Trait for binary classifiers over the 13-feature heart disease vector.
pub trait Classifier: Send + Sync {
    /// Predict the class for one feature vector: 1 = heart disease, 0 = none.
    ///
    /// Must be deterministic for a given loaded artifact and free of side effects.
    ///
    /// # Errors
    /// Returns `InferenceError` if the model cannot score the vector.
    fn predict(&self, features: &FeatureVector) -> Result<u8, InferenceError>;

    /// Short identifier of the loaded artifact (e.g. a digest prefix).
    fn fingerprint(&self) -> &str;
}
