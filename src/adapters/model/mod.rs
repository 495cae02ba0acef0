//! Linear model adapter: Implementation of Classifier.
//!
//! Loads a logistic-regression export from a JSON artifact on local disk.
//! The artifact is read once at startup and held read-only for the process
//! lifetime.
//!
//! # Artifact contract
//!
//! - `feature_names` must list exactly the 13 features in assembler order.
//!   A model trained on a different column order is refused at load time
//!   rather than scoring silently wrong vectors.
//! - Optional standardisation (`scaler_mean` / `scaler_scale`) is applied
//!   before the linear score, mirroring a scikit-learn `StandardScaler`.
//! - If a SHA-256 pin is configured the artifact bytes must match it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, InferenceError};

/// File name looked up when the configured model path is a directory.
pub const DEFAULT_MODEL_FILE: &str = "heart_disease_model.json";

const SUPPORTED_MODEL_TYPE: &str = "logistic_regression";

/// Number of digest hex characters used as the display fingerprint.
const FINGERPRINT_LEN: usize = 16;

/// Error type for model loading. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model artifact not found at {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact format: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Model digest mismatch: expected {expected}, found {actual}")]
    Digest { expected: String, actual: String },

    #[error("Model feature contract violated: {0}")]
    FeatureContract(String),

    #[error("Invalid model parameters: {0}")]
    Parameters(String),
}

/// Model parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
}

fn default_model_type() -> String {
    SUPPORTED_MODEL_TYPE.to_string()
}

fn default_threshold() -> f64 {
    0.5
}

/// Feature standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, Copy)]
struct Scaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

/// Logistic-regression classifier over the 13-feature vector.
#[derive(Debug, Clone)]
pub struct LinearModelAdapter {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    threshold: f64,
    scaler: Option<Scaler>,
    digest: String,
    source: PathBuf,
}

impl LinearModelAdapter {
    /// Load and validate the artifact at `path`.
    ///
    /// `path` may be the artifact itself or a directory containing
    /// [`DEFAULT_MODEL_FILE`]. When `expected_sha256` is given the artifact
    /// bytes must hash to it.
    ///
    /// # Errors
    /// Returns `ModelLoadError` if the file is missing, unreadable, malformed,
    /// pinned to a different digest, or does not satisfy the feature contract.
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<Self, ModelLoadError> {
        let model_path = if path.is_dir() {
            path.join(DEFAULT_MODEL_FILE)
        } else {
            path.to_path_buf()
        };

        if !model_path.exists() {
            return Err(ModelLoadError::NotFound(model_path));
        }

        let bytes = std::fs::read(&model_path).map_err(|source| ModelLoadError::Io {
            path: model_path.clone(),
            source,
        })?;

        let digest = sha256_hex(&bytes);
        if let Some(expected) = expected_sha256 {
            let expected = expected.trim().to_ascii_lowercase();
            if !constant_time_eq_str(&expected, &digest) {
                return Err(ModelLoadError::Digest {
                    expected,
                    actual: digest,
                });
            }
        }

        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        let adapter = Self::from_artifact(artifact, digest, model_path)?;

        tracing::info!(
            "Loaded model from {:?} (type={}, n_features={}, threshold={}, fingerprint={})",
            adapter.source,
            SUPPORTED_MODEL_TYPE,
            FEATURE_COUNT,
            adapter.threshold,
            adapter.fingerprint()
        );

        Ok(adapter)
    }

    /// Validate parameters and build the adapter.
    ///
    /// # Errors
    /// Returns `ModelLoadError` if the artifact violates the feature contract
    /// or contains unusable parameters.
    pub fn from_artifact(
        artifact: ModelArtifact,
        digest: String,
        source: PathBuf,
    ) -> Result<Self, ModelLoadError> {
        if artifact.model_type != SUPPORTED_MODEL_TYPE {
            return Err(ModelLoadError::Parameters(format!(
                "unsupported model_type '{}', expected '{SUPPORTED_MODEL_TYPE}'",
                artifact.model_type
            )));
        }

        check_feature_names(&artifact.feature_names)?;

        let coefficients = fixed_len("coefficients", &artifact.coefficients)?;
        if !artifact.intercept.is_finite() {
            return Err(ModelLoadError::Parameters("intercept must be finite".into()));
        }
        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(ModelLoadError::Parameters(format!(
                "threshold {} must be in (0, 1)",
                artifact.threshold
            )));
        }

        let scaler = match (&artifact.scaler_mean, &artifact.scaler_scale) {
            (None, None) => None,
            (Some(mean), Some(scale)) => {
                let mean = fixed_len("scaler_mean", mean)?;
                let scale = fixed_len("scaler_scale", scale)?;
                if scale.iter().any(|s| *s == 0.0) {
                    return Err(ModelLoadError::Parameters(
                        "scaler_scale entries must be non-zero".into(),
                    ));
                }
                Some(Scaler { mean, scale })
            }
            _ => {
                return Err(ModelLoadError::Parameters(
                    "scaler_mean and scaler_scale must be given together".into(),
                ))
            }
        };

        Ok(Self {
            coefficients,
            intercept: artifact.intercept,
            threshold: artifact.threshold,
            scaler,
            digest,
            source,
        })
    }

    /// Probability of class 1 for a feature vector.
    ///
    /// # Errors
    /// Returns `InferenceError::NonFiniteScore` if the linear score overflows.
    pub fn probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let mut z = self.intercept;
        for (i, x) in features.as_slice().iter().enumerate() {
            let x = match &self.scaler {
                Some(s) => (x - s.mean[i]) / s.scale[i],
                None => *x,
            };
            z += self.coefficients[i] * x;
        }

        if !z.is_finite() {
            return Err(InferenceError::NonFiniteScore);
        }

        Ok(sigmoid(z))
    }

    /// Decision threshold on the class-1 probability.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Full SHA-256 of the artifact bytes (hex).
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Path the artifact was loaded from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Classifier for LinearModelAdapter {
    fn predict(&self, features: &FeatureVector) -> Result<u8, InferenceError> {
        let p = self.probability(features)?;
        Ok(u8::from(p >= self.threshold))
    }

    fn fingerprint(&self) -> &str {
        let end = self.digest.len().min(FINGERPRINT_LEN);
        &self.digest[..end]
    }
}

fn check_feature_names(names: &[String]) -> Result<(), ModelLoadError> {
    if names.len() != FEATURE_COUNT {
        return Err(ModelLoadError::FeatureContract(format!(
            "model declares {} features, expected {FEATURE_COUNT}",
            names.len()
        )));
    }

    for (i, (got, expected)) in names.iter().zip(FEATURE_NAMES.iter()).enumerate() {
        if got != expected {
            return Err(ModelLoadError::FeatureContract(format!(
                "feature {i} is '{got}', expected '{expected}'"
            )));
        }
    }

    Ok(())
}

fn fixed_len(name: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ModelLoadError> {
    let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
        ModelLoadError::Parameters(format!(
            "{name} has {} entries, expected {FEATURE_COUNT}",
            values.len()
        ))
    })?;

    if array.iter().any(|v| !v.is_finite()) {
        return Err(ModelLoadError::Parameters(format!(
            "{name} must contain only finite numbers"
        )));
    }

    Ok(array)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
