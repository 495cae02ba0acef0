//! Prediction outcome and the persisted record type.

use serde::{Deserialize, Serialize};

use super::patient::PatientInput;

/// Binary risk outcome produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Class 1: heart disease indicated
    HighRisk,
    /// Class 0: no heart disease indicated
    LowRisk,
}

impl Outcome {
    /// Map a classifier output to an outcome. Only 0 and 1 are valid classes.
    #[must_use]
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            1 => Some(Self::HighRisk),
            0 => Some(Self::LowRisk),
            _ => None,
        }
    }

    /// Canonical label written to the `prediction` column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HighRisk => "High Risk",
            Self::LowRisk => "Low Risk",
        }
    }

    /// Parse a stored label.
    ///
    /// Besides the canonical labels this accepts the vocabulary older databases
    /// were written with: `High Risk ❌` / `Low Risk ✅` and `Yes` / `No`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label
            .trim()
            .trim_end_matches(['❌', '✅'])
            .trim()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "high risk" | "yes" => Some(Self::HighRisk),
            "low risk" | "no" => Some(Self::LowRisk),
            _ => None,
        }
    }

    /// Longer explanation for the result view.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::HighRisk => "Model indicates heart disease - clinical follow-up advised",
            Self::LowRisk => "Model indicates no heart disease",
        }
    }

    #[must_use]
    pub fn is_high_risk(self) -> bool {
        matches!(self, Self::HighRisk)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A submitted input together with its predicted outcome.
///
/// Immutable once written: the store has no update or delete path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub input: PatientInput,
    pub outcome: Outcome,
}

impl PredictionRecord {
    #[must_use]
    pub fn new(input: PatientInput, outcome: Outcome) -> Self {
        Self { input, outcome }
    }
}
