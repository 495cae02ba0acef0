//! Validation errors for patient input.

use std::fmt;

use super::patient::Field;

/// A single field that failed coercion or domain checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: value is required")]
    Missing { field: Field },

    #[error("{field}: '{value}' is not a valid value")]
    Unparseable { field: Field, value: String },

    #[error("{field}: {value} is outside {expected}")]
    OutOfDomain {
        field: Field,
        value: String,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Out-of-domain error using the field's declared domain.
    pub fn out_of_domain(field: Field, value: impl fmt::Display) -> Self {
        Self::OutOfDomain {
            field,
            value: value.to_string(),
            expected: field.domain(),
        }
    }

    /// The field this error refers to.
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::Missing { field }
            | Self::Unparseable { field, .. }
            | Self::OutOfDomain { field, .. } => *field,
        }
    }
}

/// Non-empty list of validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// `Ok(())` for an empty list, otherwise the wrapped errors.
    ///
    /// # Errors
    /// Returns `Err` when `errors` is non-empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Offending fields, in the order they were reported.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(ValidationError::field).collect()
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
