//! Feature assembly: typed patient input → fixed-order numeric vector.
//!
//! The order and the boolean/sex encodings below are what the classifier was
//! trained on. Reordering them silently corrupts every prediction.

use serde::Serialize;

use super::patient::{Field, PatientInput};
use super::validation::ValidationErrors;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in vector order (UCI heart disease column names).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// A validated, fixed-order feature vector.
///
/// Only [`PatientInput::assemble`] builds one, so holding a `FeatureVector`
/// implies the input passed domain validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Value of a single field.
    #[must_use]
    pub fn get(&self, field: Field) -> f64 {
        self.0[field.index()]
    }
}

impl PatientInput {
    /// Build the classifier's input vector.
    ///
    /// Order: `[age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang,
    /// oldpeak, slope, ca, thal]`, with `sex` as Male → 1 / Female → 0 and the
    /// yes/no fields as 1 / 0.
    ///
    /// # Errors
    /// Returns the validation failures if any field is outside its domain.
    pub fn assemble(&self) -> Result<FeatureVector, ValidationErrors> {
        self.validate()?;

        Ok(FeatureVector([
            f64::from(self.age),
            f64::from(self.sex.as_bit()),
            f64::from(self.chest_pain_type),
            f64::from(self.resting_blood_pressure),
            f64::from(self.cholesterol),
            bit(self.fasting_blood_sugar_high),
            f64::from(self.resting_ecg),
            f64::from(self.max_heart_rate),
            bit(self.exercise_induced_angina),
            self.st_depression,
            f64::from(self.st_slope),
            f64::from(self.major_vessels_count),
            f64::from(self.thalassemia),
        ]))
    }
}

fn bit(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;
    use proptest::prelude::*;

    fn reference_input() -> PatientInput {
        PatientInput {
            age: 50,
            sex: Sex::Male,
            chest_pain_type: 0,
            resting_blood_pressure: 120,
            cholesterol: 200,
            fasting_blood_sugar_high: false,
            resting_ecg: 0,
            max_heart_rate: 150,
            exercise_induced_angina: false,
            st_depression: 1.0,
            st_slope: 0,
            major_vessels_count: 0,
            thalassemia: 0,
        }
    }

    #[test]
    fn test_reference_vector() {
        let v = reference_input().assemble().expect("valid input");
        assert_eq!(
            v.into_inner(),
            [50.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_sex_and_flags_encoding() {
        let input = PatientInput {
            sex: Sex::Female,
            fasting_blood_sugar_high: true,
            exercise_induced_angina: true,
            ..reference_input()
        };
        let v = input.assemble().expect("valid input");
        assert_eq!(v.get(Field::Sex), 0.0);
        assert_eq!(v.get(Field::FastingBloodSugarHigh), 1.0);
        assert_eq!(v.get(Field::ExerciseInducedAngina), 1.0);
    }

    #[test]
    fn test_rejects_before_assembling() {
        let input = PatientInput {
            age: 0,
            ..reference_input()
        };
        let errors = input.assemble().expect_err("age 0 is out of domain");
        assert_eq!(errors.fields(), vec![Field::Age]);
    }

    fn valid_input() -> impl Strategy<Value = PatientInput> {
        (
            (1..=120i32, any::<bool>(), 0..=3i32, 80..=200i32, 100..=600i32),
            (any::<bool>(), 0..=2i32, 60..=220i32, any::<bool>(), 0..=60u32),
            (0..=2i32, 0..=4i32, 0..=3i32),
        )
            .prop_map(|((age, male, cp, bp, chol), (fbs, ecg, hr, exang, st), (slope, ca, thal))| {
                PatientInput {
                    age,
                    sex: if male { Sex::Male } else { Sex::Female },
                    chest_pain_type: cp,
                    resting_blood_pressure: bp,
                    cholesterol: chol,
                    fasting_blood_sugar_high: fbs,
                    resting_ecg: ecg,
                    max_heart_rate: hr,
                    exercise_induced_angina: exang,
                    st_depression: f64::from(st) / 10.0,
                    st_slope: slope,
                    major_vessels_count: ca,
                    thalassemia: thal,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_valid_inputs_assemble_in_order(input in valid_input()) {
            let v = input.assemble().expect("valid input");
            prop_assert_eq!(v.as_slice().len(), FEATURE_COUNT);
            prop_assert_eq!(v.get(Field::Age), f64::from(input.age));
            prop_assert_eq!(v.get(Field::Sex), f64::from(input.sex.as_bit()));
            prop_assert_eq!(v.get(Field::Cholesterol), f64::from(input.cholesterol));
            prop_assert_eq!(v.get(Field::MaxHeartRate), f64::from(input.max_heart_rate));
            prop_assert_eq!(v.get(Field::StDepression), input.st_depression);
            prop_assert_eq!(v.get(Field::Thalassemia), f64::from(input.thalassemia));
        }

        #[test]
        fn prop_out_of_domain_age_is_rejected(age in prop_oneof![i32::MIN..1i32, 121..=i32::MAX]) {
            let input = PatientInput { age, ..reference_input() };
            let errors = input.assemble().expect_err("out of domain");
            prop_assert!(errors.contains(Field::Age));
        }

        #[test]
        fn prop_out_of_domain_cholesterol_is_rejected(chol in prop_oneof![-1000..100i32, 601..5000i32]) {
            let input = PatientInput { cholesterol: chol, ..reference_input() };
            prop_assert!(input.assemble().is_err());
        }
    }
}
