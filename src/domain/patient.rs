//! Patient input types for heart disease risk prediction.
//!
//! The 13 clinical fields follow the UCI Cleveland heart disease dataset the
//! classifier was trained on. Values arrive either typed (API callers) or as
//! form text, and are always checked against their declared domain before a
//! feature vector is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::features::FEATURE_NAMES;
use super::validation::{ValidationError, ValidationErrors};

/// One of the 13 clinical fields collected by the form.
///
/// Variant order is the feature order expected by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Age,
    Sex,
    ChestPainType,
    RestingBloodPressure,
    Cholesterol,
    FastingBloodSugarHigh,
    RestingEcg,
    MaxHeartRate,
    ExerciseInducedAngina,
    StDepression,
    StSlope,
    MajorVesselsCount,
    Thalassemia,
}

impl Field {
    /// All fields, in feature order.
    pub const ALL: [Field; 13] = [
        Field::Age,
        Field::Sex,
        Field::ChestPainType,
        Field::RestingBloodPressure,
        Field::Cholesterol,
        Field::FastingBloodSugarHigh,
        Field::RestingEcg,
        Field::MaxHeartRate,
        Field::ExerciseInducedAngina,
        Field::StDepression,
        Field::StSlope,
        Field::MajorVesselsCount,
        Field::Thalassemia,
    ];

    /// Position of this field in the feature vector.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short column / feature name (`age`, `cp`, `trestbps`, ...).
    #[must_use]
    pub fn column(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Human-readable label shown in the form and in error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age (years)",
            Self::Sex => "Sex",
            Self::ChestPainType => "Chest Pain Type",
            Self::RestingBloodPressure => "Resting Blood Pressure (mmHg)",
            Self::Cholesterol => "Serum Cholesterol (mg/dl)",
            Self::FastingBloodSugarHigh => "Fasting Blood Sugar > 120 mg/dl",
            Self::RestingEcg => "Resting ECG Results",
            Self::MaxHeartRate => "Maximum Heart Rate Achieved",
            Self::ExerciseInducedAngina => "Exercise Induced Angina",
            Self::StDepression => "ST Depression Induced by Exercise",
            Self::StSlope => "Slope of Peak Exercise ST Segment",
            Self::MajorVesselsCount => "Number of Major Vessels",
            Self::Thalassemia => "Thalassemia",
        }
    }

    /// Declared domain, formatted for hints and error messages.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            Self::Age => "1-120",
            Self::Sex => "Male or Female",
            Self::ChestPainType | Self::Thalassemia => "0-3",
            Self::RestingBloodPressure => "80-200",
            Self::Cholesterol => "100-600",
            Self::FastingBloodSugarHigh | Self::ExerciseInducedAngina => "0 or 1",
            Self::RestingEcg | Self::StSlope => "0-2",
            Self::MaxHeartRate => "60-220",
            Self::StDepression => "0.0-6.0 in steps of 0.1",
            Self::MajorVesselsCount => "0-4",
        }
    }

    /// Inclusive integer bounds for integer-coded fields.
    ///
    /// `None` for sex, the yes/no fields and ST depression, which have their
    /// own representations.
    #[must_use]
    pub fn int_bounds(self) -> Option<(i32, i32)> {
        match self {
            Self::Age => Some((1, 120)),
            Self::ChestPainType | Self::Thalassemia => Some((0, 3)),
            Self::RestingBloodPressure => Some((80, 200)),
            Self::Cholesterol => Some((100, 600)),
            Self::RestingEcg | Self::StSlope => Some((0, 2)),
            Self::MaxHeartRate => Some((60, 220)),
            Self::MajorVesselsCount => Some((0, 4)),
            Self::Sex
            | Self::FastingBloodSugarHigh
            | Self::ExerciseInducedAngina
            | Self::StDepression => None,
        }
    }

    /// Descriptive names for choice fields, indexed by coded value.
    ///
    /// Sex is listed Male first to match the form; its coded value is the
    /// name itself, not the index.
    #[must_use]
    pub fn options(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Sex => Some(&["Male", "Female"]),
            Self::ChestPainType => Some(&[
                "Typical angina",
                "Atypical angina",
                "Non-anginal pain",
                "Asymptomatic",
            ]),
            Self::FastingBloodSugarHigh | Self::ExerciseInducedAngina => Some(&["No", "Yes"]),
            Self::RestingEcg => Some(&["Normal", "ST-T wave abnormality", "Probable LVH"]),
            Self::StSlope => Some(&["Upsloping", "Flat", "Downsloping"]),
            Self::MajorVesselsCount => Some(&["0", "1", "2", "3", "4"]),
            Self::Thalassemia => Some(&[
                "Normal",
                "Fixed defect",
                "Reversible defect",
                "Not described",
            ]),
            Self::Age
            | Self::RestingBloodPressure
            | Self::Cholesterol
            | Self::MaxHeartRate
            | Self::StDepression => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Biological sex as encoded for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Encoding used at training time: Male → 1, Female → 0.
    ///
    /// Changing this mapping requires retraining the model.
    #[must_use]
    pub fn as_bit(self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
        }
    }

    /// Inverse of [`Sex::as_bit`].
    #[must_use]
    pub fn from_bit(bit: i64) -> Option<Self> {
        match bit {
            1 => Some(Self::Male),
            0 => Some(Self::Female),
            _ => None,
        }
    }

    /// Text stored in the `sex` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "1" => Ok(Self::Male),
            "female" | "f" | "0" => Ok(Self::Female),
            _ => Err(()),
        }
    }
}

/// One clinical observation submitted through the form or an API caller.
///
/// Integer-coded fields use `i32` so that out-of-domain values from untrusted
/// callers stay representable and can be rejected by [`PatientInput::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    /// Age in years (1-120)
    pub age: i32,

    pub sex: Sex,

    /// 0 typical angina, 1 atypical angina, 2 non-anginal pain, 3 asymptomatic
    pub chest_pain_type: i32,

    /// Resting blood pressure in mmHg (80-200)
    pub resting_blood_pressure: i32,

    /// Serum cholesterol in mg/dl (100-600)
    pub cholesterol: i32,

    /// Fasting blood sugar > 120 mg/dl
    pub fasting_blood_sugar_high: bool,

    /// 0 normal, 1 ST-T wave abnormality, 2 probable LVH
    pub resting_ecg: i32,

    /// Maximum heart rate achieved (60-220)
    pub max_heart_rate: i32,

    pub exercise_induced_angina: bool,

    /// ST depression induced by exercise relative to rest (0.0-6.0, step 0.1)
    pub st_depression: f64,

    /// 0 upsloping, 1 flat, 2 downsloping
    pub st_slope: i32,

    /// Number of major vessels colored by fluoroscopy (0-4)
    pub major_vessels_count: i32,

    /// 0 normal, 1 fixed defect, 2 reversible defect, 3 not described
    pub thalassemia: i32,
}

impl PatientInput {
    /// Integer value of an integer-coded field, `None` for the others.
    #[must_use]
    pub fn int_value(&self, field: Field) -> Option<i32> {
        match field {
            Field::Age => Some(self.age),
            Field::ChestPainType => Some(self.chest_pain_type),
            Field::RestingBloodPressure => Some(self.resting_blood_pressure),
            Field::Cholesterol => Some(self.cholesterol),
            Field::RestingEcg => Some(self.resting_ecg),
            Field::MaxHeartRate => Some(self.max_heart_rate),
            Field::StSlope => Some(self.st_slope),
            Field::MajorVesselsCount => Some(self.major_vessels_count),
            Field::Thalassemia => Some(self.thalassemia),
            Field::Sex
            | Field::FastingBloodSugarHigh
            | Field::ExerciseInducedAngina
            | Field::StDepression => None,
        }
    }

    /// Check every field against its declared domain.
    ///
    /// Out-of-domain values are rejected, never clamped.
    ///
    /// # Errors
    /// Returns all offending fields, in feature order.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        for field in Field::ALL {
            if let (Some(value), Some((min, max))) = (self.int_value(field), field.int_bounds()) {
                if !(min..=max).contains(&value) {
                    errors.push(ValidationError::out_of_domain(field, value));
                }
            }
        }

        if !is_valid_st_depression(self.st_depression) {
            errors.push(ValidationError::out_of_domain(
                Field::StDepression,
                self.st_depression,
            ));
        }

        ValidationErrors::from_vec(errors)
    }

    /// Coerce raw form text into a typed input.
    ///
    /// Every field must be present and non-blank. A field given more than
    /// once takes its last value.
    ///
    /// # Errors
    /// Returns every missing, unparseable or out-of-domain field.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, ValidationErrors>
    where
        I: IntoIterator<Item = (Field, &'a str)>,
    {
        let mut reader = FieldReader::new(fields);

        let input = Self {
            age: reader.read(Field::Age),
            sex: reader.read(Field::Sex),
            chest_pain_type: reader.read(Field::ChestPainType),
            resting_blood_pressure: reader.read(Field::RestingBloodPressure),
            cholesterol: reader.read(Field::Cholesterol),
            fasting_blood_sugar_high: reader.read(Field::FastingBloodSugarHigh),
            resting_ecg: reader.read(Field::RestingEcg),
            max_heart_rate: reader.read(Field::MaxHeartRate),
            exercise_induced_angina: reader.read(Field::ExerciseInducedAngina),
            st_depression: reader.read(Field::StDepression),
            st_slope: reader.read(Field::StSlope),
            major_vessels_count: reader.read(Field::MajorVesselsCount),
            thalassemia: reader.read(Field::Thalassemia),
        };

        reader.finish()?;
        input.validate()?;
        Ok(input)
    }
}

/// ST depression must be finite, within 0.0-6.0 and on the 0.1 grid.
fn is_valid_st_depression(value: f64) -> bool {
    if !value.is_finite() || !(0.0..=6.0).contains(&value) {
        return false;
    }
    let tenths = value * 10.0;
    (tenths - tenths.round()).abs() < 1e-6
}

/// Text → typed value for a single form field.
trait FieldValue: Sized {
    /// Stand-in used while collecting errors; never escapes `from_fields`.
    const PLACEHOLDER: Self;

    fn parse_field(text: &str) -> Option<Self>;
}

impl FieldValue for i32 {
    const PLACEHOLDER: Self = 0;

    fn parse_field(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FieldValue for f64 {
    const PLACEHOLDER: Self = 0.0;

    fn parse_field(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FieldValue for bool {
    const PLACEHOLDER: Self = false;

    fn parse_field(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" => Some(true),
            "0" | "no" | "false" => Some(false),
            _ => None,
        }
    }
}

impl FieldValue for Sex {
    const PLACEHOLDER: Self = Sex::Female;

    fn parse_field(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

/// Collects parse errors across all fields so the caller sees every problem at once.
struct FieldReader<'a> {
    values: Vec<Option<&'a str>>,
    errors: Vec<ValidationError>,
}

impl<'a> FieldReader<'a> {
    fn new<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (Field, &'a str)>,
    {
        let mut values = vec![None; Field::ALL.len()];
        for (field, text) in fields {
            values[field.index()] = Some(text);
        }
        Self {
            values,
            errors: Vec::new(),
        }
    }

    fn read<T: FieldValue>(&mut self, field: Field) -> T {
        let text = match self.values[field.index()].map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => {
                self.errors.push(ValidationError::Missing { field });
                return T::PLACEHOLDER;
            }
        };

        match T::parse_field(text) {
            Some(value) => value,
            None => {
                self.errors.push(ValidationError::Unparseable {
                    field,
                    value: text.to_string(),
                });
                T::PLACEHOLDER
            }
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        ValidationErrors::from_vec(self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> Vec<(Field, &'static str)> {
        vec![
            (Field::Age, "50"),
            (Field::Sex, "Male"),
            (Field::ChestPainType, "0"),
            (Field::RestingBloodPressure, "120"),
            (Field::Cholesterol, "200"),
            (Field::FastingBloodSugarHigh, "0"),
            (Field::RestingEcg, "0"),
            (Field::MaxHeartRate, "150"),
            (Field::ExerciseInducedAngina, "0"),
            (Field::StDepression, "1.0"),
            (Field::StSlope, "0"),
            (Field::MajorVesselsCount, "0"),
            (Field::Thalassemia, "0"),
        ]
    }

    fn sample_input() -> PatientInput {
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
    fn test_field_order_matches_feature_names() {
        assert_eq!(Field::ALL.len(), FEATURE_NAMES.len());
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
        assert_eq!(Field::Sex.column(), "sex");
        assert_eq!(Field::StDepression.column(), "oldpeak");
    }

    #[test]
    fn test_sex_encoding() {
        assert_eq!(Sex::Male.as_bit(), 1);
        assert_eq!(Sex::Female.as_bit(), 0);
        assert_eq!(Sex::from_bit(1), Some(Sex::Male));
        assert_eq!(Sex::from_bit(2), None);
        assert_eq!("female".parse::<Sex>(), Ok(Sex::Female));
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_validation() {
        assert!(sample_input().validate().is_ok());

        let invalid = PatientInput {
            age: 0,
            cholesterol: 700,
            ..sample_input()
        };
        let errors = invalid.validate().expect_err("should reject");
        assert_eq!(errors.fields(), vec![Field::Age, Field::Cholesterol]);
    }

    #[test]
    fn test_st_depression_grid() {
        assert!(is_valid_st_depression(0.0));
        assert!(is_valid_st_depression(2.3));
        assert!(is_valid_st_depression(6.0));
        assert!(!is_valid_st_depression(6.1));
        assert!(!is_valid_st_depression(-0.1));
        assert!(!is_valid_st_depression(1.05));
        assert!(!is_valid_st_depression(f64::NAN));
    }

    #[test]
    fn test_from_fields() {
        let input = PatientInput::from_fields(sample_fields()).expect("should parse");
        assert_eq!(input, sample_input());
    }

    #[test]
    fn test_from_fields_reports_every_problem() {
        let mut fields = sample_fields();
        fields.retain(|(f, _)| *f != Field::Cholesterol);
        fields.push((Field::Age, "fifty"));
        fields.push((Field::RestingBloodPressure, "  "));
        fields.push((Field::FastingBloodSugarHigh, "2"));

        let errors = PatientInput::from_fields(fields).expect_err("should reject");
        assert_eq!(
            errors.fields(),
            vec![
                Field::Age,
                Field::RestingBloodPressure,
                Field::Cholesterol,
                Field::FastingBloodSugarHigh,
            ]
        );
        assert!(matches!(
            errors.errors()[0],
            ValidationError::Unparseable { field: Field::Age, .. }
        ));
        assert!(matches!(
            errors.errors()[1],
            ValidationError::Missing { field: Field::RestingBloodPressure }
        ));
    }

    #[test]
    fn test_from_fields_rejects_out_of_domain() {
        let mut fields = sample_fields();
        fields.push((Field::MajorVesselsCount, "5"));

        let errors = PatientInput::from_fields(fields).expect_err("should reject");
        assert_eq!(errors.fields(), vec![Field::MajorVesselsCount]);
    }

    #[test]
    fn test_choice_options_cover_coded_range() {
        for field in Field::ALL {
            let Some(options) = field.options() else {
                continue;
            };
            match field.int_bounds() {
                Some((min, max)) => {
                    assert_eq!(min, 0, "{field}");
                    assert_eq!(options.len(), (max + 1) as usize, "{field}");
                }
                None => assert_eq!(options.len(), 2, "{field}"),
            }
        }
        assert_eq!(Field::Age.options(), None);
    }
}
