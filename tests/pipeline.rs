//! End-to-end pipeline tests: shipped model plus an on-disk record store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heartcheck::adapters::{LinearModelAdapter, ModelLoadError, SqliteRecordStore};
use heartcheck::domain::{Field, Outcome, PatientInput, Sex};
use heartcheck::ports::{Classifier, RecordStore};
use heartcheck::{PredictionError, PredictionService};

fn model_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("models")
}

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

fn open_service(db: &Path) -> PredictionService<LinearModelAdapter, SqliteRecordStore> {
    let model = LinearModelAdapter::load(&model_dir(), None).expect("shipped model loads");
    let store = SqliteRecordStore::new(db).expect("open store");
    PredictionService::new(Arc::new(model), Arc::new(store))
}

#[test]
fn reference_patient_is_predicted_and_stored() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let service = open_service(&tmp.path().join("user_data.db"));

    let record = service.predict(&reference_input()).expect("predict");

    assert_eq!(record.outcome, Outcome::HighRisk);
    assert_eq!(service.count().expect("count"), 1);
    assert_eq!(service.list_all().expect("list"), vec![record]);
}

#[test]
fn out_of_domain_age_writes_no_row() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let service = open_service(&tmp.path().join("user_data.db"));

    let input = PatientInput {
        age: 0,
        ..reference_input()
    };
    match service.predict(&input) {
        Err(PredictionError::Validation(errors)) => assert_eq!(errors.fields(), vec![Field::Age]),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(service.count().expect("count"), 0);
}

#[test]
fn records_survive_restart_in_order() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let db = tmp.path().join("user_data.db");

    let severe = PatientInput {
        age: 67,
        chest_pain_type: 0,
        resting_blood_pressure: 160,
        cholesterol: 286,
        max_heart_rate: 108,
        exercise_induced_angina: true,
        st_depression: 1.5,
        st_slope: 1,
        major_vessels_count: 3,
        thalassemia: 2,
        ..reference_input()
    };

    let first = {
        let service = open_service(&db);
        let a = service.predict(&reference_input()).expect("predict");
        let b = service.predict(&severe).expect("predict");
        vec![a, b]
    };

    let reopened = open_service(&db);
    let records = reopened.list_all().expect("list");
    assert_eq!(records, first);
    assert_eq!(records[1].outcome, Outcome::LowRisk);

    let summary = reopened.summary().expect("summary");
    assert_eq!((summary.total, summary.high_risk, summary.low_risk), (2, 1, 1));
}

#[test]
fn form_text_flows_through_the_pipeline() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let service = open_service(&tmp.path().join("user_data.db"));

    let fields = [
        (Field::Age, "50"),
        (Field::Sex, "Male"),
        (Field::ChestPainType, "0"),
        (Field::RestingBloodPressure, "120"),
        (Field::Cholesterol, "200"),
        (Field::FastingBloodSugarHigh, "No"),
        (Field::RestingEcg, "0"),
        (Field::MaxHeartRate, "150"),
        (Field::ExerciseInducedAngina, "0"),
        (Field::StDepression, "1.0"),
        (Field::StSlope, "0"),
        (Field::MajorVesselsCount, "0"),
        (Field::Thalassemia, "0"),
    ];
    let input = PatientInput::from_fields(fields).expect("valid form text");
    assert_eq!(input, reference_input());

    let record = service.predict(&input).expect("predict");
    assert_eq!(record.input, reference_input());
}

#[test]
fn digest_pin_is_enforced() {
    let model = LinearModelAdapter::load(&model_dir(), None).expect("shipped model loads");
    let digest = model.digest().to_string();
    assert!(digest.starts_with(model.fingerprint()));

    LinearModelAdapter::load(&model_dir(), Some(&digest.to_uppercase()))
        .expect("matching pin loads");

    let wrong = "0".repeat(64);
    match LinearModelAdapter::load(&model_dir(), Some(&wrong)) {
        Err(ModelLoadError::Digest { .. }) => {}
        other => panic!("expected digest mismatch, got {other:?}"),
    }
}

#[test]
fn store_initialize_is_safe_on_existing_file() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let db = tmp.path().join("user_data.db");
    {
        let service = open_service(&db);
        service.predict(&reference_input()).expect("predict");
    }

    let store = SqliteRecordStore::new(&db).expect("reopen");
    store.initialize().expect("initialize again");
    assert_eq!(store.count().expect("count"), 1);
}

#[test]
fn open_service_from_config() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let config = heartcheck::AppConfig {
        db_path: tmp.path().join("records.db"),
        model_path: model_dir(),
        ..Default::default()
    };

    let service = heartcheck::open_service(&config).expect("open service");
    service.predict(&reference_input()).expect("predict");
    assert!(config.db_path.exists());
    assert_eq!(service.count().expect("count"), 1);
}

#[test]
fn missing_model_names_the_variable() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let config = heartcheck::AppConfig {
        db_path: tmp.path().join("records.db"),
        model_path: tmp.path().join("absent.json"),
        ..Default::default()
    };

    match heartcheck::open_service(&config) {
        Err(heartcheck::HeartcheckError::Config(message)) => {
            assert!(message.contains("HEARTCHECK_MODEL_PATH"));
        }
        Err(other) => panic!("expected config error, got {other}"),
        Ok(_) => panic!("expected config error"),
    }
    assert!(!config.db_path.exists());
}

fn with_int(field: Field, value: i32) -> PatientInput {
    let mut input = reference_input();
    match field {
        Field::Age => input.age = value,
        Field::ChestPainType => input.chest_pain_type = value,
        Field::RestingBloodPressure => input.resting_blood_pressure = value,
        Field::Cholesterol => input.cholesterol = value,
        Field::RestingEcg => input.resting_ecg = value,
        Field::MaxHeartRate => input.max_heart_rate = value,
        Field::StSlope => input.st_slope = value,
        Field::MajorVesselsCount => input.major_vessels_count = value,
        Field::Thalassemia => input.thalassemia = value,
        other => panic!("{other:?} is not integer-coded"),
    }
    input
}

fn assert_rejected(
    service: &PredictionService<LinearModelAdapter, SqliteRecordStore>,
    input: &PatientInput,
    field: Field,
) {
    let before = service.count().expect("count");
    match service.predict(input) {
        Err(PredictionError::Validation(errors)) => {
            assert_eq!(errors.fields(), vec![field], "{input:?}");
        }
        other => panic!("expected validation error for {input:?}, got {other:?}"),
    }
    assert_eq!(service.count().expect("count"), before, "{input:?}");
}

#[test]
fn every_range_is_enforced_at_its_bounds() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let service = open_service(&tmp.path().join("user_data.db"));

    let ranges = [
        (Field::Age, 1, 120),
        (Field::ChestPainType, 0, 3),
        (Field::RestingBloodPressure, 80, 200),
        (Field::Cholesterol, 100, 600),
        (Field::RestingEcg, 0, 2),
        (Field::MaxHeartRate, 60, 220),
        (Field::StSlope, 0, 2),
        (Field::MajorVesselsCount, 0, 4),
        (Field::Thalassemia, 0, 3),
    ];

    let mut accepted = 0;
    for (field, min, max) in ranges {
        for value in [min, max] {
            service
                .predict(&with_int(field, value))
                .unwrap_or_else(|e| panic!("{field:?}={value} should be accepted: {e}"));
            accepted += 1;
        }
        for value in [min - 1, max + 1] {
            assert_rejected(&service, &with_int(field, value), field);
        }
    }
    assert_eq!(accepted, 18);
    assert_eq!(service.count().expect("count"), 18);
}

#[test]
fn st_depression_outside_its_grid_is_rejected() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let service = open_service(&tmp.path().join("user_data.db"));

    for st_depression in [0.0, 6.0, 2.3] {
        let input = PatientInput {
            st_depression,
            ..reference_input()
        };
        service.predict(&input).expect("on-grid value accepted");
    }

    for st_depression in [-0.1, 6.1, 0.05, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let input = PatientInput {
            st_depression,
            ..reference_input()
        };
        assert_rejected(&service, &input, Field::StDepression);
    }
    assert_eq!(service.count().expect("count"), 3);
}
