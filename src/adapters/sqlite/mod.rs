//! SQLite adapter: Implementation of RecordStore.
//!
//! Provides local persistence for prediction records in a single
//! append-only table.
//!
//! # Schema
//!
//! The `user_inputs` table has the 13 input columns plus a text `prediction`
//! column and no primary key. Insertion order is SQLite's implicit `rowid`.
//! The layout is identical to the one older databases were created with, so
//! an existing `user_data.db` opens without migration.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`, which serializes writers inside
//! the process. A poisoned mutex surfaces as `StorageError::LockPoisoned`
//! instead of a panic so the UI can keep running.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::types::Value;
use rusqlite::{params, Connection};

use crate::domain::{Outcome, PatientInput, PredictionRecord, Sex};
use crate::ports::RecordStore;

/// How long a writer waits for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS user_inputs (
        age INTEGER, sex TEXT, cp INTEGER, trestbps INTEGER, chol INTEGER,
        fbs INTEGER, restecg INTEGER, thalach INTEGER, exang INTEGER,
        oldpeak REAL, slope INTEGER, ca INTEGER, thal INTEGER, prediction TEXT
    );
";

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Corrupt record at row {row}: {reason}")]
    CorruptRow { row: i64, reason: String },
}

/// SQLite record store.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path` and ensure the table exists.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl RecordStore for SqliteRecordStore {
    type Error = StorageError;

    fn initialize(&self) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute_batch(CREATE_TABLE)?;
        Ok(())
    }

    fn append(&self, record: &PredictionRecord) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        let input = &record.input;

        // Autocommit: the row is durable once execute returns.
        conn.execute(
            r"
            INSERT INTO user_inputs (
                age, sex, cp, trestbps, chol, fbs, restecg,
                thalach, exang, oldpeak, slope, ca, thal, prediction
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ",
            params![
                input.age,
                input.sex.as_str(),
                input.chest_pain_type,
                input.resting_blood_pressure,
                input.cholesterol,
                i64::from(input.fasting_blood_sugar_high),
                input.resting_ecg,
                input.max_heart_rate,
                i64::from(input.exercise_induced_angina),
                input.st_depression,
                input.st_slope,
                input.major_vessels_count,
                input.thalassemia,
                record.outcome.label(),
            ],
        )?;

        tracing::debug!("Appended prediction record ({})", record.outcome);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<PredictionRecord>, Self::Error> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r"
            SELECT rowid, age, sex, cp, trestbps, chol, fbs, restecg,
                   thalach, exang, oldpeak, slope, ca, thal, prediction
            FROM user_inputs
            ORDER BY rowid
            ",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRow {
                    rowid: row.get(0)?,
                    age: row.get(1)?,
                    sex: row.get(2)?,
                    cp: row.get(3)?,
                    trestbps: row.get(4)?,
                    chol: row.get(5)?,
                    fbs: row.get(6)?,
                    restecg: row.get(7)?,
                    thalach: row.get(8)?,
                    exang: row.get(9)?,
                    oldpeak: row.get(10)?,
                    slope: row.get(11)?,
                    ca: row.get(12)?,
                    thal: row.get(13)?,
                    prediction: row.get(14)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRow::decode).collect()
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM user_inputs", [], |row| {
            row.get(0)
        })?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}

/// A row as read from SQLite, before domain decoding.
struct StoredRow {
    rowid: i64,
    age: i64,
    sex: Value,
    cp: i64,
    trestbps: i64,
    chol: i64,
    fbs: i64,
    restecg: i64,
    thalach: i64,
    exang: i64,
    oldpeak: f64,
    slope: i64,
    ca: i64,
    thal: i64,
    prediction: String,
}

impl StoredRow {
    fn decode(self) -> Result<PredictionRecord, StorageError> {
        let row = self.rowid;
        let corrupt = |reason: String| StorageError::CorruptRow { row, reason };

        let int = |column: &str, value: i64| {
            i32::try_from(value).map_err(|_| corrupt(format!("{column} value {value} overflows")))
        };
        let flag = |column: &str, value: i64| match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(corrupt(format!("{column} must be 0 or 1, got {other}"))),
        };

        // Older databases stored sex either as text or as the 0/1 feature bit.
        let sex = match &self.sex {
            Value::Text(text) => text.parse::<Sex>().ok(),
            Value::Integer(bit) => Sex::from_bit(*bit),
            _ => None,
        }
        .ok_or_else(|| corrupt(format!("unrecognised sex value {:?}", self.sex)))?;

        let outcome = Outcome::from_label(&self.prediction)
            .ok_or_else(|| corrupt(format!("unrecognised prediction '{}'", self.prediction)))?;

        let input = PatientInput {
            age: int("age", self.age)?,
            sex,
            chest_pain_type: int("cp", self.cp)?,
            resting_blood_pressure: int("trestbps", self.trestbps)?,
            cholesterol: int("chol", self.chol)?,
            fasting_blood_sugar_high: flag("fbs", self.fbs)?,
            resting_ecg: int("restecg", self.restecg)?,
            max_heart_rate: int("thalach", self.thalach)?,
            exercise_induced_angina: flag("exang", self.exang)?,
            st_depression: self.oldpeak,
            st_slope: int("slope", self.slope)?,
            major_vessels_count: int("ca", self.ca)?,
            thalassemia: int("thal", self.thal)?,
        };

        Ok(PredictionRecord::new(input, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(age: i32, outcome: Outcome) -> PredictionRecord {
        PredictionRecord::new(
            PatientInput {
                age,
                sex: Sex::Female,
                chest_pain_type: 2,
                resting_blood_pressure: 130,
                cholesterol: 250,
                fasting_blood_sugar_high: true,
                resting_ecg: 1,
                max_heart_rate: 160,
                exercise_induced_angina: false,
                st_depression: 2.3,
                st_slope: 1,
                major_vessels_count: 1,
                thalassemia: 2,
            },
            outcome,
        )
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = SqliteRecordStore::in_memory().expect("Should create db");
        assert!(store.list_all().expect("Should list").is_empty());
        assert_eq!(store.count().expect("Should count"), 0);
    }

    #[test]
    fn test_append_and_list_in_insertion_order() {
        let store = SqliteRecordStore::in_memory().expect("Should create db");
        let first = sample_record(63, Outcome::HighRisk);
        let second = sample_record(41, Outcome::LowRisk);

        store.append(&first).expect("Should append");
        store.append(&second).expect("Should append");

        let loaded = store.list_all().expect("Should list");
        assert_eq!(loaded, vec![first, second]);
        assert_eq!(store.count().expect("Should count"), 2);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = SqliteRecordStore::in_memory().expect("Should create db");
        let record = sample_record(55, Outcome::LowRisk);
        store.append(&record).expect("Should append");

        for _ in 0..3 {
            store.initialize().expect("Should initialize");
        }

        assert_eq!(store.list_all().expect("Should list"), vec![record]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("user_data.db");
        let record = sample_record(70, Outcome::HighRisk);

        {
            let store = SqliteRecordStore::new(&path).expect("Should open");
            store.append(&record).expect("Should append");
        }

        let reopened = SqliteRecordStore::new(&path).expect("Should reopen");
        assert_eq!(reopened.list_all().expect("Should list"), vec![record]);
    }

    #[test]
    fn test_reads_legacy_rows() {
        let store = SqliteRecordStore::in_memory().expect("Should create db");
        {
            let conn = store.lock().expect("lock");
            conn.execute_batch(
                r"
                INSERT INTO user_inputs VALUES (52, 'Male', 0, 125, 212, 0, 1, 168, 0, 1.0, 2, 2, 3, 'High Risk ❌');
                INSERT INTO user_inputs VALUES (45, 'Female', 1, 110, 190, 0, 0, 170, 0, 0, 2, 0, 2, 'No');
                INSERT INTO user_inputs VALUES (60, 1, 3, 140, 300, 1, 2, 120, 1, 3.4, 1, 3, 3, 'Yes');
                ",
            )
            .expect("insert legacy rows");
        }

        let loaded = store.list_all().expect("Should list");
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].outcome, Outcome::HighRisk);
        assert_eq!(loaded[0].input.sex, Sex::Male);
        assert_eq!(loaded[1].outcome, Outcome::LowRisk);
        assert_eq!(loaded[1].input.st_depression, 0.0);
        assert_eq!(loaded[2].input.sex, Sex::Male);
        assert!(loaded[2].input.exercise_induced_angina);
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let store = SqliteRecordStore::in_memory().expect("Should create db");
        {
            let conn = store.lock().expect("lock");
            conn.execute_batch(
                "INSERT INTO user_inputs VALUES (52, 'Male', 0, 125, 212, 0, 1, 168, 0, 1.0, 2, 2, 3, 'Unknown');",
            )
            .expect("insert row");
        }

        match store.list_all() {
            Err(StorageError::CorruptRow { row, .. }) => assert_eq!(row, 1),
            other => panic!("expected CorruptRow, got {other:?}"),
        }
    }
}
