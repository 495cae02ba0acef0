//! Runtime configuration collected from `HEARTCHECK_*` environment variables.
//!
//! Environment variables:
//! - HEARTCHECK_DB_PATH
//! - HEARTCHECK_MODEL_PATH
//! - HEARTCHECK_MODEL_SHA256
//! - HEARTCHECK_LOG_MODE = file | stdout | auto
//! - HEARTCHECK_LOG_FILE

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DB_PATH_VAR: &str = "HEARTCHECK_DB_PATH";
pub const MODEL_PATH_VAR: &str = "HEARTCHECK_MODEL_PATH";
pub const MODEL_SHA256_VAR: &str = "HEARTCHECK_MODEL_SHA256";
pub const LOG_MODE_VAR: &str = "HEARTCHECK_LOG_MODE";
pub const LOG_FILE_VAR: &str = "HEARTCHECK_LOG_FILE";

/// Where log output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal, stdout otherwise.
    #[default]
    Auto,
}

impl LogMode {
    /// Unknown values fall back to `Auto`.
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub model_path: PathBuf,
    pub model_sha256: Option<String>,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("user_data.db"),
            model_path: PathBuf::from("models/heart_disease_model.json"),
            model_sha256: None,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("heartcheck.log"),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get(DB_PATH_VAR) {
            cfg.db_path = PathBuf::from(v);
        }
        if let Some(v) = get(MODEL_PATH_VAR) {
            cfg.model_path = PathBuf::from(v);
        }
        cfg.model_sha256 = get(MODEL_SHA256_VAR).map(|v| v.trim().to_string());
        if let Some(v) = get(LOG_MODE_VAR) {
            cfg.log_mode = LogMode::parse(&v);
        }
        if let Some(v) = get(LOG_FILE_VAR) {
            cfg.log_file = PathBuf::from(v);
        }

        cfg
    }
}
