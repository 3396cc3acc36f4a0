//! Error types for Fitpulse

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while fetching, flattening, or analyzing data
#[derive(Debug, Error)]
pub enum FitpulseError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid key path '{path}': {reason}")]
    InvalidKeyPath { path: String, reason: String },

    #[error("No data file for {date}: expected {file}")]
    MissingFile { date: NaiveDate, file: String },

    #[error("Key path '{path}' not found in file for {date} (missing segment '{segment}')")]
    MissingPath {
        date: NaiveDate,
        path: String,
        segment: String,
    },

    #[error("Unexpected value shape for {date}: {reason}")]
    ExtractError { date: NaiveDate, reason: String },

    #[error("Tables are not aligned: {0}")]
    Misaligned(String),

    #[error("Regression error: {0}")]
    RegressionError(String),
}
