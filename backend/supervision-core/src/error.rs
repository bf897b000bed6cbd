// src/error.rs
use thiserror::Error;

/// Conditions the report pipeline surfaces to its caller.
///
/// Row-level problems never show up here; they degrade to zero instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("No data for period {month:02}/{year}")]
    NoData { year: i32, month: u32 },
    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u32),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration value: {0}")]
    MissingConfig(String),
    #[error("Environment configuration error: {0}")]
    Env(#[from] envy::Error),
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON serialization/deserialization failed: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Report(#[from] ReportError),
}
