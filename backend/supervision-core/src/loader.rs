// src/loader.rs
use chrono::NaiveDate;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{info, warn};

use crate::duration::normalize_text;
use crate::{ActivityRecord, AppError};

// Column headers of the DATA METRO export
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Nombre de Usuario")]
    agent: Option<String>,
    #[serde(rename = "SUPERVISOR")]
    supervisor: Option<String>,
    #[serde(rename = "Fecha")]
    date: Option<String>,
    #[serde(rename = "Llamadas Contestadas")]
    answered: Option<String>,
    #[serde(rename = "Tiempo en Llamadas Contestadas")]
    answered_time: Option<String>,
    #[serde(rename = "Tiempo Logueado")]
    logged_time: Option<String>,
    #[serde(rename = "Tiempo ACW")]
    acw_time: Option<String>,
    #[serde(rename = "Tiempo Estado Listo")]
    ready_time: Option<String>,
    #[serde(rename = "Tiempo Estado No Listo")]
    not_ready_time: Option<String>,
    #[serde(rename = "Re envios a la cola")]
    requeues: Option<String>,
    #[serde(rename = "Transferencias Realizadas")]
    transfers: Option<String>,
}

const DATE_FORMATS: [&str; 5] = [
    "%d/%m/%Y",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d",
    "%d-%m-%Y",
];

/// Largest count a single export row can plausibly carry.
const MAX_ROW_COUNT: f64 = 1_000_000.0;

/// Day-first date, ISO accepted.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }
    // "2024-03-05 00:00:00" and similar timestamp exports
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Non-negative whole count. `None` means the cell was present but unusable:
/// negative, fractional or beyond `MAX_ROW_COUNT`.
pub fn parse_count(raw: Option<&str>) -> Option<u64> {
    let raw = raw.unwrap_or_default().trim();
    if raw.is_empty() {
        return Some(0);
    }
    let value: f64 = raw.replace(',', ".").parse().ok()?;
    if !value.is_finite() || value < 0.0 || value > MAX_ROW_COUNT || value.fract() != 0.0 {
        return None;
    }
    Some(value as u64)
}

/// Exports come in Latin-1 unless they happen to be valid UTF-8.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

pub fn load_csv(path: &Path, delimiter: u8) -> Result<Vec<ActivityRecord>, AppError> {
    let bytes = fs::read(path)?;
    let records = read_csv(&decode(&bytes), delimiter)?;
    info!("Loaded {} activity records from {}", records.len(), path.display());
    Ok(records)
}

/// Parses an export body. Rows without a usable date are skipped; every
/// other defect degrades to zero for that cell.
pub fn read_csv(body: &str, delimiter: u8) -> Result<Vec<ActivityRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let line = line + 2;

        let Some(date) = row.date.as_deref().and_then(parse_date) else {
            warn!("Skipping line {}: unparsable date {:?}", line, row.date);
            continue;
        };

        let count = |field: &str, raw: &Option<String>| {
            parse_count(raw.as_deref()).unwrap_or_else(|| {
                warn!("Line {}: unparsable {} {:?}, using 0", line, field, raw);
                0
            })
        };

        records.push(ActivityRecord {
            agent: row.agent.clone().unwrap_or_default(),
            supervisor: row.supervisor.clone().unwrap_or_default(),
            date,
            answered: count("answered count", &row.answered),
            answered_time: normalize_text(row.answered_time.as_deref()),
            logged_time: normalize_text(row.logged_time.as_deref()),
            acw_time: normalize_text(row.acw_time.as_deref()),
            ready_time: normalize_text(row.ready_time.as_deref()),
            not_ready_time: normalize_text(row.not_ready_time.as_deref()),
            requeues: count("requeue count", &row.requeues),
            transfers: count("transfer count", &row.transfers),
        });
    }
    Ok(records)
}
