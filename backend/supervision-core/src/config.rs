// src/config.rs
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::AppError;

// --- Process Configuration ---

/// Settings read from `SUPERVISION_*` environment variables (and `.env`).
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub data_path: Option<PathBuf>,
    pub report_config: Option<PathBuf>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        envy::prefixed("SUPERVISION_").from_env::<AppConfig>()
    }

    /// First byte of the configured delimiter, `;` when empty.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(b';')
    }
}

// --- Report Configuration ---

/// Organisational tables that shape a report: supervisor renames and the
/// supervisors and agents that never appear in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Historical or short label -> current display label.
    #[serde(default)]
    pub supervisor_aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub excluded_supervisors: BTreeSet<String>,
    #[serde(default)]
    pub excluded_agents: BTreeSet<String>,
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        info!(
            "Loaded report configuration from {}: {} aliases, {} excluded supervisors, \
             {} excluded agents",
            path.display(),
            config.supervisor_aliases.len(),
            config.excluded_supervisors.len(),
            config.excluded_agents.len()
        );
        Ok(config)
    }

    pub fn with_alias(mut self, from: &str, to: &str) -> Self {
        self.supervisor_aliases.insert(from.to_string(), to.to_string());
        self
    }

    pub fn exclude_supervisor(mut self, supervisor: &str) -> Self {
        self.excluded_supervisors.insert(supervisor.to_string());
        self
    }

    pub fn exclude_agent(mut self, agent: &str) -> Self {
        self.excluded_agents.insert(agent.to_string());
        self
    }

    /// The DATA METRO call center tables.
    pub fn metro() -> Self {
        let mut config = ReportConfig::default();

        // Surname-only labels used before the roster switched to "SURNAME NAME"
        for (legacy, current) in [
            ("SIMONE", "SIMONE MAYLEN"),
            ("CARRANZA", "CARRANZA FERNANDO"),
            ("ZAVARONI", "ZAVARONI PAOLA"),
            ("LAZARTE", "LAZARTE NICOLAS"),
            ("FERNANDEZ P", "FERNANDEZ PATRICIA"),
            ("ALBORNOZ", "ALBORNOZ IVAN"),
            ("SUREDA", "SUREDA LEANDRO"),
            ("GRAF", "GRAF ALEJANDRO"),
            ("VEXENAT", "VEXENAT JORGE"),
            ("GEREZ", "GEREZ ANGEL"),
            ("RICO", "RICO MELISA"),
            ("PORRAS", "KARINA PORRAS"),
            ("ROJAS", "GASTON ROJAS"),
            ("DIAZ", "DIAZ CELESTE"),
            ("DELGADO", "DELGADO CLAUDIA"),
            ("GONZALEZ F", "GONZALEZ FRANCISCO"),
            ("GONZALEZ COMPANY", "GONZALEZ COMPANY MALENA"),
        ] {
            config = config.with_alias(legacy, current);
        }

        for supervisor in [
            "ADICIONALES SDF",
            "DIAZ",
            "PORRAS",
            "ROJAS",
            "ALBORNOZ",
            "GONZALEZ C",
            "PAROLA",
            "PAROLA-MUSSON",
            "DIAZ CELESTE",
            "KARINA PORRAS",
            "GASTON ROJAS",
            "ALBORNOZ IVAN",
            "GRESPAN",
            "LEGUIZAMON",
        ] {
            config = config.exclude_supervisor(supervisor);
        }

        for agent in [
            "Laurenzano Renzo",
            "Carranza Fernando",
            "Graf Alejandro",
            "Alvarez Camila",
            "Delgado Claudia",
            "Gonzalez Company Malena",
            "Parola Federico Javier",
            "Simone Maylen",
        ] {
            config = config.exclude_agent(agent);
        }

        config
    }
}
