// src/filter.rs
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::{ActivityRecord, ReportConfig};

/// Trims, collapses inner whitespace and uppercases a label.
pub fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Canonicalizes supervisor labels and drops denylisted rows.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    aliases: HashMap<String, String>,
    excluded_supervisors: HashSet<String>,
    excluded_agents: HashSet<String>,
}

impl RecordFilter {
    pub fn new(config: &ReportConfig) -> Self {
        let aliases: HashMap<String, String> = config
            .supervisor_aliases
            .iter()
            .map(|(from, to)| (normalize_label(from), normalize_label(to)))
            .collect();

        let mut filter = Self {
            aliases,
            excluded_supervisors: HashSet::new(),
            excluded_agents: config
                .excluded_agents
                .iter()
                .map(|agent| normalize_label(agent))
                .collect(),
        };
        // Exclusions go through the alias table too, so old and new names both hit
        filter.excluded_supervisors = config
            .excluded_supervisors
            .iter()
            .map(|sup| filter.canonical_supervisor(sup))
            .collect();
        filter
    }

    /// Current display label for any historical or differently-spaced label.
    pub fn canonical_supervisor(&self, label: &str) -> String {
        let normalized = normalize_label(label);
        match self.aliases.get(&normalized) {
            Some(current) => current.clone(),
            None => normalized,
        }
    }

    pub fn is_excluded_supervisor(&self, canonical: &str) -> bool {
        self.excluded_supervisors.contains(canonical)
    }

    pub fn is_excluded_agent(&self, agent: &str) -> bool {
        self.excluded_agents.contains(&normalize_label(agent))
    }

    /// Canonicalizes every supervisor label, then drops excluded rows.
    /// Input order is preserved.
    pub fn apply(&self, records: &[ActivityRecord]) -> Vec<ActivityRecord> {
        let kept: Vec<ActivityRecord> = records
            .iter()
            .map(|record| ActivityRecord {
                supervisor: self.canonical_supervisor(&record.supervisor),
                ..record.clone()
            })
            .filter(|record| {
                !self.is_excluded_supervisor(&record.supervisor)
                    && !self.is_excluded_agent(&record.agent)
            })
            .collect();

        debug!(
            "Record filter kept {} of {} rows",
            kept.len(),
            records.len()
        );
        kept
    }
}
