// src/dominant.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::{ActivityRecord, AgentId, SupervisorId};

/// The supervisor an agent is reported under for a month, and on how many
/// distinct days the agent worked for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DominantAssignment {
    pub agent: AgentId,
    pub supervisor: SupervisorId,
    pub days: usize,
}

/// Exactly one assignment per agent seen in the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DominantSupervisorMap {
    assignments: Vec<DominantAssignment>,
    by_agent: HashMap<AgentId, usize>,
}

impl DominantSupervisorMap {
    pub fn get(&self, agent: &str) -> Option<&DominantAssignment> {
        self.by_agent.get(agent).map(|&i| &self.assignments[i])
    }

    /// Agents attributed to `supervisor`.
    pub fn agents_of(&self, supervisor: &str) -> HashSet<AgentId> {
        self.assignments
            .iter()
            .filter(|a| a.supervisor == supervisor)
            .map(|a| a.agent.clone())
            .collect()
    }

    pub fn assignments(&self) -> &[DominantAssignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Resolves each agent's dominant supervisor for `year`/`month`.
///
/// Distinct dates are counted per (agent, supervisor) in first-seen order,
/// stably sorted by count descending, and the first entry per agent wins. On
/// a tie the pair encountered first in the records keeps the agent.
pub fn resolve_dominant(
    records: &[ActivityRecord],
    year: i32,
    month: u32,
) -> DominantSupervisorMap {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut dates: HashMap<(&str, &str), HashSet<NaiveDate>> = HashMap::new();

    for record in records.iter().filter(|r| r.in_month(year, month)) {
        let key = (record.agent.as_str(), record.supervisor.as_str());
        dates
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                HashSet::new()
            })
            .insert(record.date);
    }

    let mut ranked: Vec<DominantAssignment> = order
        .iter()
        .map(|key| DominantAssignment {
            agent: key.0.to_string(),
            supervisor: key.1.to_string(),
            days: dates.get(key).map_or(0, HashSet::len),
        })
        .collect();
    // sort_by is stable: equal counts keep encounter order
    ranked.sort_by(|a, b| b.days.cmp(&a.days));

    let mut map = DominantSupervisorMap::default();
    for candidate in ranked {
        if map.by_agent.contains_key(&candidate.agent) {
            continue;
        }
        map.by_agent
            .insert(candidate.agent.clone(), map.assignments.len());
        map.assignments.push(candidate);
    }

    debug!(
        "Resolved dominant supervisor for {} agents in {:02}/{}",
        map.len(),
        month,
        year
    );
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::testing::rec;

    #[test]
    fn majority_of_distinct_days_wins() {
        let rows = vec![
            rec("A", "LOPEZ", "2024-03-01"),
            rec("A", "GOMEZ", "2024-03-02"),
            rec("A", "GOMEZ", "2024-03-02"),
            rec("A", "GOMEZ", "2024-03-02"),
            rec("A", "GOMEZ", "2024-03-03"),
        ];
        let map = resolve_dominant(&rows, 2024, 3);
        let a = map.get("A").unwrap();
        assert_eq!(a.supervisor, "GOMEZ");
        assert_eq!(a.days, 2);
    }

    #[test]
    fn tie_goes_to_first_encountered_supervisor() {
        let rows = vec![
            rec("A", "ZETA", "2024-03-01"),
            rec("A", "ALFA", "2024-03-02"),
            rec("B", "ALFA", "2024-03-01"),
            rec("B", "ZETA", "2024-03-02"),
        ];
        let map = resolve_dominant(&rows, 2024, 3);
        assert_eq!(map.get("A").map(|a| a.supervisor.as_str()), Some("ZETA"));
        assert_eq!(map.get("B").map(|a| a.supervisor.as_str()), Some("ALFA"));
    }

    #[test]
    fn only_the_selected_month_counts() {
        let rows = vec![
            rec("A", "LOPEZ", "2024-02-27"),
            rec("A", "LOPEZ", "2024-02-28"),
            rec("A", "GOMEZ", "2024-03-01"),
            rec("A", "LOPEZ", "2023-03-02"),
            rec("A", "LOPEZ", "2023-03-03"),
        ];
        let map = resolve_dominant(&rows, 2024, 3);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A").map(|a| a.supervisor.as_str()), Some("GOMEZ"));
        assert!(resolve_dominant(&rows, 2024, 4).is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let rows = vec![
            rec("A", "X", "2024-03-01"),
            rec("B", "Y", "2024-03-01"),
            rec("A", "Y", "2024-03-02"),
            rec("C", "X", "2024-03-03"),
        ];
        let first = resolve_dominant(&rows, 2024, 3);
        let second = resolve_dominant(&rows, 2024, 3);
        assert_eq!(first, second);
        let mut x_agents: Vec<_> = first.agents_of("X").into_iter().collect();
        x_agents.sort();
        assert_eq!(x_agents, vec!["A".to_string(), "C".to_string()]);
    }
}
