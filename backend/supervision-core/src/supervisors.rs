// src/supervisors.rs
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::duration::{mean_duration, serialize_hms};
use crate::ratio::{calls_per_day, sum_counts};
use crate::{ActivityRecord, SupervisorId};

/// Month overview for one supervisor label, straight from the raw rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupervisorMonthSummary {
    pub supervisor: SupervisorId,
    pub answered: u64,
    /// Distinct calendar dates with activity under this supervisor.
    pub days_worked: u64,
    pub calls_per_day: u64,
    /// Mean answered-call time per raw row.
    #[serde(serialize_with = "serialize_hms")]
    pub tmo: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub mean_not_ready_time: Duration,
}

/// Groups the period's rows by their recorded supervisor, busiest first.
///
/// Unlike the agent reports this does not use dominant attribution: every
/// row counts toward the supervisor written on it.
pub fn summarize_supervisors(records: &[ActivityRecord]) -> Vec<SupervisorMonthSummary> {
    let mut groups: BTreeMap<&str, Vec<&ActivityRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.supervisor.as_str()).or_default().push(record);
    }

    let mut summaries: Vec<SupervisorMonthSummary> = groups
        .into_iter()
        .map(|(supervisor, rows)| {
            let answered = sum_counts(rows.iter().map(|r| r.answered));
            let days_worked = rows
                .iter()
                .map(|r| r.date)
                .collect::<HashSet<NaiveDate>>()
                .len() as u64;
            SupervisorMonthSummary {
                supervisor: supervisor.to_string(),
                answered,
                days_worked,
                calls_per_day: calls_per_day(answered, days_worked),
                tmo: mean_duration(rows.iter().map(|r| r.answered_time)),
                mean_not_ready_time: mean_duration(rows.iter().map(|r| r.not_ready_time)),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.answered.cmp(&a.answered));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::testing::rec;

    #[test]
    fn supervisors_ranked_by_answered_with_calendar_days() {
        let rows = vec![
            rec("A", "GOMEZ", "2024-03-05").answered(10, Duration::minutes(20)),
            rec("B", "GOMEZ", "2024-03-05").answered(10, Duration::minutes(40)),
            rec("C", "LOPEZ", "2024-03-05").answered(50, Duration::minutes(60)),
            rec("C", "LOPEZ", "2024-03-06").answered(5, Duration::zero()),
        ];
        let summaries = summarize_supervisors(&rows);
        assert_eq!(summaries.len(), 2);

        let lopez = &summaries[0];
        assert_eq!(lopez.supervisor, "LOPEZ");
        assert_eq!(lopez.days_worked, 2);
        assert_eq!(lopez.calls_per_day, 28);

        let gomez = &summaries[1];
        // two agents on the same date: one calendar day
        assert_eq!(gomez.days_worked, 1);
        assert_eq!(gomez.calls_per_day, 20);
        assert_eq!(gomez.tmo, Duration::minutes(30));
    }
}
