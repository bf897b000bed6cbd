// src/monthly.rs
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::daily::AgentDayAggregate;
use crate::duration::{mean_duration, serialize_hms};
use crate::ratio::{calls_per_day, calls_per_hour, sum_counts};
use crate::AgentId;

/// One agent's month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentMonthSummary {
    pub agent: AgentId,
    pub answered: u64,
    pub days_worked: u64,
    /// Answered calls per day worked.
    pub calls_per_day: u64,
    /// Answered calls per productive hour.
    pub calls_per_hour: u64,
    /// Mean daily answered-call time.
    #[serde(serialize_with = "serialize_hms")]
    pub tmo: Duration,
    /// Mean of the daily per-call handling times.
    #[serde(serialize_with = "serialize_hms")]
    pub mean_handle_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub mean_logged_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub mean_acw_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub mean_ready_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub mean_not_ready_time: Duration,
    pub requeues: u64,
    pub transfers: u64,
    pub productive_hours: Decimal,
}

/// Folds one agent's day rows into a monthly summary.
///
/// An empty slice gives a zero row rather than an error.
pub fn summarize_month(agent: &str, rows: &[AgentDayAggregate]) -> AgentMonthSummary {
    let answered = sum_counts(rows.iter().map(|r| r.answered));
    let days_worked = rows
        .iter()
        .map(|r| r.date)
        .collect::<HashSet<NaiveDate>>()
        .len() as u64;
    let productive_hours: Decimal = rows.iter().map(AgentDayAggregate::productive_hours).sum();

    AgentMonthSummary {
        agent: agent.to_string(),
        answered,
        days_worked,
        calls_per_day: calls_per_day(answered, days_worked),
        calls_per_hour: calls_per_hour(answered, productive_hours),
        tmo: mean_duration(rows.iter().map(|r| r.answered_time)),
        mean_handle_time: mean_duration(rows.iter().map(|r| r.tmo)),
        mean_logged_time: mean_duration(rows.iter().map(|r| r.logged_time)),
        mean_acw_time: mean_duration(rows.iter().map(|r| r.acw_time)),
        mean_ready_time: mean_duration(rows.iter().map(|r| r.ready_time)),
        mean_not_ready_time: mean_duration(rows.iter().map(|r| r.not_ready_time)),
        requeues: sum_counts(rows.iter().map(|r| r.requeues)),
        transfers: sum_counts(rows.iter().map(|r| r.transfers)),
        productive_hours,
    }
}

/// One summary per agent, ordered by agent name.
pub fn summarize_agents(rows: &[AgentDayAggregate]) -> Vec<AgentMonthSummary> {
    let mut by_agent: BTreeMap<&str, Vec<AgentDayAggregate>> = BTreeMap::new();
    for row in rows {
        by_agent.entry(row.agent.as_str()).or_default().push(row.clone());
    }

    let summaries: Vec<AgentMonthSummary> = by_agent
        .into_iter()
        .map(|(agent, agent_rows)| summarize_month(agent, &agent_rows))
        .collect();
    debug!("Summarized {} agents", summaries.len());
    summaries
}

pub fn sort_by_answered_desc(summaries: &mut [AgentMonthSummary]) {
    summaries.sort_by(|a, b| b.answered.cmp(&a.answered));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily::aggregate_by_day;
    use crate::records::testing::rec;
    use rust_decimal_macros::dec;

    #[test]
    fn sums_means_and_ratios() {
        let days = aggregate_by_day(&[
            rec("A", "S", "2024-03-05")
                .answered(20, Duration::minutes(40))
                .logged(Duration::hours(2))
                .not_ready(Duration::hours(1))
                .requeues(2),
            rec("A", "S", "2024-03-06")
                .answered(10, Duration::minutes(30))
                .logged(Duration::hours(1))
                .transfers(3),
        ]);
        let summary = summarize_month("A", &days);

        assert_eq!(summary.answered, 30);
        assert_eq!(summary.days_worked, 2);
        assert_eq!(summary.calls_per_day, 15);
        assert_eq!(summary.productive_hours, dec!(2));
        assert_eq!(summary.calls_per_hour, 15);
        assert_eq!(summary.tmo, Duration::minutes(35));
        // daily TMO is 2m and 3m
        assert_eq!(summary.mean_handle_time, Duration::seconds(150));
        assert_eq!(summary.mean_logged_time, Duration::minutes(90));
        assert_eq!(summary.mean_not_ready_time, Duration::minutes(30));
        assert_eq!(summary.requeues, 2);
        assert_eq!(summary.transfers, 3);
    }

    #[test]
    fn no_worked_days_yields_zero_averages() {
        let summary = summarize_month("Nadie", &[]);
        assert_eq!(summary.days_worked, 0);
        assert_eq!(summary.calls_per_day, 0);
        assert_eq!(summary.calls_per_hour, 0);
        assert_eq!(summary.tmo, Duration::zero());
    }

    #[test]
    fn all_not_ready_day_yields_zero_hourly_rate() {
        let days = aggregate_by_day(&[rec("A", "S", "2024-03-05")
            .answered(12, Duration::minutes(10))
            .logged(Duration::hours(3))
            .not_ready(Duration::hours(3))]);
        let summary = summarize_month("A", &days);
        assert_eq!(summary.productive_hours, Decimal::ZERO);
        assert_eq!(summary.calls_per_hour, 0);
        assert_eq!(summary.calls_per_day, 12);
    }

    #[test]
    fn agents_are_summarized_separately() {
        let days = aggregate_by_day(&[
            rec("B", "S", "2024-03-05").answered(5, Duration::zero()),
            rec("A", "S", "2024-03-05").answered(9, Duration::zero()),
            rec("B", "S", "2024-03-07").answered(1, Duration::zero()),
        ]);
        let mut summaries = summarize_agents(&days);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].agent, "A");
        assert_eq!(summaries[1].days_worked, 2);

        sort_by_answered_desc(&mut summaries);
        assert_eq!(summaries[0].agent, "A");
        assert_eq!(summaries[1].answered, 6);
    }
}
