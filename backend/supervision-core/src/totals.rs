// src/totals.rs
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::daily::AgentDayAggregate;
use crate::duration::{mean_duration, serialize_hms};
use crate::monthly::AgentMonthSummary;
use crate::ratio::{calls_per_day, calls_per_hour, sum_counts};

pub const GROUP_TOTAL_LABEL: &str = "TOTAL GRUPO";

/// The whole selected population pooled into one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub answered: u64,
    /// Person-days: a date worked by two agents counts twice.
    pub days_worked: u64,
    pub calls_per_day: u64,
    pub calls_per_hour: u64,
    #[serde(serialize_with = "serialize_hms")]
    pub tmo: Duration,
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

/// Pools per-agent summaries and the agent-day rows they came from.
///
/// Counts come from the summaries. Productive hours and mean durations come
/// from the day rows, so agents with more days weigh more.
pub fn group_total(summaries: &[AgentMonthSummary], rows: &[AgentDayAggregate]) -> GroupTotal {
    let answered = sum_counts(summaries.iter().map(|s| s.answered));
    let days_worked = sum_counts(summaries.iter().map(|s| s.days_worked));
    let productive_hours: Decimal = rows.iter().map(AgentDayAggregate::productive_hours).sum();

    GroupTotal {
        label: GROUP_TOTAL_LABEL.to_string(),
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
        requeues: sum_counts(summaries.iter().map(|s| s.requeues)),
        transfers: sum_counts(summaries.iter().map(|s| s.transfers)),
        productive_hours,
    }
}
