// src/daily.rs
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::duration::{divide_duration, saturating_add, serialize_hms};
use crate::ratio::{calls_per_hour, hours};
use crate::{ActivityRecord, AgentId};

/// Everything one agent did on one calendar day, summed over shift segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDayAggregate {
    pub agent: AgentId,
    pub date: NaiveDate,
    pub answered: u64,
    #[serde(serialize_with = "serialize_hms")]
    pub answered_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub logged_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub acw_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub ready_time: Duration,
    #[serde(serialize_with = "serialize_hms")]
    pub not_ready_time: Duration,
    pub requeues: u64,
    pub transfers: u64,
    /// Mean handling time per answered call.
    #[serde(serialize_with = "serialize_hms")]
    pub tmo: Duration,
    pub calls_per_hour: u64,
}

impl AgentDayAggregate {
    fn empty(agent: &str, date: NaiveDate) -> Self {
        Self {
            agent: agent.to_string(),
            date,
            answered: 0,
            answered_time: Duration::zero(),
            logged_time: Duration::zero(),
            acw_time: Duration::zero(),
            ready_time: Duration::zero(),
            not_ready_time: Duration::zero(),
            requeues: 0,
            transfers: 0,
            tmo: Duration::zero(),
            calls_per_hour: 0,
        }
    }

    fn add(&mut self, record: &ActivityRecord) {
        self.answered = self.answered.saturating_add(record.answered);
        self.answered_time = saturating_add(self.answered_time, record.answered_time);
        self.logged_time = saturating_add(self.logged_time, record.logged_time);
        self.acw_time = saturating_add(self.acw_time, record.acw_time);
        self.ready_time = saturating_add(self.ready_time, record.ready_time);
        self.not_ready_time = saturating_add(self.not_ready_time, record.not_ready_time);
        self.requeues = self.requeues.saturating_add(record.requeues);
        self.transfers = self.transfers.saturating_add(record.transfers);
    }

    fn finish(mut self) -> Self {
        self.tmo = divide_duration(self.answered_time, self.answered);
        self.calls_per_hour = calls_per_hour(self.answered, self.productive_hours());
        self
    }

    /// Logged-in time minus not-ready time. May be negative on dirty data.
    pub fn productive_time(&self) -> Duration {
        self.logged_time
            .checked_sub(&self.not_ready_time)
            .unwrap_or(Duration::MIN)
    }

    pub fn productive_hours(&self) -> Decimal {
        hours(self.productive_time())
    }
}

/// Groups records by (agent, date) and sums them.
///
/// Rows come back ordered by agent, then date.
pub fn aggregate_by_day(records: &[ActivityRecord]) -> Vec<AgentDayAggregate> {
    let mut index: HashMap<(&str, NaiveDate), usize> = HashMap::new();
    let mut days: Vec<AgentDayAggregate> = Vec::new();

    for record in records {
        let key = (record.agent.as_str(), record.date);
        let slot = *index.entry(key).or_insert_with(|| {
            days.push(AgentDayAggregate::empty(&record.agent, record.date));
            days.len() - 1
        });
        days[slot].add(record);
    }

    let mut days: Vec<AgentDayAggregate> =
        days.into_iter().map(AgentDayAggregate::finish).collect();
    days.sort_by(|a, b| a.agent.cmp(&b.agent).then(a.date.cmp(&b.date)));

    debug!(
        "Aggregated {} records into {} agent-day rows",
        records.len(),
        days.len()
    );
    days
}

pub fn sort_by_date(rows: &mut [AgentDayAggregate]) {
    rows.sort_by(|a, b| a.date.cmp(&b.date));
}

pub fn sort_by_answered_desc(rows: &mut [AgentDayAggregate]) {
    rows.sort_by(|a, b| b.answered.cmp(&a.answered));
}

/// One agent's rows, oldest day first.
pub fn agent_detail(rows: &[AgentDayAggregate], agent: &str) -> Vec<AgentDayAggregate> {
    let mut detail: Vec<AgentDayAggregate> =
        rows.iter().filter(|row| row.agent == agent).cloned().collect();
    sort_by_date(&mut detail);
    detail
}
