// src/records.rs
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::duration::serialize_hms;

pub type AgentId = String;
pub type SupervisorId = String;

/// One row of the daily activity export. Durations are already normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub agent: AgentId,
    pub supervisor: SupervisorId,
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
}

impl ActivityRecord {
    pub fn new(agent: &str, supervisor: &str, date: NaiveDate) -> Self {
        Self {
            agent: agent.to_string(),
            supervisor: supervisor.to_string(),
            date,
            answered: 0,
            answered_time: Duration::zero(),
            logged_time: Duration::zero(),
            acw_time: Duration::zero(),
            ready_time: Duration::zero(),
            not_ready_time: Duration::zero(),
            requeues: 0,
            transfers: 0,
        }
    }

    pub fn answered(mut self, count: u64, talk_time: Duration) -> Self {
        self.answered = count;
        self.answered_time = talk_time;
        self
    }

    pub fn logged(mut self, d: Duration) -> Self {
        self.logged_time = d;
        self
    }

    pub fn acw(mut self, d: Duration) -> Self {
        self.acw_time = d;
        self
    }

    pub fn ready(mut self, d: Duration) -> Self {
        self.ready_time = d;
        self
    }

    pub fn not_ready(mut self, d: Duration) -> Self {
        self.not_ready_time = d;
        self
    }

    pub fn requeues(mut self, n: u64) -> Self {
        self.requeues = n;
        self
    }

    pub fn transfers(mut self, n: u64) -> Self {
        self.transfers = n;
        self
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    pub fn in_year(&self, year: i32) -> bool {
        self.date.year() == year
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    pub fn rec(agent: &str, supervisor: &str, date_str: &str) -> ActivityRecord {
        ActivityRecord::new(agent, supervisor, d(date_str))
    }
}
