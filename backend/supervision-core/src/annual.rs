// src/annual.rs
use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use crate::ratio::sum_counts;
use crate::ActivityRecord;

pub const MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

pub const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Accepts `1`..`12`, a full Spanish month name or its short label.
pub fn parse_month(input: &str) -> Option<u32> {
    let input = input.trim();
    if let Ok(n) = input.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    MONTH_NAMES
        .iter()
        .zip(MONTH_LABELS.iter())
        .position(|(name, label)| {
            name.eq_ignore_ascii_case(input) || label.eq_ignore_ascii_case(input)
        })
        .map(|i| i as u32 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: u32,
    pub label: &'static str,
    pub answered: u64,
}

/// Answered calls per calendar month of one year, January first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnualRollup {
    pub year: i32,
    pub months: [MonthlyCount; 12],
}

impl AnnualRollup {
    pub fn total(&self) -> u64 {
        sum_counts(self.months.iter().map(|m| m.answered))
    }
}

/// Sums answered calls by month for `year`; months without rows stay at zero.
pub fn annual_rollup(records: &[ActivityRecord], year: i32) -> AnnualRollup {
    let mut months: [MonthlyCount; 12] = std::array::from_fn(|i| MonthlyCount {
        month: i as u32 + 1,
        label: MONTH_LABELS[i],
        answered: 0,
    });

    for record in records.iter().filter(|r| r.in_year(year)) {
        let slot = &mut months[record.date.month0() as usize];
        slot.answered = slot.answered.saturating_add(record.answered);
    }

    debug!("Built annual rollup for {}", year);
    AnnualRollup { year, months }
}
