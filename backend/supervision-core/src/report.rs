// src/report.rs
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};

use crate::annual::{annual_rollup, AnnualRollup};
use crate::daily::{agent_detail, aggregate_by_day, AgentDayAggregate};
use crate::dominant::{resolve_dominant, DominantAssignment};
use crate::filter::RecordFilter;
use crate::monthly::{sort_by_answered_desc, summarize_agents, AgentMonthSummary};
use crate::supervisors::{summarize_supervisors, SupervisorMonthSummary};
use crate::totals::{group_total, GroupTotal};
use crate::{ActivityRecord, AgentId, ReportConfig, ReportError, SupervisorId};

// Rows, dominant assignments and the agent scope for the annual rollup
type Population = (Vec<ActivityRecord>, Vec<DominantAssignment>, Option<HashSet<AgentId>>);

/// Selector value meaning "every agent of the call center".
pub const WHOLE_CALL_CENTER: &str = "TODOS (CALL)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "supervisor", rename_all = "snake_case")]
pub enum SupervisorSelection {
    WholeCallCenter,
    Supervisor(SupervisorId),
}

impl SupervisorSelection {
    /// `None`, blank, or the whole-call-center sentinel select everyone.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") => SupervisorSelection::WholeCallCenter,
            Some(l) if l.eq_ignore_ascii_case(WHOLE_CALL_CENTER) => {
                SupervisorSelection::WholeCallCenter
            }
            Some(l) => SupervisorSelection::Supervisor(l.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportQuery {
    pub year: i32,
    pub month: u32,
    pub selection: SupervisorSelection,
    pub agent: Option<AgentId>,
}

impl ReportQuery {
    pub fn new(year: i32, month: u32, selection: SupervisorSelection) -> Result<Self, ReportError> {
        if !(1..=12).contains(&month) {
            return Err(ReportError::InvalidMonth(month));
        }
        Ok(Self {
            year,
            month,
            selection,
            agent: None,
        })
    }

    /// Adds a single-agent day-by-day drill-down to the report. Ignored for
    /// the whole call center.
    pub fn with_agent(mut self, agent: &str) -> Self {
        self.agent = Some(agent.to_string());
        self
    }
}

/// Everything the dashboard shows for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub query: ReportQuery,
    /// Dominant attributions behind a single-supervisor population.
    pub assignments: Vec<DominantAssignment>,
    pub daily: Vec<AgentDayAggregate>,
    /// Busiest agent first.
    pub agents: Vec<AgentMonthSummary>,
    pub group_total: GroupTotal,
    /// Only filled for the whole call center.
    pub supervisors: Vec<SupervisorMonthSummary>,
    pub annual: AnnualRollup,
    pub agent_detail: Vec<AgentDayAggregate>,
}

/// Values offered by the year and supervisor selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    pub supervisors: Vec<SupervisorId>,
    pub years: Vec<i32>,
}

/// Runs the whole pipeline for one report configuration.
///
/// Holds no state besides the configuration, so one engine can serve any
/// number of concurrent queries.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    filter: RecordFilter,
}

impl ReportEngine {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            filter: RecordFilter::new(config),
        }
    }

    /// Canonicalizes and filters a raw dataset once, for any number of queries.
    pub fn prepare(&self, raw: &[ActivityRecord]) -> Vec<ActivityRecord> {
        self.filter.apply(raw)
    }

    /// Selector values for prepared records: sentinel first, then sorted supervisors.
    pub fn options(records: &[ActivityRecord]) -> ReportOptions {
        let supervisors: BTreeSet<&str> = records.iter().map(|r| r.supervisor.as_str()).collect();
        let years: BTreeSet<i32> = records.iter().map(|r| r.date.year()).collect();

        ReportOptions {
            supervisors: std::iter::once(WHOLE_CALL_CENTER)
                .chain(supervisors)
                .map(str::to_string)
                .collect(),
            years: years.into_iter().collect(),
        }
    }

    /// Builds the report from records already passed through [`prepare`](Self::prepare).
    ///
    /// Returns [`ReportError::NoData`] when the selected population has no rows,
    /// including when the supervisor or agent is unknown.
    pub fn build(
        &self,
        records: &[ActivityRecord],
        query: &ReportQuery,
    ) -> Result<MonthlyReport, ReportError> {
        let (year, month) = (query.year, query.month);
        let no_data = ReportError::NoData { year, month };

        let period: Vec<ActivityRecord> = records
            .iter()
            .filter(|r| r.in_month(year, month))
            .cloned()
            .collect();
        debug!("{} rows fall in {:02}/{}", period.len(), month, year);

        let (population, assignments, scope): Population = match &query.selection {
            SupervisorSelection::WholeCallCenter => (period.clone(), Vec::new(), None),
            SupervisorSelection::Supervisor(label) => {
                let supervisor = self.filter.canonical_supervisor(label);
                let dominant = resolve_dominant(&period, year, month);
                let agents = dominant.agents_of(&supervisor);
                let assignments = dominant
                    .assignments()
                    .iter()
                    .filter(|a| a.supervisor == supervisor)
                    .cloned()
                    .collect();
                let population = period
                    .iter()
                    .filter(|r| agents.contains(&r.agent))
                    .cloned()
                    .collect();
                (population, assignments, Some(agents))
            }
        };

        if population.is_empty() {
            warn!(
                "No data for {:02}/{} with selection {:?}",
                month, year, query.selection
            );
            return Err(no_data);
        }

        let daily = aggregate_by_day(&population);
        let mut agents = summarize_agents(&daily);
        let group_total = group_total(&agents, &daily);
        sort_by_answered_desc(&mut agents);

        let supervisors = match query.selection {
            SupervisorSelection::WholeCallCenter => summarize_supervisors(&period),
            SupervisorSelection::Supervisor(_) => Vec::new(),
        };

        let year_rows: Vec<ActivityRecord> = records
            .iter()
            .filter(|r| r.in_year(year))
            .filter(|r| scope.as_ref().map_or(true, |agents| agents.contains(&r.agent)))
            .cloned()
            .collect();
        let annual = annual_rollup(&year_rows, year);

        // Drill-down only exists inside a supervisor's team
        let agent_detail = match (&query.selection, &query.agent) {
            (SupervisorSelection::Supervisor(_), Some(agent)) => {
                let detail = agent_detail(&daily, agent);
                if detail.is_empty() {
                    warn!("Agent {} has no rows in {:02}/{}", agent, month, year);
                    return Err(no_data);
                }
                detail
            }
            _ => Vec::new(),
        };

        info!(
            "Report {:02}/{} ready: {} agents, {} agent-days, {} answered",
            month,
            year,
            agents.len(),
            daily.len(),
            group_total.answered
        );

        Ok(MonthlyReport {
            query: query.clone(),
            assignments,
            daily,
            agents,
            group_total,
            supervisors,
            annual,
            agent_detail,
        })
    }

    /// [`prepare`](Self::prepare) followed by [`build`](Self::build).
    pub fn run(
        &self,
        raw: &[ActivityRecord],
        query: &ReportQuery,
    ) -> Result<MonthlyReport, ReportError> {
        let prepared = self.prepare(raw);
        self.build(&prepared, query)
    }
}
