// src/lib.rs
//! Productivity reporting for the DATA METRO call center.
//!
//! Raw activity rows go through alias canonicalization and denylist
//! filtering, are restricted to a month, optionally narrowed to one
//! supervisor's dominant agents, and are then rolled up per agent-day,
//! per agent-month, for the whole group and per calendar month of the year.

pub mod annual;
pub mod config;
pub mod daily;
pub mod dominant;
pub mod duration;
pub mod error;
pub mod filter;
pub mod loader;
pub mod monthly;
pub mod ratio;
pub mod records;
pub mod report;
pub mod supervisors;
pub mod totals;


pub use annual::{annual_rollup, parse_month, AnnualRollup, MonthlyCount};
pub use config::{AppConfig, ReportConfig};
pub use daily::{aggregate_by_day, AgentDayAggregate};
pub use dominant::{resolve_dominant, DominantAssignment, DominantSupervisorMap};
pub use duration::{format_hms, normalize, RawDuration};
pub use error::{AppError, ReportError};
pub use filter::RecordFilter;
pub use monthly::{summarize_agents, summarize_month, AgentMonthSummary};
pub use ratio::safe_divide;
pub use records::{ActivityRecord, AgentId, SupervisorId};
pub use report::{
    MonthlyReport, ReportEngine, ReportOptions, ReportQuery, SupervisorSelection,
    WHOLE_CALL_CENTER,
};
pub use supervisors::{summarize_supervisors, SupervisorMonthSummary};
pub use totals::{group_total, GroupTotal};
