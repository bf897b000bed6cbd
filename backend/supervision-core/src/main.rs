// src/main.rs
use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supervision_core::{
    format_hms, loader, parse_month, AppConfig, AppError, MonthlyReport, ReportConfig,
    ReportEngine, ReportError, ReportQuery, SupervisorSelection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Monthly productivity report for DATA METRO agents and supervisors",
    long_about = None
)]
struct Args {
    /// Activity export (CSV). Falls back to SUPERVISION_DATA_PATH
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Report configuration JSON (aliases and exclusions). Built-in tables when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report year (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Month as 1-12 or Spanish name (defaults to the current month)
    #[arg(short, long)]
    month: Option<String>,

    /// Supervisor to report on; whole call center when omitted
    #[arg(short, long)]
    supervisor: Option<String>,

    /// Agent for the day-by-day drill-down (with --supervisor only)
    #[arg(short, long)]
    agent: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Print the available years and supervisors and exit
    #[arg(long)]
    list: bool,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let app_config = AppConfig::from_env().context("Loading SUPERVISION_* environment")?;
    init_tracing(&app_config.log_level);

    let args = Args::parse();

    let data_path = args
        .data
        .clone()
        .or_else(|| app_config.data_path.clone())
        .ok_or_else(|| {
            AppError::MissingConfig("data path (--data or SUPERVISION_DATA_PATH)".to_string())
        })?;

    let report_config = match args.config.clone().or_else(|| app_config.report_config.clone()) {
        Some(path) => ReportConfig::from_json_file(&path)
            .with_context(|| format!("Reading report configuration {}", path.display()))?,
        None => {
            info!("Using built-in DATA METRO report configuration");
            ReportConfig::metro()
        }
    };

    let raw = loader::load_csv(&data_path, app_config.delimiter_byte())
        .with_context(|| format!("Loading activity export {}", data_path.display()))?;

    let engine = ReportEngine::new(&report_config);
    let records = engine.prepare(&raw);

    if args.list {
        let options = ReportEngine::options(&records);
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    let today = Local::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let month = match args.month.as_deref() {
        Some(raw_month) => {
            parse_month(raw_month).ok_or_else(|| anyhow!("Unknown month '{}'", raw_month))?
        }
        None => today.month(),
    };

    let mut query = ReportQuery::new(
        year,
        month,
        SupervisorSelection::from_label(args.supervisor.as_deref()),
    )?;
    if let Some(agent) = args.agent.as_deref() {
        query = query.with_agent(agent);
    }

    match engine.build(&records, &query) {
        Ok(report) => match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Table => print_tables(&report),
        },
        Err(ReportError::NoData { year, month }) => {
            warn!("No data for {:02}/{}", month, year);
            println!("No hay datos para este período ({:02}/{}).", month, year);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn print_tables(report: &MonthlyReport) {
    if !report.supervisors.is_empty() {
        println!("## Resumen mensual por supervisor");
        println!(
            "{:<28} {:>11} {:>6} {:>8} {:>10} {:>10}",
            "SUPERVISOR", "Contestadas", "Dias", "Prom.", "TMO", "No Listo"
        );
        for s in &report.supervisors {
            println!(
                "{:<28} {:>11} {:>6} {:>8} {:>10} {:>10}",
                s.supervisor,
                s.answered,
                s.days_worked,
                s.calls_per_day,
                format_hms(s.tmo),
                format_hms(s.mean_not_ready_time)
            );
        }
        println!();
    }

    let total = &report.group_total;
    println!("## Total del grupo");
    println!(
        "{:<28} {:>11} {:>6} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
        "",
        "Contestadas",
        "Dias",
        "Prom.",
        "x Hora",
        "TMO",
        "Logueado",
        "ACW",
        "Listo",
        "No Listo",
        "Reenv.",
        "Transf."
    );
    println!(
        "{:<28} {:>11} {:>6} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
        total.label,
        total.answered,
        total.days_worked,
        total.calls_per_day,
        total.calls_per_hour,
        format_hms(total.tmo),
        format_hms(total.mean_logged_time),
        format_hms(total.mean_acw_time),
        format_hms(total.mean_ready_time),
        format_hms(total.mean_not_ready_time),
        total.requeues,
        total.transfers
    );
    println!();

    println!("## Acumulado anual de contestadas ({})", report.annual.year);
    for m in &report.annual.months {
        println!("{:<4} {:>10}", m.label, m.answered);
    }
    println!();

    if report.assignments.is_empty() {
        return;
    }

    println!("## Resumen mensual por asistente");
    for a in &report.agents {
        println!(
            "{:<28} {:>11} {:>6} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
            a.agent,
            a.answered,
            a.days_worked,
            a.calls_per_day,
            a.calls_per_hour,
            format_hms(a.tmo),
            format_hms(a.mean_logged_time),
            format_hms(a.mean_acw_time),
            format_hms(a.mean_ready_time),
            format_hms(a.mean_not_ready_time),
            a.requeues,
            a.transfers
        );
    }
    println!();

    if !report.agent_detail.is_empty() {
        println!("## Detalle diario por asistente");
        for day in &report.agent_detail {
            println!(
                "{:<12} {:>11} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
                day.date.format("%d/%m/%Y"),
                day.answered,
                day.calls_per_hour,
                format_hms(day.tmo),
                format_hms(day.answered_time),
                format_hms(day.logged_time),
                format_hms(day.acw_time),
                format_hms(day.ready_time),
                format_hms(day.not_ready_time),
                day.requeues,
                day.transfers
            );
        }
    }
}
