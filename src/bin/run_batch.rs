//! Run mortgage calculations for every loan in a CSV file
//!
//! Writes one summary row per loan and, optionally, the full schedule of each
//! successful loan. Supports JSON output for API integration via --json

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::info;
use mortgage_engine::{load_loans, BatchOutcome, ScenarioRunner, ScheduleSummary, SolverConfig};
use serde::Serialize;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

/// Batch mortgage calculator
#[derive(Parser, Debug)]
#[command(name = "run_batch", version, about, long_about = None)]
struct Args {
    /// CSV file with one loan per row
    input: PathBuf,

    /// Directory for the output files
    #[arg(short, long, default_value = "batch_output")]
    output_dir: PathBuf,

    /// JSON file with IRR solver settings
    #[arg(long)]
    solver_config: Option<PathBuf>,

    /// Also write each loan's schedule as schedule_<loan_id>.csv
    #[arg(long)]
    schedules: bool,

    /// Print the batch response as JSON
    #[arg(long)]
    json: bool,
}

/// One line of batch_summary.csv
#[derive(Serialize, Clone, Default)]
struct SummaryRow {
    loan_id: u32,
    status: &'static str,
    error: String,
    total_periods: u32,
    principal_financed: f64,
    fixed_installment: f64,
    total_interest_paid: f64,
    total_paid_base: f64,
    total_paid_with_charges: f64,
    npv: Option<f64>,
    irr_base: f64,
    irr_with_charges: f64,
    tcea: f64,
}

impl From<&BatchOutcome> for SummaryRow {
    fn from(outcome: &BatchOutcome) -> Self {
        match &outcome.result {
            Ok(result) => {
                let summary = result.summary();
                Self {
                    loan_id: outcome.loan_id,
                    status: "ok",
                    error: String::new(),
                    total_periods: summary.total_periods,
                    principal_financed: summary.principal_financed,
                    fixed_installment: summary.fixed_installment,
                    total_interest_paid: summary.totals.total_interest_paid,
                    total_paid_base: summary.totals.total_paid_base,
                    total_paid_with_charges: summary.totals.total_paid_with_charges,
                    npv: summary.npv,
                    irr_base: summary.irr_base,
                    irr_with_charges: summary.irr_with_charges,
                    tcea: summary.tcea,
                }
            }
            Err(e) => Self {
                loan_id: outcome.loan_id,
                status: "failed",
                error: e.to_string(),
                ..Default::default()
            },
        }
    }
}

#[derive(Serialize)]
struct LoanOutput {
    loan_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ScheduleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchResponse {
    generated_at: DateTime<Utc>,
    loan_count: usize,
    succeeded: usize,
    failed: usize,
    solver: SolverConfig,
    loans: Vec<LoanOutput>,
    execution_time_ms: u64,
}

fn load_solver_config(path: Option<&PathBuf>) -> Result<SolverConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open solver config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("Failed to parse solver config {}", path.display()))
        }
        None => Ok(SolverConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let solver = load_solver_config(args.solver_config.as_ref())?;
    let loans = load_loans(&args.input)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Failed to load loans from {}", args.input.display()))?;
    info!("Loaded {} loans in {:?}", loans.len(), start.elapsed());

    let runner = ScenarioRunner::with_config(solver);
    let outcomes = runner.run_batch(&loans);
    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    info!("Calculated {} loans ({} failed) in {:?}", outcomes.len(), outcomes.len() - succeeded, start.elapsed());

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let summary_path = args.output_dir.join("batch_summary.csv");
    let mut writer = csv::Writer::from_path(&summary_path)
        .with_context(|| format!("Failed to create {}", summary_path.display()))?;
    for outcome in &outcomes {
        writer.serialize(SummaryRow::from(outcome))?;
    }
    writer.flush()?;

    if args.schedules {
        for outcome in &outcomes {
            if let Ok(result) = &outcome.result {
                let path = args.output_dir.join(format!("schedule_{}.csv", outcome.loan_id));
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                result.write_csv(file)?;
            }
        }
    }

    if args.json {
        let response = BatchResponse {
            generated_at: Utc::now(),
            loan_count: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            solver,
            loans: outcomes
                .iter()
                .map(|outcome| match &outcome.result {
                    Ok(result) => LoanOutput {
                        loan_id: outcome.loan_id,
                        summary: Some(result.summary()),
                        error: None,
                    },
                    Err(e) => LoanOutput {
                        loan_id: outcome.loan_id,
                        summary: None,
                        error: Some(e.to_string()),
                    },
                })
                .collect(),
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Batch Summary:");
        println!("  Loans: {}", outcomes.len());
        println!("  Succeeded: {}", succeeded);
        println!("  Failed: {}", outcomes.len() - succeeded);
        println!("  Output written to {}", summary_path.display());
        println!("\nTotal time: {:?}", start.elapsed());
    }

    Ok(())
}
