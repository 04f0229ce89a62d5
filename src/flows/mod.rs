pub mod portfolio;
pub mod projects;
pub mod tasks;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::batch::{run_batch, FailurePolicy, RowJob, Tally};
use crate::error::Result;
use crate::input::{read_rows, InputRow};
use crate::report::{write_reports, ReportPaths};
use crate::validate::validate_rows;

/// Per-invocation knobs shared by every batch flow.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub policy: FailurePolicy,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub tally: Tally,
    /// `None` for dry runs.
    pub reports: Option<ReportPaths>,
}

fn load_rows(path: &Path, required: &[&str]) -> Result<Vec<InputRow>> {
    let rows = read_rows(path)?;
    validate_rows(&rows, required, path)?;
    Ok(rows)
}

async fn execute<J: RowJob>(
    rows: &[InputRow],
    opts: &BatchOptions,
    job: &J,
    report_stem: &str,
) -> Result<RunSummary> {
    let outcomes = run_batch(rows, opts.policy, job).await?;
    let paths = ReportPaths::in_dir(&opts.output_dir, report_stem);
    write_reports(&outcomes, &paths)?;
    Ok(RunSummary {
        rows: rows.len(),
        tally: Tally::of(&outcomes),
        reports: Some(paths),
    })
}

fn print_payload<P: Serialize>(row: &InputRow, payload: &P) -> Result<()> {
    println!("line {}: {}", row.line(), serde_json::to_string(payload)?);
    Ok(())
}

fn dry_run_summary(rows: &[InputRow]) -> RunSummary {
    RunSummary {
        rows: rows.len(),
        tally: Tally::default(),
        reports: None,
    }
}
