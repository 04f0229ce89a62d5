use std::path::Path;

use async_trait::async_trait;
use serde_json::json;

use super::{dry_run_summary, execute, load_rows, print_payload, BatchOptions, RunSummary};
use crate::api::{self, AsanaApi};
use crate::batch::RowJob;
use crate::error::{Error, Result};
use crate::input::InputRow;
use crate::model::portfolio::{project_gid_of, MembershipOutcome, PortfolioOutcome, PortfolioPayload};
use crate::report::{write_reports, ReportPaths};

pub const CREATED_STEM: &str = "portfolio.created";
pub const ADDED_STEM: &str = "portfolio.added";

/// Create one portfolio and record it next to the other reports.
pub async fn create(
    api: &dyn AsanaApi,
    name: &str,
    workspace_gid: &str,
    output_dir: &Path,
) -> Result<(PortfolioOutcome, ReportPaths)> {
    println!("Creating portfolio: {name}");
    let payload = PortfolioPayload {
        name: name.to_string(),
        workspace: workspace_gid.to_string(),
    };
    let created = api::create_portfolio(api, &payload).await?;

    let outcome = PortfolioOutcome {
        name: created.name.unwrap_or(payload.name),
        portfolio_gid: created.gid,
        workspace_gid: workspace_gid.to_string(),
    };
    println!("✔ Portfolio created");
    println!("Name: {}", outcome.name);
    println!("GID: {}", outcome.portfolio_gid);

    let paths = ReportPaths::in_dir(output_dir, CREATED_STEM);
    write_reports(std::slice::from_ref(&outcome), &paths)?;
    Ok((outcome, paths))
}

struct AddToPortfolio<'a> {
    api: &'a dyn AsanaApi,
    portfolio_gid: &'a str,
}

#[async_trait]
impl RowJob for AddToPortfolio<'_> {
    type Outcome = MembershipOutcome;

    fn describe(&self, row: &InputRow) -> String {
        format!(
            "Adding: {} ({})",
            row.get_or_empty("name"),
            project_gid_of(row).unwrap_or("-")
        )
    }

    async fn run(&self, row: &InputRow) -> Result<MembershipOutcome> {
        let name = row.get_or_empty("name");
        let Some(project_gid) = project_gid_of(row) else {
            return Ok(MembershipOutcome::skipped(row));
        };
        api::add_project_to_portfolio(self.api, self.portfolio_gid, project_gid).await?;
        Ok(MembershipOutcome::added(name, project_gid))
    }

    fn failed(&self, row: &InputRow, error: &Error) -> MembershipOutcome {
        MembershipOutcome::failed(
            row.get_or_empty("name"),
            project_gid_of(row),
            error.to_string(),
        )
    }
}

/// Add every project listed in a previous report to `portfolio_gid`.
/// Lines without a project id are skipped rather than rejected.
pub async fn add_projects(
    api: &dyn AsanaApi,
    portfolio_gid: &str,
    opts: &BatchOptions,
) -> Result<RunSummary> {
    let rows = load_rows(&opts.input, &[])?;

    if opts.dry_run {
        for row in &rows {
            match project_gid_of(row) {
                Some(gid) => print_payload(row, &json!({ "portfolio": portfolio_gid, "item": gid }))?,
                None => println!("line {}: skipped (missing project_gid)", row.line()),
            }
        }
        return Ok(dry_run_summary(&rows));
    }

    let job = AddToPortfolio { api, portfolio_gid };
    execute(&rows, opts, &job, ADDED_STEM).await
}
