use async_trait::async_trait;

use super::{dry_run_summary, execute, load_rows, print_payload, BatchOptions, RunSummary};
use crate::api::{self, AsanaApi};
use crate::batch::RowJob;
use crate::error::{Error, Result};
use crate::input::InputRow;
use crate::model::project::{ProjectOutcome, ProjectPayload};

pub const REQUIRED: &[&str] = &["name"];
pub const REPORT_STEM: &str = "projects.created";

#[derive(Debug, Clone)]
pub struct ProjectSettings {
    pub workspace_gid: String,
    pub team_gid: String,
    /// When set, each project is created directly inside this portfolio.
    pub portfolio_gid: Option<String>,
}

struct CreateProject<'a> {
    api: &'a dyn AsanaApi,
    settings: &'a ProjectSettings,
}

impl CreateProject<'_> {
    fn payload(&self, row: &InputRow) -> ProjectPayload {
        ProjectPayload::from_row(
            row,
            &self.settings.workspace_gid,
            &self.settings.team_gid,
            self.settings.portfolio_gid.as_deref(),
        )
    }
}

#[async_trait]
impl RowJob for CreateProject<'_> {
    type Outcome = ProjectOutcome;

    fn describe(&self, row: &InputRow) -> String {
        let name = row.get_or_empty("name");
        match &self.settings.portfolio_gid {
            Some(_) => format!("Creating project in portfolio: {name}"),
            None => format!("Creating project: {name}"),
        }
    }

    async fn run(&self, row: &InputRow) -> Result<ProjectOutcome> {
        let payload = self.payload(row);
        let created = api::create_project(self.api, &payload).await?;
        Ok(ProjectOutcome {
            name: created.name.unwrap_or(payload.name),
            project_gid: created.gid,
            notes: payload.notes.unwrap_or_default(),
            error: None,
        })
    }

    fn failed(&self, row: &InputRow, error: &Error) -> ProjectOutcome {
        ProjectOutcome {
            name: row.get_or_empty("name").to_string(),
            project_gid: String::new(),
            notes: row.get_or_empty("notes").to_string(),
            error: Some(error.to_string()),
        }
    }
}

pub async fn run(
    api: &dyn AsanaApi,
    settings: &ProjectSettings,
    opts: &BatchOptions,
) -> Result<RunSummary> {
    let rows = load_rows(&opts.input, REQUIRED)?;
    let job = CreateProject { api, settings };

    if opts.dry_run {
        for row in &rows {
            print_payload(row, &job.payload(row))?;
        }
        return Ok(dry_run_summary(&rows));
    }
    execute(&rows, opts, &job, REPORT_STEM).await
}
