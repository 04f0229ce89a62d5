use serde::Serialize;

use super::Status;
use crate::input::InputRow;
use crate::report::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Membership {
    pub resource_type: String,
    pub resource_id: String,
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub workspace: String,
    pub team: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub memberships: Vec<Membership>,
}

impl ProjectPayload {
    /// Build from a validated row. Passing a portfolio places the project in
    /// it as part of the same call.
    pub fn from_row(row: &InputRow, workspace: &str, team: &str, portfolio: Option<&str>) -> Self {
        Self {
            name: row.get_or_empty("name").to_string(),
            notes: row.get("notes").map(String::from),
            workspace: workspace.to_string(),
            team: team.to_string(),
            memberships: portfolio
                .map(|gid| Membership {
                    resource_type: "portfolio".into(),
                    resource_id: gid.to_string(),
                })
                .into_iter()
                .collect(),
        }
    }
}

/// One line of `projects.created`. Its CSV feeds the portfolio flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectOutcome {
    pub name: String,
    pub project_gid: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Record for ProjectOutcome {
    const CSV_HEADER: &'static [&'static str] = &["name", "project_gid", "notes"];

    fn csv_values(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.project_gid.as_str(), self.notes.as_str()]
    }

    fn status(&self) -> Status {
        if self.error.is_some() {
            Status::Failed
        } else {
            Status::Created
        }
    }

    fn label(&self) -> String {
        match &self.error {
            Some(err) => format!("{}: {err}", self.name),
            None => format!("{} ({})", self.name, self.project_gid),
        }
    }
}
