use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Status;
use crate::input::InputRow;
use crate::report::Record;

/// Body of `POST /portfolios`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPayload {
    pub name: String,
    pub workspace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioOutcome {
    pub name: String,
    pub portfolio_gid: String,
    pub workspace_gid: String,
}

impl Record for PortfolioOutcome {
    const CSV_HEADER: &'static [&'static str] = &["name", "portfolio_gid", "workspace_gid"];

    fn csv_values(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.portfolio_gid.as_str(),
            self.workspace_gid.as_str(),
        ]
    }

    fn status(&self) -> Status {
        Status::Created
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.portfolio_gid)
    }
}

/// Project id of a report line, accepting `gid` from older exports.
pub fn project_gid_of(row: &InputRow) -> Option<&str> {
    row.get("project_gid").or_else(|| row.get("gid"))
}

/// One line of `portfolio.added`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipOutcome {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_gid: Option<String>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The input record, kept for skipped lines so they can be fixed by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Map<String, Value>>,
}

impl MembershipOutcome {
    pub fn added(name: &str, project_gid: &str) -> Self {
        Self {
            name: name.to_string(),
            project_gid: Some(project_gid.to_string()),
            status: Status::Added,
            error: None,
            raw: None,
        }
    }

    pub fn failed(name: &str, project_gid: Option<&str>, error: String) -> Self {
        Self {
            name: name.to_string(),
            project_gid: project_gid.map(String::from),
            status: Status::Failed,
            error: Some(error),
            raw: None,
        }
    }

    pub fn skipped(row: &InputRow) -> Self {
        Self {
            name: row.get_or_empty("name").to_string(),
            project_gid: None,
            status: Status::Skipped,
            error: Some("missing project_gid".into()),
            raw: Some(row.raw()),
        }
    }
}

impl Record for MembershipOutcome {
    const CSV_HEADER: &'static [&'static str] = &["name", "project_gid", "status", "error"];

    fn csv_values(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.project_gid.as_deref().unwrap_or(""),
            self.status.as_str(),
            self.error.as_deref().unwrap_or(""),
        ]
    }

    fn status(&self) -> Status {
        self.status
    }

    fn label(&self) -> String {
        let gid = self.project_gid.as_deref().unwrap_or("-");
        match &self.error {
            Some(err) => format!("{} ({gid}): {err}", self.name),
            None => format!("{} ({gid})", self.name),
        }
    }
}
