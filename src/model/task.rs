use serde::{Deserialize, Serialize};

use super::Status;
use crate::input::InputRow;
use crate::report::Record;

/// Body of `POST /tasks`. Blank optional columns are left out entirely:
/// the API treats a missing key differently from an empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    pub name: String,
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<Vec<String>>,
}

impl TaskPayload {
    pub fn from_row(row: &InputRow) -> Self {
        Self {
            name: row.get_or_empty("name").to_string(),
            projects: vec![row.get_or_empty("project_gid").to_string()],
            notes: row.get("notes").map(String::from),
            assignee: row.get("assignee_gid").map(String::from),
            due_on: row.get("due_on").map(String::from),
            start_on: row.get("start_on").map(String::from),
            followers: parse_followers(row.get("followers")),
        }
    }
}

/// Split a `|`-delimited follower list. Blank entries are dropped and an
/// empty result is `None`.
pub fn parse_followers(raw: Option<&str>) -> Option<Vec<String>> {
    let ids: Vec<String> = raw?
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// One line of `tasks.created`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub status: Status,
    pub project_gid: String,
    pub task_gid: String,
    pub task_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_gid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskOutcome {
    /// Echoes the due date and assignee that were sent, empty when blank.
    pub fn created(payload: &TaskPayload, task_gid: String, task_name: String) -> Self {
        Self {
            status: Status::Created,
            project_gid: payload.projects.first().cloned().unwrap_or_default(),
            task_gid,
            task_name,
            due_on: Some(payload.due_on.clone().unwrap_or_default()),
            assignee_gid: Some(payload.assignee.clone().unwrap_or_default()),
            error: None,
        }
    }

    pub fn failed(row: &InputRow, error: String) -> Self {
        Self {
            status: Status::Failed,
            project_gid: row.get_or_empty("project_gid").to_string(),
            task_gid: String::new(),
            task_name: row.get_or_empty("name").to_string(),
            due_on: None,
            assignee_gid: None,
            error: Some(error),
        }
    }
}

impl Record for TaskOutcome {
    const CSV_HEADER: &'static [&'static str] = &[
        "status",
        "project_gid",
        "task_gid",
        "task_name",
        "assignee_gid",
        "due_on",
        "error",
    ];

    fn csv_values(&self) -> Vec<&str> {
        vec![
            self.status.as_str(),
            self.project_gid.as_str(),
            self.task_gid.as_str(),
            self.task_name.as_str(),
            self.assignee_gid.as_deref().unwrap_or(""),
            self.due_on.as_deref().unwrap_or(""),
            self.error.as_deref().unwrap_or(""),
        ]
    }

    fn status(&self) -> Status {
        self.status
    }

    fn label(&self) -> String {
        match &self.error {
            Some(err) => format!("{}: {err}", self.task_name),
            None => format!("{} ({})", self.task_name, self.task_gid),
        }
    }
}
