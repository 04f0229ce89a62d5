use async_trait::async_trait;

use super::{dry_run_summary, execute, load_rows, print_payload, BatchOptions, RunSummary};
use crate::api::{self, AsanaApi};
use crate::batch::RowJob;
use crate::error::{Error, Result};
use crate::input::InputRow;
use crate::model::task::{TaskOutcome, TaskPayload};

pub const REQUIRED: &[&str] = &["project_gid", "name"];
pub const REPORT_STEM: &str = "tasks.created";

struct CreateTask<'a> {
    api: &'a dyn AsanaApi,
}

#[async_trait]
impl RowJob for CreateTask<'_> {
    type Outcome = TaskOutcome;

    fn describe(&self, row: &InputRow) -> String {
        format!(
            "Creating task in {}: {}",
            row.get_or_empty("project_gid"),
            row.get_or_empty("name")
        )
    }

    async fn run(&self, row: &InputRow) -> Result<TaskOutcome> {
        let payload = TaskPayload::from_row(row);
        let created = api::create_task(self.api, &payload).await?;
        let task_name = created.name.unwrap_or_else(|| payload.name.clone());
        Ok(TaskOutcome::created(&payload, created.gid, task_name))
    }

    fn failed(&self, row: &InputRow, error: &Error) -> TaskOutcome {
        TaskOutcome::failed(row, error.to_string())
    }
}

pub async fn run(api: &dyn AsanaApi, opts: &BatchOptions) -> Result<RunSummary> {
    let rows = load_rows(&opts.input, REQUIRED)?;

    if opts.dry_run {
        for row in &rows {
            print_payload(row, &TaskPayload::from_row(row))?;
        }
        return Ok(dry_run_summary(&rows));
    }
    execute(&rows, opts, &CreateTask { api }, REPORT_STEM).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::MockApi;
    use crate::batch::FailurePolicy;
    use crate::model::Status;
    use serde_json::{json, Value};

    fn options(dir: &tempfile::TempDir, csv: &str, policy: FailurePolicy) -> BatchOptions {
        let input = dir.path().join("tasks.csv");
        std::fs::write(&input, csv).unwrap();
        BatchOptions {
            input,
            output_dir: dir.path().join("output"),
            policy,
            dry_run: false,
        }
    }

    const HEADER: &str = "project_gid,name,notes,assignee_gid,due_on,start_on,followers\n";

    #[tokio::test]
    async fn sends_only_supplied_fields() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}111,Kickoff,,,2024-01-01,,\n");
        let opts = options(&dir, &csv, FailurePolicy::Continue);
        let api = MockApi::new().created("222", "Kickoff");

        run(&api, &opts).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![(
                "/tasks".to_string(),
                json!({ "name": "Kickoff", "projects": ["111"], "due_on": "2024-01-01" })
            )]
        );
    }

    #[tokio::test]
    async fn failure_is_recorded_and_later_rows_continue() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{HEADER}111,First,,,,,\n111,Second,,u9,2024-02-01,,u1|u2| u3\n111,Third,,,,,\n"
        );
        let opts = options(&dir, &csv, FailurePolicy::Continue);
        let api = MockApi::new()
            .created("1", "First")
            .fail_status(400, r#"{"errors":[{"message":"assignee: Not a user"}]}"#)
            .created("3", "Third");

        let summary = run(&api, &opts).await.unwrap();

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.tally.total(), 3);
        assert_eq!(summary.tally.failed, 1);

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].1["followers"], json!(["u1", "u2", "u3"]));
        assert_eq!(calls[1].1["assignee"], "u9");

        let reports = summary.reports.unwrap();
        let outcomes: Vec<TaskOutcome> =
            serde_json::from_str(&std::fs::read_to_string(&reports.json).unwrap()).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].status, Status::Created);
        assert_eq!(outcomes[1].status, Status::Failed);
        assert_eq!(outcomes[1].task_gid, "");
        assert_eq!(outcomes[1].task_name, "Second");
        assert_eq!(
            outcomes[1].error.as_deref(),
            Some(r#"HTTP 400: {"errors":[{"message":"assignee: Not a user"}]}"#)
        );
        assert_eq!(outcomes[2].status, Status::Created);
        assert_eq!(outcomes[2].task_gid, "3");

        let csv = std::fs::read_to_string(&reports.csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "status,project_gid,task_gid,task_name,assignee_gid,due_on,error");
        assert_eq!(lines[1], "created,111,1,First,,,");
        assert_eq!(
            lines[2],
            r#"failed,111,,Second,,,"HTTP 400: {""errors"":[{""message"":""assignee: Not a user""}]}""#
        );
    }

    #[tokio::test]
    async fn created_json_matches_report_shape() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}111,Kickoff,,u7,2024-01-01,,\n");
        let opts = options(&dir, &csv, FailurePolicy::Continue);
        let api = MockApi::new().created("222", "Kickoff");

        let summary = run(&api, &opts).await.unwrap();

        let json: Value =
            serde_json::from_str(&std::fs::read_to_string(summary.reports.unwrap().json).unwrap())
                .unwrap();
        assert_eq!(
            json,
            json!([{
                "status": "created",
                "project_gid": "111",
                "task_gid": "222",
                "task_name": "Kickoff",
                "due_on": "2024-01-01",
                "assignee_gid": "u7"
            }])
        );
    }

    #[tokio::test]
    async fn abort_policy_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}111,First,,,,,\n111,Second,,,,,\n");
        let opts = options(&dir, &csv, FailurePolicy::Abort);
        let api = MockApi::new().fail_status(500, "down").created("2", "Second");

        assert!(run(&api, &opts).await.is_err());
        assert_eq!(api.calls().len(), 1);
        assert!(!dir.path().join("output").exists());
    }

    #[tokio::test]
    async fn missing_project_gid_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}111,First,,,,,\n,Second,,,,,\n");
        let opts = options(&dir, &csv, FailurePolicy::Continue);
        let api = MockApi::new();

        let err = run(&api, &opts).await.unwrap_err();

        match err {
            Error::Validation { line, field, .. } => {
                assert_eq!(line, 3);
                assert_eq!(field, "project_gid");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(api.calls().is_empty());
    }
}
