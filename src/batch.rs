use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::input::InputRow;
use crate::model::Status;
use crate::report::Record;

/// What a run does when one row's request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Stop at the first failing row; nothing is written.
    Abort,
    /// Record the row as failed and move on.
    Continue,
}

/// The per-row half of a batch flow.
#[async_trait]
pub trait RowJob: Send + Sync {
    type Outcome: Record + Send;

    /// Progress text printed before the row is attempted.
    fn describe(&self, row: &InputRow) -> String;

    async fn run(&self, row: &InputRow) -> Result<Self::Outcome>;

    /// Outcome recorded for a row whose `run` failed under `Continue`.
    fn failed(&self, row: &InputRow, error: &Error) -> Self::Outcome;
}

/// Process `rows` in order, one request at a time.
pub async fn run_batch<J: RowJob>(
    rows: &[InputRow],
    policy: FailurePolicy,
    job: &J,
) -> Result<Vec<J::Outcome>> {
    let total = rows.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, row) in rows.iter().enumerate() {
        println!("({}/{total}) {}", index + 1, job.describe(row));

        let outcome = match job.run(row).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(line = row.line(), error = %err, ?policy, "row failed");
                match policy {
                    FailurePolicy::Abort => {
                        println!("✖ aborting at line {}", row.line());
                        return Err(err);
                    }
                    FailurePolicy::Continue => job.failed(row, &err),
                }
            }
        };

        let status = outcome.status();
        if status.is_success() {
            println!("✔ {status}: {}", outcome.label());
        } else {
            println!("✖ {status}: {}", outcome.label());
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Counts of a finished run, by outcome status.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn of<R: Record>(outcomes: &[R]) -> Self {
        let mut tally = Tally::default();
        for outcome in outcomes {
            match outcome.status() {
                s if s.is_success() => tally.succeeded += 1,
                Status::Skipped => tally.skipped += 1,
                _ => tally.failed += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}
