use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::model::Status;

/// An outcome that can be written to both report formats.
pub trait Record: Serialize {
    /// Fixed CSV column order. Downstream runs read these names back.
    const CSV_HEADER: &'static [&'static str];

    /// One value per header column; absent values are empty strings.
    fn csv_values(&self) -> Vec<&str>;

    fn status(&self) -> Status;

    /// Short human-readable label for progress output.
    fn label(&self) -> String;
}

/// Quote a CSV cell only when it holds a comma, quote or line break.
pub fn csv_escape(value: &str) -> Cow<'_, str> {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn render_csv<R: Record>(records: &[R]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(R::CSV_HEADER.join(","));
    for record in records {
        let cells: Vec<Cow<'_, str>> = record.csv_values().into_iter().map(csv_escape).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

pub fn render_json<R: Record>(records: &[R]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Where one run writes its JSON and CSV reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl ReportPaths {
    /// `stem` is the shared file name without extension, e.g. `tasks.created`.
    pub fn in_dir(dir: &Path, stem: &str) -> Self {
        Self {
            json: dir.join(format!("{stem}.json")),
            csv: dir.join(format!("{stem}.csv")),
        }
    }
}

pub fn write_reports<R: Record>(records: &[R], paths: &ReportPaths) -> Result<()> {
    for path in [&paths.json, &paths.csv] {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&paths.json, render_json(records)?)?;
    std::fs::write(&paths.csv, render_csv(records))?;
    tracing::info!(
        json = %paths.json.display(),
        csv = %paths.csv.display(),
        records = records.len(),
        "wrote reports"
    );
    Ok(())
}
