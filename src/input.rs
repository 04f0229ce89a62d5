use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One data line of an input file, keyed by header name.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    line: usize,
    fields: HashMap<String, String>,
    source: Option<Map<String, Value>>,
}

impl InputRow {
    pub fn new(line: usize, fields: HashMap<String, String>) -> Self {
        Self {
            line,
            fields,
            source: None,
        }
    }

    /// Keep the JSON object this row was read from, values untouched.
    pub fn with_source(mut self, source: Map<String, Value>) -> Self {
        self.source = Some(source);
        self
    }

    /// 1-based line number, the header being line 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The record as read: the JSON object for `.json` input, otherwise the
    /// cells as strings.
    pub fn raw(&self) -> Map<String, Value> {
        match &self.source {
            Some(obj) => obj.clone(),
            None => self
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        }
    }

    /// The trimmed value of `key`, or `None` when the column is absent or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Like [`get`](Self::get) but yields an empty string for missing values.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }
}

/// Load every data row from a CSV file, or from a JSON array of objects when
/// the path ends in `.json`.
pub fn read_rows(path: &Path) -> Result<Vec<InputRow>> {
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let rows = if is_json {
        read_json(path)?
    } else {
        read_csv(path)?
    };
    tracing::debug!(path = %path.display(), rows = rows.len(), "read input");
    Ok(rows)
}

fn read_csv(path: &Path) -> Result<Vec<InputRow>> {
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(InputRow::new(index + 2, fields));
    }
    Ok(rows)
}

fn read_json(path: &Path) -> Result<Vec<InputRow>> {
    let contents = std::fs::read_to_string(path)?;
    let records: Vec<Map<String, Value>> = serde_json::from_str(&contents)?;

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, obj)| {
            let fields = obj
                .iter()
                .map(|(k, v)| (k.clone(), json_to_string(v)))
                .collect();
            InputRow::new(index + 2, fields).with_source(obj)
        })
        .collect())
}

fn json_to_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_header_driven_rows_with_trimming() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "projects.csv",
            "name,notes\n  Website Revamp , Q1 initiative \n\nMobile App,\n",
        );

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("Website Revamp"));
        assert_eq!(rows[0].get("notes"), Some("Q1 initiative"));
        assert_eq!(rows[0].line(), 2);
        assert_eq!(rows[1].get("name"), Some("Mobile App"));
        assert_eq!(rows[1].get("notes"), None);
        assert_eq!(rows[1].get_or_empty("notes"), "");
    }

    #[test]
    fn unknown_column_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "p.csv", "name\nAlpha\n");
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].get("notes"), None);
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "p.csv", "name,notes\n\"Alpha, Beta\",\"line1\nline2\"\n");
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Alpha, Beta"));
        assert_eq!(rows[0].get("notes"), Some("line1\nline2"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rows(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "p.csv", "name,notes\nAlpha,x,extra\n");
        assert!(matches!(read_rows(&path), Err(Error::Csv { .. })));
    }

    #[test]
    fn reads_previous_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "projects.created.json",
            r#"[
  {"name": "Website Revamp", "project_gid": "123", "notes": ""},
  {"name": "Legacy", "gid": 456, "notes": null}
]"#,
        );

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("project_gid"), Some("123"));
        assert_eq!(rows[0].get("notes"), None);
        assert_eq!(rows[1].get("gid"), Some("456"));
        assert_eq!(rows[1].line(), 3);
        assert_eq!(
            Value::Object(rows[1].raw()),
            serde_json::json!({ "name": "Legacy", "gid": 456, "notes": null })
        );
    }

    #[test]
    fn csv_row_raw_is_string_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "p.csv", "name,gid
Alpha,7
");
        let rows = read_rows(&path).unwrap();
        assert_eq!(
            Value::Object(rows[0].raw()),
            serde_json::json!({ "name": "Alpha", "gid": "7" })
        );
    }

    #[test]
    fn json_that_is_not_an_array_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.json", r#"{"name": "x"}"#);
        assert!(matches!(read_rows(&path), Err(Error::Json(_))));
    }
}
