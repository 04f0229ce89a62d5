use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {}", .missing.join(", "))]
    MissingConfig { missing: Vec<&'static str> },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// `line` is 1-based and counts the header as line 1.
    #[error("Line {line} of {} is missing required field '{field}'", .path.display())]
    Validation {
        line: usize,
        field: String,
        path: PathBuf,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single API call. Each one is scoped to one row.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Displays the full cause chain so reports show timeouts and refusals.
    #[error("Request failed: {}", with_causes(.0))]
    Transport(reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    pub fn validation(line: usize, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Validation {
            line,
            field: field.into(),
            path: path.into(),
        }
    }
}

/// `err` followed by each distinct `source()` message, joined with ": ".
fn with_causes(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = inner.source();
    }
    message
}
