use std::path::Path;

use crate::error::{Error, Result};
use crate::input::InputRow;

/// Check that every row carries each required field. Stops at the first gap.
pub fn validate_rows(rows: &[InputRow], required: &[&str], path: &Path) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if let Some(field) = required.iter().copied().find(|f| row.get(f).is_none()) {
            return Err(Error::validation(index + 2, field, path));
        }
    }
    Ok(())
}
