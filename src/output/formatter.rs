use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::output::xlsx::TableSink;
use crate::table::LabeledTable;

/// Extension of every report file.
pub const OUTPUT_EXTENSION: &str = "xlsx";

/// Failure while naming or writing a report file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The file prefix would escape the output directory or is empty.
    #[error("Invalid output name '{name}': {reason}")]
    InvalidName {
        /// Rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The output directory could not be created.
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The spreadsheet could not be produced or saved.
    #[error("Failed to write {}: {source}", .path.display())]
    Spreadsheet {
        /// File path.
        path: PathBuf,
        /// Underlying writer error.
        source: rust_xlsxwriter::XlsxError,
    },
}

/// File name `<prefix>_<YYYYMMDD_HHMMSS>.xlsx` for a run started at `timestamp`.
pub fn output_file_name(prefix: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{prefix}_{}.{OUTPUT_EXTENSION}",
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Write `table` into `output_dir` under a timestamped name and return the path.
pub fn write_output<S: TableSink + ?Sized>(
    sink: &S,
    output_dir: &Path,
    prefix: &str,
    timestamp: NaiveDateTime,
    table: &LabeledTable,
) -> Result<PathBuf, OutputError> {
    validate_output_name(prefix)?;

    std::fs::create_dir_all(output_dir).map_err(|source| OutputError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(output_file_name(prefix, timestamp));
    sink.write_table(table, &path)?;
    Ok(path)
}

/// Reject names that are empty or would leave the output directory.
pub fn validate_output_name(name: &str) -> Result<(), OutputError> {
    let invalid = |reason| {
        Err(OutputError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.trim().is_empty() {
        return invalid("name must not be empty");
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return invalid("absolute paths are not allowed");
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return invalid("traversal segments are not allowed");
    }
    if name.contains('/') || name.contains('\\') {
        return invalid("path separators are not allowed");
    }
    Ok(())
}
