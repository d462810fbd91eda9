use serde_json::Value;
use thiserror::Error;

use crate::table::raw::RawResult;
use crate::table::value::CellValue;

/// Failure while turning a raw result into a [`LabeledTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A positional row does not match the number of inferred column names.
    #[error("row {row} has {found} values but {expected} columns were inferred from the query")]
    RowWidthMismatch {
        /// Zero-based row index.
        row: usize,
        /// Number of inferred column names.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },
    /// A self-labeled payload contains an element that is not a record.
    #[error("result element {index} is not a record although the first element is")]
    MixedRecordShapes {
        /// Zero-based element index.
        index: usize,
    },
}

/// Rows of scalar cells sharing one ordered, unique set of column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl LabeledTable {
    /// Create a table with the given columns and no rows.
    ///
    /// Duplicate names are made unique, see [`unique_column_names`].
    pub fn empty(columns: &[String]) -> Self {
        Self {
            columns: unique_column_names(columns),
            rows: Vec::new(),
        }
    }

    fn with_rows(columns: &[String], rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns: unique_column_names(columns),
            rows,
        }
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order; every row has one cell per column.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of `name` among the columns.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cell at `row` under column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&CellValue> {
        let index = self.column_index(name)?;
        self.rows.get(row)?.get(index)
    }

    /// Iterate over the cells of one column.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Mutably iterate over the cells of one column.
    pub fn column_values_mut(&mut self, index: usize) -> impl Iterator<Item = &mut CellValue> {
        self.rows.iter_mut().filter_map(move |row| row.get_mut(index))
    }

    fn from_records(records: &[serde_json::Map<String, Value>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map_or(CellValue::Null, CellValue::from))
                    .collect()
            })
            .collect();

        Self::with_rows(&columns, rows)
    }

    fn from_named_rows(rows: &[Vec<Value>], columns: &[String]) -> Result<Self, TableError> {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                if values.len() != columns.len() {
                    return Err(TableError::RowWidthMismatch {
                        row,
                        expected: columns.len(),
                        found: values.len(),
                    });
                }
                Ok(values.iter().map(CellValue::from).collect())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::with_rows(columns, cells))
    }

    fn from_positional_rows(rows: &[Vec<Value>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let columns: Vec<String> = (0..width).map(|index| index.to_string()).collect();

        let cells = rows
            .iter()
            .map(|values| {
                let mut row: Vec<CellValue> = values.iter().map(CellValue::from).collect();
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        Self::with_rows(&columns, cells)
    }
}

/// Make column names unique by suffixing later duplicates with `.1`, `.2`, ...
pub fn unique_column_names(columns: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(columns.len());
    for column in columns {
        let mut candidate = column.clone();
        let mut suffix = 1usize;
        while unique.contains(&candidate) {
            candidate = format!("{column}.{suffix}");
            suffix += 1;
        }
        unique.push(candidate);
    }
    unique
}

/// Build a labeled table from a classified raw result.
///
/// Returns `Ok(None)` for [`RawResult::Invalid`]; callers report that as an
/// unexpected response shape.
pub fn table_from_raw(
    raw: &RawResult,
    columns: &[String],
) -> Result<Option<LabeledTable>, TableError> {
    let table = match raw {
        RawResult::Invalid => return Ok(None),
        RawResult::Unlabeled(rows) if rows.is_empty() => LabeledTable::empty(columns),
        RawResult::SelfLabeled(records) => LabeledTable::from_records(records),
        RawResult::Unlabeled(rows) if columns.is_empty() => {
            LabeledTable::from_positional_rows(rows)
        }
        RawResult::Unlabeled(rows) => LabeledTable::from_named_rows(rows, columns)?,
    };
    Ok(Some(table))
}

/// Build a labeled table from the `result` payload of a response.
///
/// - not a sequence (or absent) → `Ok(None)`
/// - empty sequence → empty table with `columns`
/// - records → columns from the first record's keys, `columns` ignored
/// - positional rows → zipped against `columns`, or named `"0"`, `"1"`, ... when
///   `columns` is empty
pub fn build_table(
    payload: Option<&Value>,
    columns: &[String],
) -> Result<Option<LabeledTable>, TableError> {
    let raw = RawResult::from_json(payload)?;
    table_from_raw(&raw, columns)
}
