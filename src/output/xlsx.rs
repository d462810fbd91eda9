use std::path::Path;

use chrono::Datelike;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};

use crate::output::formatter::OutputError;
use crate::table::{CellValue, LabeledTable};

/// First year a spreadsheet serial date can represent.
const FIRST_SERIAL_YEAR: i32 = 1900;

/// Persists a labeled table to a file.
pub trait TableSink {
    /// Write `table` to `path`, replacing any existing file.
    fn write_table(&self, table: &LabeledTable, path: &Path) -> Result<(), OutputError>;
}

impl<T: TableSink + ?Sized> TableSink for &T {
    fn write_table(&self, table: &LabeledTable, path: &Path) -> Result<(), OutputError> {
        (**self).write_table(table, path)
    }
}

/// Single-sheet `.xlsx` writer.
///
/// The first row holds the column names in bold. Timestamps are stored as
/// spreadsheet date-times holding their wall-clock time in the table's
/// target timezone; missing values are left blank. Timestamps before 1900
/// have no serial date and are written as text.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    sheet_name: String,
    datetime_format: String,
}

impl XlsxSink {
    /// Sink writing to a sheet named `sheet_name`.
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            datetime_format: "yyyy-mm-dd hh:mm:ss".to_string(),
        }
    }

    fn build_workbook(&self, table: &LabeledTable) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let datetime = Format::new().set_num_format(&self.datetime_format);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, name) in table.columns().iter().enumerate() {
            worksheet.write_string_with_format(0, col_num(col)?, name, &header)?;
        }

        for (row, cells) in table.rows().iter().enumerate() {
            let row = row_num(row + 1)?;
            for (col, cell) in cells.iter().enumerate() {
                write_cell(worksheet, row, col_num(col)?, cell, &datetime)?;
            }
        }

        worksheet.autofit();
        Ok(workbook)
    }
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self::new("Sheet1")
    }
}

impl TableSink for XlsxSink {
    fn write_table(&self, table: &LabeledTable, path: &Path) -> Result<(), OutputError> {
        let spreadsheet_error = |source| OutputError::Spreadsheet {
            path: path.to_path_buf(),
            source,
        };
        let mut workbook = self.build_workbook(table).map_err(spreadsheet_error)?;
        workbook.save(path).map_err(spreadsheet_error)
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &CellValue,
    datetime: &Format,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        #[allow(clippy::cast_precision_loss)]
        CellValue::Integer(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(x) => {
            worksheet.write_number(row, col, *x)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Timestamp(ts) if ts.year() < FIRST_SERIAL_YEAR => {
            worksheet.write_string(row, col, cell.to_string())?;
        }
        CellValue::Timestamp(ts) => {
            worksheet.write_datetime_with_format(row, col, &ts.naive_local(), datetime)?;
        }
    }
    Ok(())
}

fn row_num(index: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(index: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}
