use std::io::{self, Write};

use crate::table::LabeledTable;

/// Render the first `limit` rows of `table` as a left-aligned text grid.
///
/// The first line holds the column names, each following line starts with the
/// zero-based row index. A trailing `... (N more rows)` line reports what was
/// left out.
pub fn render_preview(table: &LabeledTable, limit: usize) -> String {
    let shown = table.row_count().min(limit);
    let index_width = shown.saturating_sub(1).to_string().len();

    let cells: Vec<Vec<String>> = table.rows()[..shown]
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(col, name)| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut preview = String::new();
    push_line(&mut preview, "", index_width, table.columns(), &widths);
    for (index, row) in cells.iter().enumerate() {
        push_line(&mut preview, &index.to_string(), index_width, row, &widths);
    }
    if table.row_count() > shown {
        preview.push_str(&format!("... ({} more rows)\n", table.row_count() - shown));
    }
    preview
}

fn push_line(
    out: &mut String,
    label: &str,
    label_width: usize,
    cells: &[String],
    widths: &[usize],
) {
    let mut line = format!("{label:<label_width$}");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str("  ");
        line.push_str(&format!("{cell:<width$}"));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// One-line shape summary plus the column list.
pub fn render_summary(table: &LabeledTable) -> String {
    format!(
        "Table shape: {} rows x {} columns\nColumns: [{}]\n",
        table.row_count(),
        table.column_count(),
        table.columns().join(", ")
    )
}

/// Write the preview of `table` to `out`.
///
/// When the preview cannot be written, the shape summary is written instead.
pub fn write_preview<W: Write + ?Sized>(
    out: &mut W,
    table: &LabeledTable,
    limit: usize,
) -> io::Result<()> {
    let preview = render_preview(table, limit);
    if out.write_all(preview.as_bytes()).is_ok() {
        return Ok(());
    }
    out.write_all(render_summary(table).as_bytes())
}
