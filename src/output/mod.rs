/// Timestamped report naming and writing.
pub mod formatter;
/// Console preview of a labeled table.
pub mod preview;
/// Spreadsheet persistence.
pub mod xlsx;

pub use formatter::{OutputError, output_file_name, write_output};
pub use xlsx::{TableSink, XlsxSink};
