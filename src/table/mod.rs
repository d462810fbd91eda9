/// Labeled table construction from raw result payloads.
pub mod builder;
/// Classification of raw result payloads.
pub mod raw;
/// Scalar cell values.
pub mod value;

pub use builder::{LabeledTable, TableError, build_table, table_from_raw};
pub use raw::RawResult;
pub use value::CellValue;
