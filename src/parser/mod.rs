/// Identifier helpers: quoting, case folding, qualified-name segments, keyword matching.
pub mod names;
/// Output column inference from the projection list of a `SELECT` statement.
pub mod projection;

pub use projection::extract_columns;
