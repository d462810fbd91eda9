use chrono_tz::Tz;
use tracing::debug;

use crate::table::{CellValue, LabeledTable};
use crate::temporal::classifier::TemporalClassifier;
use crate::temporal::parse::parse_timestamp;

/// Converts temporal columns of a table to zoned timestamps.
#[derive(Debug, Clone)]
pub struct TemporalNormalizer {
    classifier: TemporalClassifier,
    timezone: Tz,
}

impl TemporalNormalizer {
    /// Normalizer using the default trigger set.
    pub fn new(timezone: Tz) -> Self {
        Self::with_classifier(TemporalClassifier::default(), timezone)
    }

    /// Normalizer using a custom column classifier.
    pub fn with_classifier(classifier: TemporalClassifier, timezone: Tz) -> Self {
        Self {
            classifier,
            timezone,
        }
    }

    /// Rewrite every temporal column of `table` in place.
    ///
    /// A column is replaced only when at least one of its values parses; the
    /// values that do not parse become [`CellValue::Null`]. Columns with no
    /// parseable value keep their original cells. Returns the names of the
    /// converted columns.
    pub fn normalize(&self, table: &mut LabeledTable) -> Vec<String> {
        let mut converted = Vec::new();

        for index in self.classifier.temporal_columns(table) {
            let parsed: Vec<_> = table.column_values(index).map(parse_timestamp).collect();
            let parsed_count = parsed.iter().filter(|value| value.is_some()).count();
            let dropped = table
                .column_values(index)
                .zip(&parsed)
                .filter(|(cell, timestamp)| timestamp.is_none() && !cell.is_null())
                .count();
            let column = table.columns()[index].clone();

            if parsed_count == 0 {
                debug!(column = %column, "no parseable timestamps; column left as-is");
                continue;
            }

            for (cell, timestamp) in table.column_values_mut(index).zip(parsed) {
                *cell = timestamp.map_or(CellValue::Null, |ts| {
                    CellValue::Timestamp(ts.with_timezone(&self.timezone))
                });
            }

            debug!(
                column = %column,
                parsed = parsed_count,
                dropped,
                timezone = %self.timezone,
                "converted temporal column"
            );
            converted.push(column);
        }

        converted
    }
}

/// Normalize the temporal columns of `table` to `timezone` with the default triggers.
pub fn normalize_temporal(table: &mut LabeledTable, timezone: Tz) -> Vec<String> {
    TemporalNormalizer::new(timezone).normalize(table)
}
