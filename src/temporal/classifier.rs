use crate::parser::names::normalize_identifier;
use crate::table::LabeledTable;

/// Name fragments that mark a column as temporal unless configured otherwise.
pub const DEFAULT_TEMPORAL_TRIGGERS: [&str; 3] = ["date", "time", "check"];

/// Name-based temporal column predicate.
///
/// A column is temporal when its case-folded name contains any trigger
/// substring. Column types are never inspected: `CheckInDate` matches,
/// `update` does not, and a numeric `time_spent` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalClassifier {
    triggers: Vec<String>,
}

impl TemporalClassifier {
    /// Create a classifier from trigger substrings.
    ///
    /// Triggers are compared case-insensitively; blank triggers are ignored.
    pub fn new<I, S>(triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let triggers = triggers
            .into_iter()
            .map(|trigger| trigger.as_ref().trim().to_lowercase())
            .filter(|trigger| !trigger.is_empty())
            .collect();
        Self { triggers }
    }

    /// The lowercased trigger substrings.
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// True when the column name contains a trigger.
    pub fn is_temporal(&self, column: &str) -> bool {
        let name = normalize_identifier(column).to_lowercase();
        self.triggers
            .iter()
            .any(|trigger| name.contains(trigger.as_str()))
    }

    /// Indices of the temporal columns of `table`, in column order.
    pub fn temporal_columns(&self, table: &LabeledTable) -> Vec<usize> {
        table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| self.is_temporal(column))
            .map(|(index, _)| index)
            .collect()
    }
}

impl Default for TemporalClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPORAL_TRIGGERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_triggers_match_case_insensitively() {
        let classifier = TemporalClassifier::default();
        assert!(classifier.is_temporal("CheckInDate"));
        assert!(classifier.is_temporal("create_date"));
        assert!(classifier.is_temporal("UPDATE_TIME"));
        assert!(classifier.is_temporal("checked"));
        assert!(!classifier.is_temporal("update"));
        assert!(!classifier.is_temporal("UpdateCounter"));
        assert!(!classifier.is_temporal("Month"));
    }

    #[test]
    fn custom_triggers_replace_defaults() {
        let classifier = TemporalClassifier::new(["Stamp", " ", "when"]);
        assert_eq!(classifier.triggers(), ["stamp", "when"]);
        assert!(classifier.is_temporal("created_stamp"));
        assert!(!classifier.is_temporal("create_date"));
    }

    #[test]
    fn empty_trigger_set_matches_nothing() {
        let classifier = TemporalClassifier::new(Vec::<String>::new());
        assert!(!classifier.is_temporal("date"));
    }
}
