use serde_json::{Map, Value};

use crate::table::TableError;

/// Shape of a query result payload, decided once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// Records that carry their own field names.
    SelfLabeled(Vec<Map<String, Value>>),
    /// Positional rows that need externally supplied column names.
    ///
    /// An empty payload lands here with no rows.
    Unlabeled(Vec<Vec<Value>>),
    /// Anything that is not a sequence: absent, `null`, a string, an object...
    Invalid,
}

impl RawResult {
    /// Classify a JSON payload.
    ///
    /// The first element decides the shape: when it is an object, every element
    /// must be one. Scalar elements of an unlabeled payload become one-value rows.
    pub fn from_json(payload: Option<&Value>) -> Result<Self, TableError> {
        let Some(Value::Array(items)) = payload else {
            return Ok(Self::Invalid);
        };

        if !matches!(items.first(), Some(Value::Object(_))) {
            let rows = items
                .iter()
                .map(|item| match item {
                    Value::Array(values) => values.clone(),
                    scalar => vec![scalar.clone()],
                })
                .collect();
            return Ok(Self::Unlabeled(rows));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record.clone()),
                _ => Err(TableError::MixedRecordShapes { index }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::SelfLabeled)
    }

    /// Number of records or rows; zero for [`RawResult::Invalid`].
    pub fn len(&self) -> usize {
        match self {
            Self::SelfLabeled(records) => records.len(),
            Self::Unlabeled(rows) => rows.len(),
            Self::Invalid => 0,
        }
    }

    /// True when there are no records or rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
