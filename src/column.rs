/// Typed column storage.
///
/// A Column is an immutable array-like container indexed by row. Every column
/// holds one of two kinds of value:
///
/// - `Float64`: a well-formed `f64` per row. Never null, never a string.
/// - `Category`: a label per row, stored as a [`StringId`] into the column's
///   own [`StringInterner`].
///
/// Columns are built whole by the table builder and never mutated afterwards.
use crate::interner::{StringId, StringInterner};
use std::fmt::Debug;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Float64,
    Category,
}

/// A single cell read out of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Float64(f64),
    String(String),
}

impl ColumnValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ColumnValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ColumnValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ColumnValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

enum ColumnData {
    Float64(Vec<f64>),
    Category {
        ids: Vec<StringId>,
        labels: StringInterner,
    },
}

pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn float64(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Float64(values),
        }
    }

    /// Create a category column from row IDs and the interner that issued them.
    ///
    /// Every ID must resolve in `labels`.
    pub fn category(name: impl Into<String>, ids: Vec<StringId>, labels: StringInterner) -> Self {
        debug_assert!(ids.iter().all(|&id| labels.resolve(id).is_some()));
        Column {
            name: name.into(),
            data: ColumnData::Category { ids, labels },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        match self.data {
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::Category { .. } => ColumnType::Category,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Float64(values) => values.len(),
            ColumnData::Category { ids, .. } => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<ColumnValue> {
        match &self.data {
            ColumnData::Float64(values) => values.get(index).copied().map(ColumnValue::Float64),
            ColumnData::Category { ids, labels } => ids
                .get(index)
                .and_then(|&id| labels.resolve(id))
                .map(|s| ColumnValue::String(s.to_string())),
        }
    }

    /// The whole numeric column, for aggregation loops.
    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Float64(values) => Some(values),
            ColumnData::Category { .. } => None,
        }
    }

    /// Row IDs and the interner that resolves them.
    pub fn as_categories(&self) -> Option<(&[StringId], &StringInterner)> {
        match &self.data {
            ColumnData::Float64(_) => None,
            ColumnData::Category { ids, labels } => Some((ids, labels)),
        }
    }
}

impl Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column {{ name: '{}', type: {:?}, len: {} }}",
            self.name,
            self.column_type(),
            self.len()
        )
    }
}
