/// Raw records as produced by a record source.
///
/// A raw record maps a field name to an untyped scalar. Nothing here decides
/// what a field *means*; that is the table builder's job.
use serde::Deserialize;
use std::collections::HashMap;

/// An untyped scalar read from a source.
///
/// Deserializes from plain JSON scalars, so a remote page body of the form
/// `{"items": [{"age": "31", "region": "Seoul"}], "cursor": null}` maps
/// straight onto records.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// One raw record: field name to scalar. Absent fields are simply missing keys.
pub type RawRecord = HashMap<String, RawValue>;

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Interpret the value as a finite number.
    ///
    /// Strings are trimmed and parsed; booleans read as `1`/`0`. Returns `None`
    /// for null, unparseable strings, and non-finite numbers.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            RawValue::Null => return None,
            RawValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            RawValue::Number(n) => *n,
            RawValue::String(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Interpret the value as a category label.
    ///
    /// Returns `None` for null and for strings that are blank after trimming.
    pub fn as_label(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}
