//! Row and Cell Types
//!
//! A table row is anything that can hand out a [`CellValue`] for a column id.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Parse a raw text cell (CSV, query strings). Finite numbers become
    /// [`CellValue::Number`], blank input becomes [`CellValue::Empty`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Canonical string form used for filter membership.
    ///
    /// Numbers use the shortest decimal form (`30`, `2.5`), which is also what
    /// filter option values are written in.
    pub fn filter_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(n.to_string())),
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Anything that can be displayed as a table row
pub trait TableRow {
    /// Value of the given column; unknown columns are [`CellValue::Empty`].
    fn cell(&self, column_id: &str) -> CellValue;
}

/// Generic row keyed by column id, used for CSV and JSON sourced tables
pub type Record = IndexMap<String, CellValue>;

impl TableRow for IndexMap<String, CellValue> {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).cloned().unwrap_or_default()
    }
}

impl TableRow for BTreeMap<String, CellValue> {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).cloned().unwrap_or_default()
    }
}

impl TableRow for HashMap<String, CellValue> {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).cloned().unwrap_or_default()
    }
}

impl TableRow for serde_json::Map<String, serde_json::Value> {
    fn cell(&self, column_id: &str) -> CellValue {
        self.get(column_id).map(CellValue::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_key_matches_js_string_form() {
        assert_eq!(CellValue::from(30_i64).filter_key(), "30");
        assert_eq!(CellValue::Number(2.5).filter_key(), "2.5");
        assert_eq!(CellValue::from("Chicago").filter_key(), "Chicago");
        assert_eq!(CellValue::Bool(true).filter_key(), "true");
        assert_eq!(CellValue::Empty.filter_key(), "");
    }

    #[test]
    fn test_parse() {
        assert_eq!(CellValue::parse("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::parse(" "), CellValue::Empty);
        assert_eq!(CellValue::parse("New York"), CellValue::Text("New York".into()));
        assert_eq!(CellValue::parse("NaN"), CellValue::Text("NaN".into()));
    }

    #[test]
    fn test_json_row() {
        let row: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(r#"{"age": 27, "city": "Chicago", "vip": false}"#).unwrap();
        assert_eq!(row.cell("age"), CellValue::Number(27.0));
        assert_eq!(row.cell("city"), CellValue::Text("Chicago".into()));
        assert_eq!(row.cell("vip"), CellValue::Bool(false));
        assert_eq!(row.cell("missing"), CellValue::Empty);
    }

    #[test]
    fn test_untagged_serde() {
        let cells: Vec<CellValue> = serde_json::from_str(r#"[1, "a", true, null]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::Number(1.0),
                CellValue::Text("a".into()),
                CellValue::Bool(true),
                CellValue::Empty
            ]
        );
    }
}
