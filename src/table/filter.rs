//! Filter Selections
//!
//! Column id -> set of selected values. Used for both the committed filters
//! and the editor's draft; the engine keeps the two as separate values.

use indexmap::{IndexMap, IndexSet};

use super::row::TableRow;

/// Selected filter values per column, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    columns: IndexMap<String, IndexSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of filtered columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Total number of selected values across all columns
    pub fn value_count(&self) -> usize {
        self.columns.values().map(IndexSet::len).sum()
    }

    pub fn contains(&self, column_id: &str, value: &str) -> bool {
        self.columns
            .get(column_id)
            .map(|set| set.contains(value))
            .unwrap_or(false)
    }

    pub fn values(&self, column_id: &str) -> Option<&IndexSet<String>> {
        self.columns.get(column_id)
    }

    /// Include or exclude a value. A column whose set becomes empty is dropped.
    pub fn set(&mut self, column_id: &str, value: &str, included: bool) {
        if included {
            self.columns
                .entry(column_id.to_string())
                .or_default()
                .insert(value.to_string());
        } else {
            self.remove(column_id, value);
        }
    }

    /// Remove one value; returns whether it was present.
    pub fn remove(&mut self, column_id: &str, value: &str) -> bool {
        let Some(set) = self.columns.get_mut(column_id) else {
            return false;
        };
        let removed = set.shift_remove(value);
        if set.is_empty() {
            self.columns.shift_remove(column_id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// AND across columns, OR within a column's value set.
    pub fn matches<R: TableRow>(&self, row: &R) -> bool {
        self.columns
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .all(|(column_id, values)| values.contains(&row.cell(column_id).filter_key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::row::{CellValue, Record};

    fn row(city: &str, age: i64) -> Record {
        let mut r = Record::new();
        r.insert("city".into(), CellValue::from(city));
        r.insert("age".into(), CellValue::from(age));
        r
    }

    #[test]
    fn test_empty_selection_matches_everything() {
        let filters = FilterSelection::new();
        assert!(filters.matches(&row("Houston", 29)));
    }

    #[test]
    fn test_or_within_and_across() {
        let mut filters = FilterSelection::new();
        filters.set("city", "Chicago", true);
        filters.set("city", "Houston", true);
        filters.set("age", "29", true);

        assert!(filters.matches(&row("Houston", 29)));
        assert!(!filters.matches(&row("Chicago", 27)));
        assert!(!filters.matches(&row("Phoenix", 29)));
    }

    #[test]
    fn test_removing_last_value_drops_column() {
        let mut filters = FilterSelection::new();
        filters.set("city", "Chicago", true);
        assert!(filters.remove("city", "Chicago"));
        assert!(filters.values("city").is_none());
        assert!(filters.is_empty());
        assert!(!filters.remove("city", "Chicago"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut filters = FilterSelection::new();
        filters.set("city", "Phoenix", true);
        filters.set("age", "50", true);
        filters.set("city", "Chicago", true);

        let flat: Vec<(String, String)> = filters
            .iter()
            .flat_map(|(c, vs)| vs.iter().map(move |v| (c.to_string(), v.clone())))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("city".to_string(), "Phoenix".to_string()),
                ("city".to_string(), "Chicago".to_string()),
                ("age".to_string(), "50".to_string()),
            ]
        );
        assert_eq!(filters.value_count(), 3);
    }
}
