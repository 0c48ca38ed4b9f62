//! Table Engine
//!
//! Owns the rows, committed and draft filter selections, pagination cursor and
//! the filter editor's UI state. The filtered index list is recomputed eagerly
//! whenever rows or committed filters change; paging slices it.

use tracing::debug;

use super::column::Column;
use super::filter::FilterSelection;
use super::row::TableRow;

/// Rows-per-page choices offered when none are configured
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 2] = [5, 8];

/// Placeholder shown when the current page has no rows
pub const NO_DATA_MESSAGE: &str = "No data available.";

/// One active committed filter value, as shown in the chip row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub column_id: String,
    pub value: String,
    /// `"<column label>: <value>"`
    pub label: String,
}

/// Rendered table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// Formatted cells of the visible rows, in column order
    Rows(Vec<Vec<String>>),
    /// Single placeholder row spanning every column
    Empty { colspan: usize, message: &'static str },
}

/// Filtering and pagination state for one table
#[derive(Debug, Clone)]
pub struct TableEngine<R> {
    columns: Vec<Column>,
    rows: Vec<R>,
    committed: FilterSelection,
    draft: FilterSelection,
    editor_open: bool,
    expanded: Option<String>,
    page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    filtered: Vec<usize>,
}

impl<R: TableRow> TableEngine<R> {
    pub fn new(rows: Vec<R>, columns: Vec<Column>, page_size: usize) -> Self {
        let mut engine = Self {
            columns,
            rows,
            committed: FilterSelection::new(),
            draft: FilterSelection::new(),
            editor_open: false,
            expanded: None,
            page: 0,
            page_size: page_size.max(1),
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            filtered: Vec::new(),
        };
        engine.refilter();
        engine
    }

    /// Replace the rows-per-page choices. Zeros are dropped; an empty list
    /// keeps the defaults.
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        let options: Vec<usize> = options.into_iter().filter(|n| *n > 0).collect();
        if !options.is_empty() {
            self.page_size_options = options;
        }
        self
    }

    fn refilter(&mut self) {
        self.filtered = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.committed.matches(*row))
            .map(|(i, _)| i)
            .collect();
        debug!(
            rows = self.rows.len(),
            matched = self.filtered.len(),
            filters = self.committed.value_count(),
            "Table filters applied"
        );
    }

    // ---- data ----

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Replace the data set. Filters are re-applied and paging restarts.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.page = 0;
        self.refilter();
    }

    // ---- pagination ----

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Move the cursor. Pages past the end are allowed and render empty.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.page.saturating_add(1).saturating_mul(self.page_size) < self.filtered.len()
    }

    /// Rows of the filtered set before pagination
    pub fn filtered_rows(&self) -> Vec<&R> {
        self.filtered.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Current page slice of the filtered rows
    pub fn visible_rows(&self) -> Vec<&R> {
        let total = self.filtered.len();
        let start = self.page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        self.filtered[start..end]
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Pagination caption, e.g. `1–5 of 10`
    pub fn range_label(&self) -> String {
        let count = self.filtered.len();
        let from = if count == 0 {
            0
        } else {
            self.page.saturating_mul(self.page_size).saturating_add(1)
        };
        let to = count.min(self.page.saturating_add(1).saturating_mul(self.page_size));
        format!("{}\u{2013}{} of {}", from, to, count)
    }

    // ---- rendering ----

    pub fn render_row(&self, row: &R) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.render(&row.cell(&column.id)))
            .collect()
    }

    pub fn body(&self) -> TableBody {
        let visible = self.visible_rows();
        if visible.is_empty() {
            return TableBody::Empty {
                colspan: self.columns.len(),
                message: NO_DATA_MESSAGE,
            };
        }
        TableBody::Rows(visible.into_iter().map(|row| self.render_row(row)).collect())
    }

    // ---- committed filters ----

    pub fn committed_filters(&self) -> &FilterSelection {
        &self.committed
    }

    pub fn active_chips(&self) -> Vec<FilterChip> {
        let mut chips = Vec::with_capacity(self.committed.value_count());
        for (column_id, values) in self.committed.iter() {
            let column_label = self
                .column(column_id)
                .map(|c| c.label.as_str())
                .unwrap_or(column_id);
            for value in values {
                chips.push(FilterChip {
                    column_id: column_id.to_string(),
                    value: value.clone(),
                    label: format!("{}: {}", column_label, value),
                });
            }
        }
        chips
    }

    /// Drop one committed value without going through the editor
    pub fn remove_committed_filter_value(&mut self, column_id: &str, value: &str) {
        if self.committed.remove(column_id, value) {
            self.page = 0;
            self.refilter();
        }
    }

    /// "Clear All" on the active filter summary
    pub fn clear_all_committed_filters(&mut self) {
        if self.committed.is_empty() {
            return;
        }
        self.committed.clear();
        self.page = 0;
        self.refilter();
    }

    // ---- filter editor ----

    fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn filter_categories(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_filter_category())
    }

    /// Whether the table offers a filter editor at all
    pub fn has_filter_categories(&self) -> bool {
        self.filter_categories().next().is_some()
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    pub fn expanded_category(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn draft_filters(&self) -> &FilterSelection {
        &self.draft
    }

    pub fn draft_selected(&self, column_id: &str, value: &str) -> bool {
        self.draft.contains(column_id, value)
    }

    /// Seed the draft from the committed filters and expand the first category
    pub fn open_filter_editor(&mut self) {
        self.draft = self.committed.clone();
        self.expanded = self
            .columns
            .iter()
            .find(|c| c.is_filter_category())
            .map(|c| c.id.clone());
        self.editor_open = true;
    }

    /// Close without committing
    pub fn close_filter_editor(&mut self) {
        self.editor_open = false;
        self.expanded = None;
    }

    pub fn expand_category(&mut self, column_id: &str, expanded: bool) {
        self.expanded = if expanded {
            Some(column_id.to_string())
        } else {
            None
        };
    }

    /// Edit the draft only; committed filters are untouched until apply
    pub fn toggle_filter_value(&mut self, column_id: &str, value: &str, included: bool) {
        self.draft.set(column_id, value, included);
    }

    pub fn apply_filters(&mut self) {
        self.committed = self.draft.clone();
        self.close_filter_editor();
        self.page = 0;
        self.refilter();
    }

    /// "Clear All" inside the editor: discard the draft and close
    pub fn clear_draft_filters(&mut self) {
        self.draft.clear();
        self.close_filter_editor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::{Align, FilterOption};
    use crate::table::row::{CellValue, Record};

    const PEOPLE: [(&str, i64, &str); 10] = [
        ("John Doe", 30, "New York"),
        ("Jane Smith", 24, "Los Angeles"),
        ("Alice Brown", 29, "Houston"),
        ("Bob White", 38, "Phoenix"),
        ("Eve Adams", 50, "San Diego"),
        ("Tom Green", 27, "Chicago"),
        ("Alice Brown", 29, "Houston"),
        ("Bob White", 38, "Phoenix"),
        ("Eve Adams", 50, "San Diego"),
        ("Tom Green", 27, "Chicago"),
    ];

    fn rows() -> Vec<Record> {
        PEOPLE
            .iter()
            .enumerate()
            .map(|(i, (name, age, city))| {
                let mut r = Record::new();
                r.insert("id".into(), CellValue::from(i as i64 + 1));
                r.insert("name".into(), CellValue::from(*name));
                r.insert("age".into(), CellValue::from(*age));
                r.insert("city".into(), CellValue::from(*city));
                r
            })
            .collect()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID").align(Align::Center),
            Column::new("name", "Name"),
            Column::new("age", "Age")
                .align(Align::Right)
                .format(|v| format!("{}y", v))
                .filter_options(vec![
                    FilterOption::new("27", "Age 27"),
                    FilterOption::new("29", "Age 29"),
                ]),
            Column::new("city", "City").filter_options(vec![
                FilterOption::plain("Chicago"),
                FilterOption::plain("Houston"),
                FilterOption::plain("Phoenix"),
            ]),
        ]
    }

    fn engine() -> TableEngine<Record> {
        TableEngine::new(rows(), columns(), 5)
    }

    fn names(engine: &TableEngine<Record>) -> Vec<String> {
        engine
            .visible_rows()
            .iter()
            .map(|r| r.cell("name").to_string())
            .collect()
    }

    #[test]
    fn test_unfiltered_pagination() {
        let mut t = engine();
        assert_eq!(t.filtered_count(), 10);
        assert_eq!(t.page_count(), 2);
        assert_eq!(t.visible_rows().len(), 5);
        assert_eq!(t.range_label(), "1\u{2013}5 of 10");
        assert!(t.has_next_page());

        t.set_page(1);
        assert_eq!(t.range_label(), "6\u{2013}10 of 10");
        assert!(!t.has_next_page());
        assert!(t.has_previous_page());
    }

    #[test]
    fn test_chicago_filter_two_rows_then_empty_page() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("city", "Chicago", true);
        t.apply_filters();

        assert_eq!(t.page(), 0);
        assert_eq!(names(&t), vec!["Tom Green", "Tom Green"]);

        t.set_page(1);
        assert!(t.visible_rows().is_empty());
        assert_eq!(
            t.body(),
            TableBody::Empty {
                colspan: 4,
                message: NO_DATA_MESSAGE
            }
        );
    }

    #[test]
    fn test_toggle_then_clear_leaves_committed_unchanged() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("city", "Houston", true);
        t.apply_filters();
        let before = t.committed_filters().clone();

        t.open_filter_editor();
        t.toggle_filter_value("city", "Houston", false);
        t.toggle_filter_value("city", "Phoenix", true);
        t.toggle_filter_value("age", "27", true);
        assert_eq!(t.committed_filters(), &before);

        t.clear_draft_filters();
        assert_eq!(t.committed_filters(), &before);
        assert!(!t.is_editor_open());
        assert!(t.draft_filters().is_empty());
        assert_eq!(t.filtered_count(), 2);
    }

    #[test]
    fn test_close_without_apply_discards_draft() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("city", "Chicago", true);
        t.apply_filters();
        let before = t.committed_filters().clone();

        t.open_filter_editor();
        t.toggle_filter_value("city", "Chicago", false);
        t.toggle_filter_value("age", "50", true);
        t.close_filter_editor();
        assert!(!t.is_editor_open());
        assert_eq!(t.expanded_category(), None);
        assert_eq!(t.committed_filters(), &before);
        assert_eq!(t.filtered_count(), 2);

        t.open_filter_editor();
        assert_eq!(t.draft_filters(), &before);
        assert!(t.draft_selected("city", "Chicago"));
        assert!(!t.draft_selected("age", "50"));
    }

    #[test]
    fn test_editor_seeds_draft_and_expands_first_category() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("age", "29", true);
        t.apply_filters();

        t.open_filter_editor();
        assert!(t.draft_selected("age", "29"));
        assert_eq!(t.expanded_category(), Some("age"));

        t.expand_category("city", true);
        assert_eq!(t.expanded_category(), Some("city"));
        t.expand_category("city", false);
        assert_eq!(t.expanded_category(), None);
    }

    #[test]
    fn test_no_filter_categories() {
        let mut t = TableEngine::new(rows(), vec![Column::new("name", "Name")], 5);
        assert!(!t.has_filter_categories());
        assert!(engine().has_filter_categories());
        t.open_filter_editor();
        assert!(t.is_editor_open());
        assert_eq!(t.expanded_category(), None);
    }

    #[test]
    fn test_and_across_columns() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("city", "Houston", true);
        t.toggle_filter_value("city", "Chicago", true);
        t.toggle_filter_value("age", "27", true);
        t.apply_filters();
        assert_eq!(names(&t), vec!["Tom Green", "Tom Green"]);
    }

    #[test]
    fn test_filtered_rows_match_predicate() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("city", "Phoenix", true);
        t.toggle_filter_value("city", "Houston", true);
        t.apply_filters();

        let expected: Vec<Record> = rows()
            .into_iter()
            .filter(|r| {
                let city = r.cell("city").to_string();
                city == "Phoenix" || city == "Houston"
            })
            .collect();
        let actual: Vec<Record> = t.filtered_rows().into_iter().cloned().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_page_resets() {
        let mut t = engine();
        t.set_page(1);
        t.set_page_size(8);
        assert_eq!(t.page(), 0);

        t.set_page(1);
        t.open_filter_editor();
        t.apply_filters();
        assert_eq!(t.page(), 0);

        t.set_page(3);
        t.set_rows(rows());
        assert_eq!(t.page(), 0);
    }

    #[test]
    fn test_page_size_options() {
        let t = engine();
        assert_eq!(t.page_size_options(), &DEFAULT_PAGE_SIZE_OPTIONS);

        let t = engine().with_page_size_options(vec![0, 10, 25]);
        assert_eq!(t.page_size_options(), &[10, 25]);

        let t = engine().with_page_size_options(vec![0]);
        assert_eq!(t.page_size_options(), &DEFAULT_PAGE_SIZE_OPTIONS);
    }

    #[test]
    fn test_page_size_zero_is_one() {
        let mut t = engine();
        t.set_page_size(0);
        assert_eq!(t.page_size(), 1);
        assert_eq!(t.page_count(), 10);
    }

    #[test]
    fn test_remove_last_committed_value_drops_column() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("city", "Chicago", true);
        t.toggle_filter_value("age", "27", true);
        t.apply_filters();
        t.set_page(1);

        t.remove_committed_filter_value("city", "Chicago");
        assert!(t.committed_filters().values("city").is_none());
        assert_eq!(t.page(), 0);
        assert_eq!(t.filtered_count(), 2);

        t.clear_all_committed_filters();
        assert!(t.committed_filters().is_empty());
        assert_eq!(t.filtered_count(), 10);
    }

    #[test]
    fn test_chips_follow_selection_order() {
        let mut t = engine();
        t.open_filter_editor();
        t.toggle_filter_value("city", "Phoenix", true);
        t.toggle_filter_value("age", "29", true);
        t.apply_filters();

        let labels: Vec<String> = t.active_chips().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["City: Phoenix", "Age: 29"]);
    }

    #[test]
    fn test_body_formats_numbers_only() {
        let t = engine();
        match t.body() {
            TableBody::Rows(rows) => {
                assert_eq!(rows.len(), 5);
                assert_eq!(rows[0], vec!["1", "John Doe", "30y", "New York"]);
            }
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_range_label() {
        let t: TableEngine<Record> = TableEngine::new(Vec::new(), columns(), 5);
        assert_eq!(t.range_label(), "0\u{2013}0 of 0");
        assert_eq!(t.page_count(), 0);
        assert!(matches!(t.body(), TableBody::Empty { colspan: 4, .. }));
    }
}
