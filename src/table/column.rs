//! Column Definitions
//!
//! Display metadata plus the optional enumerated filter values for a column.

use std::fmt;
use std::sync::Arc;

use super::row::CellValue;

/// Formatter applied to numeric cells only
pub type CellFormatter = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// One allowed value of a filterable column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is the value itself
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Table column definition
#[derive(Clone)]
pub struct Column {
    pub id: String,
    pub label: String,
    pub min_width: Option<u32>,
    pub align: Align,
    pub filterable: bool,
    pub filter_options: Vec<FilterOption>,
    format: Option<CellFormatter>,
}

impl Column {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min_width: None,
            align: Align::default(),
            filterable: false,
            filter_options: Vec::new(),
            format: None,
        }
    }

    pub fn min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn format(mut self, formatter: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        self.format = Some(Arc::new(formatter));
        self
    }

    /// Mark the column filterable with the given allowed values
    pub fn filter_options(mut self, options: Vec<FilterOption>) -> Self {
        self.filterable = true;
        self.filter_options = options;
        self
    }

    /// Whether the column shows up as a category in the filter editor
    pub fn is_filter_category(&self) -> bool {
        self.filterable && !self.filter_options.is_empty()
    }

    /// Render a cell for display. The formatter only sees numbers.
    pub fn render(&self, value: &CellValue) -> String {
        match (value, &self.format) {
            (CellValue::Number(n), Some(format)) => format(*n),
            _ => value.to_string(),
        }
    }

    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.filter_options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("min_width", &self.min_width)
            .field("align", &self.align)
            .field("filterable", &self.filterable)
            .field("filter_options", &self.filter_options)
            .field("format", &self.format.is_some())
            .finish()
    }
}

/// `en-US` style number formatting: grouped thousands, at most three
/// fraction digits.
pub fn locale_string(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}
