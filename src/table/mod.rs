//! Filterable Table
//!
//! In-memory filtering and pagination over a row set with enumerated
//! per-column filters, a draft/committed filter editor and a chip summary.

mod column;
mod engine;
mod filter;
mod row;

pub use column::{locale_string, Align, CellFormatter, Column, FilterOption};
pub use engine::{
    FilterChip, TableBody, TableEngine, DEFAULT_PAGE_SIZE_OPTIONS, NO_DATA_MESSAGE,
};
pub use filter::FilterSelection;
pub use row::{CellValue, Record, TableRow};
