//! Table document model.
//!
//! The engine never touches a concrete view: it reads headers and cells and
//! moves rows through [`TableHandle`]. [`HtmlTable`] is the in-memory
//! implementation used by the frontend, rendered to markup on demand.

mod html;
mod table;

use shared::models::{SortDirection, ValueType};

pub use table::{CellElement, Document, HeaderCell, HtmlTable, Image, RowElement, RowId};

/// Header attribute naming the column key of a sortable header.
pub const SORT_KEY_ATTR: &str = "data-sort";
/// Header attribute carrying an explicit value-type hint.
pub const SORT_TYPE_ATTR: &str = "data-sort-type";
/// Cell attribute carrying a machine-comparable value.
pub const SORT_VALUE_ATTR: &str = "data-sort-value";

/// Comparison value of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortValue<'a> {
    pub text: &'a str,
    /// Set when the value came from a sortable-value override rather than
    /// from the rendered text.
    pub is_override: bool,
}

impl<'a> SortValue<'a> {
    pub const EMPTY: SortValue<'static> = SortValue { text: "", is_override: false };

    pub fn text(text: &'a str) -> Self {
        Self { text, is_override: false }
    }

    pub fn overridden(text: &'a str) -> Self {
        Self { text, is_override: true }
    }
}

/// A rendered table body the engine can read and reorder.
///
/// Cells of a row line up with the headers, so header `i` describes cell `i`.
pub trait TableHandle {
    fn table_id(&self) -> &str;

    fn header_count(&self) -> usize;
    fn header_label(&self, header: usize) -> Option<&str>;
    /// Column key of a header marked sortable.
    fn header_sort_key(&self, header: usize) -> Option<&str>;
    fn header_type_hint(&self, header: usize) -> Option<ValueType>;
    /// Marks `header` with `direction`, or clears its indicator on `None`.
    fn set_sort_indicator(&mut self, header: usize, direction: Option<SortDirection>);

    fn row_count(&self) -> usize;
    /// Missing cells read as empty.
    fn sort_value(&self, row: usize, column: usize) -> SortValue<'_>;
    /// Display text, falling back to an image's alternate text.
    fn cell_text(&self, row: usize, column: usize) -> &str;
    /// Moves rows so that position `i` holds the row previously at `order[i]`.
    fn reorder_rows(&mut self, order: &[usize]);

    fn is_row_hidden(&self, row: usize) -> bool;
    fn set_row_hidden(&mut self, row: usize, hidden: bool);
}
