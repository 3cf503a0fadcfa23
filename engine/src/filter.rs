// Client-side free-text filter over the rows of the current page.
use tracing::debug;

use crate::dom::TableHandle;
use crate::sort::compare::fold_text;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowFilter {
    needle: String,
}

impl RowFilter {
    pub fn new(text: &str) -> Self {
        Self { needle: fold_text(text) }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches<T: TableHandle + ?Sized>(&self, table: &T, row: usize) -> bool {
        self.is_empty() || (0..table.header_count()).any(|column| fold_text(table.cell_text(row, column)).contains(&self.needle))
    }

    /// Hides the rows that do not match and returns how many stay visible.
    /// Row order is left untouched.
    pub fn apply<T: TableHandle + ?Sized>(&self, table: &mut T) -> usize {
        let mut visible = 0;
        for row in 0..table.row_count() {
            let keep = self.matches(table, row);
            table.set_row_hidden(row, !keep);
            visible += usize::from(keep);
        }
        debug!(table = %table.table_id(), needle = %self.needle, visible, "Filtered table rows");
        visible
    }
}
