use std::collections::{BTreeMap, BTreeSet};

use shared::models::{SortDirection, ValueType};

use super::{SortValue, TableHandle, SORT_KEY_ATTR, SORT_TYPE_ATTR, SORT_VALUE_ATTR};

/// Stable identity of a body row, kept across reorderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderCell {
    pub label: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
}

impl HeaderCell {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Header marked sortable under `key`.
    pub fn sortable(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(label).with_attr(SORT_KEY_ATTR, key)
    }

    pub fn with_type(self, value_type: ValueType) -> Self {
        self.with_attr(SORT_TYPE_ATTR, value_type.as_str())
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

impl Image {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellElement {
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub image: Option<Image>,
}

impl CellElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Icon-only cell.
    pub fn image(image: Image) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn with_sort_value(self, value: impl Into<String>) -> Self {
        self.with_attr(SORT_VALUE_ATTR, value)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Rendered text, or the image's alt (then title) when the text is blank.
    pub fn visible_text(&self) -> &str {
        let text = self.text.trim();
        if !text.is_empty() {
            return text;
        }
        match &self.image {
            Some(img) if !img.alt.trim().is_empty() => img.alt.trim(),
            Some(Image { title: Some(title), .. }) => title.trim(),
            _ => text,
        }
    }

    pub fn sort_value(&self) -> SortValue<'_> {
        match self.attr(SORT_VALUE_ATTR) {
            Some(value) => SortValue::overridden(value.trim()),
            None => SortValue::text(self.visible_text()),
        }
    }
}

// Rows are moved between positions, never cloned.
#[derive(Debug, PartialEq, Eq)]
pub struct RowElement {
    id: RowId,
    pub cells: Vec<CellElement>,
    pub classes: BTreeSet<String>,
    pub hidden: bool,
}

impl RowElement {
    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn cell(&self, column: usize) -> Option<&CellElement> {
        self.cells.get(column)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct HtmlTable {
    id: String,
    pub headers: Vec<HeaderCell>,
    rows: Vec<RowElement>,
    pub classes: BTreeSet<String>,
    next_row_id: usize,
}

impl HtmlTable {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            classes: BTreeSet::new(),
            next_row_id: 0,
        }
    }

    pub fn with_headers(mut self, headers: Vec<HeaderCell>) -> Self {
        self.headers = headers;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn push_row(&mut self, cells: Vec<CellElement>) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        self.rows.push(RowElement {
            id,
            cells,
            classes: BTreeSet::new(),
            hidden: false,
        });
        id
    }

    /// Appends a row holding a single cell spanning every column.
    pub fn push_message_row(&mut self, message: &str) -> RowId {
        let colspan = self.headers.len().max(1).to_string();
        let cell = CellElement::new(message).with_attr("colspan", colspan);
        let id = self.push_row(vec![cell]);
        if let Some(row) = self.rows.last_mut() {
            row.classes.insert("table-message".to_string());
        }
        id
    }

    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[RowElement] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &RowElement> {
        self.rows.iter().filter(|row| !row.hidden)
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(RowElement::id).collect()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.attr(SORT_KEY_ATTR) == Some(key))
    }

    /// Visible text of one column, top to bottom.
    pub fn column_texts(&self, key: &str) -> Vec<&str> {
        match self.column_index(key) {
            Some(index) => self
                .rows
                .iter()
                .map(|row| row.cell(index).map_or("", CellElement::visible_text))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn header(&self, key: &str) -> Option<&HeaderCell> {
        self.column_index(key).map(|index| &self.headers[index])
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl TableHandle for HtmlTable {
    fn table_id(&self) -> &str {
        &self.id
    }

    fn header_count(&self) -> usize {
        self.headers.len()
    }

    fn header_label(&self, header: usize) -> Option<&str> {
        self.headers.get(header).map(|h| h.label.as_str())
    }

    fn header_sort_key(&self, header: usize) -> Option<&str> {
        self.headers.get(header)?.attr(SORT_KEY_ATTR).filter(|key| !key.is_empty())
    }

    fn header_type_hint(&self, header: usize) -> Option<ValueType> {
        self.headers.get(header)?.attr(SORT_TYPE_ATTR).and_then(ValueType::parse)
    }

    fn set_sort_indicator(&mut self, header: usize, direction: Option<SortDirection>) {
        let Some(cell) = self.headers.get_mut(header) else {
            return;
        };
        cell.classes.remove(SortDirection::Asc.css_class());
        cell.classes.remove(SortDirection::Desc.css_class());
        cell.attributes.remove("aria-sort");
        if let Some(direction) = direction {
            cell.classes.insert(direction.css_class().to_string());
            cell.attributes.insert("aria-sort".to_string(), direction.aria().to_string());
        }
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn sort_value(&self, row: usize, column: usize) -> SortValue<'_> {
        self.rows
            .get(row)
            .and_then(|r| r.cell(column))
            .map_or(SortValue::EMPTY, CellElement::sort_value)
    }

    fn cell_text(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.cell(column))
            .map_or("", CellElement::visible_text)
    }

    fn reorder_rows(&mut self, order: &[usize]) {
        let mut slots: Vec<Option<RowElement>> = std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        let mut reordered = Vec::with_capacity(slots.len());
        for &index in order {
            if let Some(row) = slots.get_mut(index).and_then(Option::take) {
                reordered.push(row);
            }
        }
        // Rows the order did not mention keep their relative position at the end.
        reordered.extend(slots.into_iter().flatten());
        self.rows = reordered;
    }

    fn is_row_hidden(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|r| r.hidden)
    }

    fn set_row_hidden(&mut self, row: usize, hidden: bool) {
        if let Some(r) = self.rows.get_mut(row) {
            r.hidden = hidden;
        }
    }
}

/// The tables rendered on one page, looked up by element id.
#[derive(Debug, Default)]
pub struct Document {
    tables: Vec<HtmlTable>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `table`, replacing any table with the same id.
    pub fn insert(&mut self, table: HtmlTable) {
        self.tables.retain(|t| t.id() != table.id());
        self.tables.push(table);
    }

    pub fn table(&self, id: &str) -> Option<&HtmlTable> {
        self.tables.iter().find(|t| t.id() == id)
    }

    pub fn table_mut(&mut self, id: &str) -> Option<&mut HtmlTable> {
        self.tables.iter_mut().find(|t| t.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> HtmlTable {
        let mut table = HtmlTable::new("embarques").with_headers(vec![
            HeaderCell::sortable("Processo", "processo"),
            HeaderCell::sortable("Valor", "valor").with_type(ValueType::Numeric),
            HeaderCell::new("Ações"),
        ]);
        table.push_row(vec![CellElement::new("IMP-001"), CellElement::new("R$ 10,00").with_sort_value("10")]);
        table.push_row(vec![CellElement::new("IMP-002"), CellElement::new("R$ 20,00").with_sort_value("20")]);
        table.push_row(vec![CellElement::new("IMP-003")]);
        table
    }

    #[test]
    fn test_header_lookup() {
        let table = sample_table();
        assert_eq!(table.header_sort_key(0), Some("processo"));
        assert_eq!(table.header_sort_key(2), None);
        assert_eq!(table.header_type_hint(1), Some(ValueType::Numeric));
        assert_eq!(table.column_index("valor"), Some(1));
    }

    #[test]
    fn test_sort_value_prefers_override() {
        let table = sample_table();
        assert_eq!(table.sort_value(0, 1), SortValue::overridden("10"));
        assert_eq!(table.sort_value(0, 0), SortValue::text("IMP-001"));
        // Missing cell
        assert_eq!(table.sort_value(2, 1), SortValue::EMPTY);
        assert_eq!(table.cell_text(9, 0), "");
    }

    #[test]
    fn test_image_cell_uses_alt_text() {
        let cell = CellElement::image(Image::new("/static/icons/ok.svg", " Liberado "));
        assert_eq!(cell.sort_value(), SortValue::text("Liberado"));

        let titled = CellElement::image(Image {
            src: "/static/icons/x.svg".into(),
            alt: String::new(),
            title: Some("Retido".into()),
        });
        assert_eq!(titled.visible_text(), "Retido");
    }

    #[test]
    fn test_reorder_moves_rows_and_keeps_ids() {
        let mut table = sample_table();
        let before = table.row_ids();
        table.reorder_rows(&[2, 0, 1]);
        assert_eq!(table.row_ids(), vec![before[2], before[0], before[1]]);
        assert_eq!(table.column_texts("processo"), vec!["IMP-003", "IMP-001", "IMP-002"]);
    }

    #[test]
    fn test_reorder_with_partial_order_keeps_leftovers() {
        let mut table = sample_table();
        table.reorder_rows(&[1]);
        assert_eq!(table.column_texts("processo"), vec!["IMP-002", "IMP-001", "IMP-003"]);
    }

    #[test]
    fn test_sort_indicator_is_replaced() {
        let mut table = sample_table();
        table.set_sort_indicator(0, Some(SortDirection::Asc));
        table.set_sort_indicator(0, Some(SortDirection::Desc));
        let header = &table.headers[0];
        assert!(header.has_class("sort-desc"));
        assert!(!header.has_class("sort-asc"));
        assert_eq!(header.attr("aria-sort"), Some("descending"));

        table.set_sort_indicator(0, None);
        assert!(table.headers[0].classes.is_empty());
        assert_eq!(table.headers[0].attr("aria-sort"), None);
    }

    #[test]
    fn test_message_row_spans_columns() {
        let mut table = sample_table();
        table.clear_rows();
        table.push_message_row("Nenhum registro encontrado");
        let row = &table.rows()[0];
        assert!(row.classes.contains("table-message"));
        assert_eq!(row.cells[0].attr("colspan"), Some("3"));
    }

    #[test]
    fn test_document_lookup_and_replace() {
        let mut doc = Document::new();
        doc.insert(HtmlTable::new("a"));
        doc.insert(HtmlTable::new("b"));
        doc.insert(HtmlTable::new("a").with_headers(vec![HeaderCell::new("x")]));
        assert_eq!(doc.table("a").map(|t| t.headers.len()), Some(1));
        assert!(doc.table_mut("missing").is_none());
    }
}
