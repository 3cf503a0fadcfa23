// Builds the rendered table from a backend page.
use shared::models::{CellValue, ColumnDescriptor, PageResponse, ValueType};
use table_engine::dom::{CellElement, HeaderCell, HtmlTable};

pub const EMPTY_MESSAGE: &str = "Nenhum registro encontrado.";
pub const NUMERIC_CLASS: &str = "text-end";

/// Descriptors for the page's columns, preferring entries of `catalog`.
pub fn columns_for(page: &PageResponse, catalog: &[ColumnDescriptor]) -> Vec<ColumnDescriptor> {
    page.columns
        .iter()
        .map(|key| {
            catalog
                .iter()
                .find(|column| &column.key == key)
                .cloned()
                .unwrap_or_else(|| ColumnDescriptor::from_key(key))
        })
        .collect()
}

fn is_numeric(column: &ColumnDescriptor, page: &PageResponse) -> bool {
    match column.value_type {
        Some(value_type) => value_type == ValueType::Numeric,
        None => {
            let values: Vec<&CellValue> = page.rows.iter().filter_map(|row| row.get(&column.key)).collect();
            !values.is_empty()
                && values.iter().all(|value| matches!(value, CellValue::Number(_) | CellValue::Null))
                && values.iter().any(|value| !value.is_empty())
        }
    }
}

fn header_for(column: &ColumnDescriptor, numeric: bool) -> HeaderCell {
    let mut header = if column.sortable {
        HeaderCell::sortable(column.label.clone(), column.key.clone())
    } else {
        HeaderCell::new(column.label.clone())
    };
    if let Some(value_type) = column.value_type {
        header = header.with_type(value_type);
    }
    if numeric {
        header = header.with_class(NUMERIC_CLASS);
    }
    header
}

fn cell_for(value: &CellValue, numeric: bool) -> CellElement {
    let mut cell = CellElement::new(value.display_text());
    if let Some(sort_value) = value.sort_override() {
        cell = cell.with_sort_value(sort_value);
    }
    if numeric {
        cell = cell.with_class(NUMERIC_CLASS);
    }
    cell
}

/// Replaces headers and rows of `table` with the contents of `page`.
pub fn render_page(table: &mut HtmlTable, columns: &[ColumnDescriptor], page: &PageResponse) {
    let numeric: Vec<bool> = columns.iter().map(|column| is_numeric(column, page)).collect();
    table.headers = columns
        .iter()
        .zip(&numeric)
        .map(|(column, numeric)| header_for(column, *numeric))
        .collect();

    table.clear_rows();
    if page.rows.is_empty() {
        table.push_message_row(EMPTY_MESSAGE);
        return;
    }
    for row in &page.rows {
        let cells = columns
            .iter()
            .zip(&numeric)
            .map(|(column, numeric)| cell_for(row.get(&column.key).unwrap_or(&CellValue::Null), *numeric))
            .collect();
        table.push_row(cells);
    }
}

/// Clears the body and shows `message` in its place. Headers stay.
pub fn render_message(table: &mut HtmlTable, message: &str) {
    table.clear_rows();
    table.push_message_row(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Row;
    use table_engine::dom::{TableHandle, SORT_VALUE_ATTR};

    fn page() -> PageResponse {
        let mut first = Row::new();
        first.insert("processo".into(), CellValue::from("IMP-002"));
        first.insert("valor".into(), CellValue::Number(1200.5));
        first.insert("data_chegada".into(), CellValue::from("05/06/2025"));
        let mut second = Row::new();
        second.insert("processo".into(), CellValue::from("IMP-001"));
        second.insert("valor".into(), CellValue::Null);
        PageResponse {
            columns: vec!["processo".into(), "valor".into(), "data_chegada".into()],
            rows: vec![first, second],
            total: 2,
            page: 1,
            page_size: 25,
        }
    }

    #[test]
    fn test_render_page() {
        let page = page();
        let catalog = vec![ColumnDescriptor::new("processo", "Processo").unsortable()];
        let columns = columns_for(&page, &catalog);
        let mut table = HtmlTable::new("processos");
        render_page(&mut table, &columns, &page);

        assert_eq!(table.header_sort_key(0), None);
        assert_eq!(table.header_label(0), Some("Processo"));
        assert_eq!(table.header_sort_key(1), Some("valor"));
        assert_eq!(table.header_label(2), Some("Data chegada"));
        assert!(table.headers[1].has_class(NUMERIC_CLASS));
        assert!(!table.headers[2].has_class(NUMERIC_CLASS));

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell_text(0, 1), "1.200,50");
        assert_eq!(table.rows()[0].cell(1).unwrap().attr(SORT_VALUE_ATTR), Some("1200.5"));
        assert_eq!(table.cell_text(1, 1), "");
        assert_eq!(table.cell_text(1, 2), "");
    }

    #[test]
    fn test_empty_page_shows_message() {
        let mut page = page();
        page.rows.clear();
        let mut table = HtmlTable::new("processos");
        render_page(&mut table, &columns_for(&page, &[]), &page);

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell_text(0, 0), EMPTY_MESSAGE);
        assert_eq!(table.header_count(), 3);
    }
}
