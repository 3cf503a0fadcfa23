// In-memory backend serving a fixed row set. Used by the preview binary
// and by tests; applies the text query and pagination like the server does.
use async_trait::async_trait;
use shared::models::{PageResponse, Row, SearchQuery};
use table_engine::sort::compare::fold_text;

use super::SearchBackend;
use crate::error::FrontendError;

#[derive(Debug, Clone)]
pub struct StaticBackend {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl StaticBackend {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn from_page(page: PageResponse) -> Self {
        Self::new(page.columns, page.rows)
    }

    fn matches(&self, row: &Row, needle: &str) -> bool {
        self.columns
            .iter()
            .filter_map(|key| row.get(key))
            .any(|value| fold_text(&value.display_text()).contains(needle))
    }
}

#[async_trait]
impl SearchBackend for StaticBackend {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse, FrontendError> {
        let needle = query.q.as_deref().map(fold_text).unwrap_or_default();
        let matching: Vec<&Row> = self.rows.iter().filter(|row| self.matches(row, &needle)).collect();

        let page_size = query.page_size.max(1) as usize;
        let start = (query.page.max(1) as usize - 1) * page_size;
        let rows = matching.iter().skip(start).take(page_size).map(|row| (*row).clone()).collect();

        Ok(PageResponse {
            columns: self.columns.clone(),
            rows,
            total: matching.len() as u64,
            page: query.page.max(1),
            page_size: query.page_size,
        })
    }
}
