//! Page controller for one server-paginated, locally sortable table.
//!
//! [`TablePage`] fetches a page through a [`SearchBackend`], renders it,
//! and attaches a fresh [`TableSortEngine`] to the new body, so every new row
//! set starts from the configured default sort.

use shared::models::{ColumnDescriptor, PageResponse, SearchQuery, SortState};
use table_engine::dom::HtmlTable;
use table_engine::export::export_visible_csv;
use table_engine::filter::RowFilter;
use table_engine::{EngineError, TableSortEngine};
use tracing::{info, warn};

use crate::config::TableSettings;
use crate::render;
use crate::search::Debouncer;
use crate::services::SearchBackend;

pub const LOADING_CLASS: &str = "is-loading";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { rows: usize, total: u64 },
    Empty,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    fn of(page: &PageResponse) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages(),
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

pub struct TablePage<B> {
    backend: B,
    settings: TableSettings,
    catalog: Vec<ColumnDescriptor>,
    table: HtmlTable,
    engine: TableSortEngine,
    query: SearchQuery,
    pagination: Option<Pagination>,
    debouncer: Debouncer,
}

impl<B: SearchBackend> TablePage<B> {
    pub fn new(table_id: impl Into<String>, backend: B, settings: TableSettings) -> Self {
        let query = SearchQuery { page_size: settings.page_size, ..SearchQuery::default() };
        Self {
            backend,
            catalog: Vec::new(),
            table: HtmlTable::new(table_id),
            engine: TableSortEngine::inert(settings.sort.clone()),
            query,
            pagination: None,
            debouncer: Debouncer::new(settings.search_debounce()),
            settings,
        }
    }

    /// Labels, type hints and sortability for known column keys.
    pub fn with_columns(mut self, catalog: Vec<ColumnDescriptor>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn table(&self) -> &HtmlTable {
        &self.table
    }

    pub fn engine(&self) -> &TableSortEngine {
        &self.engine
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    /// Handle for keystroke handlers; call [`TablePage::search_text`] once
    /// [`Debouncer::settle`] returns `true`.
    pub fn debouncer(&self) -> Debouncer {
        self.debouncer.clone()
    }

    pub async fn load(&mut self, query: SearchQuery) -> LoadOutcome {
        info!(table = self.table.id(), page = query.page, q = ?query.q, "Loading table page");
        let options = self.settings.sort.clone();

        match self.backend.search(&query).await {
            Ok(page) => {
                let columns = render::columns_for(&page, &self.catalog);
                render::render_page(&mut self.table, &columns, &page);
                self.pagination = Some(Pagination::of(&page));
                self.query = query;

                if page.rows.is_empty() {
                    self.engine = TableSortEngine::inert(options);
                    return LoadOutcome::Empty;
                }
                self.engine = TableSortEngine::attach(Some(&mut self.table), options);
                LoadOutcome::Loaded { rows: page.rows.len(), total: page.total }
            }
            Err(err) => {
                warn!(table = self.table.id(), error = %err, "Table page failed to load");
                let message = err.user_message();
                render::render_message(&mut self.table, &message);
                self.engine = TableSortEngine::inert(options);
                self.pagination = None;
                LoadOutcome::Failed { message }
            }
        }
    }

    pub async fn reload(&mut self) -> LoadOutcome {
        self.load(self.query.clone()).await
    }

    /// Sorts by `column_key`. Large bodies get the loading class for the
    /// configured delay before the reorder.
    pub async fn click_header(&mut self, column_key: &str) -> Option<SortState> {
        if self.engine.is_inert() {
            return None;
        }
        let visible = self.table.visible_rows().count();
        let show_loading = visible > self.settings.loading_indicator_threshold;
        if show_loading {
            self.table.add_class(LOADING_CLASS);
            tokio::time::sleep(self.settings.loading_delay()).await;
        }
        let state = self.engine.sort_by(&mut self.table, column_key);
        if show_loading {
            self.table.remove_class(LOADING_CLASS);
        }
        state
    }

    /// Server-side text search, back on the first page.
    pub async fn search_text(&mut self, text: &str) -> LoadOutcome {
        let query = self.query.clone().with_text(text).with_page(1);
        self.load(query).await
    }

    /// Hides rows of the current page not containing `text`. Returns the
    /// number of data rows left visible. An empty-state or error message
    /// row is never hidden.
    pub fn filter_local(&mut self, text: &str) -> usize {
        if self.engine.is_inert() {
            return 0;
        }
        RowFilter::new(text).apply(&mut self.table)
    }

    pub async fn next_page(&mut self) -> Option<LoadOutcome> {
        let pagination = self.pagination.filter(Pagination::has_next)?;
        let query = self.query.clone().with_page(pagination.page + 1);
        Some(self.load(query).await)
    }

    pub async fn previous_page(&mut self) -> Option<LoadOutcome> {
        let pagination = self.pagination.filter(Pagination::has_previous)?;
        let query = self.query.clone().with_page(pagination.page - 1);
        Some(self.load(query).await)
    }

    pub fn export_csv(&self) -> Result<String, EngineError> {
        export_visible_csv(&self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrontendError;
    use crate::services::StaticBackend;
    use async_trait::async_trait;
    use shared::models::{CellValue, Row, SortDirection};
    use std::time::Duration;
    use table_engine::dom::TableHandle;
    use table_engine::{SortOptions, SortPhase};

    fn chegadas(count: usize) -> StaticBackend {
        let rows = (0..count)
            .map(|i| {
                let mut row = Row::new();
                row.insert("processo".into(), CellValue::Text(format!("IMP-{:03}", i + 1)));
                let day = (i * 7) % 28 + 1;
                row.insert("data_chegada".into(), CellValue::Text(format!("{day:02}/06/2025")));
                row.insert("valor".into(), CellValue::Number((count - i) as f64 * 10.5));
                row
            })
            .collect();
        StaticBackend::new(vec!["processo".into(), "data_chegada".into(), "valor".into()], rows)
    }

    fn settings(page_size: u32) -> TableSettings {
        TableSettings { page_size, ..TableSettings::default() }
    }

    fn column(page: &TablePage<impl SearchBackend>, key: &str) -> Vec<String> {
        page.table().column_texts(key).into_iter().map(str::to_string).collect()
    }

    struct FailingBackend;

    #[async_trait]
    impl SearchBackend for FailingBackend {
        async fn search(&self, _query: &SearchQuery) -> Result<PageResponse, FrontendError> {
            Err(FrontendError::Backend { status: 500, message: "Internal Server Error".into() })
        }
    }

    #[tokio::test]
    async fn test_load_renders_and_attaches() {
        let mut page = TablePage::new("chegadas", chegadas(5), settings(25));
        let outcome = page.reload().await;
        assert_eq!(outcome, LoadOutcome::Loaded { rows: 5, total: 5 });
        assert!(!page.engine().is_inert());
        assert_eq!(page.engine().columns().len(), 3);
        assert_eq!(
            page.pagination(),
            Some(Pagination { page: 1, page_size: 25, total: 5, total_pages: 1 })
        );
    }

    #[tokio::test]
    async fn test_click_header_sorts_current_page() {
        let mut page = TablePage::new("chegadas", chegadas(5), settings(25));
        page.reload().await;

        let state = page.click_header("data_chegada").await.unwrap();
        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(column(&page, "data_chegada"), ["01/06/2025", "01/06/2025", "08/06/2025", "15/06/2025", "22/06/2025"]);
        // stable: equal dates keep their page order
        assert_eq!(column(&page, "processo")[..2], ["IMP-001", "IMP-005"]);

        let state = page.click_header("valor").await.unwrap();
        assert_eq!(state.active_column.as_deref(), Some("valor"));
        assert_eq!(column(&page, "valor"), ["10,50", "21", "31,50", "42", "52,50"]);
    }

    #[tokio::test]
    async fn test_new_page_resets_to_default_sort() {
        let mut page = TablePage::new("chegadas", chegadas(12), settings(5));
        page.reload().await;
        page.click_header("valor").await;
        assert_eq!(
            page.engine().phase(),
            SortPhase::Sorted { column: "valor".into(), direction: SortDirection::Asc }
        );

        assert!(matches!(page.next_page().await, Some(LoadOutcome::Loaded { rows: 5, total: 12 })));
        assert_eq!(page.query().page, 2);
        assert_eq!(page.engine().phase(), SortPhase::Unsorted);
        assert_eq!(column(&page, "valor"), ["73,50", "63", "52,50", "42", "31,50"]);
        assert!(!page.table().header("valor").unwrap().has_class("sort-asc"));
    }

    #[tokio::test]
    async fn test_configured_default_sort_applies_to_each_page() {
        let mut settings = settings(5);
        settings.sort = SortOptions::default().with_default_column("valor", SortDirection::Asc);
        let mut page = TablePage::new("chegadas", chegadas(12), settings);

        page.reload().await;
        assert_eq!(column(&page, "valor"), ["84", "94,50", "105", "115,50", "126"]);
        page.click_header("valor").await;
        assert_eq!(page.engine().state().direction, SortDirection::Desc);

        page.next_page().await;
        assert_eq!(page.engine().state().direction, SortDirection::Asc);
        assert_eq!(column(&page, "valor"), ["31,50", "42", "52,50", "63", "73,50"]);
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let mut page = TablePage::new("chegadas", chegadas(7), settings(5));
        page.reload().await;
        assert_eq!(page.previous_page().await, None);
        assert!(page.next_page().await.is_some());
        assert_eq!(page.next_page().await, None);
        assert_eq!(page.table().row_count(), 2);
        assert!(page.previous_page().await.is_some());
        assert_eq!(page.query().page, 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_inert() {
        let mut page = TablePage::new("chegadas", chegadas(3), settings(25));
        let outcome = page.search_text("inexistente").await;
        assert_eq!(outcome, LoadOutcome::Empty);
        assert!(page.engine().is_inert());
        assert_eq!(page.table().cell_text(0, 0), render::EMPTY_MESSAGE);
        assert_eq!(page.click_header("valor").await, None);
    }

    #[tokio::test]
    async fn test_filter_keeps_message_row_visible() {
        let mut page = TablePage::new("chegadas", FailingBackend, settings(25));
        page.reload().await;
        assert_eq!(page.filter_local("xyz"), 0);
        assert_eq!(page.table().visible_rows().count(), 1);
        assert!(!page.table().is_row_hidden(0));

        let mut empty = TablePage::new("chegadas", chegadas(3), settings(25));
        empty.search_text("inexistente").await;
        assert_eq!(empty.filter_local("abc"), 0);
        assert_eq!(empty.table().cell_text(0, 0), render::EMPTY_MESSAGE);
        assert!(!empty.table().is_row_hidden(0));
    }

    #[tokio::test]
    async fn test_backend_failure_shows_inline_message() {
        let mut page = TablePage::new("chegadas", FailingBackend, settings(25));
        let outcome = page.reload().await;
        let message = "Não foi possível carregar os dados (erro 500).".to_string();
        assert_eq!(outcome, LoadOutcome::Failed { message: message.clone() });
        assert_eq!(page.table().cell_text(0, 0), message);
        assert_eq!(page.pagination(), None);
    }

    #[tokio::test]
    async fn test_search_text_resets_to_first_page() {
        let mut page = TablePage::new("chegadas", chegadas(12), settings(5));
        page.reload().await;
        page.next_page().await;
        let outcome = page.search_text("IMP-01").await;
        assert_eq!(outcome, LoadOutcome::Loaded { rows: 3, total: 3 });
        assert_eq!(page.query().page, 1);
        assert_eq!(page.query().q.as_deref(), Some("IMP-01"));
    }

    #[tokio::test]
    async fn test_filter_local_and_export() {
        let mut page = TablePage::new("chegadas", chegadas(5), settings(25));
        page.reload().await;
        assert_eq!(page.filter_local("imp-00"), 5);
        assert_eq!(page.filter_local("IMP-002"), 1);

        let csv = page.export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["Processo;Data chegada;Valor", "IMP-002;08/06/2025;42"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_large_body_shows_loading_class_during_sort() {
        let mut page = TablePage::new("chegadas", chegadas(30), TableSettings {
            page_size: 30,
            loading_indicator_threshold: 20,
            loading_delay_ms: 50,
            ..TableSettings::default()
        });
        page.reload().await;

        let started = tokio::time::Instant::now();
        page.click_header("processo").await;
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!page.table().has_class(LOADING_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_runs_once() {
        let mut page = TablePage::new("chegadas", chegadas(12), settings(5));
        let debouncer = page.debouncer();

        let early = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.settle().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(debouncer.settle().await);
        assert!(!early.await.unwrap());
        assert_eq!(page.search_text("IMP-00").await, LoadOutcome::Loaded { rows: 5, total: 9 });
    }
}
