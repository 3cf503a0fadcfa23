//! Per-table sort engine.
//!
//! One [`TableSortEngine`] is attached to one rendered table and owns that
//! table's [`SortState`]. Header clicks map to [`TableSortEngine::sort_by`];
//! rows are reordered in place, without a round trip to the backend. On a
//! server-paginated table only the rows of the current page are sorted.

pub mod compare;

use std::time::Instant;

use shared::models::{ColumnDescriptor, SortDirection, SortState, ValueType};
use tracing::{debug, warn};

use crate::config::SortOptions;
use crate::dom::TableHandle;
use crate::error::EngineError;

pub use compare::{compare_values, SortKey};

// Rows sampled per column when inferring its value type.
const TYPE_SAMPLE_ROWS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortPhase {
    Unsorted,
    Sorted { column: String, direction: SortDirection },
}

#[derive(Debug, Clone)]
struct SortableColumn {
    key: String,
    label: String,
    index: usize,
    /// Explicit `data-sort-type` of the header.
    hint: Option<ValueType>,
    inferred: ValueType,
}

#[derive(Debug, Clone)]
pub struct TableSortEngine {
    table_id: Option<String>,
    options: SortOptions,
    columns: Vec<SortableColumn>,
    state: SortState,
}

impl TableSortEngine {
    /// Attaches to `table`. A missing table or one without sortable headers
    /// yields an inert engine and a warning, never an error.
    pub fn attach<T: TableHandle + ?Sized>(table: Option<&mut T>, options: SortOptions) -> Self {
        match Self::try_attach(table, options.clone()) {
            Ok(engine) => engine,
            Err(err) => {
                warn!(error = %err, "Sort engine not attached, table stays unsortable");
                Self::inert(options)
            }
        }
    }

    pub fn try_attach<T: TableHandle + ?Sized>(table: Option<&mut T>, options: SortOptions) -> Result<Self, EngineError> {
        let table = table.ok_or(EngineError::TableMissing)?;
        let columns = discover_columns(table, &options);
        if columns.is_empty() {
            return Err(EngineError::NoSortableHeaders(table.table_id().to_string()));
        }

        let mut engine = TableSortEngine {
            table_id: Some(table.table_id().to_string()),
            state: SortState::new(None, options.default_direction),
            options,
            columns,
        };
        engine.state = engine.default_state();
        engine.apply(table);
        debug!(
            table = %table.table_id(),
            columns = engine.columns.len(),
            active = ?engine.state.active_column,
            "Sort engine attached"
        );
        Ok(engine)
    }

    /// An engine bound to nothing; every call is a no-op.
    pub fn inert(options: SortOptions) -> Self {
        TableSortEngine {
            table_id: None,
            state: SortState::new(None, options.default_direction),
            options,
            columns: Vec::new(),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    pub fn state(&self) -> &SortState {
        &self.state
    }

    pub fn phase(&self) -> SortPhase {
        match &self.state.active_column {
            Some(column) => SortPhase::Sorted {
                column: column.clone(),
                direction: self.state.direction,
            },
            None => SortPhase::Unsorted,
        }
    }

    /// Sortable columns, typed by their header hint or by sampling.
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .map(|c| ColumnDescriptor::new(&c.key, &c.label).with_type(c.hint.unwrap_or(c.inferred)))
            .collect()
    }

    /// Header-click transition: the active column flips direction, any other
    /// column becomes active ascending. Returns the new state, or `None` when
    /// nothing happened.
    pub fn sort_by<T: TableHandle + ?Sized>(&mut self, table: &mut T, column_key: &str) -> Option<SortState> {
        if let Err(err) = self.check_table(table) {
            warn!(error = %err, "Sort request ignored");
            return None;
        }
        if self.column(column_key).is_none() {
            let err = EngineError::UnknownColumn {
                table: table.table_id().to_string(),
                column: column_key.to_string(),
            };
            warn!(error = %err, "Sort request ignored");
            return None;
        }

        self.state = self.state.clicked(column_key);
        self.apply(table);
        Some(self.state.clone())
    }

    /// Click on the header at `header_index`.
    pub fn handle_header_click<T: TableHandle + ?Sized>(&mut self, table: &mut T, header_index: usize) -> Option<SortState> {
        let key = table.header_sort_key(header_index)?.to_string();
        self.sort_by(table, &key)
    }

    /// Sorts again with the current state, e.g. after rows were appended.
    pub fn reapply<T: TableHandle + ?Sized>(&self, table: &mut T) {
        if self.check_table(table).is_ok() {
            self.apply(table);
        }
    }

    /// Back to the configured default state, as after a fresh render.
    pub fn reset<T: TableHandle + ?Sized>(&mut self, table: &mut T) {
        if self.check_table(table).is_err() {
            return;
        }
        self.state = self.default_state();
        self.apply(table);
    }

    fn default_state(&self) -> SortState {
        match self.options.default_column.as_deref() {
            Some(key) if self.column(key).is_some() => {
                SortState::new(Some(key.to_string()), self.options.default_direction)
            }
            Some(key) => {
                warn!(table = ?self.table_id, column = %key, "Default sort column has no sortable header");
                SortState::new(None, self.options.default_direction)
            }
            None => SortState::new(None, self.options.default_direction),
        }
    }

    fn check_table<T: TableHandle + ?Sized>(&self, table: &T) -> Result<(), EngineError> {
        match self.table_id.as_deref() {
            None => Err(EngineError::TableMissing),
            Some(attached) if attached != table.table_id() => Err(EngineError::ForeignTable {
                attached: attached.to_string(),
                received: table.table_id().to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn column(&self, key: &str) -> Option<&SortableColumn> {
        self.columns.iter().find(|c| c.key == key)
    }

    fn apply<T: TableHandle + ?Sized>(&self, table: &mut T) {
        if let Some(column) = self.state.active_column.as_deref().and_then(|key| self.column(key)) {
            sort_rows(table, column, self.state.direction, &self.options);
        }
        self.render_indicators(table);
    }

    fn render_indicators<T: TableHandle + ?Sized>(&self, table: &mut T) {
        let active = self.state.active_column.as_deref();
        for column in &self.columns {
            let direction = (Some(column.key.as_str()) == active).then_some(self.state.direction);
            table.set_sort_indicator(column.index, direction);
        }
    }
}

fn discover_columns<T: TableHandle + ?Sized>(table: &T, options: &SortOptions) -> Vec<SortableColumn> {
    let mut columns: Vec<SortableColumn> = Vec::new();
    for index in 0..table.header_count() {
        let Some(key) = table.header_sort_key(index) else {
            continue;
        };
        if columns.iter().any(|c| c.key == key) {
            warn!(table = %table.table_id(), column = %key, "Duplicate sortable header ignored");
            continue;
        }
        let samples = (0..table.row_count().min(TYPE_SAMPLE_ROWS)).map(|row| table.sort_value(row, index).text);
        columns.push(SortableColumn {
            key: key.to_string(),
            label: table.header_label(index).unwrap_or(key).to_string(),
            index,
            hint: table.header_type_hint(index),
            inferred: ValueType::infer(samples, options.date_format),
        });
    }
    columns
}

fn sort_rows<T: TableHandle + ?Sized>(table: &mut T, column: &SortableColumn, direction: SortDirection, options: &SortOptions) {
    let started = Instant::now();
    let mut keyed: Vec<(usize, SortKey)> = (0..table.row_count())
        .map(|row| {
            let key = SortKey::from_value(table.sort_value(row, column.index), column.hint, options.date_format);
            (row, key)
        })
        .collect();
    // Stable: equal keys keep their current relative order.
    keyed.sort_by(|(_, a), (_, b)| a.compare(b, direction));

    let order: Vec<usize> = keyed.into_iter().map(|(row, _)| row).collect();
    table.reorder_rows(&order);
    debug!(
        table = %table.table_id(),
        column = %column.key,
        direction = ?direction,
        rows = order.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "Sorted table rows"
    );
}
