// Table engine library root: the in-memory table model, the per-table sort
// engine, client-side filtering and CSV export.

pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod filter;
pub mod sort;

pub use config::SortOptions;
pub use dom::{HtmlTable, TableHandle};
pub use error::EngineError;
pub use sort::{SortPhase, TableSortEngine};
