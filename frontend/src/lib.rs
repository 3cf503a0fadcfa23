// Back-office table pages: backend search, rendering, local sorting and
// client-side caching of menu and session data.
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod search;
pub mod services;

pub use config::AppConfig;
pub use controller::{LoadOutcome, Pagination, TablePage};
pub use error::FrontendError;
