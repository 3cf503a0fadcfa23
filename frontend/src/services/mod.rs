// Data sources for the table pages.
pub mod backend;
pub mod fixture;

use async_trait::async_trait;
use shared::models::{PageResponse, SearchQuery};

use crate::error::FrontendError;

pub use backend::HttpSearchBackend;
pub use fixture::StaticBackend;

/// Server-side search: filtering and pagination happen behind this seam,
/// sorting of the returned page happens locally.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse, FrontendError>;
}
