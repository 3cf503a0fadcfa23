// HTTP client for the back-office search, menu and session endpoints.
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use serde::de::DeserializeOwned;
use shared::models::{PageResponse, SearchQuery};
use tracing::{debug, info};

use super::SearchBackend;
use crate::cache::menu::{MenuItem, MenuSource, SessionInfo};
use crate::config::{ApiSettings, LocaleSettings};
use crate::error::FrontendError;

pub struct HttpSearchBackend {
    client: reqwest::Client,
    search_url: String,
    menu_url: String,
    session_url: String,
    language: String,
}

impl HttpSearchBackend {
    pub fn new(api: &ApiSettings, locale: &LocaleSettings) -> Result<Self, FrontendError> {
        if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
            return Err(FrontendError::Config(format!("api.base_url must be http or https: {}", api.base_url)));
        }
        let client = reqwest::Client::builder().timeout(api.timeout()).build()?;
        info!(base_url = %api.base_url, "HTTP backend ready");
        Ok(Self {
            client,
            search_url: api.endpoint(&api.search_path),
            menu_url: api.endpoint(&api.menu_path),
            session_url: api.endpoint(&api.session_path),
            language: locale.language.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, FrontendError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, &self.language)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FrontendError::Backend { status: status.as_u16(), message });
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Backend response received");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse, FrontendError> {
        self.get_json(&self.search_url, &query.to_query_pairs()).await
    }
}

#[async_trait]
impl MenuSource for HttpSearchBackend {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, FrontendError> {
        self.get_json(&self.menu_url, &[]).await
    }

    async fn fetch_session(&self) -> Result<SessionInfo, FrontendError> {
        self.get_json(&self.session_url, &[]).await
    }
}
