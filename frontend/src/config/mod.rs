// Application configuration, mirroring assets/config/default.json.
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use table_engine::SortOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub version: String,
    pub api: ApiSettings,
    pub tables: TableSettings,
    pub cache: CacheSettings,
    pub locale: LocaleSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub search_path: String,
    pub menu_path: String,
    pub session_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableSettings {
    pub page_size: u32,
    /// Visible rows above which a header click shows the loading state first.
    pub loading_indicator_threshold: usize,
    pub loading_delay_ms: u64,
    pub search_debounce_ms: u64,
    #[serde(default)]
    pub sort: SortOptions,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub menu_ttl_secs: u64,
    pub session_ttl_secs: u64,
    pub revalidate_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocaleSettings {
    pub language: String,
}

fn default_timeout_secs() -> u64 {
    15
}

impl ApiSettings {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TableSettings {
    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: 25,
            loading_indicator_threshold: 500,
            loading_delay_ms: 50,
            search_debounce_ms: 300,
            sort: SortOptions::default(),
        }
    }
}

impl CacheSettings {
    pub fn menu_ttl(&self) -> Duration {
        Duration::from_secs(self.menu_ttl_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn revalidate_interval(&self) -> Duration {
        Duration::from_secs(self.revalidate_interval_secs)
    }
}

impl AppConfig {
    /// Loads the configuration bundled with the binary.
    pub fn load_default() -> Result<Self> {
        Self::from_json_str(include_str!("../../assets/config/default.json"))
            .context("Bundled default configuration is invalid")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.tables.page_size == 0 {
            anyhow::bail!("tables.page_size must be greater than zero");
        }
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DateFormat, SortDirection};
    use std::io::Write;

    #[test]
    fn test_load_default() {
        let config = AppConfig::load_default().unwrap();
        assert_eq!(config.tables.page_size, 25);
        assert_eq!(config.tables.loading_indicator_threshold, 500);
        assert_eq!(config.tables.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.tables.sort.date_format, DateFormat::Dmy);
        assert_eq!(config.tables.sort.default_column, None);
        assert_eq!(config.cache.menu_ttl(), Duration::from_secs(3600));
        assert_eq!(config.locale.language, "pt-BR");
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = AppConfig::load_default().unwrap();
        let mut api = config.api;
        api.base_url = "https://erp.example.com/".to_string();
        assert_eq!(api.endpoint("/api/menu"), "https://erp.example.com/api/menu");
    }

    #[test]
    fn test_load_from_file() {
        let json = r#"{
            "version": "2.0.0",
            "api": {
                "base_url": "https://erp.example.com",
                "search_path": "/api/exportacao/processos",
                "menu_path": "/api/menu",
                "session_path": "/api/sessao"
            },
            "tables": {
                "page_size": 50,
                "loading_indicator_threshold": 200,
                "loading_delay_ms": 10,
                "search_debounce_ms": 250,
                "sort": { "defaultColumn": "data_embarque", "defaultDirection": "desc" }
            },
            "cache": { "menu_ttl_secs": 60, "session_ttl_secs": 30, "revalidate_interval_secs": 120 },
            "locale": { "language": "pt-BR" }
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.version, "2.0.0");
        assert_eq!(config.api.timeout(), Duration::from_secs(15));
        assert_eq!(config.tables.page_size, 50);
        assert_eq!(config.tables.sort.default_column.as_deref(), Some("data_embarque"));
        assert_eq!(config.tables.sort.default_direction, SortDirection::Desc);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let json = include_str!("../../assets/config/default.json").replace("\"page_size\": 25", "\"page_size\": 0");
        assert!(AppConfig::from_json_str(&json).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load_from_file("/nonexistent/frontend.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
