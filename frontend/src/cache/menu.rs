// Navigation menu and session data with stale-while-revalidate refresh.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{Storage, TtlCache};
use crate::config::CacheSettings;
use crate::error::FrontendError;

const MENU_KEY: &str = "items";
const SESSION_KEY: &str = "current";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

/// Session issued by the authentication service. Only read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, FrontendError>;
    async fn fetch_session(&self) -> Result<SessionInfo, FrontendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevalidateReport {
    pub menu_refreshed: bool,
    pub session_refreshed: bool,
}

pub struct MenuCache<S, M> {
    menu: TtlCache<S>,
    session: TtlCache<S>,
    source: M,
}

impl<S: Storage, M: MenuSource> MenuCache<S, M> {
    pub fn new(storage: Arc<S>, source: M, settings: &CacheSettings) -> Self {
        Self {
            menu: TtlCache::new(storage.clone(), "menu", settings.menu_ttl()),
            session: TtlCache::new(storage, "session", settings.session_ttl()),
            source,
        }
    }

    /// Cached menu, fetched from the source when missing or expired.
    pub async fn menu(&self) -> Result<Vec<MenuItem>, FrontendError> {
        if let Some(items) = self.menu.get::<Vec<MenuItem>>(MENU_KEY) {
            debug!(items = items.len(), "Menu served from cache");
            return Ok(items);
        }
        let items = self.source.fetch_menu().await?;
        if let Err(err) = self.menu.put(MENU_KEY, &items) {
            warn!(error = %err, "Menu not cached");
        }
        Ok(items)
    }

    /// Cached session; an entry past its own expiry is fetched again.
    pub async fn session(&self) -> Result<SessionInfo, FrontendError> {
        if let Some(session) = self.session.get::<SessionInfo>(SESSION_KEY) {
            if !session.is_expired_at(Utc::now()) {
                return Ok(session);
            }
            self.session.invalidate(SESSION_KEY);
        }
        let session = self.source.fetch_session().await?;
        if let Err(err) = self.session.put(SESSION_KEY, &session) {
            warn!(error = %err, "Session not cached");
        }
        Ok(session)
    }

    /// Refetches both entries. A failed fetch keeps whatever is cached.
    pub async fn revalidate(&self) -> RevalidateReport {
        let mut report = RevalidateReport::default();

        match self.source.fetch_menu().await {
            Ok(items) => report.menu_refreshed = self.menu.put(MENU_KEY, &items).is_ok(),
            Err(err) => warn!(error = %err, "Menu revalidation failed, keeping cached copy"),
        }
        match self.source.fetch_session().await {
            Ok(session) => report.session_refreshed = self.session.put(SESSION_KEY, &session).is_ok(),
            Err(err) => warn!(error = %err, "Session revalidation failed, keeping cached copy"),
        }

        debug!(?report, "Cache revalidated");
        report
    }
}

impl<S, M> MenuCache<S, M>
where
    S: Storage + 'static,
    M: MenuSource + 'static,
{
    /// Revalidates every `every`, starting one period from now. Abort the
    /// handle to stop.
    pub fn spawn_revalidation(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        info!(interval_secs = every.as_secs(), "Starting cache revalidation");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.revalidate().await;
            }
        })
    }
}
