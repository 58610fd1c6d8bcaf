//! Inventory Web
//!
//! Server-rendered inventory management with a pluggable item store, session
//! flash messages and a small token protected task API.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod sessions;
pub mod store;
pub mod tasks;
pub mod telemetry;

pub use error::{AppError, Result};

use std::sync::Arc;

use auth::{TokenService, UserRegistry};
use config::Settings;
use response::Views;
use store::ItemStore;
use tasks::TaskRegistry;
use tower_sessions_sqlx_store::SqliteStore;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn ItemStore>,
    pub sessions: SqliteStore,
    pub views: Arc<Views>,
    pub tasks: Arc<TaskRegistry>,
    pub users: Arc<UserRegistry>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Open the configured item and session stores and build everything the handlers need
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let store = store::open_store(&settings.storage).await?;
        let sessions = sessions::open_session_store(&settings.session).await?;
        Self::with_stores(settings, store, sessions)
    }

    /// Build state around already opened stores
    pub fn with_stores(
        settings: Settings,
        store: Arc<dyn ItemStore>,
        sessions: SqliteStore,
    ) -> Result<Self> {
        let tokens = TokenService::from_config(
            settings.auth.jwt_secret.as_deref(),
            settings.auth.token_ttl_minutes,
        );

        Ok(Self {
            settings: Arc::new(settings),
            store,
            sessions,
            views: Arc::new(Views::new()?),
            tasks: Arc::new(TaskRegistry::new()),
            users: Arc::new(UserRegistry::new()),
            tokens: Arc::new(tokens),
        })
    }
}
