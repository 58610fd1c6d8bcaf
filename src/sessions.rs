//! Session persistence backing the flash messages

use std::time::Duration as StdDuration;
use time::Duration;
use tokio::task::JoinHandle;
use tower_sessions::{session_store::ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::store::sqlite::connect_pool;

/// How often expired session records are purged
pub const DELETION_INTERVAL: StdDuration = StdDuration::from_secs(60);

/// Open the SQLite session store and create its table
pub async fn open_session_store(config: &SessionConfig) -> Result<SqliteStore> {
    let pool = connect_pool(&config.path).await?;
    let store = SqliteStore::new(pool);
    store.migrate().await?;

    info!(path = %config.path, idle_minutes = config.idle_minutes, "Session store opened");
    Ok(store)
}

/// Cookie-backed session layer; sessions expire after `idle_minutes` without a request
pub fn session_layer(store: SqliteStore, config: &SessionConfig) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(config.idle_minutes)))
}

/// Delete expired records every `period` until the task is dropped or fails
pub fn spawn_expired_deletion(store: SqliteStore, period: StdDuration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.continuously_delete_expired(period).await {
            warn!(error = %e, "Expired session deletion stopped");
        }
    })
}
