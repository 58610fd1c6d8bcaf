//! SQLite item store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StorageBackend;
use crate::error::{AppError, Result};
use crate::store::{Item, ItemData, ItemStore};

const ITEM_COLUMNS: &str = "id, name, description, quantity, created_at, updated_at";

/// Item store backed by a single SQLite table
///
/// Name uniqueness is the table's `UNIQUE` constraint; this type only
/// translates the constraint failure into [`AppError::DuplicateName`].
#[derive(Debug, Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Open (creating if needed) the database at `path` and apply migrations
    ///
    /// `:memory:` opens a private in-memory database that lives as long as the
    /// store.
    pub async fn connect(path: &str) -> Result<Self> {
        let pool = connect_pool(path).await?;
        let store = Self { pool };
        store.migrate().await?;
        info!(path = %path, "Connected to SQLite item store");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Item store migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Pool for a SQLite file, or for a private database when `path` is `:memory:`
///
/// Shared by the item store and the session store.
pub async fn connect_pool(path: &str) -> Result<SqlitePool> {
    if path == ":memory:" {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // every pooled connection would otherwise get its own empty database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        return Ok(pool);
    }

    let path = path.strip_prefix("sqlite://").unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    Ok(SqlitePoolOptions::new().connect_with(options).await?)
}

/// Map the engine's constraint signal onto the domain error
fn map_write_error(err: sqlx::Error, name: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            warn!(name = %name, "Duplicate item name rejected");
            AppError::DuplicateName(name.to_string())
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn find_all(&self) -> Result<Vec<Item>> {
        // rowid grows with every insert, so it breaks created_at ties in creation order
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn find_by_id(&self, id: &str) -> Result<Item> {
        sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::item_not_found)
    }

    async fn create(&self, data: ItemData) -> Result<Item> {
        let data = data.validated()?;
        let now = Utc::now();

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (id, name, description, quantity, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().simple().to_string())
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.quantity)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &data.name))?;

        debug!(id = %item.id, name = %item.name, "Item inserted");
        Ok(item)
    }

    async fn update(&self, id: &str, data: ItemData) -> Result<Item> {
        let data = data.validated()?;

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items
            SET name = ?, description = ?, quantity = ?, updated_at = ?
            WHERE id = ?
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.quantity)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &data.name))?
        .ok_or_else(AppError::item_not_found)?;

        debug!(id = %item.id, "Item updated");
        Ok(item)
    }

    async fn delete(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM items").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Sqlite
    }
}
