//! Item storage - trait, validation, and the embedded backends

pub mod document;
pub mod seed;
pub mod sqlite;

pub use document::DocumentItemStore;
pub use sqlite::SqliteItemStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{AppError, Result};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and description are required";
pub const QUANTITY_MESSAGE: &str = "Quantity must be a non-negative number";

/// An inventory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of an item, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub description: String,
    pub quantity: i64,
}

impl ItemData {
    pub fn new(name: impl Into<String>, description: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            quantity,
        }
    }

    /// Trim text fields and check them against the item rules
    ///
    /// Both backends run this before touching the engine, so create and
    /// update share one policy.
    pub fn validated(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        let description = self.description.trim().to_string();

        if name.is_empty() || description.is_empty() {
            return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        if self.quantity < 0 {
            return Err(AppError::Validation(QUANTITY_MESSAGE.to_string()));
        }

        Ok(Self {
            name,
            description,
            quantity: self.quantity,
        })
    }
}

/// Quantity as submitted by a client, before it is known to be an integer
///
/// Form posts always carry text, JSON bodies may carry a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawQuantity {
    /// Resolve to a non-negative integer
    pub fn parse(&self) -> Result<i64> {
        let quantity = match self {
            RawQuantity::Integer(n) => Some(*n),
            // 2^63 itself is out of range, so the upper bound is exclusive
            RawQuantity::Float(f)
                if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f) =>
            {
                Some(*f as i64)
            }
            RawQuantity::Float(_) => None,
            RawQuantity::Text(s) => s.trim().parse::<i64>().ok(),
        };

        match quantity {
            Some(n) if n >= 0 => Ok(n),
            _ => Err(AppError::Validation(QUANTITY_MESSAGE.to_string())),
        }
    }
}

/// Persistence contract shared by every backend
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, most recently created first
    async fn find_all(&self) -> Result<Vec<Item>>;

    async fn find_by_id(&self, id: &str) -> Result<Item>;

    async fn create(&self, data: ItemData) -> Result<Item>;

    /// Replace name, description and quantity; `updated_at` is set here
    async fn update(&self, id: &str, data: ItemData) -> Result<Item>;

    /// Number of removed items; zero means the id was unknown
    async fn delete(&self, id: &str) -> Result<u64>;

    async fn count(&self) -> Result<u64>;

    /// Remove every item
    async fn clear(&self) -> Result<u64>;

    fn backend(&self) -> StorageBackend;
}

/// Open the backend selected by configuration
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ItemStore>> {
    let store: Arc<dyn ItemStore> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteItemStore::connect(&config.path).await?),
        StorageBackend::Document => Arc::new(DocumentItemStore::open(&config.path).await?),
    };

    info!(backend = %config.backend, path = %config.path, "Item store opened");

    if config.seed_on_start {
        let report = seed::seed_items(store.as_ref()).await?;
        info!(
            inserted = report.inserted.len(),
            skipped = report.skipped.len(),
            "Seeded sample items"
        );
    }

    Ok(store)
}
