//! Document item store
//!
//! Items are JSON documents in an embedded redb database, keyed by id. A second
//! table maps names to ids and serves as the unique index. Both tables are
//! written in one transaction, so a rejected write leaves neither changed.

use async_trait::async_trait;
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StorageBackend;
use crate::error::{AppError, Result};
use crate::store::{Item, ItemData, ItemStore};

const ITEMS: TableDefinition<&str, &str> = TableDefinition::new("items");
const NAME_INDEX: TableDefinition<&str, &str> = TableDefinition::new("items_name_unique");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");
const NEXT_SEQ: &str = "next_seq";

/// Raised inside a write transaction when the name index already holds the key
#[derive(Debug, Clone, PartialEq, Eq)]
struct UniqueViolated {
    key: String,
}

/// Stored form of an item; `seq` orders documents created in the same instant
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    seq: u64,
    #[serde(flatten)]
    item: Item,
}

/// Item store backed by an embedded redb file
pub struct DocumentItemStore {
    path: PathBuf,
    db: Arc<Database>,
}

impl DocumentItemStore {
    /// Open (creating if needed) the database at `path`
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let db_path = path.clone();
        let db = tokio::task::spawn_blocking(move || -> Result<Database> {
            let db = Database::create(&db_path)?;
            // read transactions fail on tables that were never created
            let txn = db.begin_write()?;
            txn.open_table(ITEMS)?;
            txn.open_table(NAME_INDEX)?;
            txn.open_table(META)?;
            txn.commit()?;
            Ok(db)
        })
        .await
        .map_err(join_error)??;

        let store = Self {
            path,
            db: Arc::new(db),
        };
        info!(
            path = %store.path.display(),
            documents = store.count().await?,
            "Opened document store"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against the database on the blocking pool
    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(join_error)?
    }
}

/// Run `op` in a write transaction: commit on success, abort otherwise
fn write<T>(
    db: &Database,
    op: impl FnOnce(&WriteTransaction) -> Result<std::result::Result<T, UniqueViolated>>,
) -> Result<T> {
    let txn = db.begin_write()?;
    match op(&txn) {
        Ok(Ok(value)) => {
            txn.commit()?;
            Ok(value)
        }
        Ok(Err(violation)) => {
            txn.abort()?;
            Err(duplicate(violation))
        }
        Err(e) => {
            if let Err(abort) = txn.abort() {
                warn!(error = %abort, "Failed to abort document transaction");
            }
            Err(e)
        }
    }
}

fn next_seq(txn: &WriteTransaction) -> Result<u64> {
    let mut meta = txn.open_table(META)?;
    let seq = meta.get(NEXT_SEQ)?.map(|guard| guard.value()).unwrap_or(0);
    meta.insert(NEXT_SEQ, seq + 1)?;
    Ok(seq)
}

fn encode(doc: &Document) -> Result<String> {
    serde_json::to_string(doc)
        .map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))
}

fn decode(raw: &str) -> Result<Document> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Database(format!("Corrupt document: {}", e)))
}

fn duplicate(violation: UniqueViolated) -> AppError {
    warn!(name = %violation.key, "Duplicate item name rejected");
    AppError::DuplicateName(violation.key)
}

fn join_error(err: tokio::task::JoinError) -> AppError {
    AppError::Internal(format!("Document store task failed: {}", err))
}

#[async_trait]
impl ItemStore for DocumentItemStore {
    async fn find_all(&self) -> Result<Vec<Item>> {
        self.blocking(|db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(ITEMS)?;

            let mut docs = Vec::new();
            for entry in table.iter()? {
                let (_, raw) = entry?;
                docs.push(decode(raw.value())?);
            }

            docs.sort_by(|a: &Document, b: &Document| {
                b.item
                    .created_at
                    .cmp(&a.item.created_at)
                    .then(b.seq.cmp(&a.seq))
            });
            Ok(docs.into_iter().map(|doc| doc.item).collect())
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Item> {
        let id = id.to_string();
        self.blocking(move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(ITEMS)?;
            let raw = table.get(id.as_str())?.ok_or_else(AppError::item_not_found)?;
            Ok(decode(raw.value())?.item)
        })
        .await
    }

    async fn create(&self, data: ItemData) -> Result<Item> {
        let data = data.validated()?;
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4().simple().to_string(),
            name: data.name,
            description: data.description,
            quantity: data.quantity,
            created_at: now,
            updated_at: now,
        };

        let item = self
            .blocking(move |db| {
                write(db, move |txn| {
                    let doc = Document {
                        seq: next_seq(txn)?,
                        item,
                    };

                    let mut names = txn.open_table(NAME_INDEX)?;
                    if names.get(doc.item.name.as_str())?.is_some() {
                        return Ok(Err(UniqueViolated {
                            key: doc.item.name.clone(),
                        }));
                    }
                    names.insert(doc.item.name.as_str(), doc.item.id.as_str())?;

                    let mut items = txn.open_table(ITEMS)?;
                    items.insert(doc.item.id.as_str(), encode(&doc)?.as_str())?;
                    Ok(Ok(doc.item))
                })
            })
            .await?;

        debug!(id = %item.id, name = %item.name, "Document inserted");
        Ok(item)
    }

    async fn update(&self, id: &str, data: ItemData) -> Result<Item> {
        let data = data.validated()?;
        let id = id.to_string();

        let item = self
            .blocking(move |db| {
                write(db, move |txn| {
                    let mut items = txn.open_table(ITEMS)?;
                    let current = match items.get(id.as_str())? {
                        Some(raw) => decode(raw.value())?,
                        None => return Err(AppError::item_not_found()),
                    };
                    let previous_name = current.item.name.clone();

                    let doc = Document {
                        seq: current.seq,
                        item: Item {
                            name: data.name,
                            description: data.description,
                            quantity: data.quantity,
                            updated_at: Utc::now(),
                            ..current.item
                        },
                    };

                    let mut names = txn.open_table(NAME_INDEX)?;
                    let owner = names
                        .get(doc.item.name.as_str())?
                        .map(|guard| guard.value().to_string());
                    if owner.is_some_and(|owner| owner != doc.item.id) {
                        return Ok(Err(UniqueViolated {
                            key: doc.item.name.clone(),
                        }));
                    }
                    names.remove(previous_name.as_str())?;
                    names.insert(doc.item.name.as_str(), doc.item.id.as_str())?;

                    items.insert(doc.item.id.as_str(), encode(&doc)?.as_str())?;
                    Ok(Ok(doc.item))
                })
            })
            .await?;

        debug!(id = %item.id, "Document updated");
        Ok(item)
    }

    async fn delete(&self, id: &str) -> Result<u64> {
        let id = id.to_string();
        self.blocking(move |db| {
            write(db, move |txn| {
                let mut items = txn.open_table(ITEMS)?;
                let removed = match items.remove(id.as_str())? {
                    Some(raw) => decode(raw.value())?,
                    None => return Ok(Ok(0)),
                };

                let mut names = txn.open_table(NAME_INDEX)?;
                names.remove(removed.item.name.as_str())?;
                Ok(Ok(1))
            })
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.blocking(|db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(ITEMS)?;

            let mut count = 0;
            for entry in table.iter()? {
                entry?;
                count += 1;
            }
            Ok(count)
        })
        .await
    }

    async fn clear(&self) -> Result<u64> {
        self.blocking(|db| {
            write(db, |txn| {
                let mut items = txn.open_table(ITEMS)?;
                let ids = keys(&items)?;
                for id in &ids {
                    items.remove(id.as_str())?;
                }

                let mut names = txn.open_table(NAME_INDEX)?;
                for name in keys(&names)? {
                    names.remove(name.as_str())?;
                }
                Ok(Ok(ids.len() as u64))
            })
        })
        .await
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Document
    }
}

fn keys(table: &impl ReadableTable<&'static str, &'static str>) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    for entry in table.iter()? {
        let (key, _) = entry?;
        keys.push(key.value().to_string());
    }
    Ok(keys)
}
