//! In-memory task registry

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::error::{AppError, Result};

/// A task: a server-assigned id plus whatever fields the client sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Task {
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }
}

/// Registry holding tasks in insertion order
pub struct TaskRegistry {
    tasks: RwLock<Vec<Task>>,
    next_id: AtomicU64,
}

impl TaskRegistry {
    /// Create a new empty task registry
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn list(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    pub fn get(&self, id: u64) -> Option<Task> {
        self.tasks.read().iter().find(|t| t.id == id).cloned()
    }

    /// Store a new task; a client-supplied `id` field is ignored
    pub fn create(&self, mut fields: Map<String, Value>) -> Task {
        fields.remove("id");
        let task = Task {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            fields,
        };

        self.tasks.write().push(task.clone());
        info!(id = task.id, "Task created");
        task
    }

    /// Merge `fields` into an existing task
    pub fn update(&self, id: u64, mut fields: Map<String, Value>) -> Result<Task> {
        fields.remove("id");

        let mut tasks = self.tasks.write();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

        task.fields.extend(fields);
        info!(id = id, "Task updated");
        Ok(task.clone())
    }

    pub fn remove(&self, id: u64) -> Result<()> {
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            return Err(AppError::NotFound("Task".to_string()));
        }

        info!(id = id, "Task removed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
