//! Task storage.
//!
//! Callers go through [`TaskStore`] so a persistent backend can replace the
//! in-memory list without touching the HTTP layer.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::task::{Task, TaskFields};

#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("task store lock poisoned")]
    Poisoned,
}

pub trait TaskStore: Send + Sync {
    /// All tasks in insertion order.
    fn list(&self) -> Result<Vec<Task>, StoreError>;

    fn get(&self, id: u64) -> Result<Option<Task>, StoreError>;

    /// Stores a new task under the next id.
    fn create(&self, fields: TaskFields) -> Result<Task, StoreError>;

    /// Overwrites every field of the task. Returns `Ok(None)` if it doesn't exist.
    fn update(&self, id: u64, fields: TaskFields) -> Result<Option<Task>, StoreError>;

    /// Removes all tasks with this id. Returns `Ok(false)` if there were none.
    fn delete(&self, id: u64) -> Result<bool, StoreError>;
}

#[derive(Debug)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
}

/// Process-lifetime store backed by a `Vec`.
#[derive(Debug)]
pub struct InMemoryTaskStore {
    inner: RwLock<Inner>,
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl TaskStore for InMemoryTaskStore {
    fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.read()?.tasks.clone())
    }

    fn get(&self, id: u64) -> Result<Option<Task>, StoreError> {
        Ok(self.read()?.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn create(&self, fields: TaskFields) -> Result<Task, StoreError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        inner.next_id += 1;
        let task = Task::from_fields(id, fields);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    fn update(&self, id: u64, fields: TaskFields) -> Result<Option<Task>, StoreError> {
        let mut inner = self.write()?;
        Ok(inner.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.overwrite(fields);
            task.clone()
        }))
    }

    fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        Ok(inner.tasks.len() != before)
    }
}
