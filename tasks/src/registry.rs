//! Shared task registry with per-task mutation serialization.
//!
//! Each task is guarded by its own lock so concurrent transition attempts
//! on the same task are serialized: two workers cannot both observe
//! `queued` and both move the task to `running`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{Result, TaskError};
use crate::task::{Task, TaskStatus};

/// Registry of live tasks, keyed by id.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<Uuid, Arc<Mutex<Task>>>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task, returning its id.
    pub async fn insert(&self, task: Task) -> Uuid {
        let id = task.id;
        self.tasks
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(task)));
        id
    }

    /// Snapshot of a registered task.
    pub async fn get(&self, id: Uuid) -> Result<Task> {
        let handle = self.handle(id).await?;
        let task = handle.lock().await;
        Ok(task.clone())
    }

    /// Attempt a status transition under the task's lock.
    ///
    /// Returns the status after the attempt. Illegal transitions propagate
    /// [`TaskError::IllegalTransition`] and leave the task unchanged.
    pub async fn transition(&self, id: Uuid, to: TaskStatus) -> Result<TaskStatus> {
        let handle = self.handle(id).await?;
        let mut task = handle.lock().await;
        task.transition(to)?;
        Ok(task.status)
    }

    /// Transition a task to `failed`, recording the failure message.
    pub async fn fail(&self, id: Uuid, message: impl Into<String>) -> Result<()> {
        let handle = self.handle(id).await?;
        let mut task = handle.lock().await;
        task.fail(message)
    }

    /// Remove a terminal task from the registry, returning it.
    pub async fn archive(&self, id: Uuid) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        let handle = tasks.get(&id).ok_or(TaskError::NotFound(id))?;
        {
            let task = handle.lock().await;
            if !task.is_terminal() {
                return Err(TaskError::NotTerminal(id));
            }
        }
        let handle = tasks.remove(&id).ok_or(TaskError::NotFound(id))?;
        let task = handle.lock().await;
        Ok(task.clone())
    }

    /// Snapshots of every registered task, in no particular order.
    pub async fn tasks(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut snapshots = Vec::with_capacity(tasks.len());
        for handle in tasks.values() {
            snapshots.push(handle.lock().await.clone());
        }
        snapshots
    }

    /// Number of registered tasks.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    async fn handle(&self, id: Uuid) -> Result<Arc<Mutex<Task>>> {
        self.tasks
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TaskError::NotFound(id))
    }
}
