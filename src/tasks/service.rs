// SPDX-License-Identifier: MIT
//! Business rules between the HTTP layer and the task store.
//!
//! Every operation is a pure request-to-result function: validate input,
//! enforce the status transition rules, and translate store outcomes into
//! the [`TaskError`] taxonomy the HTTP layer maps onto status codes.

use std::sync::Arc;

use thiserror::Error;

use super::model::{Task, TaskStatus};
use super::store::TaskStore;

/// Outcome taxonomy surfaced to the HTTP layer.
///
/// A store fault is never swallowed: everything the store reports comes out
/// of the service as either `NotFound` or `Storage`.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A required field was empty. Maps to 400.
    #[error("title and description are required")]
    MissingField,
    /// No task matches the identifier. Maps to 404.
    #[error("task not found")]
    NotFound,
    /// Completion guard: the task is already in its terminal state. Maps to 400.
    #[error("task is already completed")]
    AlreadyCompleted,
    /// Any underlying persistence fault. Maps to 500.
    #[error("task storage failed")]
    Storage(#[from] anyhow::Error),
}

/// The six task operations over an injected store.
///
/// The store instance is passed in at construction; the service holds no
/// other state and never caches tasks across calls.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.store.find_all().await?)
    }

    /// Tasks still waiting to be completed. Filtering happens here so any
    /// store implementation works unmodified.
    pub async fn list_pending(&self) -> Result<Vec<Task>, TaskError> {
        let mut tasks = self.store.find_all().await?;
        tasks.retain(|t| t.status == TaskStatus::NotCompleted);
        Ok(tasks)
    }

    /// Create a task with the default "not completed" status and return it
    /// with its store-assigned ID. Nothing is persisted on validation failure.
    pub async fn create(&self, title: &str, description: &str) -> Result<Task, TaskError> {
        if title.is_empty() || description.is_empty() {
            return Err(TaskError::MissingField);
        }
        let mut task = Task::new(title, description);
        self.store.create(&mut task).await?;
        Ok(task)
    }

    pub async fn get(&self, id: i64) -> Result<Task, TaskError> {
        self.store.find_by_id(id).await?.ok_or(TaskError::NotFound)
    }

    /// Delete after confirming existence, so a missing ID reports `NotFound`
    /// even though the store-level delete itself is a no-op for unknown IDs.
    pub async fn delete(&self, id: i64) -> Result<(), TaskError> {
        self.get(id).await?;
        self.store.delete(id).await?;
        Ok(())
    }

    /// Replace title and description wholesale. ID and status are preserved;
    /// status changes only through [`TaskService::complete`].
    pub async fn edit(&self, id: i64, title: &str, description: &str) -> Result<Task, TaskError> {
        let mut task = self.get(id).await?;
        if title.is_empty() || description.is_empty() {
            return Err(TaskError::MissingField);
        }
        task.title = title.to_string();
        task.description = description.to_string();
        self.store.update(&task).await?;
        Ok(task)
    }

    /// The one-directional status transition. Completing an already
    /// completed task is rejected and leaves the stored record untouched.
    pub async fn complete(&self, id: i64) -> Result<Task, TaskError> {
        let mut task = self.get(id).await?;
        if task.status == TaskStatus::Completed {
            return Err(TaskError::AlreadyCompleted);
        }
        task.status = TaskStatus::Completed;
        self.store.update(&task).await?;
        Ok(task)
    }
}
