// SPDX-License-Identifier: MIT
//! Task persistence: the [`TaskStore`] contract plus the SQLite-backed and
//! in-memory implementations.
//!
//! Absence is reported as `Ok(None)`, never as an error, so callers can tell
//! "no such task" apart from a storage fault.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous},
    ConnectOptions as _, SqlitePool,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr as _;
use tokio::sync::Mutex;
use tracing::info;

use super::model::{Task, TaskStatus};
use crate::retry::{retry_fixed, RetryConfig};

/// Statements slower than this are logged at WARN level.
const SLOW_STATEMENT: std::time::Duration = std::time::Duration::from_millis(250);

/// Capability contract shared by every task store.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist `task`, assigning a fresh unique ID when `task.id` is unset (0).
    async fn create(&self, task: &mut Task) -> Result<()>;

    /// The task with the given ID, or `None` if absent.
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>>;

    /// All tasks in ID order, which equals insertion order.
    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Overwrite the stored record matching `task.id` with the given fields.
    /// Callers are expected to have verified existence via [`TaskStore::find_by_id`].
    async fn update(&self, task: &Task) -> Result<()>;

    /// Remove the record with `id`. Deleting an unknown ID is a no-op, so
    /// delete stays idempotent.
    async fn delete(&self, id: i64) -> Result<()>;
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    status: String,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status: TaskStatus::from_str(&self.status)?,
        })
    }
}

/// Durable store backed by a SQLite database in the data directory.
///
/// Concurrency is delegated to SQLite; every store call is a single
/// statement, so no multi-statement transactions are needed.
#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Open (creating if missing) `{data_dir}/taskd.db` and run migrations.
    ///
    /// The initial connection is retried per `retry`; once the attempts are
    /// exhausted the last error propagates and the service does not start.
    pub async fn connect(data_dir: &Path, retry: &RetryConfig) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("taskd.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
                .log_slow_statements(log::LevelFilter::Warn, SLOW_STATEMENT);

        let pool = retry_fixed(retry, || SqlitePool::connect_with(opts.clone()))
            .await
            .context("could not connect to the task database")?;

        Self::migrate(&pool).await?;
        info!(path = %db_path.display(), "task database ready");
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .context("failed to run database migrations")?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create(&self, task: &mut Task) -> Result<()> {
        if task.id == 0 {
            let result =
                sqlx::query("INSERT INTO tasks (title, description, status) VALUES (?, ?, ?)")
                    .bind(&task.title)
                    .bind(&task.description)
                    .bind(task.status.as_str())
                    .execute(&self.pool)
                    .await?;
            task.id = result.last_insert_rowid();
        } else {
            sqlx::query("INSERT INTO tasks (id, title, description, status) VALUES (?, ?, ?, ?)")
                .bind(task.id)
                .bind(&task.title)
                .bind(&task.description)
                .bind(task.status.as_str())
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TaskRow::into_task).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM tasks ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn update(&self, task: &Task) -> Result<()> {
        sqlx::query("UPDATE tasks SET title = ?, description = ?, status = ? WHERE id = ?")
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(task.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

/// In-memory store used by tests.
///
/// A single mutex serializes access. IDs come from a monotonic counter, so
/// BTreeMap key order (what `find_all` walks) matches insertion order.
#[derive(Default)]
pub struct MemoryTaskStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, task: &mut Task) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if task.id == 0 {
            inner.next_id += 1;
            task.id = inner.next_id;
        } else if task.id > inner.next_id {
            inner.next_id = task.id;
        }
        inner.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let inner = self.inner.lock().await;
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        let inner = self.inner.lock().await;
        Ok(inner.tasks.values().cloned().collect())
    }

    async fn update(&self, task: &Task) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.tasks.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_assigns_sequential_ids() {
        let store = MemoryTaskStore::default();
        let mut first = Task::new("one", "first");
        let mut second = Task::new("two", "second");
        store.create(&mut first).await.unwrap();
        store.create(&mut second).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn memory_store_find_all_is_insertion_order() {
        let store = MemoryTaskStore::default();
        for title in ["a", "b", "c"] {
            let mut task = Task::new(title, "body");
            store.create(&mut task).await.unwrap();
        }
        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn memory_store_delete_unknown_id_is_noop() {
        let store = MemoryTaskStore::default();
        store.delete(42).await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_store_update_overwrites_record() {
        let store = MemoryTaskStore::default();
        let mut task = Task::new("old", "old body");
        store.create(&mut task).await.unwrap();

        task.title = "new".to_string();
        store.update(&task).await.unwrap();

        let found = store.find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(found.title, "new");
    }
}
