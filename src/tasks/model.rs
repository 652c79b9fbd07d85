// SPDX-License-Identifier: MIT
//! The task record and its completion state.

use serde::{Deserialize, Serialize};

/// Completion state of a [`Task`].
///
/// The only legal transition is `NotCompleted` to `Completed`, made through
/// the service's complete operation. Completed tasks cannot be reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "not completed")]
    NotCompleted,
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    /// Wire/database representation. Matches the serde rename values.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotCompleted => "not completed",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not completed" => Ok(TaskStatus::NotCompleted),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(anyhow::anyhow!("unknown task status '{other}'")),
        }
    }
}

/// A described unit of work with a completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier; 0 means "not yet persisted".
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl Task {
    /// A fresh, unpersisted task. The store assigns the ID on create.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::NotCompleted,
        }
    }
}
