pub mod model;
pub mod service;
pub mod store;

pub use model::{Task, TaskStatus};
pub use service::{TaskError, TaskService};
pub use store::{MemoryTaskStore, SqliteTaskStore, TaskStore};
