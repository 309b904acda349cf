//! Storage interface shared by the HTTP handlers.
//!
//! Every check-then-write operation (title uniqueness, timer flag flips,
//! session task lookup) runs atomically inside the backend.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{NewSession, PomodoroSession, Task, TaskInput, TaskStatus};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fails with `Conflict` when another task already has the title, ignoring case.
    async fn create_task(&self, input: TaskInput) -> StoreResult<Task>;

    /// Tasks in insertion order, optionally restricted to one status.
    async fn list_tasks(&self, status: Option<TaskStatus>) -> StoreResult<Vec<Task>>;

    async fn get_task(&self, id: &str) -> StoreResult<Task>;

    /// Replaces title, description and status of an existing task.
    async fn update_task(&self, id: &str, input: TaskInput) -> StoreResult<Task>;

    async fn delete_task(&self, id: &str) -> StoreResult<()>;

    /// Flips the timer flag to `active`, failing with `Conflict` if it is already there.
    async fn set_pomodoro_active(&self, id: &str, active: bool) -> StoreResult<Task>;

    /// Stores a session for an existing task with `completed = false`.
    async fn create_session(&self, session: NewSession) -> StoreResult<PomodoroSession>;

    /// Stores a fully formed session as-is, without checking its task.
    async fn record_session(&self, session: PomodoroSession) -> StoreResult<()>;

    async fn list_sessions(&self) -> StoreResult<Vec<PomodoroSession>>;
}
