use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{NewSession, PomodoroSession, Task, TaskInput, TaskStatus, title_key};
use crate::store::TaskStore;

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    sessions: Vec<PomodoroSession>,
}

impl Inner {
    fn position(&self, id: &str) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    fn title_taken(&self, title: &str, except: Option<&str>) -> bool {
        let key = title_key(title);
        self.tasks
            .iter()
            .any(|task| Some(task.id.as_str()) != except && task.title_key() == key)
    }
}

/// Process-local store. Contents are lost when the server stops.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, input: TaskInput) -> StoreResult<Task> {
        let mut inner = self.inner.write().await;
        if inner.title_taken(&input.title, None) {
            return Err(StoreError::duplicate_title(&input.title));
        }

        let task = Task::new(input);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, status: Option<TaskStatus>) -> StoreResult<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .iter()
            .filter(|task| status.is_none_or(|status| task.status == status))
            .cloned()
            .collect())
    }

    async fn get_task(&self, id: &str) -> StoreResult<Task> {
        let inner = self.inner.read().await;
        let index = inner.position(id)?;
        Ok(inner.tasks[index].clone())
    }

    async fn update_task(&self, id: &str, input: TaskInput) -> StoreResult<Task> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;
        if inner.title_taken(&input.title, Some(id)) {
            return Err(StoreError::duplicate_title_on_update(&input.title));
        }

        let task = &mut inner.tasks[index];
        task.apply(input);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;
        inner.tasks.remove(index);
        Ok(())
    }

    async fn set_pomodoro_active(&self, id: &str, active: bool) -> StoreResult<Task> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;
        let task = &mut inner.tasks[index];
        match (task.pomodoro_active, active) {
            (true, true) => Err(StoreError::timer_already_active(id)),
            (false, false) => Err(StoreError::timer_not_active(id)),
            _ => {
                task.pomodoro_active = active;
                Ok(task.clone())
            }
        }
    }

    async fn create_session(&self, session: NewSession) -> StoreResult<PomodoroSession> {
        let mut inner = self.inner.write().await;
        inner.position(&session.task_id)?;

        let session =
            PomodoroSession::new(session.task_id, session.start_time, session.end_time, false);
        inner.sessions.push(session.clone());
        Ok(session)
    }

    async fn record_session(&self, session: PomodoroSession) -> StoreResult<()> {
        self.inner.write().await.sessions.push(session);
        Ok(())
    }

    async fn list_sessions(&self) -> StoreResult<Vec<PomodoroSession>> {
        Ok(self.inner.read().await.sessions.clone())
    }
}
