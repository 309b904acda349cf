use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use crate::error::{StoreError, StoreResult};
use crate::models::{NewSession, PomodoroSession, Task, TaskInput, TaskStatus, title_key};
use crate::store::TaskStore;

const TASK_COLUMNS: &str = "id, title, description, status, pomodoro_active";

/// SQLite-backed store. Title uniqueness is enforced by a unique index on the
/// lowercased title, so concurrent writers cannot both win.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn connect(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Database(e.into()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(path = %path.display(), "sqlite store ready");

        Ok(Db { pool })
    }
}

fn conflict_on_unique(error: sqlx::Error, conflict: impl FnOnce() -> StoreError) -> StoreError {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => conflict(),
        other => other.into(),
    }
}

#[async_trait]
impl TaskStore for Db {
    async fn create_task(&self, input: TaskInput) -> StoreResult<Task> {
        let task = Task::new(input);

        sqlx::query(
            "INSERT INTO tasks (id, title, title_key, description, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(task.title_key())
        .bind(&task.description)
        .bind(task.status)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, || StoreError::duplicate_title(&task.title)))?;

        Ok(task)
    }

    async fn list_tasks(&self, status: Option<TaskStatus>) -> StoreResult<Vec<Task>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE status = ? ORDER BY rowid"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks ORDER BY rowid"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn get_task(&self, id: &str) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn update_task(&self, id: &str, input: TaskInput) -> StoreResult<Task> {
        let key = title_key(&input.title);

        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = ?, title_key = ?, description = ?, status = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(key)
        .bind(&input.description)
        .bind(input.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(e, || StoreError::duplicate_title_on_update(&input.title))
        })?
        .ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::task_not_found(id));
        }

        Ok(())
    }

    async fn set_pomodoro_active(&self, id: &str, active: bool) -> StoreResult<Task> {
        let flipped = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET pomodoro_active = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ? AND pomodoro_active = ?
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(active)
        .bind(id)
        .bind(!active)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(task) = flipped {
            return Ok(task);
        }

        // Nothing matched: either the task is gone or the flag is already set.
        self.get_task(id).await?;
        Err(if active {
            StoreError::timer_already_active(id)
        } else {
            StoreError::timer_not_active(id)
        })
    }

    async fn create_session(&self, session: NewSession) -> StoreResult<PomodoroSession> {
        let session =
            PomodoroSession::new(session.task_id, session.start_time, session.end_time, false);

        let result = sqlx::query(
            "INSERT INTO pomodoro_sessions (id, task_id, start_time, end_time, completed)
             SELECT ?, ?, ?, ?, ?
             WHERE EXISTS (SELECT 1 FROM tasks WHERE id = ?)",
        )
        .bind(&session.id)
        .bind(&session.task_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.completed)
        .bind(&session.task_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::task_not_found(&session.task_id));
        }

        Ok(session)
    }

    async fn record_session(&self, session: PomodoroSession) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO pomodoro_sessions (id, task_id, start_time, end_time, completed)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.task_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.completed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_sessions(&self) -> StoreResult<Vec<PomodoroSession>> {
        let rows = sqlx::query_as::<_, PomodoroSession>(
            "SELECT id, task_id, start_time, end_time, completed
             FROM pomodoro_sessions ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open() -> (TempDir, Db) {
        let dir = tempfile::tempdir().unwrap();
        let db = Db::connect(&dir.path().join("data").join("tasks.db"))
            .await
            .unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let (_dir, db) = open().await;
        let created = db
            .create_task(TaskInput {
                title: "Write report".into(),
                description: Some("quarterly".into()),
                status: TaskStatus::InProgress,
            })
            .await
            .unwrap();

        assert_eq!(db.get_task(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn unique_index_rejects_case_variants() {
        let (_dir, db) = open().await;
        let first = db.create_task(TaskInput::titled("Focus")).await.unwrap();
        let second = db.create_task(TaskInput::titled("Other")).await.unwrap();

        assert!(matches!(
            db.create_task(TaskInput::titled("fOcUs")).await,
            Err(StoreError::Conflict(_))
        ));
        assert!(matches!(
            db.update_task(&second.id, TaskInput::titled("FOCUS")).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(
            db.update_task(&first.id, TaskInput::titled("FOCUS"))
                .await
                .unwrap()
                .title,
            "FOCUS"
        );
    }

    #[tokio::test]
    async fn filter_by_status_and_delete() {
        let (_dir, db) = open().await;
        let todo = db.create_task(TaskInput::titled("todo")).await.unwrap();
        db.create_task(TaskInput {
            status: TaskStatus::Done,
            ..TaskInput::titled("done")
        })
        .await
        .unwrap();

        assert_eq!(db.list_tasks(Some(TaskStatus::Todo)).await.unwrap(), vec![todo.clone()]);
        assert_eq!(db.list_tasks(None).await.unwrap().len(), 2);

        db.delete_task(&todo.id).await.unwrap();
        assert!(matches!(db.get_task(&todo.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(db.delete_task(&todo.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn timer_flag_conflicts_and_missing_task() {
        let (_dir, db) = open().await;
        let task = db.create_task(TaskInput::titled("Focus")).await.unwrap();

        assert!(matches!(
            db.set_pomodoro_active("missing", true).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(db.set_pomodoro_active(&task.id, true).await.unwrap().pomodoro_active);
        assert!(matches!(
            db.set_pomodoro_active(&task.id, true).await,
            Err(StoreError::Conflict(_))
        ));
        db.set_pomodoro_active(&task.id, false).await.unwrap();
        assert!(matches!(
            db.set_pomodoro_active(&task.id, false).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn sessions_survive_task_deletion() {
        let (_dir, db) = open().await;
        let task = db.create_task(TaskInput::titled("Focus")).await.unwrap();
        let session = db
            .create_session(NewSession {
                task_id: task.id.clone(),
                start_time: "2025-01-09T12:00:00".parse().unwrap(),
                end_time: "2025-01-09T12:25:00".parse().unwrap(),
            })
            .await
            .unwrap();

        db.delete_task(&task.id).await.unwrap();
        assert_eq!(db.list_sessions().await.unwrap(), vec![session]);
        assert!(matches!(
            db.create_session(NewSession {
                task_id: task.id,
                start_time: "2025-01-09T13:00:00".parse().unwrap(),
                end_time: "2025-01-09T13:10:00".parse().unwrap(),
            })
            .await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn fixture_is_not_reseeded_after_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        let db = Db::connect(&path).await.unwrap();
        assert!(crate::fixture::seed(&db).await.unwrap());
        db.pool.close().await;

        let reopened = Db::connect(&path).await.unwrap();
        assert!(!crate::fixture::seed(&reopened).await.unwrap());
        assert_eq!(
            reopened.list_sessions().await.unwrap(),
            vec![crate::fixture::sample_session()]
        );
    }
}
