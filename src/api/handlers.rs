use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::api::extract::{ValidJson, ValidQuery};
use crate::models::{NewSession, PomodoroSession, PomodoroStats, Task, TaskInput, TaskStatus};
use crate::stats;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: String) -> Json<Self> {
        Json(Self { message })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    pub task_id: String,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// Tasks

pub async fn create_task(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<TaskInput>,
) -> ApiResult<Task> {
    let task = state.store.create_task(input).await?;
    tracing::debug!(id = %task.id, title = %task.title, "task created");
    Ok(Json(task))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Vec<Task>> {
    Ok(Json(state.store.list_tasks(query.status).await?))
}

pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Task> {
    Ok(Json(state.store.get_task(&id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<TaskInput>,
) -> ApiResult<Task> {
    let task = state.store.update_task(&id, input).await?;
    tracing::debug!(%id, "task updated");
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    state.store.delete_task(&id).await?;
    tracing::debug!(%id, "task deleted");
    Ok(Message::new(format!("ID '{id}' has been deleted")))
}

// Pomodoro

pub async fn start_pomodoro(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<StartQuery>,
) -> ApiResult<Message> {
    let id = query.task_id;
    state.store.set_pomodoro_active(&id, true).await?;
    tracing::debug!(%id, "pomodoro started");
    Ok(Message::new(format!(
        "25 minute Pomodoro timer created for ID '{id}'"
    )))
}

pub async fn stop_pomodoro(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    state.store.set_pomodoro_active(&id, false).await?;
    tracing::debug!(%id, "pomodoro stopped");
    Ok(Message::new(format!(
        "Timer Pomodoro for ID '{id}' has been stopped"
    )))
}

pub async fn pomodoro_stats(State(state): State<AppState>) -> ApiResult<PomodoroStats> {
    let sessions = state.store.list_sessions().await?;
    Ok(Json(stats::aggregate(&sessions)))
}

pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<Vec<PomodoroSession>> {
    Ok(Json(state.store.list_sessions().await?))
}

pub async fn create_session(
    State(state): State<AppState>,
    ValidJson(session): ValidJson<NewSession>,
) -> ApiResult<PomodoroSession> {
    let session = state.store.create_session(session).await?;
    tracing::debug!(id = %session.id, task_id = %session.task_id, "session recorded");
    Ok(Json(session))
}
