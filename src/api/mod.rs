//! HTTP surface: shared state and the axum router.

pub mod error;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(store: impl TaskStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/pomodoro", post(handlers::start_pomodoro))
        .route("/pomodoro/{task_id}/stop", post(handlers::stop_pomodoro))
        .route("/pomodoro/stats", get(handlers::pomodoro_stats))
        .route(
            "/pomodoro/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
