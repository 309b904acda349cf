use thiserror::Error;

/// Errors returned by every [`TaskStore`](crate::store::TaskStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced task or session does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate title, or the timer flag is already in the requested state.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound(format!("ID '{id}' doesn't exist"))
    }

    pub fn duplicate_title(title: &str) -> Self {
        Self::Conflict(format!("Task '{title}' already exist"))
    }

    pub fn duplicate_title_on_update(title: &str) -> Self {
        Self::Conflict(format!("The task titled '{title}' already exist"))
    }

    pub fn timer_already_active(id: &str) -> Self {
        Self::Conflict(format!("ID '{id}' already has an active timer"))
    }

    pub fn timer_not_active(id: &str) -> Self {
        Self::Conflict(format!("ID '{id}' there is no active timer"))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
