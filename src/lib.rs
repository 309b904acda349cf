//! Task list HTTP API with a Pomodoro timer flag and session statistics.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod fixture;
pub mod models;
pub mod stats;
pub mod store;

pub use api::{AppState, router};
pub use db::Db;
pub use error::{StoreError, StoreResult};
pub use store::{MemoryStore, TaskStore};
