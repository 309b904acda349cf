use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Storage {
    /// Keep everything in process memory
    Memory,
    /// Persist to a SQLite file
    Sqlite,
}

/// Task list API with a Pomodoro timer flag
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "FOCUS_TASKS_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Storage backend
    #[arg(long, env = "FOCUS_TASKS_STORAGE", value_enum, default_value_t = Storage::Memory)]
    pub storage: Storage,

    /// SQLite database file (defaults to the user state directory)
    #[arg(long, env = "FOCUS_TASKS_DATABASE")]
    pub database: Option<PathBuf>,

    /// Record the sample completed session at startup
    #[arg(long, env = "FOCUS_TASKS_SEED_FIXTURE")]
    pub seed_fixture: bool,
}

impl Config {
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    let state_dir = dirs::state_dir()
        .or_else(dirs::config_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
        .ok_or_else(|| anyhow::anyhow!("Could not find state directory"))?;

    Ok(state_dir.join("focus-tasks").join("data").join("tasks.db"))
}
