//! Sample session data recorded by `--seed-fixture`.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::StoreResult;
use crate::models::PomodoroSession;
use crate::store::TaskStore;

pub const FIXTURE_SESSION_ID: &str = "fixture-1";

const fn at(hour: u32, minute: u32) -> NaiveDateTime {
    match NaiveDate::from_ymd_opt(2025, 1, 9) {
        Some(date) => match date.and_hms_opt(hour, minute, 0) {
            Some(timestamp) => timestamp,
            None => panic!("invalid fixture time"),
        },
        None => panic!("invalid fixture date"),
    }
}

const FIXTURE_START: NaiveDateTime = at(12, 0);
const FIXTURE_END: NaiveDateTime = at(12, 25);

/// A completed 25 minute session for task `"1"`.
pub fn sample_session() -> PomodoroSession {
    PomodoroSession {
        id: FIXTURE_SESSION_ID.to_string(),
        task_id: "1".to_string(),
        start_time: FIXTURE_START,
        end_time: FIXTURE_END,
        completed: true,
    }
}

/// Records the sample session unless a previous run already did.
pub async fn seed(store: &dyn TaskStore) -> StoreResult<bool> {
    let sessions = store.list_sessions().await?;
    if sessions.iter().any(|s| s.id == FIXTURE_SESSION_ID) {
        return Ok(false);
    }

    store.record_session(sample_session()).await?;
    Ok(true)
}
