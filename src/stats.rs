//! Aggregation of recorded Pomodoro sessions.

use crate::models::{PomodoroSession, PomodoroStats};

/// Sums completed sessions per task.
///
/// Sessions with `completed == false` are skipped. Durations are kept as
/// fractional minutes without rounding.
pub fn aggregate<'a, I>(sessions: I) -> PomodoroStats
where
    I: IntoIterator<Item = &'a PomodoroSession>,
{
    sessions
        .into_iter()
        .filter(|session| session.completed)
        .fold(PomodoroStats::default(), |mut stats, session| {
            let minutes = session.minutes();
            let entry = stats.per_task.entry(session.task_id.clone()).or_default();
            entry.completed_sessions += 1;
            entry.total_minutes += minutes;
            stats.total_minutes += minutes;
            stats
        })
}
