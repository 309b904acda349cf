use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub pomodoro_active: bool,
}

impl Task {
    pub fn new(input: TaskInput) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            status: input.status,
            pomodoro_active: false,
        }
    }

    /// Full replace of the client-editable fields. The timer flag is kept.
    pub fn apply(&mut self, input: TaskInput) {
        self.title = input.title;
        self.description = input.description;
        self.status = input.status;
    }

    pub fn title_key(&self) -> String {
        title_key(&self.title)
    }
}

/// Comparison key behind the case-insensitive title uniqueness rule.
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

/// Body of `POST /tasks` and `PUT /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PomodoroSession {
    pub id: String,
    pub task_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub completed: bool,
}

impl PomodoroSession {
    pub fn new(
        task_id: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        completed: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            start_time,
            end_time,
            completed,
        }
    }

    pub fn minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 60_000.0
    }
}

/// Body of `POST /pomodoro/sessions`. Sessions recorded this way start out
/// with `completed = false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSession {
    pub task_id: String,
    #[serde(deserialize_with = "timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(deserialize_with = "timestamp")]
    pub end_time: NaiveDateTime,
}

/// Accepts naive ISO-8601 timestamps as-is and RFC 3339 timestamps with an
/// offset, the latter normalized to UTC.
fn timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(aware) => Ok(aware.naive_utc()),
        Err(_) => raw.parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub completed_sessions: u32,
    pub total_minutes: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PomodoroStats {
    pub per_task: BTreeMap<String, TaskStats>,
    pub total_minutes: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 1, 9)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[rstest]
    #[case(TaskStatus::Todo, "\"TODO\"")]
    #[case(TaskStatus::InProgress, "\"IN_PROGRESS\"")]
    #[case(TaskStatus::Done, "\"DONE\"")]
    fn status_uses_uppercase_tokens(#[case] status: TaskStatus, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
        assert_eq!(status.to_string(), json.trim_matches('"'));
    }

    #[test]
    fn input_defaults_status_and_description() {
        let input: TaskInput = serde_json::from_str(r#"{"title":"Write report"}"#).unwrap();
        assert_eq!(input, TaskInput::titled("Write report"));
    }

    #[test]
    fn apply_keeps_timer_flag() {
        let mut task = Task::new(TaskInput::titled("Focus"));
        task.pomodoro_active = true;
        task.apply(TaskInput {
            title: "Refocus".into(),
            description: Some("again".into()),
            status: TaskStatus::Done,
        });

        assert!(task.pomodoro_active);
        assert_eq!(task.title, "Refocus");
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn session_minutes_are_fractional() {
        let mut session = PomodoroSession::new("a", at(12, 0), at(12, 25), true);
        assert_eq!(session.minutes(), 25.0);

        session.end_time = at(12, 0) + chrono::Duration::seconds(90);
        assert_eq!(session.minutes(), 1.5);
    }

    #[rstest]
    #[case("2025-01-09T12:00:00")]
    #[case("2025-01-09T12:00:00Z")]
    #[case("2025-01-09T14:00:00+02:00")]
    fn session_body_accepts_naive_and_offset_timestamps(#[case] start: &str) {
        let body = format!(
            r#"{{"task_id":"a","start_time":"{start}","end_time":"2025-01-09T12:25:00"}}"#
        );
        let session: NewSession = serde_json::from_str(&body).unwrap();
        assert_eq!(session.start_time, at(12, 0));
    }

    #[test]
    fn session_body_rejects_garbage_timestamp() {
        let body = r#"{"task_id":"a","start_time":"noon","end_time":"2025-01-09T12:25:00"}"#;
        assert!(serde_json::from_str::<NewSession>(body).is_err());
    }

    #[test]
    fn title_key_folds_unicode() {
        assert_eq!(title_key("ÉTÉ Plan"), title_key("été plan"));
    }
}
