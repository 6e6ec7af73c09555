use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Exam lifecycle state. Transitions are monotonic:
/// `InProgress` -> `Completed`, exactly once, triggered by submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    InProgress,
    Completed,
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamStatus::InProgress => write!(f, "in_progress"),
            ExamStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ExamStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ExamStatus::InProgress),
            "completed" => Ok(ExamStatus::Completed),
            other => Err(format!("Unknown exam status: {}", other)),
        }
    }
}

/// A session binding a QuestionSet to a test-taker's submissions.
/// `total_marks`, `obtained_marks` and `results` are populated only
/// when the exam reaches `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: Uuid,
    pub question_set_id: Uuid,
    pub status: ExamStatus,
    pub total_marks: Option<i32>,
    pub obtained_marks: Option<f64>,
    pub results: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
