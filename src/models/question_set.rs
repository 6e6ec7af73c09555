use crate::models::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered collection of questions generated from one source document.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub difficulty: String,
    pub total_marks: i32,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuestionSet {
    pub title: String,
    pub subject: String,
    pub difficulty: String,
    pub total_marks: i32,
    pub questions: Vec<Question>,
}
