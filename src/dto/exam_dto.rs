use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExamRequest {
    pub question_set_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateExamResponse {
    pub exam_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub message: String,
}

/// Per-question evaluation entry in a completed exam's result snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question_id: i32,
    pub is_correct: bool,
    pub marks_obtained: f64,
    pub feedback: String,
}

/// Result payload returned by submit and by the results endpoint once
/// the exam is completed.
#[derive(Debug, Clone, Serialize)]
pub struct ExamResultResponse {
    pub exam_id: Uuid,
    pub total_marks: i32,
    pub obtained_marks: f64,
    pub percentage: f64,
    pub answers: Vec<AnswerResult>,
}
