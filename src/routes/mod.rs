pub mod exams;
pub mod extract;
pub mod health;
pub mod questions;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/extract-text", post(extract::extract_text))
        .route("/api/generate-questions", post(questions::generate_questions))
        .route("/api/exams", post(exams::create_exam))
        .route("/api/answers", post(exams::submit_answer))
        .route("/api/exams/:exam_id/submit", post(exams::submit_exam))
        .route("/api/exams/:exam_id/results", get(exams::get_results))
        .with_state(state)
}
