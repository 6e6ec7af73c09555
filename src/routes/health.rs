use crate::AppState;
use axum::{extract::State, response::Json};
use serde_json::{json, Value as JsonValue};

pub async fn root() -> Json<JsonValue> {
    Json(json!({
        "message": "AI Question Generator & Exam System API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "extract": "/extract-text",
            "generate": "/api/generate-questions",
            "create_exam": "/api/exams",
            "submit_answer": "/api/answers",
            "submit_exam": "/api/exams/{exam_id}/submit",
            "get_exam_results": "/api/exams/{exam_id}/results",
            "health": "/health"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<JsonValue> {
    Json(json!({
        "status": "healthy",
        "providers": {
            "configured": state.providers.names(),
            "available": !state.providers.is_empty()
        },
        "database": {
            "backend": state.store.backend()
        }
    }))
}
