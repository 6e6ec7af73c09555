use crate::dto::exam_dto::{
    CreateExamRequest, CreateExamResponse, ExamResultResponse, SubmitAnswerResponse,
};
use crate::error::{Error, Result};
use crate::models::answer::NewAnswer;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
    Form,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use uuid::Uuid;

#[axum::debug_handler]
pub async fn create_exam(
    State(state): State<AppState>,
    Form(req): Form<CreateExamRequest>,
) -> Result<Json<CreateExamResponse>> {
    let exam = state.exam_service.create_exam(req.question_set_id).await?;
    tracing::info!(exam_id = %exam.id, question_set_id = %req.question_set_id, "exam created");
    Ok(Json(CreateExamResponse { exam_id: exam.id }))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SubmitAnswerResponse>> {
    let mut exam_id: Option<Uuid> = None;
    let mut question_id: Option<i32> = None;
    let mut answer_text: Option<String> = None;
    let mut answer_image: Option<String> = None;
    let mut answer_audio: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "exam_id" => {
                let raw = field.text().await?;
                exam_id = Some(raw.trim().parse().map_err(|_| {
                    Error::BadRequest(format!("Invalid exam_id: {}", raw))
                })?);
            }
            "question_id" => {
                let raw = field.text().await?;
                question_id = Some(raw.trim().parse().map_err(|_| {
                    Error::BadRequest(format!("Invalid question_id: {}", raw))
                })?);
            }
            "answer_text" => answer_text = Some(field.text().await?),
            "answer_image" => answer_image = Some(BASE64.encode(field.bytes().await?)),
            "answer_audio" => answer_audio = Some(BASE64.encode(field.bytes().await?)),
            _ => {}
        }
    }

    let exam_id = exam_id.ok_or_else(|| Error::BadRequest("Missing exam_id".to_string()))?;
    let question_id =
        question_id.ok_or_else(|| Error::BadRequest("Missing question_id".to_string()))?;

    state
        .exam_service
        .record_answer(NewAnswer {
            exam_id,
            question_id,
            answer_text,
            answer_image,
            answer_audio,
        })
        .await?;

    Ok(Json(SubmitAnswerResponse {
        message: "Answer submitted successfully".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn submit_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<Uuid>,
) -> Result<Json<ExamResultResponse>> {
    let result = state.exam_service.submit(exam_id).await?;
    tracing::info!(
        exam_id = %exam_id,
        obtained = result.obtained_marks,
        total = result.total_marks,
        "exam submitted"
    );
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn get_results(
    State(state): State<AppState>,
    Path(exam_id): Path<Uuid>,
) -> Result<Json<ExamResultResponse>> {
    let result = state.exam_service.results(exam_id).await?;
    Ok(Json(result))
}
