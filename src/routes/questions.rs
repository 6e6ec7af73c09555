use crate::dto::question_dto::{GenerateQuestionsParams, GenerateQuestionsResponse};
use crate::error::{Error, Result};
use crate::models::question::QuestionCategory;
use crate::models::question_set::NewQuestionSet;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use validator::Validate;

#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateQuestionsResponse>> {
    let mut params = GenerateQuestionsParams::default();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("document.txt").to_string();
                let bytes = field.bytes().await?;
                upload = Some((filename, bytes.to_vec()));
            }
            "num_mcqs" => params.num_mcqs = parse_count(&name, &field.text().await?)?,
            "num_short" => params.num_short = parse_count(&name, &field.text().await?)?,
            "num_medium" => params.num_medium = parse_count(&name, &field.text().await?)?,
            "num_long" => params.num_long = parse_count(&name, &field.text().await?)?,
            "subject" => params.subject = field.text().await?,
            "difficulty" => params.difficulty = field.text().await?,
            _ => {}
        }
    }
    params.validate()?;

    let (filename, content) =
        upload.ok_or_else(|| Error::BadRequest("No file uploaded".to_string()))?;
    let text = state.extract_service.extract(&filename, &content).await?;

    let requests = [
        (QuestionCategory::Mcq, params.num_mcqs),
        (QuestionCategory::Subjective(2), params.num_short),
        (QuestionCategory::Subjective(5), params.num_medium),
        (QuestionCategory::Subjective(10), params.num_long),
    ];
    let (questions, total_marks) = state
        .generation_service
        .generate_set(&text, &requests, &state.default_provider)
        .await;

    tracing::info!(
        total = questions.len(),
        total_marks,
        subject = %params.subject,
        "assembled question set"
    );

    let set = state
        .store
        .create_question_set(NewQuestionSet {
            title: format!("{} - {}", params.subject, filename),
            subject: params.subject,
            difficulty: params.difficulty,
            total_marks,
            questions,
        })
        .await?;

    Ok(Json(GenerateQuestionsResponse {
        question_set_id: set.id,
        total_questions: set.questions.len(),
        total_marks: set.total_marks,
        questions: set.questions,
    }))
}

/// Negative counts behave like zero (no batch); non-numeric or
/// out-of-range input is a client error.
fn parse_count(name: &str, raw: &str) -> Result<u32> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::BadRequest(format!("Invalid value for {}: {}", name, raw)))?;
    u32::try_from(value.max(0))
        .map_err(|_| Error::BadRequest(format!("Invalid value for {}: {}", name, raw)))
}
