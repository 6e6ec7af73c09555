use crate::dto::question_dto::ExtractTextResponse;
use crate::error::{Error, Result};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::Json,
};

#[axum::debug_handler]
pub async fn extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractTextResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("document.txt")
                .to_string();
            let bytes = field.bytes().await?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, content) =
        upload.ok_or_else(|| Error::BadRequest("No file uploaded".to_string()))?;
    let text = state.extract_service.extract(&filename, &content).await?;

    Ok(Json(ExtractTextResponse {
        word_count: text.split_whitespace().count(),
        char_count: text.chars().count(),
        filename,
        text,
    }))
}
