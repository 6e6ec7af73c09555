use crate::models::question::Question;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

/// Generation parameters collected from the multipart form, with
/// defaults applied before validation.
#[derive(Debug, Clone, Validate)]
pub struct GenerateQuestionsParams {
    #[validate(range(max = 50))]
    pub num_mcqs: u32,
    #[validate(range(max = 50))]
    pub num_short: u32,
    #[validate(range(max = 50))]
    pub num_medium: u32,
    #[validate(range(max = 50))]
    pub num_long: u32,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 200))]
    pub difficulty: String,
}

impl Default for GenerateQuestionsParams {
    fn default() -> Self {
        Self {
            num_mcqs: 5,
            num_short: 3,
            num_medium: 2,
            num_long: 1,
            subject: "General Knowledge".to_string(),
            difficulty: "Medium (Graduate Level)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQuestionsResponse {
    pub question_set_id: Uuid,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub total_marks: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractTextResponse {
    pub filename: String,
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
}
