use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One submitted answer record. The store is append-only: a question may
/// accumulate several records while the exam is in progress, and the
/// newest one wins at evaluation time. Image/audio payloads are stored
/// base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub question_id: i32,
    pub answer_text: Option<String>,
    pub answer_image: Option<String>,
    pub answer_audio: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub exam_id: Uuid,
    pub question_id: i32,
    pub answer_text: Option<String>,
    pub answer_image: Option<String>,
    pub answer_audio: Option<String>,
}
