pub mod memory;
pub mod postgres;

use crate::error::Result;
use crate::models::answer::{Answer, NewAnswer};
use crate::models::exam::Exam;
use crate::models::question_set::{NewQuestionSet, QuestionSet};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Narrow CRUD surface over the persistent store. Implemented by
/// [`postgres::PgStore`] in production and [`memory::MemoryStore`] when no
/// database is configured (and as the deterministic fake in tests).
#[async_trait]
pub trait ExamStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn create_question_set(&self, new: NewQuestionSet) -> Result<QuestionSet>;

    async fn get_question_set(&self, id: Uuid) -> Result<Option<QuestionSet>>;

    async fn create_exam(&self, question_set_id: Uuid) -> Result<Exam>;

    async fn get_exam(&self, id: Uuid) -> Result<Option<Exam>>;

    /// Appends one answer record. The store never overwrites earlier
    /// records for the same question.
    async fn insert_answer(&self, new: NewAnswer) -> Result<Answer>;

    /// All answers for an exam in insertion order.
    async fn answers_for_exam(&self, exam_id: Uuid) -> Result<Vec<Answer>>;

    /// Transitions `in_progress -> completed` and persists the score
    /// snapshot. Write-once: if the exam is already completed the stored
    /// row is returned untouched, so concurrent submits settle on the
    /// first writer's result.
    async fn complete_exam(
        &self,
        exam_id: Uuid,
        total_marks: i32,
        obtained_marks: f64,
        results: JsonValue,
    ) -> Result<Exam>;
}
