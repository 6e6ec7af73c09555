use crate::database::ExamStore;
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::exam::{Exam, ExamStatus};
use crate::models::question_set::{NewQuestionSet, QuestionSet};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    question_sets: HashMap<Uuid, QuestionSet>,
    exams: HashMap<Uuid, Exam>,
    answers: Vec<Answer>,
}

/// In-process store used when `DATABASE_URL` is not configured, and by
/// tests as a deterministic substitute for Postgres. All methods hold a
/// single lock, which also gives `complete_exam` its write-once guarantee.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExamStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_question_set(&self, new: NewQuestionSet) -> Result<QuestionSet> {
        let set = QuestionSet {
            id: Uuid::new_v4(),
            title: new.title,
            subject: new.subject,
            difficulty: new.difficulty,
            total_marks: new.total_marks,
            questions: new.questions,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        inner.question_sets.insert(set.id, set.clone());
        Ok(set)
    }

    async fn get_question_set(&self, id: Uuid) -> Result<Option<QuestionSet>> {
        let inner = self.inner.read().await;
        Ok(inner.question_sets.get(&id).cloned())
    }

    async fn create_exam(&self, question_set_id: Uuid) -> Result<Exam> {
        let exam = Exam {
            id: Uuid::new_v4(),
            question_set_id,
            status: ExamStatus::InProgress,
            total_marks: None,
            obtained_marks: None,
            results: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        let mut inner = self.inner.write().await;
        inner.exams.insert(exam.id, exam.clone());
        Ok(exam)
    }

    async fn get_exam(&self, id: Uuid) -> Result<Option<Exam>> {
        let inner = self.inner.read().await;
        Ok(inner.exams.get(&id).cloned())
    }

    async fn insert_answer(&self, new: NewAnswer) -> Result<Answer> {
        let answer = Answer {
            id: Uuid::new_v4(),
            exam_id: new.exam_id,
            question_id: new.question_id,
            answer_text: new.answer_text,
            answer_image: new.answer_image,
            answer_audio: new.answer_audio,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        inner.answers.push(answer.clone());
        Ok(answer)
    }

    async fn answers_for_exam(&self, exam_id: Uuid) -> Result<Vec<Answer>> {
        let inner = self.inner.read().await;
        Ok(inner
            .answers
            .iter()
            .filter(|a| a.exam_id == exam_id)
            .cloned()
            .collect())
    }

    async fn complete_exam(
        &self,
        exam_id: Uuid,
        total_marks: i32,
        obtained_marks: f64,
        results: JsonValue,
    ) -> Result<Exam> {
        let mut inner = self.inner.write().await;
        let exam = inner
            .exams
            .get_mut(&exam_id)
            .ok_or_else(|| Error::NotFound("Exam not found".to_string()))?;

        if exam.status == ExamStatus::Completed {
            return Ok(exam.clone());
        }

        exam.status = ExamStatus::Completed;
        exam.total_marks = Some(total_marks);
        exam.obtained_marks = Some(obtained_marks);
        exam.results = Some(results);
        exam.completed_at = Some(Utc::now());
        Ok(exam.clone())
    }
}
