use crate::database::ExamStore;
use crate::dto::exam_dto::{AnswerResult, ExamResultResponse};
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::exam::{Exam, ExamStatus};
use crate::models::question::Question;
use crate::services::evaluation::EvaluationService;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Cap on concurrent evaluation calls at submission time, to stay
/// within provider rate limits.
const EVALUATION_CONCURRENCY: usize = 4;

/// State machine governing the exam lifecycle: creation, answer intake,
/// submission with aggregate scoring, and result retrieval.
#[derive(Clone)]
pub struct ExamService {
    store: Arc<dyn ExamStore>,
    evaluation: EvaluationService,
    default_provider: String,
}

impl ExamService {
    pub fn new(
        store: Arc<dyn ExamStore>,
        evaluation: EvaluationService,
        default_provider: String,
    ) -> Self {
        Self {
            store,
            evaluation,
            default_provider,
        }
    }

    pub async fn create_exam(&self, question_set_id: Uuid) -> Result<Exam> {
        self.store
            .get_question_set(question_set_id)
            .await?
            .ok_or_else(|| Error::NotFound("Question set not found".to_string()))?;
        self.store.create_exam(question_set_id).await
    }

    /// Appends one answer record. Writes are rejected once the exam is
    /// completed, keeping answers immutable after submission.
    pub async fn record_answer(&self, new: NewAnswer) -> Result<Answer> {
        let exam = self.require_exam(new.exam_id).await?;
        if exam.status == ExamStatus::Completed {
            return Err(Error::BadRequest(
                "Exam is already completed; answers can no longer be submitted".to_string(),
            ));
        }
        self.store.insert_answer(new).await
    }

    /// Transitions the exam to `completed`, evaluating every answered
    /// question. Submitting an already-completed exam is a no-op that
    /// returns the persisted snapshot without re-evaluation.
    pub async fn submit(&self, exam_id: Uuid) -> Result<ExamResultResponse> {
        let exam = self.require_exam(exam_id).await?;
        if exam.status == ExamStatus::Completed {
            return snapshot_response(&exam);
        }

        let set = self
            .store
            .get_question_set(exam.question_set_id)
            .await?
            .ok_or_else(|| Error::NotFound("Question set not found".to_string()))?;
        let answers = self.store.answers_for_exam(exam_id).await?;

        // Latest record per question wins when duplicates exist.
        let mut latest: HashMap<i32, &Answer> = HashMap::new();
        for answer in &answers {
            latest.insert(answer.question_id, answer);
        }

        let total_marks: i32 = set.questions.iter().map(|q| q.marks).sum();

        let jobs: Vec<_> = set
            .questions
            .iter()
            .filter_map(|question| {
                latest
                    .get(&question.id)
                    .map(|answer| self.evaluate_one(question, answer, &set.subject))
            })
            .collect();
        let evaluated: Vec<AnswerResult> = stream::iter(jobs)
            .buffered(EVALUATION_CONCURRENCY)
            .collect()
            .await;

        let obtained_marks: f64 = evaluated.iter().map(|r| r.marks_obtained).sum();
        let results_json = serde_json::to_value(&evaluated)?;

        let completed = self
            .store
            .complete_exam(exam_id, total_marks, obtained_marks, results_json)
            .await?;
        snapshot_response(&completed)
    }

    /// Returns the persisted result snapshot once the exam is completed.
    pub async fn results(&self, exam_id: Uuid) -> Result<ExamResultResponse> {
        let exam = self.require_exam(exam_id).await?;
        if exam.status != ExamStatus::Completed {
            return Err(Error::NotAvailable("Results not available".to_string()));
        }
        snapshot_response(&exam)
    }

    async fn evaluate_one(
        &self,
        question: &Question,
        answer: &Answer,
        subject: &str,
    ) -> AnswerResult {
        let answer_text = answer.answer_text.as_deref().unwrap_or_default();
        let evaluation = self
            .evaluation
            .evaluate(question, answer_text, &self.default_provider, subject)
            .await;
        AnswerResult {
            question_id: question.id,
            is_correct: evaluation.correct,
            marks_obtained: evaluation.score,
            feedback: evaluation.feedback,
        }
    }

    async fn require_exam(&self, exam_id: Uuid) -> Result<Exam> {
        self.store
            .get_exam(exam_id)
            .await?
            .ok_or_else(|| Error::NotFound("Exam not found".to_string()))
    }
}

fn snapshot_response(exam: &Exam) -> Result<ExamResultResponse> {
    let total_marks = exam.total_marks.unwrap_or(0);
    let obtained_marks = exam.obtained_marks.unwrap_or(0.0);
    let answers: Vec<AnswerResult> = match &exam.results {
        Some(value) => serde_json::from_value(value.clone())?,
        None => Vec::new(),
    };
    Ok(ExamResultResponse {
        exam_id: exam.id,
        total_marks,
        obtained_marks,
        percentage: percentage(obtained_marks, total_marks),
        answers,
    })
}

fn percentage(obtained: f64, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = obtained / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::question::QuestionCategory;
    use crate::models::question_set::NewQuestionSet;
    use crate::services::model_provider::ProviderRegistry;
    use std::collections::BTreeMap;

    fn mcq(id: i32, correct: &str) -> Question {
        Question {
            id,
            text: format!("Question {}?", id),
            category: QuestionCategory::Mcq,
            marks: 1,
            options: Some(BTreeMap::from([
                ("A".to_string(), "x".to_string()),
                ("B".to_string(), "y".to_string()),
                ("C".to_string(), "z".to_string()),
                ("D".to_string(), "w".to_string()),
            ])),
            correct_answer: Some(correct.to_string()),
            hint: None,
        }
    }

    fn subjective(id: i32, marks: i32) -> Question {
        Question {
            id,
            text: format!("Discuss topic {}.", id),
            category: QuestionCategory::Subjective(marks),
            marks,
            options: None,
            correct_answer: None,
            hint: None,
        }
    }

    fn text_answer(exam_id: Uuid, question_id: i32, text: &str) -> NewAnswer {
        NewAnswer {
            exam_id,
            question_id,
            answer_text: Some(text.to_string()),
            answer_image: None,
            answer_audio: None,
        }
    }

    /// No provider configured, so subjective answers deterministically
    /// get the half-marks fallback.
    fn service() -> (ExamService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let registry = Arc::new(ProviderRegistry::new(vec![]));
        let svc = ExamService::new(
            store.clone(),
            EvaluationService::new(registry),
            "Gemini".to_string(),
        );
        (svc, store)
    }

    async fn seed_set(store: &MemoryStore, questions: Vec<Question>) -> Uuid {
        let total_marks = questions.iter().map(|q| q.marks).sum();
        store
            .create_question_set(NewQuestionSet {
                title: "Biology - notes.txt".into(),
                subject: "Biology".into(),
                difficulty: "Medium (Graduate Level)".into(),
                total_marks,
                questions,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn partial_submission_scores_answered_questions_only() {
        let (svc, store) = service();
        let set_id = seed_set(&store, vec![mcq(1, "B"), subjective(2, 5)]).await;
        let exam = svc.create_exam(set_id).await.unwrap();
        svc.record_answer(text_answer(exam.id, 1, "B")).await.unwrap();

        let result = svc.submit(exam.id).await.unwrap();
        assert_eq!(result.total_marks, 6);
        assert_eq!(result.obtained_marks, 1.0);
        assert_eq!(result.percentage, 16.67);
        // Unanswered question yields no result entry.
        assert_eq!(result.answers.len(), 1);
        assert_eq!(result.answers[0].question_id, 1);
        assert!(result.answers[0].is_correct);
    }

    #[tokio::test]
    async fn submit_is_idempotent() {
        let (svc, store) = service();
        let set_id = seed_set(&store, vec![mcq(1, "A")]).await;
        let exam = svc.create_exam(set_id).await.unwrap();
        svc.record_answer(text_answer(exam.id, 1, "A")).await.unwrap();

        let first = svc.submit(exam.id).await.unwrap();
        let second = svc.submit(exam.id).await.unwrap();
        assert_eq!(first.obtained_marks, second.obtained_marks);
        assert_eq!(first.total_marks, second.total_marks);
        assert_eq!(first.answers.len(), second.answers.len());
    }

    #[tokio::test]
    async fn latest_duplicate_answer_wins() {
        let (svc, store) = service();
        let set_id = seed_set(&store, vec![mcq(1, "B")]).await;
        let exam = svc.create_exam(set_id).await.unwrap();
        svc.record_answer(text_answer(exam.id, 1, "A")).await.unwrap();
        svc.record_answer(text_answer(exam.id, 1, "B")).await.unwrap();

        let result = svc.submit(exam.id).await.unwrap();
        assert_eq!(result.obtained_marks, 1.0);
        assert!(result.answers[0].is_correct);
    }

    #[tokio::test]
    async fn answers_are_rejected_after_completion() {
        let (svc, store) = service();
        let set_id = seed_set(&store, vec![mcq(1, "B")]).await;
        let exam = svc.create_exam(set_id).await.unwrap();
        svc.submit(exam.id).await.unwrap();

        let err = svc
            .record_answer(text_answer(exam.id, 1, "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn results_unavailable_until_completed() {
        let (svc, store) = service();
        let set_id = seed_set(&store, vec![mcq(1, "B")]).await;
        let exam = svc.create_exam(set_id).await.unwrap();

        let err = svc.results(exam.id).await.unwrap_err();
        assert!(matches!(err, Error::NotAvailable(_)));

        svc.submit(exam.id).await.unwrap();
        let result = svc.results(exam.id).await.unwrap();
        assert_eq!(result.total_marks, 1);
    }

    #[tokio::test]
    async fn missing_exam_is_not_found() {
        let (svc, _store) = service();
        let err = svc.submit(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn create_exam_requires_existing_question_set() {
        let (svc, _store) = service();
        let err = svc.create_exam(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn obtained_marks_never_exceed_total() {
        let (svc, store) = service();
        let set_id = seed_set(&store, vec![mcq(1, "B"), subjective(2, 5), subjective(3, 10)]).await;
        let exam = svc.create_exam(set_id).await.unwrap();
        svc.record_answer(text_answer(exam.id, 1, "B")).await.unwrap();
        svc.record_answer(text_answer(exam.id, 2, "an essay")).await.unwrap();
        svc.record_answer(text_answer(exam.id, 3, "another essay"))
            .await
            .unwrap();

        let result = svc.submit(exam.id).await.unwrap();
        assert!(result.obtained_marks <= result.total_marks as f64);
        // 1 (mcq) + 2 (floor 5/2) + 5 (floor 10/2)
        assert_eq!(result.obtained_marks, 8.0);
    }
}
