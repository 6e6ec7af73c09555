use crate::database::ExamStore;
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::exam::{Exam, ExamStatus};
use crate::models::question::Question;
use crate::models::question_set::{NewQuestionSet, QuestionSet};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Postgres-backed store. Questions are stored as a JSONB snapshot on
/// the owning question set row; answers are an append-only table.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(50)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Config(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

#[derive(FromRow)]
struct QuestionSetRow {
    id: Uuid,
    title: String,
    subject: String,
    difficulty: String,
    total_marks: i32,
    questions: JsonValue,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuestionSetRow> for QuestionSet {
    type Error = Error;

    fn try_from(row: QuestionSetRow) -> Result<Self> {
        let questions: Vec<Question> = serde_json::from_value(row.questions)?;
        Ok(QuestionSet {
            id: row.id,
            title: row.title,
            subject: row.subject,
            difficulty: row.difficulty,
            total_marks: row.total_marks,
            questions,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct ExamRow {
    id: Uuid,
    question_set_id: Uuid,
    status: String,
    total_marks: Option<i32>,
    obtained_marks: Option<f64>,
    results: Option<JsonValue>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ExamRow> for Exam {
    type Error = Error;

    fn try_from(row: ExamRow) -> Result<Self> {
        let status: ExamStatus = row.status.parse().map_err(Error::Internal)?;
        Ok(Exam {
            id: row.id,
            question_set_id: row.question_set_id,
            status,
            total_marks: row.total_marks,
            obtained_marks: row.obtained_marks,
            results: row.results,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(FromRow)]
struct AnswerRow {
    id: Uuid,
    exam_id: Uuid,
    question_id: i32,
    answer_text: Option<String>,
    answer_image: Option<String>,
    answer_audio: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Answer {
            id: row.id,
            exam_id: row.exam_id,
            question_id: row.question_id,
            answer_text: row.answer_text,
            answer_image: row.answer_image,
            answer_audio: row.answer_audio,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ExamStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_question_set(&self, new: NewQuestionSet) -> Result<QuestionSet> {
        let questions_json = serde_json::to_value(&new.questions)?;
        let row = sqlx::query_as::<_, QuestionSetRow>(
            r#"
            INSERT INTO question_sets (id, title, subject, difficulty, total_marks, questions)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.subject)
        .bind(&new.difficulty)
        .bind(new.total_marks)
        .bind(questions_json)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn get_question_set(&self, id: Uuid) -> Result<Option<QuestionSet>> {
        let row = sqlx::query_as::<_, QuestionSetRow>(
            r#"SELECT * FROM question_sets WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(QuestionSet::try_from).transpose()
    }

    async fn create_exam(&self, question_set_id: Uuid) -> Result<Exam> {
        let row = sqlx::query_as::<_, ExamRow>(
            r#"
            INSERT INTO exams (id, question_set_id, status)
            VALUES ($1, $2, 'in_progress')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(question_set_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn get_exam(&self, id: Uuid) -> Result<Option<Exam>> {
        let row = sqlx::query_as::<_, ExamRow>(r#"SELECT * FROM exams WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Exam::try_from).transpose()
    }

    async fn insert_answer(&self, new: NewAnswer) -> Result<Answer> {
        let row = sqlx::query_as::<_, AnswerRow>(
            r#"
            INSERT INTO answers (id, exam_id, question_id, answer_text, answer_image, answer_audio)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.exam_id)
        .bind(new.question_id)
        .bind(new.answer_text)
        .bind(new.answer_image)
        .bind(new.answer_audio)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn answers_for_exam(&self, exam_id: Uuid) -> Result<Vec<Answer>> {
        let rows = sqlx::query_as::<_, AnswerRow>(
            r#"SELECT * FROM answers WHERE exam_id = $1 ORDER BY created_at ASC, id ASC"#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Answer::from).collect())
    }

    async fn complete_exam(
        &self,
        exam_id: Uuid,
        total_marks: i32,
        obtained_marks: f64,
        results: JsonValue,
    ) -> Result<Exam> {
        // The status guard makes the transition first-writer-wins; a
        // concurrent submit loses the race and reads back the winner.
        let updated = sqlx::query_as::<_, ExamRow>(
            r#"
            UPDATE exams
            SET status = 'completed', total_marks = $2, obtained_marks = $3,
                results = $4, completed_at = NOW()
            WHERE id = $1 AND status = 'in_progress'
            RETURNING *
            "#,
        )
        .bind(exam_id)
        .bind(total_marks)
        .bind(obtained_marks)
        .bind(&results)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => row.try_into(),
            None => self
                .get_exam(exam_id)
                .await?
                .ok_or_else(|| Error::NotFound("Exam not found".to_string())),
        }
    }
}
