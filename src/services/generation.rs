use crate::models::question::{Question, QuestionCategory};
use crate::services::model_provider::{ProviderError, ProviderRegistry};
use crate::services::parser::{self, MalformedResponse};
use crate::services::prompt;
use futures::future::join_all;
use std::sync::Arc;

const GENERATION_MAX_TOKENS: u32 = 1000;
const GENERATION_TEMPERATURE: f32 = 0.7;

/// Why one category batch yielded nothing. Internal to the service:
/// every variant degrades to an empty batch and a warning.
#[derive(Debug)]
enum BatchFailure {
    NoProvider,
    Provider(ProviderError),
    Malformed(MalformedResponse),
}

/// Orchestrates prompt -> provider -> parser for one question category
/// and assembles numbered question sets across categories.
#[derive(Clone)]
pub struct GenerationService {
    providers: Arc<ProviderRegistry>,
}

impl GenerationService {
    pub fn new(providers: Arc<ProviderRegistry>) -> Self {
        Self { providers }
    }

    /// Generates up to `count` questions of one category. A zero count
    /// returns immediately without a model call; any failure degrades to
    /// an empty batch so other categories are unaffected.
    pub async fn generate_batch(
        &self,
        source_text: &str,
        category: QuestionCategory,
        count: u32,
        preferred_provider: &str,
    ) -> Vec<Question> {
        if count == 0 {
            return Vec::new();
        }

        match self
            .try_generate_batch(source_text, category, count, preferred_provider)
            .await
        {
            Ok(questions) => {
                tracing::info!(
                    category = %category,
                    requested = count,
                    yielded = questions.len(),
                    "generated question batch"
                );
                questions
            }
            Err(failure) => {
                tracing::warn!(
                    category = %category,
                    failure = ?failure,
                    "question batch degraded to empty"
                );
                Vec::new()
            }
        }
    }

    async fn try_generate_batch(
        &self,
        source_text: &str,
        category: QuestionCategory,
        count: u32,
        preferred_provider: &str,
    ) -> Result<Vec<Question>, BatchFailure> {
        let provider = self
            .providers
            .select(preferred_provider)
            .ok_or(BatchFailure::NoProvider)?;

        let prompt = prompt::generation_prompt(source_text, category, count);
        let raw = provider
            .generate(&prompt, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE)
            .await
            .map_err(BatchFailure::Provider)?;

        let drafts = parser::parse_question_array(&raw).map_err(BatchFailure::Malformed)?;

        let questions = drafts
            .into_iter()
            .map(|draft| Question {
                // Renumbered by generate_set across the whole concatenation.
                id: 0,
                text: draft.question,
                category,
                marks: category.marks(),
                options: if category.is_objective() {
                    draft.options
                } else {
                    None
                },
                correct_answer: if category.is_objective() {
                    draft.correct_answer
                } else {
                    None
                },
                hint: draft.hint,
            })
            .collect();

        Ok(questions)
    }

    /// Runs every requested category batch concurrently, concatenates the
    /// results in request order, and assigns ids 1..N across the whole
    /// sequence. Returns the questions and their summed marks.
    pub async fn generate_set(
        &self,
        source_text: &str,
        requests: &[(QuestionCategory, u32)],
        preferred_provider: &str,
    ) -> (Vec<Question>, i32) {
        let batches = join_all(requests.iter().map(|(category, count)| {
            self.generate_batch(source_text, *category, *count, preferred_provider)
        }))
        .await;

        let mut questions: Vec<Question> = batches.into_iter().flatten().collect();
        for (idx, question) in questions.iter_mut().enumerate() {
            question.id = idx as i32 + 1;
        }
        let total_marks = questions.iter().map(|q| q.marks).sum();
        (questions, total_marks)
    }
}
