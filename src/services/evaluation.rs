use crate::models::question::Question;
use crate::services::model_provider::ProviderRegistry;
use crate::services::parser;
use crate::services::prompt;
use serde::Serialize;
use std::sync::Arc;

const EVALUATION_MAX_TOKENS: u32 = 300;
const EVALUATION_TEMPERATURE: f32 = 0.3;

/// Outcome of scoring one answer against one question.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub score: f64,
    pub max_score: f64,
    pub feedback: String,
    pub suggestions: Option<String>,
    pub correct: bool,
}

impl Evaluation {
    fn incorrect(max_score: f64, feedback: String) -> Self {
        Self {
            score: 0.0,
            max_score,
            feedback,
            suggestions: None,
            correct: false,
        }
    }

    /// Ungraded subjective answers get half marks rather than zero, so
    /// they are not penalized pending manual review.
    fn fallback_credit(question: &Question, feedback: &str) -> Self {
        Self {
            score: (question.marks / 2) as f64,
            max_score: question.marks as f64,
            feedback: feedback.to_string(),
            suggestions: None,
            correct: false,
        }
    }
}

/// Scores answers: exact-match for MCQ, model-graded for subjective
/// categories, with deterministic fallbacks when grading cannot happen.
#[derive(Clone)]
pub struct EvaluationService {
    providers: Arc<ProviderRegistry>,
}

impl EvaluationService {
    pub fn new(providers: Arc<ProviderRegistry>) -> Self {
        Self { providers }
    }

    pub async fn evaluate(
        &self,
        question: &Question,
        answer_text: &str,
        preferred_provider: &str,
        subject: &str,
    ) -> Evaluation {
        if question.category.is_objective() {
            return evaluate_mcq(question, answer_text);
        }
        self.evaluate_subjective(question, answer_text, preferred_provider, subject)
            .await
    }

    async fn evaluate_subjective(
        &self,
        question: &Question,
        answer_text: &str,
        preferred_provider: &str,
        subject: &str,
    ) -> Evaluation {
        let Some(provider) = self.providers.select(preferred_provider) else {
            return Evaluation::fallback_credit(question, "Answer submitted successfully.");
        };

        let prompt = prompt::evaluation_prompt(subject, question, answer_text);
        let raw = match provider
            .generate(&prompt, EVALUATION_MAX_TOKENS, EVALUATION_TEMPERATURE)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(
                    question_id = question.id,
                    provider = provider.name(),
                    error = %err,
                    "evaluation call failed"
                );
                return Evaluation::incorrect(question.marks as f64, "API error.".to_string());
            }
        };

        match parser::parse_score_object(&raw) {
            Ok(draft) => {
                let max_score = question.marks as f64;
                let score = draft.score.clamp(0.0, max_score);
                Evaluation {
                    score,
                    max_score,
                    // Partial credit is never flagged correct.
                    correct: score == max_score,
                    feedback: draft
                        .feedback
                        .unwrap_or_else(|| "No feedback available".to_string()),
                    suggestions: draft.suggestions,
                }
            }
            Err(err) => {
                tracing::warn!(
                    question_id = question.id,
                    error = %err,
                    "evaluation response unparsable, applying fallback credit"
                );
                Evaluation::fallback_credit(
                    question,
                    "Answer submitted successfully. Manual review may be needed.",
                )
            }
        }
    }
}

/// Deterministic objective scoring: a case-sensitive label match earns
/// full marks, anything else earns zero. No model call.
fn evaluate_mcq(question: &Question, answer_text: &str) -> Evaluation {
    let max_score = question.marks as f64;
    match question.correct_answer.as_deref() {
        Some(correct_label) => {
            let correct = answer_text == correct_label;
            Evaluation {
                score: if correct { max_score } else { 0.0 },
                max_score,
                feedback: if correct {
                    "Correct!".to_string()
                } else {
                    format!("Incorrect. The correct answer is {}.", correct_label)
                },
                suggestions: None,
                correct,
            }
        }
        None => Evaluation::incorrect(max_score, "No answer key available.".to_string()),
    }
}
