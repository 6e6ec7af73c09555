use crate::models::question::{Question, QuestionCategory};

/// Bounded prefix of the source document fed into generation prompts,
/// in characters, to respect model context limits.
pub const SOURCE_PREFIX_CHARS: usize = 2000;

fn truncate_source(text: &str) -> String {
    text.chars().take(SOURCE_PREFIX_CHARS).collect()
}

/// Instruction for generating `count` questions of one category from the
/// source text. The model is required to reply with a bare JSON array.
pub fn generation_prompt(source_text: &str, category: QuestionCategory, count: u32) -> String {
    let text = truncate_source(source_text);
    match category {
        QuestionCategory::Mcq => format!(
            r#"Generate {count} multiple choice questions based on the following text.

Text: {text}...

Return ONLY a JSON array with this exact format:
[
    {{
        "question": "Question text here?",
        "options": {{
            "A": "Option A",
            "B": "Option B",
            "C": "Option C",
            "D": "Option D"
        }},
        "correct_answer": "A",
        "hint": "Brief hint"
    }}
]"#
        ),
        QuestionCategory::Subjective(marks) => format!(
            r#"Generate {count} subjective questions worth {marks} marks each based on the following text.

Text: {text}...

Return ONLY a JSON array with this exact format:
[
    {{
        "question": "Question text here?",
        "hint": "Brief hint for answering"
    }}
]"#
        ),
    }
}

/// Instruction for scoring one free-text answer against one question.
/// The model is required to reply with a JSON object holding `score`,
/// `feedback` and `suggestions`, score bounded to the question's marks.
pub fn evaluation_prompt(subject: &str, question: &Question, answer_text: &str) -> String {
    format!(
        r#"Evaluate this answer for the given question. Subject: {subject}.
Give a score out of {marks} marks.
Question: {question}
Answer: {answer}
Provide evaluation in JSON format:
{{
    "score": <number between 0 and {marks}>,
    "feedback": "<detailed feedback>",
    "suggestions": "<suggestions for improvement>"
}}"#,
        marks = question.marks,
        question = question.text,
        answer = answer_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjective_question(marks: i32) -> Question {
        Question {
            id: 1,
            text: "Explain photosynthesis.".into(),
            category: QuestionCategory::Subjective(marks),
            marks,
            options: None,
            correct_answer: None,
            hint: None,
        }
    }

    #[test]
    fn generation_prompt_truncates_long_source() {
        let long_text = "x".repeat(5000);
        let prompt = generation_prompt(&long_text, QuestionCategory::Mcq, 3);
        // 2000-char prefix plus the surrounding instruction text, never 5000.
        assert!(prompt.len() < 3000);
        assert!(prompt.contains("Generate 3 multiple choice questions"));
        assert!(prompt.contains("\"correct_answer\""));
    }

    #[test]
    fn subjective_prompt_names_marks_and_count() {
        let prompt = generation_prompt("short text", QuestionCategory::Subjective(5), 2);
        assert!(prompt.contains("Generate 2 subjective questions worth 5 marks"));
        assert!(!prompt.contains("options"));
    }

    #[test]
    fn evaluation_prompt_bounds_score() {
        let q = subjective_question(10);
        let prompt = evaluation_prompt("Biology", &q, "Plants make food from light.");
        assert!(prompt.contains("score out of 10 marks"));
        assert!(prompt.contains("between 0 and 10"));
        assert!(prompt.contains("Subject: Biology"));
        assert!(prompt.contains("Plants make food from light."));
    }
}
