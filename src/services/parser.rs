use serde::Deserialize;
use std::collections::BTreeMap;

/// Model replied but its output could not be parsed into the expected
/// structure. The caller decides how to degrade; no repair is attempted.
#[derive(Debug, thiserror::Error)]
pub enum MalformedResponse {
    #[error("no JSON payload found in model output")]
    MissingPayload,

    #[error("invalid JSON in model output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// One question as returned by the generation model. `question` is
/// mandatory; MCQ fields are absent for subjective categories.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    #[serde(default)]
    pub options: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Score object as returned by the evaluation model.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreDraft {
    pub score: f64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub suggestions: Option<String>,
}

/// Slices `raw` from the first occurrence of `open` to the last
/// occurrence of `close`, dropping any prose the model wrapped around
/// the payload.
fn payload_slice(raw: &str, open: char, close: char) -> Result<&str, MalformedResponse> {
    let start = raw.find(open).ok_or(MalformedResponse::MissingPayload)?;
    let end = raw.rfind(close).ok_or(MalformedResponse::MissingPayload)?;
    if end < start {
        return Err(MalformedResponse::MissingPayload);
    }
    Ok(&raw[start..=end])
}

/// Extracts and parses the first top-level JSON array from free-form
/// model output.
pub fn parse_question_array(raw: &str) -> Result<Vec<QuestionDraft>, MalformedResponse> {
    let slice = payload_slice(raw, '[', ']')?;
    Ok(serde_json::from_str(slice)?)
}

/// Extracts and parses the first top-level JSON object from free-form
/// model output.
pub fn parse_score_object(raw: &str) -> Result<ScoreDraft, MalformedResponse> {
    let slice = payload_slice(raw, '{', '}')?;
    Ok(serde_json::from_str(slice)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_surrounded_by_prose() {
        let raw = r#"Sure! Here are your questions:
[{"question": "Q1?", "hint": "h"}, {"question": "Q2?"}]
Let me know if you need more."#;
        let drafts = parse_question_array(raw).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].question, "Q1?");
        assert_eq!(drafts[0].hint.as_deref(), Some("h"));
        assert!(drafts[1].hint.is_none());
    }

    #[test]
    fn parses_mcq_draft_fields() {
        let raw = r#"[{"question":"Q?","options":{"A":"x","B":"y","C":"z","D":"w"},"correct_answer":"B","hint":"h"}]"#;
        let drafts = parse_question_array(raw).unwrap();
        let options = drafts[0].options.as_ref().unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(drafts[0].correct_answer.as_deref(), Some("B"));
    }

    #[test]
    fn missing_brackets_is_malformed() {
        let err = parse_question_array("no json here").unwrap_err();
        assert!(matches!(err, MalformedResponse::MissingPayload));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse_question_array("[{question: unquoted}]").unwrap_err();
        assert!(matches!(err, MalformedResponse::InvalidJson(_)));
    }

    #[test]
    fn element_without_question_field_is_malformed() {
        let err = parse_question_array(r#"[{"hint": "h"}]"#).unwrap_err();
        assert!(matches!(err, MalformedResponse::InvalidJson(_)));
    }

    #[test]
    fn parses_score_object_with_prose() {
        let raw = "Evaluation follows.\n{\"score\": 3.5, \"feedback\": \"ok\", \"suggestions\": \"more detail\"}\nDone.";
        let draft = parse_score_object(raw).unwrap();
        assert_eq!(draft.score, 3.5);
        assert_eq!(draft.feedback.as_deref(), Some("ok"));
    }

    #[test]
    fn score_object_without_score_is_malformed() {
        let err = parse_score_object(r#"{"feedback": "ok"}"#).unwrap_err();
        assert!(matches!(err, MalformedResponse::InvalidJson(_)));
    }

    #[test]
    fn mismatched_bracket_order_is_malformed() {
        let err = parse_question_array("] oops [").unwrap_err();
        assert!(matches!(err, MalformedResponse::MissingPayload));
    }
}
