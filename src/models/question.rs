use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Question kind and weight tag. `Mcq` is the only objective category;
/// subjective tiers carry their mark value in the label (`"2_mark"`,
/// `"5_mark"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionCategory {
    Mcq,
    Subjective(i32),
}

impl QuestionCategory {
    pub fn marks(&self) -> i32 {
        match self {
            QuestionCategory::Mcq => 1,
            QuestionCategory::Subjective(n) => *n,
        }
    }

    pub fn is_objective(&self) -> bool {
        matches!(self, QuestionCategory::Mcq)
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionCategory::Mcq => write!(f, "mcq"),
            QuestionCategory::Subjective(n) => write!(f, "{}_mark", n),
        }
    }
}

impl FromStr for QuestionCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "mcq" {
            return Ok(QuestionCategory::Mcq);
        }
        if let Some(prefix) = s.strip_suffix("_mark") {
            if let Ok(n) = prefix.parse::<i32>() {
                if n >= 1 {
                    return Ok(QuestionCategory::Subjective(n));
                }
            }
        }
        Err(format!("Unknown question category: {}", s))
    }
}

impl Serialize for QuestionCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QuestionCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single generated question. Immutable once part of a QuestionSet;
/// `id` is assigned sequentially across all categories at assembly time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub category: QuestionCategory,
    pub marks: i32,
    pub options: Option<BTreeMap<String, String>>,
    pub correct_answer: Option<String>,
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_mcq_and_mark_tiers() {
        assert_eq!("mcq".parse::<QuestionCategory>(), Ok(QuestionCategory::Mcq));
        assert_eq!(
            "5_mark".parse::<QuestionCategory>(),
            Ok(QuestionCategory::Subjective(5))
        );
        assert_eq!(
            "10_mark".parse::<QuestionCategory>(),
            Ok(QuestionCategory::Subjective(10))
        );
        assert!("essay".parse::<QuestionCategory>().is_err());
        assert!("0_mark".parse::<QuestionCategory>().is_err());
        assert!("x_mark".parse::<QuestionCategory>().is_err());
    }

    #[test]
    fn category_marks() {
        assert_eq!(QuestionCategory::Mcq.marks(), 1);
        assert_eq!(QuestionCategory::Subjective(2).marks(), 2);
        assert_eq!(QuestionCategory::Subjective(10).marks(), 10);
    }

    #[test]
    fn category_serde_roundtrip() {
        let json = serde_json::to_string(&QuestionCategory::Subjective(5)).unwrap();
        assert_eq!(json, "\"5_mark\"");
        let back: QuestionCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QuestionCategory::Subjective(5));
    }

    #[test]
    fn question_serializes_wire_shape() {
        let q = Question {
            id: 1,
            text: "What is 2+2?".into(),
            category: QuestionCategory::Mcq,
            marks: 1,
            options: Some(BTreeMap::from([
                ("A".to_string(), "3".to_string()),
                ("B".to_string(), "4".to_string()),
            ])),
            correct_answer: Some("B".into()),
            hint: None,
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["type"], "mcq");
        assert_eq!(v["marks"], 1);
        assert_eq!(v["options"]["B"], "4");
        assert!(v["hint"].is_null());
    }
}
