pub mod answer;
pub mod exam;
pub mod question;
pub mod question_set;
