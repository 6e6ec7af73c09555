pub mod exam_dto;
pub mod question_dto;
