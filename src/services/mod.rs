pub mod evaluation;
pub mod exam;
pub mod extract;
pub mod generation;
pub mod model_provider;
pub mod parser;
pub mod prompt;
