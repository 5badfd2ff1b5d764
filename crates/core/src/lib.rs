#![forbid(unsafe_code)]

pub mod model;
pub mod parser;
pub mod scoring;

pub use parser::parse_question_numbers;
pub use scoring::{Annotation, NoKeyEnteredError, Report, score};
