//! Router and grader labels, errors and traits

mod classifier;
mod error;
mod label;
mod parse;

pub use classifier::{AnswerGrader, HallucinationGrader, QuestionRouter, RelevanceGrader};
pub use error::ClassificationError;
pub use label::{BinaryScore, Route};
pub use parse::{normalize_label, parse_binary_score, parse_route};
