pub mod scoring;
pub mod types;

pub use scoring::{
    grade_answer,
    review_attempt,
    score_submission,
    QuestionReview,
};
pub use types::{
    QuestionKind,
    Quiz,
    QuizAnswer,
    QuizAttempt,
    QuizQuestion,
    QuizSummary,
};
