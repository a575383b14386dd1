pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{
    GenerateAiPayload,
    GenerateQuizPayload,
    ListPayload,
    ProgressPayload,
    ProgressSummary,
    QuizSubmission,
    Recommendation,
    SubmittedAnswer,
    WordPayload,
};
