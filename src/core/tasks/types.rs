pub use super::{
    handle::TaskHandle,
    queue::{
        ProgressCommand,
        ProgressQueue,
    },
};
use crate::{
    api::types::{
        ProgressSummary,
        Recommendation,
    },
    quiz::types::{
        Quiz,
        QuizAttempt,
        QuizSummary,
    },
    state::{
        details::DetailsAction,
        vocabulary::VocabAction,
    },
};

/// Everything the orchestration layer can hand back to the host. Reducer
/// actions are applied to the matching state machine; the rest is simple
/// host state (alerts, navigation, read-only quiz and analytics results).
#[derive(Debug, Clone)]
pub enum StateUpdate {
    Vocab(VocabAction),
    Details(DetailsAction),

    /// Blocking user-facing message for a failed mutation. The modal that
    /// issued it stays open with its form intact.
    Alert(String),

    /// The list is gone server-side; the host navigates away and refreshes
    /// the overview.
    ListDeleted { list_id: String },

    Connection(bool),

    Quizzes(Result<Vec<QuizSummary>, String>),
    QuizGenerated(Result<Quiz, String>),
    QuizLoaded(Result<Quiz, String>),
    QuizSubmitted(Result<QuizAttempt, String>),

    ProgressSummary(Result<ProgressSummary, String>),
    Recommendations(Result<Vec<Recommendation>, String>),
}

impl StateUpdate {
    pub fn update_type(&self) -> &'static str {
        match self {
            StateUpdate::Vocab(_) => "vocab",
            StateUpdate::Details(_) => "details",
            StateUpdate::Alert(_) => "alert",
            StateUpdate::ListDeleted { .. } => "list_deleted",
            StateUpdate::Connection(_) => "connection",
            StateUpdate::Quizzes(_) => "quizzes",
            StateUpdate::QuizGenerated(_) => "quiz_generated",
            StateUpdate::QuizLoaded(_) => "quiz_loaded",
            StateUpdate::QuizSubmitted(_) => "quiz_submitted",
            StateUpdate::ProgressSummary(_) => "progress_summary",
            StateUpdate::Recommendations(_) => "recommendations",
        }
    }
}
