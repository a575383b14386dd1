use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::models::{
        Difficulty,
        MasteryStatus,
        VocabularyList,
    },
    state::forms::{
        AiForm,
        ListForm,
        WordForm,
    },
};

/// Envelope for `GET /vocabulary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListsResponse {
    pub vocabulary_lists: Vec<VocabularyList>,
}

/// Structured error body the backend emits on failures. Either field may be
/// missing; the extraction order is error, then message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload {
    pub name: String,
    pub description: String,
    pub target_language: String,
    pub native_language: String,
}

impl From<&ListForm> for ListPayload {
    fn from(form: &ListForm) -> Self {
        Self {
            name: form.name.clone(),
            description: form.description.clone(),
            target_language: form.target_language.clone(),
            native_language: form.native_language.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPayload {
    pub term: String,
    pub translation: String,
    pub part_of_speech: String,
    pub difficulty: Difficulty,
}

impl From<&WordForm> for WordPayload {
    fn from(form: &WordForm) -> Self {
        Self {
            term: form.term.clone(),
            translation: form.translation.clone(),
            part_of_speech: form.part_of_speech.clone(),
            difficulty: form.difficulty,
        }
    }
}

/// Body of `POST /vocabulary/words/{wordId}/progress`. The server derives
/// mastery from status on its own curve; the client only names the target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPayload {
    pub status: MasteryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAiPayload {
    pub topic: String,
    pub difficulty: Difficulty,
    pub word_count: u32,
}

impl From<&AiForm> for GenerateAiPayload {
    fn from(form: &AiForm) -> Self {
        Self { topic: form.topic.clone(), difficulty: form.difficulty, word_count: form.word_count }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizPayload {
    pub list_id: String,
    pub question_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer: String,
}

/// Body of `POST /quizzes/{id}/submit`: the full answer set in one request.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSubmission {
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_words: u32,
    pub mastered_words: u32,
    pub learning_words: u32,
    pub average_mastery: f32,
    #[serde(default)]
    pub quiz_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub list_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfResponse {
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_payload_omits_absent_list_id() {
        let body = ProgressPayload { status: MasteryStatus::Mastered, list_id: None };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"status":"mastered"}"#);

        let body =
            ProgressPayload { status: MasteryStatus::Learning, list_id: Some("l1".into()) };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"learning","listId":"l1"}"#
        );
    }

    #[test]
    fn lists_response_reads_the_envelope() {
        let json = r#"{"vocabularyLists":[{
            "id": "l1", "name": "Travel",
            "targetLanguage": "es", "nativeLanguage": "en"
        }]}"#;
        let response: ListsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.vocabulary_lists.len(), 1);
        assert_eq!(response.vocabulary_lists[0].name, "Travel");
    }

    #[test]
    fn submission_serializes_camel_case() {
        let body = QuizSubmission {
            answers: vec![SubmittedAnswer { question_id: "q1".into(), answer: "playa".into() }],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"answers":[{"questionId":"q1","answer":"playa"}]}"#
        );
    }
}
