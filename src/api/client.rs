use std::{
    sync::Mutex,
    time::Duration,
};

use reqwest::{
    Client,
    Response,
    StatusCode,
};
use serde::{
    de::DeserializeOwned,
    Serialize,
};
use tracing::debug;

use super::types::{
    ApiErrorBody,
    CsrfResponse,
    GenerateAiPayload,
    GenerateQuizPayload,
    ListPayload,
    ListsResponse,
    ProgressPayload,
    ProgressSummary,
    QuizSubmission,
    Recommendation,
    WordPayload,
};
use crate::{
    core::{
        config::ClientConfig,
        errors::UNKNOWN_ERROR,
        models::{
            VocabularyList,
            Word,
        },
        LexitrackError,
    },
    quiz::types::{
        Quiz,
        QuizAttempt,
        QuizSummary,
    },
};

const CSRF_HEADER: &str = "X-CSRF-Token";

/// Extraction priority for failed responses: structured `error` field,
/// structured `message` field, generic HTTP status line, literal fallback
/// for shapes we cannot parse.
pub(crate) fn error_message_from_body(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => {
            parsed.error.or(parsed.message).unwrap_or_else(|| UNKNOWN_ERROR.to_string())
        }
        Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
        Err(_) => UNKNOWN_ERROR.to_string(),
    }
}

/// Capability object for the REST backend. Owns the configured HTTP client
/// (cookie jar for credentialed requests) and the CSRF token it attaches to
/// every mutating call. Holds no entity state between calls.
pub struct ApiClient {
    http: Client,
    base_url: String,
    csrf_token: Mutex<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, LexitrackError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LexitrackError::Custom(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(response: Response) -> Result<Response, LexitrackError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(LexitrackError::Api(error_message_from_body(status, &body)))
    }

    /// Fetch and cache the CSRF token. The cookie set alongside it lives in
    /// the client's jar; only the header value needs managing here.
    pub async fn fetch_csrf_token(&self) -> Result<(), LexitrackError> {
        let response = self.http.get(self.url("/csrf-token")).send().await?;
        let body: CsrfResponse = Self::ensure_success(response).await?.json().await?;
        *self.csrf_token.lock().expect("csrf token lock") = Some(body.csrf_token);
        Ok(())
    }

    async fn csrf_token(&self) -> Result<String, LexitrackError> {
        let cached = self.csrf_token.lock().expect("csrf token lock").clone();
        if let Some(token) = cached {
            return Ok(token);
        }
        self.fetch_csrf_token().await?;
        Ok(self.csrf_token.lock().expect("csrf token lock").clone().unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LexitrackError> {
        let response = self.http.get(self.url(path)).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LexitrackError> {
        let token = self.csrf_token().await?;
        let response =
            self.http.post(self.url(path)).header(CSRF_HEADER, token).json(body).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LexitrackError> {
        let token = self.csrf_token().await?;
        let response =
            self.http.put(self.url(path)).header(CSRF_HEADER, token).json(body).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), LexitrackError> {
        let token = self.csrf_token().await?;
        let response = self.http.delete(self.url(path)).header(CSRF_HEADER, token).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    pub async fn fetch_lists(
        &self,
        page: usize,
        limit: usize,
    ) -> Result<Vec<VocabularyList>, LexitrackError> {
        let response = self
            .http
            .get(self.url("/vocabulary"))
            .query(&[("page", page.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        let body: ListsResponse = Self::ensure_success(response).await?.json().await?;
        debug!("fetched {} vocabulary lists (page {})", body.vocabulary_lists.len(), page);
        Ok(body.vocabulary_lists)
    }

    pub async fn create_list(&self, payload: &ListPayload) -> Result<VocabularyList, LexitrackError> {
        self.post_json("/vocabulary", payload).await
    }

    pub async fn fetch_list(&self, list_id: &str) -> Result<VocabularyList, LexitrackError> {
        self.get_json(&format!("/vocabulary/{list_id}")).await
    }

    pub async fn update_list(
        &self,
        list_id: &str,
        payload: &ListPayload,
    ) -> Result<VocabularyList, LexitrackError> {
        self.put_json(&format!("/vocabulary/{list_id}"), payload).await
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<(), LexitrackError> {
        self.delete(&format!("/vocabulary/{list_id}")).await
    }

    pub async fn create_word(
        &self,
        list_id: &str,
        payload: &WordPayload,
    ) -> Result<Word, LexitrackError> {
        self.post_json(&format!("/vocabulary/{list_id}/words"), payload).await
    }

    pub async fn update_word(
        &self,
        list_id: &str,
        word_id: &str,
        payload: &WordPayload,
    ) -> Result<Word, LexitrackError> {
        self.put_json(&format!("/vocabulary/{list_id}/words/{word_id}"), payload).await
    }

    pub async fn delete_word(&self, list_id: &str, word_id: &str) -> Result<(), LexitrackError> {
        self.delete(&format!("/vocabulary/{list_id}/words/{word_id}")).await
    }

    pub async fn update_word_progress(
        &self,
        word_id: &str,
        payload: &ProgressPayload,
    ) -> Result<(), LexitrackError> {
        let token = self.csrf_token().await?;
        let response = self
            .http
            .post(self.url(&format!("/vocabulary/words/{word_id}/progress")))
            .header(CSRF_HEADER, token)
            .json(payload)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    pub async fn generate_ai_list(
        &self,
        payload: &GenerateAiPayload,
    ) -> Result<VocabularyList, LexitrackError> {
        self.post_json("/vocabulary/generate-ai-list", payload).await
    }

    pub async fn fetch_quizzes(&self) -> Result<Vec<QuizSummary>, LexitrackError> {
        self.get_json("/quizzes").await
    }

    pub async fn generate_quiz(
        &self,
        payload: &GenerateQuizPayload,
    ) -> Result<Quiz, LexitrackError> {
        self.post_json("/quizzes/generate", payload).await
    }

    pub async fn fetch_quiz(&self, quiz_id: &str) -> Result<Quiz, LexitrackError> {
        self.get_json(&format!("/quizzes/{quiz_id}")).await
    }

    pub async fn submit_quiz(
        &self,
        quiz_id: &str,
        submission: &QuizSubmission,
    ) -> Result<QuizAttempt, LexitrackError> {
        self.post_json(&format!("/quizzes/{quiz_id}/submit"), submission).await
    }

    pub async fn fetch_progress_summary(&self) -> Result<ProgressSummary, LexitrackError> {
        self.get_json("/analytics/progress").await
    }

    pub async fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, LexitrackError> {
        self.get_json("/analytics/recommendations").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_error_field_wins() {
        let message = error_message_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"error":"name required","message":"validation failed"}"#,
        );
        assert_eq!(message, "name required");
    }

    #[test]
    fn message_field_is_second_choice() {
        let message = error_message_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"message":"validation failed"}"#,
        );
        assert_eq!(message, "validation failed");
    }

    #[test]
    fn empty_body_falls_back_to_status_line() {
        let message = error_message_from_body(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(message, "HTTP 500 Internal Server Error");
    }

    #[test]
    fn unknown_shapes_use_the_literal_fallback() {
        let message =
            error_message_from_body(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert_eq!(message, UNKNOWN_ERROR);

        let message = error_message_from_body(StatusCode::BAD_REQUEST, "{}");
        assert_eq!(message, UNKNOWN_ERROR);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig {
            base_url: "http://localhost:3001/api/".into(),
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/vocabulary"), "http://localhost:3001/api/vocabulary");
    }
}
