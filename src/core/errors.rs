use thiserror::Error;

/// Literal fallback for server error payloads we cannot make sense of.
pub const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Error, Debug)]
pub enum LexitrackError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    /// Message already extracted from a structured server error body.
    #[error("{0}")]
    Api(String),

    /// The owning view went away before the response did. Never surfaced
    /// to the user as an error.
    #[error("request cancelled")]
    Cancelled,

    #[error("LexitrackError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for LexitrackError {
    fn from(error: std::io::Error) -> Self {
        LexitrackError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for LexitrackError {
    fn from(error: reqwest::Error) -> Self {
        LexitrackError::Reqwest(Box::new(error))
    }
}

impl LexitrackError {
    /// Message shown to the user. Priority: structured API error message,
    /// then the transport error string, then the literal fallback.
    pub fn user_message(&self) -> String {
        match self {
            LexitrackError::Api(message) => message.clone(),
            LexitrackError::Reqwest(e) => e.to_string(),
            LexitrackError::Custom(message) => message.clone(),
            LexitrackError::Io(e) => e.to_string(),
            LexitrackError::Json(_) | LexitrackError::Cancelled => UNKNOWN_ERROR.to_string(),
        }
    }
}
