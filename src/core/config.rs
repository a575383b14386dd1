use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::LexitrackError,
    persistence,
};

const CONFIG_FILE: &str = "client_config.json";

/// Connection settings for the REST backend. Everything else the client
/// needs (session cookie, CSRF token) is acquired at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
            page_size: 20,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Self {
        persistence::load_json_or_default(CONFIG_FILE)
    }

    pub fn save(&self) -> Result<(), LexitrackError> {
        persistence::save_json(self, CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, 20);
        assert!(config.base_url.starts_with("http://localhost"));
    }
}
