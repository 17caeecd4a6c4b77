use anyhow::{anyhow, Result};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Credentials and settings read from the environment at startup.
///
/// Nothing is required at load time; a missing value only fails the client
/// that needs it.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub google_developer_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub twitter_consumer_key: Option<String>,
    pub twitter_consumer_secret: Option<String>,
    pub twitter_access_token: Option<String>,
    pub twitter_access_token_secret: Option<String>,
}

/// A set, non-empty environment variable. Blank entries in `.env` count as unset.
fn env_value(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env_value("OPENAI_API_KEY"),
            openai_model: env_value("OPENAI_MODEL"),
            google_developer_key: env_value("GOOGLE_DEVELOPER_KEY"),
            google_search_engine_id: env_value("GOOGLE_CUSTOM_SEARCH_ENGINE_ID"),
            twitter_consumer_key: env_value("TWITTER_CONSUMER_KEY"),
            twitter_consumer_secret: env_value("TWITTER_CONSUMER_SECRET"),
            twitter_access_token: env_value("TWITTER_ACCESS_TOKEN"),
            twitter_access_token_secret: env_value("TWITTER_ACCESS_TOKEN_SECRET"),
        }
    }

    pub fn openai_model(&self) -> &str {
        self.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }
}

/// Unwrap an optional setting, naming the variable when it is missing.
pub fn require<'a>(value: &'a Option<String>, var: &str) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| anyhow!("{} not set", var))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing() {
        let err = require(&None, "OPENAI_API_KEY").unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY not set");
    }

    #[test]
    fn test_blank_env_value_is_unset() {
        std::env::set_var("RETRO_THREAD_TEST_BLANK", "");
        std::env::set_var("RETRO_THREAD_TEST_SPACES", "   ");
        std::env::set_var("RETRO_THREAD_TEST_SET", "sk-123");

        assert_eq!(env_value("RETRO_THREAD_TEST_BLANK"), None);
        assert_eq!(env_value("RETRO_THREAD_TEST_SPACES"), None);
        assert_eq!(env_value("RETRO_THREAD_TEST_UNSET"), None);
        assert_eq!(env_value("RETRO_THREAD_TEST_SET").as_deref(), Some("sk-123"));

        let err = require(&env_value("RETRO_THREAD_TEST_BLANK"), "OPENAI_API_KEY").unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY not set");
    }

    #[test]
    fn test_default_model() {
        let settings = Settings::default();
        assert_eq!(settings.openai_model(), DEFAULT_OPENAI_MODEL);
    }
}
