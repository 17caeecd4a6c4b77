//! Text generation through the OpenAI chat completions API.

use crate::config::{require, Settings};
use crate::content::{user_prompt, SYSTEM_PROMPT};
use crate::records::GameRecord;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const OPENAI_API: &str = "https://api.openai.com";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Something that writes the raw text of a thread for a game.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, record: &GameRecord) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: OPENAI_API.to_string(),
            api_key,
            model: model.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.openai_api_key.clone(), settings.openai_model())
    }

    /// Point the client at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ContentGenerator for OpenAiClient {
    async fn generate(&self, record: &GameRecord) -> Result<String> {
        let api_key = require(&self.api_key, "OPENAI_API_KEY")?;

        let request = ChatRequest {
            model: &self.model,
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(record),
                },
            ],
        };

        info!(model = %self.model, title = %record.title, "Requesting thread text");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach text generation API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Text generation failed ({}): {}", status, body));
        }

        let response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse text generation response")?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("Text generation returned no choices"))?;

        debug!(chars = text.chars().count(), "Received thread text");
        Ok(text)
    }
}
