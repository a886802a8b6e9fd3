//! Content generators: the Cohere chat API and replay of saved replies.

use deckgen_core::{Config, ContentGenerator, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Path of the chat endpoint below the API base URL.
const CHAT_PATH: &str = "/v2/chat";

/// Outline generation can take a while for long decks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Generates outlines with a Cohere chat model. One attempt per call.
pub struct CohereGenerator {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl CohereGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, api_base: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
            endpoint: format!("{}{}", api_base.trim_end_matches('/'), CHAT_PATH),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Generator using the key and API base of `config`.
    pub fn from_config(config: &Config, model: &str) -> Self {
        Self::new(config.api_key.clone(), model, &config.api_base)
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

impl ContentGenerator for CohereGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        log::info!("Requesting outline from {} ({})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .map_err(|e| Error::GenerationError(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::GenerationError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(Error::GenerationError(format!("API returned {}: {}", status, detail)));
        }

        reply_text(&body)
    }
}

/// Concatenate the text items of a chat response body.
fn reply_text(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::GenerationError(format!("Unexpected response: {}", e)))?;

    Ok(response
        .message
        .content
        .into_iter()
        .filter(|item| item.kind == "text")
        .map(|item| item.text)
        .collect())
}

/// Replays a reply saved to disk instead of calling a model.
pub struct ReplayGenerator {
    path: PathBuf,
}

impl ReplayGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentGenerator for ReplayGenerator {
    fn generate(&self, _prompt: &str) -> Result<String> {
        log::info!("Replaying response from {}", self.path.display());
        fs::read_to_string(&self.path).map_err(|e| {
            Error::GenerationError(format!("Failed to read {}: {}", self.path.display(), e))
        })
    }
}
