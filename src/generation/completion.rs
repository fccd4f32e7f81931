use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ChatCompletion;
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Invalid completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can turn a prompt into a chat completion payload.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<ChatCompletion, CompletionError>;
}

pub type SharedCompletion = Arc<dyn CompletionService>;

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestMessage<'a> {
    pub role: &'static str,
    pub content: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestContent<'a> {
    Text { text: Cow<'a, str> },
}

impl<'a> CompletionRequest<'a> {
    pub fn user_prompt(model: &'a str, prompt: &'a str) -> Self {
        CompletionRequest {
            model,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![RequestContent::Text { text: Cow::Borrowed(prompt) }],
            }],
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

pub struct OpenAiCompletions {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletions {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        OpenAiCompletions {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_config(client: Client, config: &AppConfig) -> Self {
        Self::new(
            client,
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletions {
    async fn complete(&self, prompt: &str) -> Result<ChatCompletion, CompletionError> {
        debug!("Requesting completion from {} with model {}", self.endpoint(), self.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest::user_prompt(&self.model, prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|response| response.error.message)
                .unwrap_or_else(|| format!("Completion request failed with status {status}"));
            return Err(CompletionError::Api { status: status.as_u16(), message });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
