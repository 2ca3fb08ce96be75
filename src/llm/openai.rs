//! OpenAI-compatible chat completions client.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::CompletionError;
use crate::prompt::RenderedPrompt;

use super::gateway::{CompletionGateway, GenerationParams};

/// Chat completions over HTTP with bearer authentication.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl OpenAiClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionGateway for OpenAiClient {
    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        params: &GenerationParams,
    ) -> Result<Vec<String>, CompletionError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": &prompt.system},
                {"role": "user", "content": &prompt.user}
            ],
            "temperature": params.temperature,
            "top_p": params.top_p,
            "n": params.n,
            "max_tokens": params.max_tokens,
            "stream": false
        });

        debug!("POST {} (model {})", self.endpoint(), self.model);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        let text = response.text().await.map_err(CompletionError::Transport)?;
        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let api_response: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        Ok(api_response
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect())
    }
}
