use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::constants;
use crate::error::VivaError;

// Structures matching the OpenAI-compatible /v1/chat/completions endpoint.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

/// Client for the remote chat-completion endpoint. One request per turn,
/// no streaming, no retry.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl CompletionClient {
    /// Reads the credential from `OPENAI_API_KEY` and the endpoint base from
    /// `OPENAI_API_BASE`. A missing credential is fatal at startup.
    pub fn from_env() -> Result<Self, VivaError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(VivaError::ConfigurationMissing)?;
        Ok(Self::new(constants::OPENAI_API_BASE.clone(), api_key))
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Sends exactly two messages (system role = the session instruction,
    /// user role = the rendered transcript) and returns the top completion's
    /// text. The whole conversation history arrives flattened inside the user
    /// message; per-turn role tagging is deliberately not used.
    pub async fn complete(
        &self,
        system_instruction: &str,
        rendered_transcript: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, VivaError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request_payload = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: rendered_transcript.to_string(),
                },
            ],
            temperature,
        };

        debug!(model, %url, "Sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(constants::REQUEST_TIMEOUT)
            .json(&request_payload)
            .send()
            .await
            .map_err(|e| VivaError::remote(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            error!(%status, %error_body, "Completion endpoint returned an error");
            return Err(VivaError::remote(format!(
                "endpoint returned status {status}: {error_body}"
            )));
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| VivaError::remote(format!("invalid response body: {e}")))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| VivaError::remote("response contained no choices"))?;

        debug!(content = %choice.message.content, "Received completion");

        Ok(choice.message.content)
    }
}
