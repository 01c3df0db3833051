// OpenAI-compatible chat completion client.
//
// Works against any endpoint speaking the `/chat/completions` dialect
// (OpenAI, OpenRouter, local servers). The reply is read from
// `choices[0].message.content`; any other response shape counts as
// "no response" rather than an error.

use crate::core::ai::{
    models::{AiConfig, AiMessage},
    AiProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::error::Error;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Pulls the reply text out of a chat completion payload.
fn extract_reply(response: &serde_json::Value) -> Option<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
}

#[async_trait]
impl AiProvider for OpenAiClient {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let payload = json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
        });

        tracing::debug!(
            "Sending {} message(s) to {} ({})",
            messages.len(),
            self.completions_url(),
            config.model
        );

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(format!("Chat API error: {} - {}", status, text).into());
        }

        let response_json: serde_json::Value = response.json().await?;
        Ok(extract_reply(&response_json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reply_from_choice() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "42 files." } }]
        });
        assert_eq!(extract_reply(&body), Some("42 files.".to_string()));
    }

    #[test]
    fn test_unexpected_shape_is_no_reply() {
        assert_eq!(extract_reply(&json!({ "choices": [] })), None);
        assert_eq!(extract_reply(&json!({ "error": { "message": "bad" } })), None);
        assert_eq!(
            extract_reply(&json!({ "choices": [{ "message": { "content": null } }] })),
            None
        );
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let client = OpenAiClient::new("key".to_string(), "https://openrouter.ai/api/v1/");
        assert_eq!(
            client.completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}
