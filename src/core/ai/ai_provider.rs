use super::models::{AiConfig, AiMessage};
use async_trait::async_trait;
use std::error::Error;

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends a chat completion request to the AI provider.
    ///
    /// Returns `Ok(None)` when the endpoint answered but the payload carried
    /// no reply text.
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
}

// Blanket implementation for Box<dyn AiProvider> so the session can hold
// whichever provider main picked at runtime.
#[async_trait]
impl AiProvider for Box<dyn AiProvider> {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        (**self).chat_complete(messages, config).await
    }
}
