// =============================================================================
// CHAT SESSION
// =============================================================================
//
// One conversation about one Drive link. The session owns the history and the
// current file collection, and drives each turn:
//
//   user turn -> system prompt -> chat endpoint -> assistant turn
//
// Sends are single-flight: a submit while another is in progress is ignored.
// Chat failures never escape; they become a fallback assistant turn so the
// conversation stays usable. The reply timeout bounds the whole turn, Drive
// re-fetch included, and link loads have their own bound.

use super::ai_provider::AiProvider;
use super::models::{AiConfig, AiMessage};
use super::prompt_builder::{find_requested_file, render_system_prompt, BuiltPrompt, PromptBuilder};
use crate::core::auth::AuthProvider;
use crate::core::drive::{AggregatorConfig, DriveApi, FileRecord, FolderAggregator};
use crate::core::links;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Assistant turn used when the endpoint answered without any reply text.
pub const NO_RESPONSE_FALLBACK: &str = "No response.";

/// Assistant turn used when the endpoint call failed or timed out.
pub const CHAT_ERROR_FALLBACK: &str = "Error contacting OpenAI API.";

pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ai: AiConfig,
    /// How long a whole turn may take, prompt building included.
    pub reply_timeout: Duration,
    /// How long resolving and aggregating a link may take.
    pub load_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}

/// What happened to a submitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or another send was already in flight. History unchanged.
    Ignored,
    /// The endpoint answered (possibly with the "no response" fallback).
    Replied,
    /// The endpoint failed; the error fallback was appended.
    Failed,
}

/// Clears the sending flag when a turn finishes, however it finishes.
struct SendingGuard<'a>(&'a AtomicBool);

impl<'a> SendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ChatSession<P: AiProvider, A: DriveApi + ?Sized> {
    provider: P,
    aggregator: FolderAggregator<A>,
    prompt_builder: PromptBuilder<A>,
    config: SessionConfig,
    auth: Box<dyn AuthProvider>,
    link: RwLock<String>,
    files: RwLock<Arc<Vec<FileRecord>>>,
    history: RwLock<Vec<AiMessage>>,
    sending: AtomicBool,
}

impl<P: AiProvider, A: DriveApi + ?Sized> ChatSession<P, A> {
    /// Creates a session with no link loaded yet.
    pub fn new(
        provider: P,
        drive: Arc<A>,
        aggregator_config: AggregatorConfig,
        config: SessionConfig,
        auth: Box<dyn AuthProvider>,
    ) -> Self {
        Self {
            provider,
            aggregator: FolderAggregator::new(Arc::clone(&drive), aggregator_config),
            prompt_builder: PromptBuilder::new(drive),
            config,
            auth,
            link: RwLock::new(String::new()),
            files: RwLock::new(Arc::new(Vec::new())),
            history: RwLock::new(Vec::new()),
            sending: AtomicBool::new(false),
        }
    }

    /// Resolves and aggregates `link`, replacing the current collection.
    ///
    /// Any failure publishes an empty collection. Returns the number of files
    /// now loaded.
    pub async fn load_link(&self, link: &str) -> usize {
        let reference = links::resolve(link);
        match reference.id() {
            Some(id) => tracing::debug!("Resolved link to Drive id {}", id),
            None => tracing::warn!("Unrecognised Drive link: {}", link),
        }

        let files = match self.auth.request_token().await {
            Ok(token) => {
                let aggregate = self.aggregator.aggregate_or_empty(&reference, &token);
                match tokio::time::timeout(self.config.load_timeout, aggregate).await {
                    Ok(files) => files,
                    Err(_) => {
                        tracing::warn!(
                            "Loading {} timed out after {:?}, continuing with no files",
                            link,
                            self.config.load_timeout
                        );
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Could not get a Drive token, continuing with no files: {}", e);
                Vec::new()
            }
        };
        let count = files.len();

        *self.files.write().await = Arc::new(files);
        *self.link.write().await = link.to_string();

        count
    }

    /// Sends one user message and appends the assistant's reply.
    pub async fn submit(&self, user_text: &str) -> SubmitOutcome {
        if user_text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(_sending) = SendingGuard::acquire(&self.sending) else {
            tracing::debug!("Ignoring message while a reply is pending");
            return SubmitOutcome::Ignored;
        };

        let user_turn = AiMessage::user(user_text);
        let prior_turns: Vec<AiMessage> = {
            let mut history = self.history.write().await;
            let prior = history.iter().filter(|m| !m.is_system()).cloned().collect();
            history.push(user_turn.clone());
            prior
        };

        let turn = self.run_turn(user_turn, prior_turns);
        let (reply, outcome) = match tokio::time::timeout(self.config.reply_timeout, turn).await {
            Ok(Ok(Some(text))) if !text.is_empty() => (text, SubmitOutcome::Replied),
            Ok(Ok(_)) => (NO_RESPONSE_FALLBACK.to_string(), SubmitOutcome::Replied),
            Ok(Err(e)) => {
                tracing::error!("Chat endpoint error: {}", e);
                (CHAT_ERROR_FALLBACK.to_string(), SubmitOutcome::Failed)
            }
            Err(_) => {
                tracing::error!("Turn timed out after {:?}", self.config.reply_timeout);
                (CHAT_ERROR_FALLBACK.to_string(), SubmitOutcome::Failed)
            }
        };

        self.history.write().await.push(AiMessage::assistant(reply));
        outcome
    }

    /// Builds this turn's prompt and asks the chat endpoint for a reply.
    async fn run_turn(
        &self,
        user_turn: AiMessage,
        prior_turns: Vec<AiMessage>,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let files = self.files().await;
        let link = self.link().await;

        let prompt = match self.auth.request_token().await {
            Ok(token) => {
                self.prompt_builder
                    .build_system_prompt(&files, &link, Some(&user_turn), &token)
                    .await
            }
            Err(e) => {
                tracing::warn!("Could not get a Drive token, using stored content: {}", e);
                let requested = find_requested_file(&files, &user_turn.content).map(|f| f.id());
                BuiltPrompt {
                    text: render_system_prompt(&files, &link, requested),
                    refreshed: None,
                }
            }
        };

        if let Some(refreshed) = prompt.refreshed {
            self.replace_file(refreshed).await;
        }

        let mut messages = Vec::with_capacity(prior_turns.len() + 2);
        messages.push(AiMessage::system(prompt.text));
        messages.extend(prior_turns);
        messages.push(user_turn);

        self.provider.chat_complete(&messages, &self.config.ai).await
    }

    /// Conversation turns for display. System turns are never stored.
    pub async fn history(&self) -> Vec<AiMessage> {
        self.history
            .read()
            .await
            .iter()
            .filter(|m| !m.is_system())
            .cloned()
            .collect()
    }

    /// Snapshot of the current file collection.
    pub async fn files(&self) -> Arc<Vec<FileRecord>> {
        Arc::clone(&*self.files.read().await)
    }

    pub async fn link(&self) -> String {
        self.link.read().await.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    /// Republishes the collection with `refreshed` swapped in by id.
    async fn replace_file(&self, refreshed: FileRecord) {
        let mut files = self.files.write().await;
        let updated: Vec<FileRecord> = files
            .iter()
            .map(|f| {
                if f.id() == refreshed.id() {
                    refreshed.clone()
                } else {
                    f.clone()
                }
            })
            .collect();
        *files = Arc::new(updated);
    }
}
