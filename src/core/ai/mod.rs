pub mod ai_provider;
pub mod chat_session;
pub mod models;
pub mod prompt_builder;

pub use ai_provider::AiProvider;
pub use chat_session::{ChatSession, SessionConfig, SubmitOutcome};
pub use models::{AiConfig, AiMessage};
