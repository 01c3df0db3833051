// =============================================================================
// SYSTEM PROMPT CONSTRUCTION
// =============================================================================
//
// Builds the grounding context sent with every chat turn. To keep the prompt
// small, each file only contributes a short preview. When the user names a
// file in their question, that one file is sent in full, re-fetching it from
// Drive first if we only hold a preview.

use super::models::AiMessage;
use crate::core::drive::drive_models::truncate_chars;
use crate::core::drive::{fetch_content, DriveApi, FileRecord};
use std::sync::Arc;

/// Characters of each non-requested file included in the prompt.
pub const PREVIEW_CHARS: usize = 200;

/// Behavioural rules appended after the file listing.
pub const ANSWER_INSTRUCTIONS: &str = "Always answer as briefly, directly and clearly as possible. \
For every fact or quote you use, cite where it came from (file name, page number, or quoted text). \
If you are not sure about something, say so instead of guessing. \
If asked about the entire folder, be accurate and precise when counting and doing arithmetic.";

/// The prompt for one turn, plus the record that was re-fetched to build it.
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub text: String,
    /// Set when a requested file was re-fetched in full. Callers should swap
    /// it into their collection so later turns reuse it.
    pub refreshed: Option<FileRecord>,
}

/// First file, in collection order, whose name appears verbatim in `message`.
pub fn find_requested_file<'a>(files: &'a [FileRecord], message: &str) -> Option<&'a FileRecord> {
    files
        .iter()
        .find(|f| !f.name().is_empty() && message.contains(f.name()))
}

/// Renders the prompt text. The file with `requested_id` keeps its full
/// content; every other file is cut to [`PREVIEW_CHARS`].
pub fn render_system_prompt(
    files: &[FileRecord],
    link: &str,
    requested_id: Option<&str>,
) -> String {
    let listing: Vec<String> = files
        .iter()
        .map(|f| {
            let content = if requested_id == Some(f.id()) {
                f.content.as_str()
            } else {
                truncate_chars(&f.content, PREVIEW_CHARS)
            };
            format!("File: {}\n{}\n", f.name(), content)
        })
        .collect();

    format!(
        "You are an expert assistant. The user will ask questions about the contents of the \
         Google Drive folder or document at this link: {}. Here are the files and summaries of \
         their contents:\n\n{}\n\n{}",
        link,
        listing.join("\n"),
        ANSWER_INSTRUCTIONS
    )
}

pub struct PromptBuilder<A: DriveApi + ?Sized> {
    api: Arc<A>,
}

impl<A: DriveApi + ?Sized> PromptBuilder<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Builds the system prompt for a turn.
    ///
    /// The only side effect is the conditional full re-fetch of a requested
    /// file. If that fetch fails we log it and use the content we already have.
    pub async fn build_system_prompt(
        &self,
        files: &[FileRecord],
        link: &str,
        user_message: Option<&AiMessage>,
        token: &str,
    ) -> BuiltPrompt {
        let requested = user_message.and_then(|msg| find_requested_file(files, &msg.content));

        let Some(requested) = requested else {
            return BuiltPrompt {
                text: render_system_prompt(files, link, None),
                refreshed: None,
            };
        };

        let refreshed = if requested.is_full_content {
            None
        } else {
            self.refetch(requested, token).await
        };

        let text = match &refreshed {
            Some(full) => {
                let substituted: Vec<FileRecord> = files
                    .iter()
                    .map(|f| if f.id() == full.id() { full.clone() } else { f.clone() })
                    .collect();
                render_system_prompt(&substituted, link, Some(full.id()))
            }
            None => render_system_prompt(files, link, Some(requested.id())),
        };

        BuiltPrompt { text, refreshed }
    }

    async fn refetch(&self, record: &FileRecord, token: &str) -> Option<FileRecord> {
        tracing::debug!("Fetching full content for requested file '{}'", record.name());

        match fetch_content(self.api.as_ref(), &record.descriptor, token).await {
            Ok(content) => Some(record.with_full_content(content)),
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch full content for '{}', using preview: {}",
                    record.name(),
                    e
                );
                None
            }
        }
    }
}
