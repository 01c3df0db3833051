use super::drive_models::FileDescriptor;
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Drive request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Drive API returned {status}: {body}")]
    Status { status: u16, body: String },
}

// ============================================================================
// STORAGE PROVIDER TRAIT (PORT)
// ============================================================================

/// The four Drive reads the pipeline needs.
///
/// Lookups return `Ok(None)` when the provider answered but gave us nothing
/// usable (no id, no file list). Transport failures are errors.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Metadata (id, name, MIME type) for a single file.
    async fn file_metadata(
        &self,
        file_id: &str,
        token: &str,
    ) -> Result<Option<FileDescriptor>, DriveError>;

    /// Direct children of a folder, shared drives included.
    async fn list_children(
        &self,
        folder_id: &str,
        token: &str,
    ) -> Result<Option<Vec<FileDescriptor>>, DriveError>;

    /// Plain-text export of a Google Doc.
    async fn export_text(&self, file_id: &str, token: &str) -> Result<String, DriveError>;

    /// Raw file content decoded as text.
    async fn download_text(&self, file_id: &str, token: &str) -> Result<String, DriveError>;
}
