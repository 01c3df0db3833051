// Content-type dispatch for a single file.

use super::drive_api::{DriveApi, DriveError};
use super::drive_models::{ContentKind, FileDescriptor, UNSUPPORTED_FILE_SENTINEL};

/// Reads the text of one file.
///
/// Google Docs go through the export endpoint, plain text is downloaded
/// verbatim, and everything else yields the unsupported-file sentinel
/// without touching the network. Errors are left to the caller.
pub async fn fetch_content<A>(
    api: &A,
    descriptor: &FileDescriptor,
    token: &str,
) -> Result<String, DriveError>
where
    A: DriveApi + ?Sized,
{
    match descriptor.content_kind() {
        ContentKind::GoogleDoc => {
            tracing::debug!("Exporting Google Doc {} as text", descriptor.id);
            api.export_text(&descriptor.id, token).await
        }
        ContentKind::PlainText => {
            tracing::debug!("Downloading text file {}", descriptor.id);
            api.download_text(&descriptor.id, token).await
        }
        ContentKind::Unsupported => Ok(UNSUPPORTED_FILE_SENTINEL.to_string()),
    }
}
