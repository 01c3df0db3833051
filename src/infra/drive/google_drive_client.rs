// =============================================================================
// GOOGLE DRIVE CLIENT
// =============================================================================
//
// Drive v3 REST implementation of the core `DriveApi` port.
//
// **Endpoints used:**
// - `GET /files/{id}?fields=id,name,mimeType` - single file metadata
// - `GET /files?q='{id}' in parents` - direct children of a folder
// - `GET /files/{id}/export?mimeType=text/plain` - Google Doc as plain text
// - `GET /files/{id}?alt=media` - raw file bytes
//
// Every request carries `Authorization: Bearer <token>`. The token comes from
// whichever `AuthProvider` the session was started with.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::core::drive::{DriveApi, DriveError, FileDescriptor};

pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3/files";

/// Metadata response. Every field is optional because error payloads
/// (`{"error": {...}}`) deserialize into the same shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiFile {
    id: Option<String>,
    name: Option<String>,
    mime_type: Option<String>,
}

impl ApiFile {
    fn into_descriptor(self) -> Option<FileDescriptor> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(FileDescriptor {
            id,
            name: self.name.unwrap_or_default(),
            mime_type: self.mime_type.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiFileList {
    files: Option<Vec<ApiFile>>,
}

/// Minimal Drive REST client exposing only what the aggregator needs.
pub struct GoogleDriveClient {
    client: Client,
    base_url: String,
}

impl GoogleDriveClient {
    pub fn new() -> Self {
        Self::with_base_url(DRIVE_API_BASE)
    }

    /// Points the client at a different Drive-compatible endpoint.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn metadata_url(&self, file_id: &str) -> String {
        format!("{}/{}?fields=id%2Cname%2CmimeType", self.base_url, file_id)
    }

    fn children_url(&self, folder_id: &str) -> String {
        format!(
            "{}?q='{}'+in+parents&fields=files(id%2Cname%2CmimeType)\
             &supportsAllDrives=true&includeItemsFromAllDrives=true",
            self.base_url, folder_id
        )
    }

    fn export_url(&self, file_id: &str) -> String {
        format!("{}/{}/export?mimeType=text/plain", self.base_url, file_id)
    }

    fn media_url(&self, file_id: &str) -> String {
        format!("{}/{}?alt=media", self.base_url, file_id)
    }

    async fn get(&self, url: &str, token: &str) -> Result<Response, DriveError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;
        Ok(response)
    }

    /// Reads a text body, treating non-2xx responses as errors.
    async fn get_text(&self, url: &str, token: &str) -> Result<String, DriveError> {
        let response = self.get(url, token).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Status { status, body });
        }

        Ok(response.text().await?)
    }
}

impl Default for GoogleDriveClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriveApi for GoogleDriveClient {
    async fn file_metadata(
        &self,
        file_id: &str,
        token: &str,
    ) -> Result<Option<FileDescriptor>, DriveError> {
        tracing::debug!("Fetching Drive metadata: {}", file_id);

        let response = self.get(&self.metadata_url(file_id), token).await?;
        if !response.status().is_success() {
            tracing::debug!("Metadata lookup for {} returned {}", file_id, response.status());
            return Ok(None);
        }

        let file: ApiFile = response.json().await?;
        Ok(file.into_descriptor())
    }

    async fn list_children(
        &self,
        folder_id: &str,
        token: &str,
    ) -> Result<Option<Vec<FileDescriptor>>, DriveError> {
        tracing::debug!("Listing Drive folder: {}", folder_id);

        let response = self.get(&self.children_url(folder_id), token).await?;
        if !response.status().is_success() {
            tracing::debug!("Listing {} returned {}", folder_id, response.status());
            return Ok(None);
        }

        let list: ApiFileList = response.json().await?;
        Ok(list.files.map(|files| {
            files
                .into_iter()
                .filter_map(ApiFile::into_descriptor)
                .collect()
        }))
    }

    async fn export_text(&self, file_id: &str, token: &str) -> Result<String, DriveError> {
        self.get_text(&self.export_url(file_id), token).await
    }

    async fn download_text(&self, file_id: &str, token: &str) -> Result<String, DriveError> {
        self.get_text(&self.media_url(file_id), token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_match_drive_v3() {
        let client = GoogleDriveClient::new();

        assert_eq!(
            client.metadata_url("abc"),
            "https://www.googleapis.com/drive/v3/files/abc?fields=id%2Cname%2CmimeType"
        );
        assert_eq!(
            client.export_url("abc"),
            "https://www.googleapis.com/drive/v3/files/abc/export?mimeType=text/plain"
        );
        assert_eq!(
            client.media_url("abc"),
            "https://www.googleapis.com/drive/v3/files/abc?alt=media"
        );
    }

    #[test]
    fn test_children_url_includes_shared_drives() {
        let client = GoogleDriveClient::with_base_url("http://localhost:9000/files/");
        let url = client.children_url("folder1");

        assert!(url.starts_with("http://localhost:9000/files?q='folder1'+in+parents"));
        assert!(url.contains("supportsAllDrives=true"));
        assert!(url.contains("includeItemsFromAllDrives=true"));
    }

    #[test]
    fn test_error_payload_has_no_descriptor() {
        let json = r#"{"error":{"code":404,"message":"File not found"}}"#;
        let file: ApiFile = serde_json::from_str(json).unwrap();
        assert!(file.into_descriptor().is_none());
    }

    #[test]
    fn test_listing_without_files_is_none() {
        let denied: ApiFileList = serde_json::from_str(r#"{"error":{}}"#).unwrap();
        assert!(denied.files.is_none());

        let empty: ApiFileList = serde_json::from_str(r#"{"files":[]}"#).unwrap();
        assert_eq!(empty.files.map(|f| f.len()), Some(0));
    }

    #[test]
    fn test_metadata_maps_to_descriptor() {
        let json = r#"{"id":"1","name":"Report.txt","mimeType":"text/plain"}"#;
        let file: ApiFile = serde_json::from_str(json).unwrap();

        assert_eq!(
            file.into_descriptor(),
            Some(FileDescriptor::new("1", "Report.txt", "text/plain"))
        );
    }
}
