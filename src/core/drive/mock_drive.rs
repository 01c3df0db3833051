// In-memory Drive used by the core tests.

use super::drive_api::{DriveApi, DriveError};
use super::drive_models::FileDescriptor;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockDrive {
    files: DashMap<String, (FileDescriptor, String)>,
    folders: DashMap<String, Vec<String>>,
    failing: DashSet<String>,
    hanging: DashSet<String>,
    exports: AtomicUsize,
    downloads: AtomicUsize,
}

impl MockDrive {
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
            folders: DashMap::new(),
            failing: DashSet::new(),
            hanging: DashSet::new(),
            exports: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn add_file(&self, id: &str, name: &str, mime_type: &str, content: &str) {
        self.files.insert(
            id.to_string(),
            (FileDescriptor::new(id, name, mime_type), content.to_string()),
        );
    }

    /// Registers a folder listing. Children must be added with `add_file`.
    pub fn add_folder(&self, folder_id: &str, child_ids: &[&str]) {
        self.folders.insert(
            folder_id.to_string(),
            child_ids.iter().map(|id| id.to_string()).collect(),
        );
    }

    /// Makes content reads for `id` fail with a 500.
    pub fn fail_content(&self, id: &str) {
        self.failing.insert(id.to_string());
    }

    /// Makes content reads for `id` never complete.
    pub fn hang_content(&self, id: &str) {
        self.hanging.insert(id.to_string());
    }

    pub fn export_calls(&self) -> usize {
        self.exports.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    async fn content(&self, file_id: &str) -> Result<String, DriveError> {
        tokio::task::yield_now().await;
        if self.hanging.contains(file_id) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(file_id) {
            return Err(DriveError::Status {
                status: 500,
                body: "backend error".to_string(),
            });
        }

        self.files
            .get(file_id)
            .map(|entry| entry.value().1.clone())
            .ok_or_else(|| DriveError::Status {
                status: 404,
                body: "File not found".to_string(),
            })
    }
}

#[async_trait]
impl DriveApi for MockDrive {
    async fn file_metadata(
        &self,
        file_id: &str,
        _token: &str,
    ) -> Result<Option<FileDescriptor>, DriveError> {
        Ok(self.files.get(file_id).map(|entry| entry.value().0.clone()))
    }

    async fn list_children(
        &self,
        folder_id: &str,
        _token: &str,
    ) -> Result<Option<Vec<FileDescriptor>>, DriveError> {
        Ok(self.folders.get(folder_id).map(|children| {
            children
                .iter()
                .filter_map(|id| self.files.get(id).map(|entry| entry.value().0.clone()))
                .collect()
        }))
    }

    async fn export_text(&self, file_id: &str, _token: &str) -> Result<String, DriveError> {
        self.exports.fetch_add(1, Ordering::SeqCst);
        self.content(file_id).await
    }

    async fn download_text(&self, file_id: &str, _token: &str) -> Result<String, DriveError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.content(file_id).await
    }
}
