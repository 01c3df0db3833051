// =============================================================================
// FOLDER AGGREGATION
// =============================================================================
//
// Expands a resolved link into the list of files the assistant can see:
// - Document links become a one-element collection
// - Folder links become every direct child, fetched concurrently
//
// Aggregation is all-or-nothing. The session only ever publishes a complete
// collection or an empty one, never a partial result.

use super::content_fetcher::fetch_content;
use super::drive_api::{DriveApi, DriveError};
use super::drive_models::{FileDescriptor, FileRecord};
use crate::core::links::LinkReference;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;

/// Default number of child fetches in flight at once.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid Google Drive folder or document link")]
    InvalidLink,

    #[error("access denied or not found")]
    DocumentUnavailable,

    #[error("no files found or access denied")]
    FolderUnavailable,

    #[error("failed to fetch file content: {0}")]
    Fetch(#[from] DriveError),
}

/// Tuning knobs for an aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Maximum concurrent content fetches for a folder.
    pub max_concurrent_fetches: usize,
    /// Characters kept per file. `None` keeps everything.
    pub retain_chars: Option<usize>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_FETCH_CONCURRENCY,
            retain_chars: None,
        }
    }
}

pub struct FolderAggregator<A: DriveApi + ?Sized> {
    api: Arc<A>,
    config: AggregatorConfig,
}

impl<A: DriveApi + ?Sized> FolderAggregator<A> {
    pub fn new(api: Arc<A>, config: AggregatorConfig) -> Self {
        Self { api, config }
    }

    /// Resolves `reference` into file records.
    pub async fn aggregate(
        &self,
        reference: &LinkReference,
        token: &str,
    ) -> Result<Vec<FileRecord>, ResolutionError> {
        match reference {
            LinkReference::Document(id) => {
                let descriptor = self
                    .api
                    .file_metadata(id, token)
                    .await?
                    .filter(|d| !d.id.is_empty())
                    .ok_or(ResolutionError::DocumentUnavailable)?;

                let record = self.fetch_record(descriptor, token).await?;
                Ok(vec![record])
            }
            LinkReference::Folder(id) => {
                let children = self
                    .api
                    .list_children(id, token)
                    .await?
                    .ok_or(ResolutionError::FolderUnavailable)?;

                tracing::debug!("Folder {} has {} child file(s)", id, children.len());
                self.fetch_all(children, token).await
            }
            LinkReference::Invalid => Err(ResolutionError::InvalidLink),
        }
    }

    /// Like `aggregate`, but any failure collapses to an empty collection.
    pub async fn aggregate_or_empty(
        &self,
        reference: &LinkReference,
        token: &str,
    ) -> Vec<FileRecord> {
        match self.aggregate(reference, token).await {
            Ok(files) => {
                tracing::info!("Aggregated {} file(s)", files.len());
                files
            }
            Err(e) => {
                tracing::warn!("Aggregation failed, continuing with no files: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetches every child, waits for all of them to settle, then fails the
    /// whole group if any single fetch failed. Output keeps listing order.
    async fn fetch_all(
        &self,
        children: Vec<FileDescriptor>,
        token: &str,
    ) -> Result<Vec<FileRecord>, ResolutionError> {
        let results: Vec<Result<FileRecord, DriveError>> = stream::iter(children)
            .map(move |descriptor| self.fetch_record(descriptor, token))
            .buffered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let records = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn fetch_record(
        &self,
        descriptor: FileDescriptor,
        token: &str,
    ) -> Result<FileRecord, DriveError> {
        let content = fetch_content(self.api.as_ref(), &descriptor, token).await?;

        Ok(match self.config.retain_chars {
            Some(max_chars) => FileRecord::retained(descriptor, content, max_chars),
            None => FileRecord::full(descriptor, content),
        })
    }
}
