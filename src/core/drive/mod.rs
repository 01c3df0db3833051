pub mod content_fetcher;
pub mod drive_api;
pub mod drive_models;
pub mod folder_aggregator;

#[cfg(test)]
pub mod mock_drive;

pub use content_fetcher::fetch_content;
pub use drive_api::{DriveApi, DriveError};
pub use drive_models::{FileDescriptor, FileRecord};
pub use folder_aggregator::{AggregatorConfig, FolderAggregator, ResolutionError};
