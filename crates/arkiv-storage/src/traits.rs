//! Storage abstraction traits
//!
//! This module defines the traits all dataset storage backends must implement.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use arkiv_core::models::{Dataset, MetadataFormat, Principal};
use arkiv_core::reporter::WorkReporter;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Dataset creation failed: {0}")]
    CreateFailed(String),

    #[error("Dataset write failed: {0}")]
    WriteFailed(String),

    #[error("Dataset not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Submission failed: {0}")]
    SubmitFailed(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Dataset storage abstraction
///
/// `create_dataset` is the sole creation point in the system: when it returns,
/// the dataset exists durably with its store identifier assigned, and nothing
/// the pipeline does afterwards removes it. The returned dataset carries the
/// format's prototype metadata, which doubles as the defaults reference for
/// the enhancer.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Create and persist an empty dataset of the given format
    async fn create_dataset(&self, format: MetadataFormat) -> StorageResult<Dataset>;

    /// Persist the current state of an existing dataset
    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()>;

    /// Load a dataset by its store identifier
    async fn load_dataset(&self, id: Uuid) -> StorageResult<Dataset>;

    /// Add one file's content to a dataset
    ///
    /// `source` is the absolute staging location of the content; `relative` is
    /// the path the file gets inside the dataset. Backends must reject
    /// relative paths that escape the dataset's file tree.
    async fn add_file(
        &self,
        principal: &Principal,
        dataset_id: Uuid,
        source: &Path,
        relative: &Path,
    ) -> StorageResult<()>;

    /// Number of files currently stored under the dataset
    ///
    /// Counts all files, not just those of the latest request; for a freshly
    /// created dataset the two coincide.
    async fn count_files(&self, dataset_id: Uuid) -> StorageResult<usize>;

    /// All datasets in the store
    async fn list_datasets(&self) -> StorageResult<Vec<Dataset>>;
}

/// Downstream workflow/submission subsystem
///
/// Implementations drive the supplied reporter: start before the first
/// submission step, one exception per recoverable failure, end after the last
/// step whether or not anything failed. The caller inspects the reporter
/// afterwards; `Ok(())` only means the subsystem ran, not that it succeeded.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(
        &self,
        dataset: &Dataset,
        principal: &Principal,
        reporter: &dyn WorkReporter,
    ) -> StorageResult<()>;
}
