//! Local filesystem dataset store
//!
//! Layout: `{base}/datasets/{id}/dataset.json` holds the dataset record,
//! `{base}/datasets/{id}/files/` holds the ingested content tree.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use arkiv_core::models::{Dataset, DatasetState, MetadataFormat, Principal};
use arkiv_core::reporter::{WorkFailure, WorkReporter};

use crate::traits::{DatasetStore, StorageError, StorageResult, SubmissionGateway};

const DATASETS_DIR: &str = "datasets";
const DATASET_FILE: &str = "dataset.json";
const FILES_DIR: &str = "files";

/// Filesystem-backed implementation of [`DatasetStore`] and [`SubmissionGateway`]
#[derive(Clone)]
pub struct LocalDatasetStore {
    base_path: PathBuf,
}

impl LocalDatasetStore {
    /// Create a new store rooted at `base_path`, creating the directory tree
    /// if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(base_path.join(DATASETS_DIR))
            .await
            .map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create store directory {}: {}",
                    base_path.display(),
                    e
                ))
            })?;

        Ok(LocalDatasetStore { base_path })
    }

    fn dataset_dir(&self, id: Uuid) -> PathBuf {
        self.base_path.join(DATASETS_DIR).join(id.to_string())
    }

    fn dataset_file(&self, id: Uuid) -> PathBuf {
        self.dataset_dir(id).join(DATASET_FILE)
    }

    fn files_dir(&self, id: Uuid) -> PathBuf {
        self.dataset_dir(id).join(FILES_DIR)
    }

    /// Reject relative paths that would land outside the dataset's file tree
    fn validate_relative(relative: &Path) -> StorageResult<()> {
        if relative.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath("empty path".to_string()));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::InvalidPath(format!(
                        "{} escapes the dataset file tree",
                        relative.display()
                    )));
                }
            }
        }
        Ok(())
    }

    async fn write_dataset(&self, dataset: &Dataset) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(dataset)?;
        fs::write(self.dataset_file(dataset.id), json)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!("dataset {}: {}", dataset.id, e))
            })?;
        Ok(())
    }

    async fn dataset_exists(&self, id: Uuid) -> StorageResult<bool> {
        Ok(fs::try_exists(self.dataset_file(id)).await?)
    }
}

#[async_trait]
impl DatasetStore for LocalDatasetStore {
    async fn create_dataset(&self, format: MetadataFormat) -> StorageResult<Dataset> {
        let dataset = Dataset::new(format);

        fs::create_dir_all(self.files_dir(dataset.id))
            .await
            .map_err(|e| StorageError::CreateFailed(format!("dataset {}: {}", dataset.id, e)))?;

        let json = serde_json::to_vec_pretty(&dataset)?;
        fs::write(self.dataset_file(dataset.id), json)
            .await
            .map_err(|e| StorageError::CreateFailed(format!("dataset {}: {}", dataset.id, e)))?;

        tracing::info!(
            dataset_id = %dataset.id,
            format = %format,
            "Created dataset"
        );

        Ok(dataset)
    }

    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()> {
        if !self.dataset_exists(dataset.id).await? {
            return Err(StorageError::NotFound(dataset.id));
        }
        self.write_dataset(dataset).await?;
        tracing::debug!(dataset_id = %dataset.id, "Saved dataset");
        Ok(())
    }

    async fn load_dataset(&self, id: Uuid) -> StorageResult<Dataset> {
        let raw = match fs::read(self.dataset_file(id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id));
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn add_file(
        &self,
        principal: &Principal,
        dataset_id: Uuid,
        source: &Path,
        relative: &Path,
    ) -> StorageResult<()> {
        Self::validate_relative(relative)?;
        if !self.dataset_exists(dataset_id).await? {
            return Err(StorageError::NotFound(dataset_id));
        }

        let dest = self.files_dir(dataset_id).join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        let bytes = fs::copy(source, &dest).await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", relative.display(), e))
        })?;

        tracing::debug!(
            dataset_id = %dataset_id,
            user = %principal.user_id,
            file = %relative.display(),
            size_bytes = bytes,
            "Added file to dataset"
        );

        Ok(())
    }

    async fn count_files(&self, dataset_id: Uuid) -> StorageResult<usize> {
        if !self.dataset_exists(dataset_id).await? {
            return Err(StorageError::NotFound(dataset_id));
        }

        let files_dir = self.files_dir(dataset_id);
        if !fs::try_exists(&files_dir).await? {
            return Ok(0);
        }

        let mut count = 0;
        let mut pending = vec![files_dir];
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    async fn list_datasets(&self) -> StorageResult<Vec<Dataset>> {
        let mut datasets = Vec::new();
        let mut entries = fs::read_dir(self.base_path.join(DATASETS_DIR)).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let record = entry.path().join(DATASET_FILE);
            match fs::read(&record).await {
                Ok(raw) => match serde_json::from_slice::<Dataset>(&raw) {
                    Ok(dataset) => datasets.push(dataset),
                    Err(e) => {
                        tracing::warn!(
                            path = %record.display(),
                            error = %e,
                            "Skipping unreadable dataset record"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %record.display(),
                        error = %e,
                        "Skipping dataset directory without record"
                    );
                }
            }
        }
        datasets.sort_by_key(|d| d.created_at);
        Ok(datasets)
    }
}

#[async_trait]
impl SubmissionGateway for LocalDatasetStore {
    /// Hand the dataset to the archive workflow: here, a `Draft -> Submitted`
    /// state transition persisted to disk. Failures along the way are recorded
    /// on the reporter; the start/end pair brackets the whole operation.
    async fn submit(
        &self,
        dataset: &Dataset,
        principal: &Principal,
        reporter: &dyn WorkReporter,
    ) -> StorageResult<()> {
        reporter.on_work_start();
        tracing::debug!(
            dataset_id = %dataset.id,
            user = %principal.user_id,
            "Submitting dataset to workflow"
        );

        match self.load_dataset(dataset.id).await {
            Err(e) => {
                tracing::error!(error = %e, dataset_id = %dataset.id, "Submission failed");
                reporter.on_exception(WorkFailure::new("submit", e.to_string()));
            }
            Ok(stored) if stored.state == DatasetState::Submitted => {
                reporter.on_exception(WorkFailure::new(
                    "submit",
                    format!("dataset {} is already submitted", dataset.id),
                ));
            }
            Ok(_) => {
                let mut submitted = dataset.clone();
                submitted.state = DatasetState::Submitted;
                submitted.touch();
                match self.write_dataset(&submitted).await {
                    Ok(()) => {
                        tracing::info!(dataset_id = %dataset.id, "Dataset submitted");
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            dataset_id = %dataset.id,
                            "Failed to persist submitted state"
                        );
                        reporter.on_exception(WorkFailure::new("submit", e.to_string()));
                    }
                }
            }
        }

        reporter.on_work_end();
        Ok(())
    }
}
