//! File ingestion
//!
//! Adds the staged files of a deposit to its dataset, one store call per file,
//! under the work-report discipline: one start signal before the batch, one
//! exception per file that cannot be added, one end signal after the batch
//! whether or not anything failed. A per-file failure never aborts the rest of
//! the batch. The post-ingestion count verification is the orchestrator's job,
//! not this component's.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arkiv_core::models::{Dataset, Principal};
use arkiv_core::reporter::{WorkFailure, WorkReporter};
use arkiv_core::DepositError;
use arkiv_storage::DatasetStore;

pub struct FileIngestor {
    store: Arc<dyn DatasetStore>,
}

impl FileIngestor {
    pub fn new(store: Arc<dyn DatasetStore>) -> Self {
        Self { store }
    }

    /// Ingest the listed files from the staging directory into the dataset.
    ///
    /// Returns `Err` only when the batch could not run at all (unusable
    /// staging directory); per-file failures are recorded on the reporter.
    pub async fn ingest(
        &self,
        principal: &Principal,
        dataset: &Dataset,
        staging_dir: &Path,
        files: &[PathBuf],
        reporter: &dyn WorkReporter,
    ) -> Result<(), DepositError> {
        let staging = tokio::fs::metadata(staging_dir).await.map_err(|e| {
            DepositError::Storage(format!(
                "staging directory {}: {}",
                staging_dir.display(),
                e
            ))
        })?;
        if !staging.is_dir() {
            return Err(DepositError::Storage(format!(
                "staging location {} is not a directory",
                staging_dir.display()
            )));
        }

        reporter.on_work_start();
        tracing::debug!(
            dataset_id = %dataset.id,
            staging = %staging_dir.display(),
            requested = files.len(),
            "Ingesting files"
        );

        for relative in files {
            let source = staging_dir.join(relative);
            if let Err(e) = self
                .store
                .add_file(principal, dataset.id, &source, relative)
                .await
            {
                tracing::error!(
                    error = %e,
                    dataset_id = %dataset.id,
                    file = %relative.display(),
                    "Failed to add file"
                );
                reporter.on_exception(WorkFailure::new(
                    "ingest",
                    format!("{}: {}", relative.display(), e),
                ));
            }
        }

        reporter.on_work_end();
        Ok(())
    }
}
