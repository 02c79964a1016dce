//! Shared test helpers: payload fixtures and mock collaborators

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use arkiv_core::models::{Dataset, MetadataFormat, Principal};
use arkiv_core::reporter::{WorkFailure, WorkReporter};
use arkiv_storage::{DatasetStore, StorageError, StorageResult, SubmissionGateway};

/// Well-formed metadata payload for the given format
pub fn metadata_payload(format: &str, audience: &[&str]) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "schema_version": "0.1",
        "title": "Bronze age settlements",
        "creators": ["J. Fields"],
        "description": "Survey data from the 2019 campaign",
        "audience": audience,
        "application": { "metadata_format": format }
    }))
    .unwrap()
}

pub fn depositor() -> Principal {
    Principal::new("user001").with_display_name("Jo Fields")
}

/// In-memory store with configurable failure behavior
#[derive(Default)]
pub struct MockStore {
    created: AtomicUsize,
    fail_create: bool,
    /// Relative paths whose add_file call fails
    failing_files: Vec<PathBuf>,
    /// Files accepted by add_file but missing from the stored count
    silently_dropped: usize,
    datasets: Mutex<HashMap<Uuid, Dataset>>,
    files: Mutex<HashMap<Uuid, Vec<PathBuf>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_creation() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn failing_file(relative: impl Into<PathBuf>) -> Self {
        Self {
            failing_files: vec![relative.into()],
            ..Self::default()
        }
    }

    pub fn silently_dropping(count: usize) -> Self {
        Self {
            silently_dropped: count,
            ..Self::default()
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Store identifier of the single dataset created during the test
    pub fn only_dataset_id(&self) -> Uuid {
        let datasets = self.datasets.lock().unwrap();
        assert_eq!(datasets.len(), 1, "expected exactly one created dataset");
        *datasets.keys().next().unwrap()
    }
}

#[async_trait]
impl DatasetStore for MockStore {
    async fn create_dataset(&self, format: MetadataFormat) -> StorageResult<Dataset> {
        if self.fail_create {
            return Err(StorageError::CreateFailed("store unavailable".to_string()));
        }
        let dataset = Dataset::new(format);
        self.created.fetch_add(1, Ordering::SeqCst);
        self.datasets
            .lock()
            .unwrap()
            .insert(dataset.id, dataset.clone());
        Ok(dataset)
    }

    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()> {
        let mut datasets = self.datasets.lock().unwrap();
        if !datasets.contains_key(&dataset.id) {
            return Err(StorageError::NotFound(dataset.id));
        }
        datasets.insert(dataset.id, dataset.clone());
        Ok(())
    }

    async fn load_dataset(&self, id: Uuid) -> StorageResult<Dataset> {
        self.datasets
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    async fn add_file(
        &self,
        _principal: &Principal,
        dataset_id: Uuid,
        _source: &Path,
        relative: &Path,
    ) -> StorageResult<()> {
        if self.failing_files.iter().any(|f| f == relative) {
            return Err(StorageError::WriteFailed(format!(
                "{}: permission denied",
                relative.display()
            )));
        }
        self.files
            .lock()
            .unwrap()
            .entry(dataset_id)
            .or_default()
            .push(relative.to_path_buf());
        Ok(())
    }

    async fn count_files(&self, dataset_id: Uuid) -> StorageResult<usize> {
        let stored = self
            .files
            .lock()
            .unwrap()
            .get(&dataset_id)
            .map(|f| f.len())
            .unwrap_or(0);
        Ok(stored.saturating_sub(self.silently_dropped))
    }

    async fn list_datasets(&self) -> StorageResult<Vec<Dataset>> {
        Ok(self.datasets.lock().unwrap().values().cloned().collect())
    }
}

/// Scripted submission subsystem
pub enum GatewayBehavior {
    /// Clean start/end pair, no exceptions
    Succeeds,
    /// Records one exception between start and end
    ReportsException,
    /// Signals start but never end, as a crashed driver would
    NeverEnds,
    /// The subsystem itself is unreachable
    Unavailable,
}

pub struct MockGateway {
    pub behavior: GatewayBehavior,
}

impl MockGateway {
    pub fn new(behavior: GatewayBehavior) -> Self {
        Self { behavior }
    }
}

#[async_trait]
impl SubmissionGateway for MockGateway {
    async fn submit(
        &self,
        _dataset: &Dataset,
        _principal: &Principal,
        reporter: &dyn WorkReporter,
    ) -> StorageResult<()> {
        match self.behavior {
            GatewayBehavior::Succeeds => {
                reporter.on_work_start();
                reporter.on_work_end();
                Ok(())
            }
            GatewayBehavior::ReportsException => {
                reporter.on_work_start();
                reporter.on_exception(WorkFailure::new("submit", "workflow step failed"));
                reporter.on_work_end();
                Ok(())
            }
            GatewayBehavior::NeverEnds => {
                reporter.on_work_start();
                Ok(())
            }
            GatewayBehavior::Unavailable => Err(StorageError::SubmitFailed(
                "workflow subsystem unreachable".to_string(),
            )),
        }
    }
}
