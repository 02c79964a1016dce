//! Deposit pipeline orchestrator
//!
//! Sequences the stages `Received → Validated → Transformed → Created →
//! FilesIngested → Submitted → Done` and classifies the terminal outcome.
//! Transitions are one-directional: there is no retry and no rollback. A
//! failure before dataset creation leaves nothing behind and rejects or fails
//! the request; a failure from creation onward downgrades the result to
//! [`DepositOutcome::CreatedButIncomplete`], always carrying the dataset with
//! its already-assigned store identifier so the caller can locate the partial
//! object and retry ingestion or submission against it.

use std::sync::Arc;

use arkiv_core::models::{Dataset, DatasetState, DepositRequest};
use arkiv_core::reporter::{WorkReport, WorkReporter};
use arkiv_core::validation::Diagnostics;
use arkiv_core::{DepositConfig, DepositError};
use arkiv_storage::{DatasetStore, SubmissionGateway};

use crate::enhance::enhance_with_defaults;
use crate::ingest::FileIngestor;
use crate::submit::SubmissionCoordinator;
use crate::transform::{JsonTransformer, MetadataTransformer};
use crate::validator::{MetadataValidator, SchemaValidator};

/// Terminal classification of one deposit request; exactly one per request
#[derive(Debug)]
pub enum DepositOutcome {
    /// Fully validated, stored, ingested, and submitted
    Success(Dataset),
    /// Rejected before anything durable existed; no dataset was created
    RejectedInput(DepositError),
    /// The dataset exists but a later stage failed; nothing is rolled back
    CreatedButIncomplete {
        dataset: Dataset,
        reason: DepositError,
    },
    /// Hard failure with no dataset to report
    Failed(DepositError),
}

impl DepositOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DepositOutcome::Success(_))
    }

    /// The dataset, for outcomes where one exists
    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            DepositOutcome::Success(dataset) => Some(dataset),
            DepositOutcome::CreatedButIncomplete { dataset, .. } => Some(dataset),
            DepositOutcome::RejectedInput(_) | DepositOutcome::Failed(_) => None,
        }
    }
}

/// The deposit ingestion pipeline
///
/// All collaborators are explicit constructor parameters; the pipeline holds
/// no process-wide state and no locks. One request is processed end-to-end by
/// one logical worker; concurrent requests share nothing but the store.
pub struct DepositPipeline {
    store: Arc<dyn DatasetStore>,
    validator: Arc<dyn MetadataValidator>,
    transformer: Arc<dyn MetadataTransformer>,
    ingestor: FileIngestor,
    coordinator: SubmissionCoordinator,
    config: DepositConfig,
}

impl DepositPipeline {
    /// Pipeline with the default JSON validator and transformer
    pub fn new(
        store: Arc<dyn DatasetStore>,
        gateway: Arc<dyn SubmissionGateway>,
        config: DepositConfig,
    ) -> Self {
        let validator = Arc::new(SchemaValidator::new(config.max_metadata_bytes));
        Self::with_components(store, gateway, validator, Arc::new(JsonTransformer), config)
    }

    pub fn with_components(
        store: Arc<dyn DatasetStore>,
        gateway: Arc<dyn SubmissionGateway>,
        validator: Arc<dyn MetadataValidator>,
        transformer: Arc<dyn MetadataTransformer>,
        config: DepositConfig,
    ) -> Self {
        Self {
            ingestor: FileIngestor::new(store.clone()),
            coordinator: SubmissionCoordinator::new(gateway),
            store,
            validator,
            transformer,
            config,
        }
    }

    /// Run one deposit request through the pipeline
    pub async fn execute(&self, request: DepositRequest) -> DepositOutcome {
        let DepositRequest {
            principal,
            metadata,
            staging_dir,
            files,
        } = request;

        tracing::info!(
            user = %principal.user_id,
            files = files.len(),
            "Deposit received"
        );

        // Received -> Validated
        if files.len() > self.config.max_files_per_deposit {
            let mut diagnostics = Diagnostics::new();
            diagnostics.fatal(
                "/files",
                format!(
                    "deposit lists {} files, limit is {}",
                    files.len(),
                    self.config.max_files_per_deposit
                ),
            );
            return self.reject(DepositError::SchemaValidation { diagnostics });
        }
        let diagnostics = match self
            .validator
            .validate(&metadata, &self.config.schema_version)
        {
            Ok(diagnostics) => diagnostics,
            Err(e) => return self.reject(e),
        };
        if !diagnostics.passed() {
            return self.reject(DepositError::SchemaValidation { diagnostics });
        }

        // Validated -> Transformed
        let mut document = match self.transformer.transform(&metadata) {
            Ok(document) => document,
            Err(e) => return self.reject(e),
        };

        // Transformed -> Created. The sole creation point: from here on the
        // dataset exists durably and failures downgrade instead of rejecting.
        let mut dataset = match self.store.create_dataset(document.format()).await {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!(error = %e, "Dataset creation failed");
                return DepositOutcome::Failed(DepositError::CreationFailed(e.to_string()));
            }
        };
        tracing::info!(
            dataset_id = %dataset.id,
            format = %dataset.format,
            "Dataset created"
        );

        enhance_with_defaults(&mut document, &dataset);
        dataset.set_metadata(document);
        dataset.owner_id = Some(principal.user_id.clone());
        dataset.administrative_mut().depositor = Some(principal.clone());
        if let Err(e) = self.store.save_dataset(&dataset).await {
            return self.incomplete(dataset, DepositError::Storage(e.to_string()));
        }

        // Created -> FilesIngested
        let requested = files.len();
        let report = WorkReport::new("ingesting files");
        if let Err(reason) = self
            .ingestor
            .ingest(&principal, &dataset, &staging_dir, &files, &report)
            .await
        {
            return self.incomplete(dataset, reason);
        }
        if let Err(reason) = report.check_ok() {
            return self.incomplete(dataset, reason);
        }
        // The reporter catches explicit failures; the count re-query catches
        // silent drops. Counts all files under the dataset, which for a
        // freshly created one equals this request's contribution.
        let stored = match self.store.count_files(dataset.id).await {
            Ok(stored) => stored,
            Err(e) => return self.incomplete(dataset, DepositError::Storage(e.to_string())),
        };
        if stored < requested {
            return self.incomplete(
                dataset,
                DepositError::PostCountMismatch {
                    expected: requested,
                    actual: stored,
                },
            );
        }
        tracing::info!(
            dataset_id = %dataset.id,
            stored = stored,
            "Files ingested"
        );

        // FilesIngested -> Submitted
        let report = WorkReport::new("submitting dataset");
        if let Err(reason) = self
            .coordinator
            .submit(&dataset, &principal, &report)
            .await
        {
            return self.incomplete(dataset, reason);
        }
        if let Err(reason) = report.check_ok() {
            return self.incomplete(dataset, reason);
        }
        dataset.state = DatasetState::Submitted;

        // Done
        tracing::info!(dataset_id = %dataset.id, "Deposit complete");
        DepositOutcome::Success(dataset)
    }

    fn reject(&self, reason: DepositError) -> DepositOutcome {
        tracing::warn!(reason = %reason, "Deposit rejected");
        DepositOutcome::RejectedInput(reason)
    }

    fn incomplete(&self, dataset: Dataset, reason: DepositError) -> DepositOutcome {
        tracing::warn!(
            dataset_id = %dataset.id,
            reason = %reason,
            "Dataset created but deposit incomplete"
        );
        DepositOutcome::CreatedButIncomplete { dataset, reason }
    }
}
