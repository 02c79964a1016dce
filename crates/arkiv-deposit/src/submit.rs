//! Submission coordination
//!
//! Hands a fully populated dataset to the downstream workflow subsystem. The
//! gateway drives the supplied reporter; the orchestrator inspects the report
//! afterwards. The dataset persists in storage whatever happens here.

use std::sync::Arc;

use arkiv_core::models::{Dataset, Principal};
use arkiv_core::reporter::WorkReporter;
use arkiv_core::DepositError;
use arkiv_storage::SubmissionGateway;

pub struct SubmissionCoordinator {
    gateway: Arc<dyn SubmissionGateway>,
}

impl SubmissionCoordinator {
    pub fn new(gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn submit(
        &self,
        dataset: &Dataset,
        principal: &Principal,
        reporter: &dyn WorkReporter,
    ) -> Result<(), DepositError> {
        tracing::debug!(
            dataset_id = %dataset.id,
            user = %principal.user_id,
            "Handing dataset to submission workflow"
        );

        self.gateway
            .submit(dataset, principal, reporter)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    dataset_id = %dataset.id,
                    "Submission workflow unavailable"
                );
                DepositError::Storage(e.to_string())
            })
    }
}
