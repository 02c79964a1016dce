use std::path::PathBuf;

use bytes::Bytes;

use super::user::Principal;

/// An accepted deposit request
///
/// Immutable once constructed: the pipeline reads from it but never writes
/// back. File paths are relative to the staging directory and keep their
/// request order.
#[derive(Debug, Clone)]
pub struct DepositRequest {
    pub principal: Principal,
    /// Raw metadata payload as received from the client
    pub metadata: Bytes,
    /// Transient location holding the uploaded files prior to ingestion
    pub staging_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl DepositRequest {
    pub fn new(
        principal: Principal,
        metadata: impl Into<Bytes>,
        staging_dir: impl Into<PathBuf>,
        files: Vec<PathBuf>,
    ) -> Self {
        Self {
            principal,
            metadata: metadata.into(),
            staging_dir: staging_dir.into(),
            files,
        }
    }
}
