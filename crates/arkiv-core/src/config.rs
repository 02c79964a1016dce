//! Configuration module
//!
//! Deposit service configuration, read from `ARKIV_*` environment variables
//! with sensible defaults for local development.

use std::env;
use std::path::PathBuf;

use crate::models::metadata::SCHEMA_VERSION_0_1;

// Common constants
const DEFAULT_STORAGE_PATH: &str = "./data";
const MAX_FILES_PER_DEPOSIT: usize = 1024;
const MAX_METADATA_BYTES: usize = 1024 * 1024;

/// Deposit service configuration
#[derive(Clone, Debug)]
pub struct DepositConfig {
    /// Root directory of the local dataset store
    pub storage_path: PathBuf,
    /// Metadata schema version deposits are validated against
    pub schema_version: String,
    /// Upper bound on the number of files in a single deposit
    pub max_files_per_deposit: usize,
    /// Upper bound on the metadata payload size in bytes
    pub max_metadata_bytes: usize,
}

impl DepositConfig {
    pub fn from_env() -> Self {
        Self {
            storage_path: env::var("ARKIV_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
            schema_version: env::var("ARKIV_SCHEMA_VERSION")
                .unwrap_or_else(|_| SCHEMA_VERSION_0_1.to_string()),
            max_files_per_deposit: env::var("ARKIV_MAX_FILES_PER_DEPOSIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_FILES_PER_DEPOSIT),
            max_metadata_bytes: env::var("ARKIV_MAX_METADATA_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_METADATA_BYTES),
        }
    }
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            schema_version: SCHEMA_VERSION_0_1.to_string(),
            max_files_per_deposit: MAX_FILES_PER_DEPOSIT,
            max_metadata_bytes: MAX_METADATA_BYTES,
        }
    }
}
