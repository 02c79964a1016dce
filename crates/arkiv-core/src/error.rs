//! Error types module
//!
//! All deposit pipeline failures are unified under the [`DepositError`] enum.
//! The taxonomy distinguishes failures that reject a request before anything
//! durable exists (malformed input, schema validation, unrecognized format,
//! deserialization) from failures that occur after the dataset has been
//! created, where the object persists and the request is downgraded rather
//! than rolled back.

use crate::reporter::WorkFailure;
use crate::validation::Diagnostics;

#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    /// The payload could not be parsed as structured text at all
    #[error("Malformed metadata payload: {0}")]
    MalformedInput(String),

    /// The payload parsed but violated the metadata schema
    #[error("Metadata failed schema validation:\n{diagnostics}")]
    SchemaValidation { diagnostics: Diagnostics },

    /// The application-specific metadata block is missing or names an unknown format
    #[error("Unrecognized metadata format: {0}")]
    UnrecognizedFormat(String),

    /// The payload could not be deserialized into the canonical document
    #[error("Metadata deserialization failed: {0}")]
    Deserialization(String),

    /// Dataset creation failed; nothing durable exists for this request
    #[error("Failed to create dataset: {0}")]
    CreationFailed(String),

    /// A driven sub-operation recorded failures, or exited without signaling
    /// start/completion
    #[error("{client_message}: {} failure(s) recorded", failures.len())]
    IncompleteWork {
        failures: Vec<WorkFailure>,
        client_message: String,
    },

    /// Fewer files stored than requested, with no per-file exception reported
    #[error("Stored file count {actual} is less than the requested {expected}")]
    PostCountMismatch { expected: usize, actual: usize },

    /// Storage-layer failure after the dataset was created
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DepositError {
    /// True for errors that reject the request before any dataset exists.
    /// Everything else occurs from creation onward and downgrades the request
    /// to "created but incomplete" instead of failing it outright.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DepositError::MalformedInput(_)
                | DepositError::SchemaValidation { .. }
                | DepositError::UnrecognizedFormat(_)
                | DepositError::Deserialization(_)
        )
    }

    /// Client-facing message. Internal detail (paths, store internals) stays in
    /// the `Display` output; this is what goes back to the depositor.
    pub fn client_message(&self) -> String {
        match self {
            DepositError::MalformedInput(_) => "Metadata payload could not be parsed".to_string(),
            DepositError::SchemaValidation { diagnostics } => {
                format!("Invalid metadata:\n{}", diagnostics)
            }
            DepositError::UnrecognizedFormat(ref msg) => {
                format!("Unrecognized metadata format: {}", msg)
            }
            DepositError::Deserialization(_) => "Metadata could not be deserialized".to_string(),
            DepositError::CreationFailed(_) => "Could not create a new dataset".to_string(),
            DepositError::IncompleteWork { client_message, .. } => {
                format!("Dataset created but problem with {}", client_message)
            }
            DepositError::PostCountMismatch { expected, actual } => {
                format!("Added only {} files of {}", actual, expected)
            }
            DepositError::Storage(_) => "Dataset created but not fully stored".to_string(),
        }
    }
}
