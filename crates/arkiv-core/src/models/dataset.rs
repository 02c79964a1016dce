//! Persisted archival object
//!
//! A [`Dataset`] comes into existence through the store's creation operation
//! and is durable from that moment on: its identifier never changes, and no
//! later pipeline failure removes it. Content files live next to the dataset
//! in the store and are observed through the store's file count, not through
//! this struct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metadata::{MetadataDocument, MetadataFormat};
use super::user::Principal;

/// Lifecycle state of a dataset in the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetState {
    /// Created, may still be receiving metadata and files
    Draft,
    /// Handed to the downstream workflow subsystem
    Submitted,
}

/// Administrative (non-descriptive) metadata, created lazily on first use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeMetadata {
    pub depositor: Option<Principal>,
    pub created_at: DateTime<Utc>,
}

/// The persisted archival object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Store identifier, assigned at creation and immutable thereafter
    pub id: Uuid,
    pub format: MetadataFormat,
    pub owner_id: Option<String>,
    pub metadata: MetadataDocument,
    #[serde(default)]
    pub administrative: Option<AdministrativeMetadata>,
    pub state: DatasetState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dataset {
    /// Build a fresh draft dataset of the given format, carrying the format's
    /// prototype metadata. Called by the store's creation operation only.
    pub fn new(format: MetadataFormat) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            format,
            owner_id: None,
            metadata: MetadataDocument::prototype(format),
            administrative: None,
            state: DatasetState::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the deposited metadata document. Replaces the creation-time
    /// prototype; done exactly once per deposit.
    pub fn set_metadata(&mut self, metadata: MetadataDocument) {
        self.metadata = metadata;
        self.touch();
    }

    /// Administrative metadata, created on first access
    pub fn administrative_mut(&mut self) -> &mut AdministrativeMetadata {
        self.administrative
            .get_or_insert_with(|| AdministrativeMetadata {
                depositor: None,
                created_at: Utc::now(),
            })
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
