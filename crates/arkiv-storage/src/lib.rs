//! Arkiv storage backends
//!
//! This crate defines the [`DatasetStore`] and [`SubmissionGateway`] traits the
//! deposit pipeline is written against, and the local filesystem backend that
//! implements both. The store is the only component that creates datasets;
//! once created, a dataset is durable regardless of what the rest of the
//! pipeline does.

pub mod local;
pub mod traits;

pub use local::LocalDatasetStore;
pub use traits::{DatasetStore, StorageError, StorageResult, SubmissionGateway};
