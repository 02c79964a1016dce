//! Arkiv deposit pipeline
//!
//! The ordered ingestion pipeline that turns an accepted deposit request into
//! a registered archival object: validate → transform → create → enrich →
//! ingest files → submit. Each stage can fail independently; failures before
//! dataset creation reject the request outright, failures after it downgrade
//! the result to "created but incomplete" without rolling anything back.

pub mod enhance;
pub mod ingest;
pub mod pipeline;
pub mod submit;
pub mod transform;
pub mod validator;

pub use enhance::enhance_with_defaults;
pub use ingest::FileIngestor;
pub use pipeline::{DepositOutcome, DepositPipeline};
pub use submit::SubmissionCoordinator;
pub use transform::{JsonTransformer, MetadataTransformer};
pub use validator::{MetadataValidator, SchemaValidator};
