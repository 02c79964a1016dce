//! Data models for the deposit service
//!
//! This module contains the domain structures shared across the pipeline,
//! organized by area: the persisted dataset, its descriptive metadata, the
//! depositing principal, and the inbound deposit request.

pub mod dataset;
pub mod deposit;
pub mod metadata;
pub mod user;

// Re-export all models for convenient imports
pub use dataset::*;
pub use deposit::*;
pub use metadata::*;
pub use user::*;
