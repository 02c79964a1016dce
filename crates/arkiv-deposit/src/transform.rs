//! Metadata transformation
//!
//! Turns validated payload bytes into the canonical [`MetadataDocument`]. The
//! metadata format is read from the application-specific block; a missing or
//! unrecognized format is its own error class, distinct from structural
//! deserialization failures. A transform never silently degrades to an empty
//! document.

use serde::Deserialize;

use arkiv_core::models::{
    metadata::SCHEMA_VERSION_0_1, AccessRights, ApplicationSpecific, MetadataDocument,
    MetadataFormat,
};
use arkiv_core::DepositError;

/// Deserializes validated bytes into the canonical metadata document
pub trait MetadataTransformer: Send + Sync {
    fn transform(&self, payload: &[u8]) -> Result<MetadataDocument, DepositError>;
}

/// Wire form of the document; the format arrives as a free string and is
/// resolved against [`MetadataFormat`] separately so that an unknown value is
/// reported as `UnrecognizedFormat`, not as a deserialization failure.
#[derive(Deserialize)]
struct WireDocument {
    #[serde(default)]
    schema_version: Option<String>,
    title: String,
    #[serde(default)]
    creators: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    audience: Vec<String>,
    #[serde(default)]
    application: Option<WireApplication>,
    #[serde(default)]
    access_rights: Option<AccessRights>,
}

#[derive(Deserialize)]
struct WireApplication {
    #[serde(default)]
    metadata_format: Option<String>,
}

/// Default transformer for the JSON metadata schema
pub struct JsonTransformer;

impl MetadataTransformer for JsonTransformer {
    fn transform(&self, payload: &[u8]) -> Result<MetadataDocument, DepositError> {
        let wire: WireDocument = serde_json::from_slice(payload)
            .map_err(|e| DepositError::Deserialization(e.to_string()))?;

        let format_value = wire
            .application
            .as_ref()
            .and_then(|a| a.metadata_format.as_deref())
            .ok_or_else(|| {
                DepositError::UnrecognizedFormat(
                    "application-specific metadata block is missing".to_string(),
                )
            })?;
        let format = MetadataFormat::parse(format_value)
            .ok_or_else(|| DepositError::UnrecognizedFormat(format_value.to_string()))?;

        Ok(MetadataDocument {
            schema_version: wire
                .schema_version
                .unwrap_or_else(|| SCHEMA_VERSION_0_1.to_string()),
            title: wire.title,
            creators: wire.creators,
            description: wire.description,
            audience: wire.audience,
            application: ApplicationSpecific {
                metadata_format: format,
            },
            access_rights: wire.access_rights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_valid_payload() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "schema_version": "0.1",
            "title": "Bronze age settlements",
            "creators": ["J. Fields", "M. Braun"],
            "description": "Survey data",
            "audience": ["Archaeology"],
            "application": { "metadata_format": "archaeology" },
            "access_rights": "open"
        }))
        .unwrap();

        let document = JsonTransformer.transform(&payload).unwrap();
        assert_eq!(document.title, "Bronze age settlements");
        assert_eq!(document.creators.len(), 2);
        assert_eq!(document.format(), MetadataFormat::Archaeology);
        assert_eq!(document.access_rights, Some(AccessRights::Open));
    }

    #[test]
    fn missing_application_block_is_unrecognized_format() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "title": "T",
            "creators": ["C"],
        }))
        .unwrap();
        match JsonTransformer.transform(&payload) {
            Err(DepositError::UnrecognizedFormat(msg)) => assert!(msg.contains("missing")),
            other => panic!("expected UnrecognizedFormat, got {other:?}"),
        }
    }

    #[test]
    fn unknown_format_value_is_unrecognized_format() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "title": "T",
            "creators": ["C"],
            "application": { "metadata_format": "geology" }
        }))
        .unwrap();
        match JsonTransformer.transform(&payload) {
            Err(DepositError::UnrecognizedFormat(msg)) => assert_eq!(msg, "geology"),
            other => panic!("expected UnrecognizedFormat, got {other:?}"),
        }
    }

    #[test]
    fn structural_mismatch_is_deserialization_error() {
        // creators must be an array, not a scalar
        let payload = serde_json::to_vec(&serde_json::json!({
            "title": "T",
            "creators": "just me",
            "application": { "metadata_format": "history" }
        }))
        .unwrap();
        match JsonTransformer.transform(&payload) {
            Err(DepositError::Deserialization(_)) => {}
            other => panic!("expected Deserialization, got {other:?}"),
        }
    }

    #[test]
    fn defaults_schema_version_when_absent() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "title": "T",
            "creators": ["C"],
            "application": { "metadata_format": "history" }
        }))
        .unwrap();
        let document = JsonTransformer.transform(&payload).unwrap();
        assert_eq!(document.schema_version, SCHEMA_VERSION_0_1);
        assert!(document.audience.is_empty());
    }
}
