//! Metadata schema validation
//!
//! The first pipeline stage, and the only one guaranteed to run before any
//! durable mutation. A payload that cannot be parsed at all is a hard
//! [`DepositError::MalformedInput`]; everything the parser can read is checked
//! against the schema and reported through [`Diagnostics`] instead, so the
//! depositor sees every finding at once.

use arkiv_core::models::metadata::KNOWN_SCHEMA_VERSIONS;
use arkiv_core::validation::Diagnostics;
use arkiv_core::DepositError;

/// Validates a raw metadata payload against a schema version
pub trait MetadataValidator: Send + Sync {
    /// Pure check, no side effects. `Err` is reserved for payloads that cannot
    /// be parsed as structured text at all; schema findings land in the
    /// returned [`Diagnostics`].
    fn validate(&self, payload: &[u8], schema_version: &str)
        -> Result<Diagnostics, DepositError>;
}

/// Default validator for the JSON metadata schema
pub struct SchemaValidator {
    max_metadata_bytes: usize,
}

impl SchemaValidator {
    pub fn new(max_metadata_bytes: usize) -> Self {
        Self { max_metadata_bytes }
    }
}

impl MetadataValidator for SchemaValidator {
    fn validate(
        &self,
        payload: &[u8],
        schema_version: &str,
    ) -> Result<Diagnostics, DepositError> {
        if payload.is_empty() {
            return Err(DepositError::MalformedInput("empty payload".to_string()));
        }

        let mut diagnostics = Diagnostics::new();

        if payload.len() > self.max_metadata_bytes {
            diagnostics.fatal(
                "/",
                format!(
                    "payload of {} bytes exceeds the {} byte limit",
                    payload.len(),
                    self.max_metadata_bytes
                ),
            );
            return Ok(diagnostics);
        }

        let text = std::str::from_utf8(payload).map_err(|e| {
            DepositError::MalformedInput(format!("payload is not valid UTF-8: {e}"))
        })?;
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| DepositError::MalformedInput(e.to_string()))?;

        let Some(object) = value.as_object() else {
            diagnostics.fatal("/", "document root must be an object");
            return Ok(diagnostics);
        };

        if !KNOWN_SCHEMA_VERSIONS.contains(&schema_version) {
            diagnostics.fatal(
                "/schema_version",
                format!("unknown schema version {schema_version}"),
            );
            return Ok(diagnostics);
        }
        if let Some(declared) = object.get("schema_version").and_then(|v| v.as_str()) {
            if declared != schema_version {
                diagnostics.error(
                    "/schema_version",
                    format!("document declares version {declared}, expected {schema_version}"),
                );
            }
        }

        let has_title = object
            .get("title")
            .and_then(|v| v.as_str())
            .is_some_and(|t| !t.trim().is_empty());
        if !has_title {
            diagnostics.error("/title", "title is required");
        }

        let has_creator = object
            .get("creators")
            .and_then(|v| v.as_array())
            .is_some_and(|a| a.iter().filter_map(|v| v.as_str()).any(|s| !s.trim().is_empty()));
        if !has_creator {
            diagnostics.error("/creators", "at least one creator is required");
        }

        let has_description = object
            .get("description")
            .and_then(|v| v.as_str())
            .is_some_and(|d| !d.trim().is_empty());
        if !has_description {
            diagnostics.warning("/description", "no description given");
        }

        let has_audience = object
            .get("audience")
            .and_then(|v| v.as_array())
            .is_some_and(|a| !a.is_empty());
        if !has_audience {
            diagnostics.warning("/audience", "no audience terms given, format defaults apply");
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkiv_core::models::metadata::SCHEMA_VERSION_0_1;

    fn validator() -> SchemaValidator {
        SchemaValidator::new(1024 * 1024)
    }

    fn valid_payload() -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "schema_version": "0.1",
            "title": "Bronze age settlements",
            "creators": ["J. Fields"],
            "description": "Survey data from the 2019 campaign",
            "audience": ["Archaeology"],
            "application": { "metadata_format": "archaeology" }
        }))
        .unwrap()
    }

    #[test]
    fn valid_payload_passes() {
        let diagnostics = validator()
            .validate(&valid_payload(), SCHEMA_VERSION_0_1)
            .unwrap();
        assert!(diagnostics.passed(), "unexpected findings: {diagnostics}");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn empty_payload_is_malformed() {
        match validator().validate(b"", SCHEMA_VERSION_0_1) {
            Err(DepositError::MalformedInput(_)) => {}
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        match validator().validate(&[0xff, 0xfe, 0x00], SCHEMA_VERSION_0_1) {
            Err(DepositError::MalformedInput(msg)) => assert!(msg.contains("UTF-8")),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn json_syntax_error_is_malformed() {
        match validator().validate(b"{ not json", SCHEMA_VERSION_0_1) {
            Err(DepositError::MalformedInput(_)) => {}
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn oversize_payload_is_fatal_finding() {
        let validator = SchemaValidator::new(16);
        let diagnostics = validator
            .validate(&valid_payload(), SCHEMA_VERSION_0_1)
            .unwrap();
        assert!(!diagnostics.passed());
        assert_eq!(diagnostics.fatals().len(), 1);
    }

    #[test]
    fn non_object_root_is_fatal_finding() {
        let diagnostics = validator().validate(b"[1, 2, 3]", SCHEMA_VERSION_0_1).unwrap();
        assert!(!diagnostics.passed());
        assert_eq!(diagnostics.fatals().len(), 1);
    }

    #[test]
    fn unknown_schema_version_is_fatal_finding() {
        let diagnostics = validator().validate(&valid_payload(), "9.9").unwrap();
        assert!(!diagnostics.passed());
        assert!(diagnostics.fatals()[0].message.contains("9.9"));
    }

    #[test]
    fn declared_version_mismatch_is_error() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "schema_version": "0.0",
            "title": "T",
            "creators": ["C"],
        }))
        .unwrap();
        let diagnostics = validator().validate(&payload, SCHEMA_VERSION_0_1).unwrap();
        assert!(diagnostics
            .errors()
            .iter()
            .any(|d| d.pointer == "/schema_version"));
    }

    #[test]
    fn missing_title_and_creators_are_errors() {
        let diagnostics = validator().validate(b"{}", SCHEMA_VERSION_0_1).unwrap();
        assert!(!diagnostics.passed());
        let pointers: Vec<&str> = diagnostics.errors().iter().map(|d| d.pointer.as_str()).collect();
        assert!(pointers.contains(&"/title"));
        assert!(pointers.contains(&"/creators"));
    }

    #[test]
    fn blank_title_is_an_error() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "title": "   ",
            "creators": ["C"],
        }))
        .unwrap();
        let diagnostics = validator().validate(&payload, SCHEMA_VERSION_0_1).unwrap();
        assert!(diagnostics.errors().iter().any(|d| d.pointer == "/title"));
    }

    #[test]
    fn missing_description_and_audience_are_warnings_only() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "title": "T",
            "creators": ["C"],
        }))
        .unwrap();
        let diagnostics = validator().validate(&payload, SCHEMA_VERSION_0_1).unwrap();
        assert!(diagnostics.passed());
        assert_eq!(diagnostics.warnings().len(), 2);
    }
}
