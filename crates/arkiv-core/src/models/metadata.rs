//! Descriptive metadata document
//!
//! The canonical in-memory form of a deposit's metadata. On the wire the
//! document is a JSON object; the pipeline's transformer turns validated bytes
//! into a [`MetadataDocument`]. The discipline a document belongs to is carried
//! in an application-specific block and drives which format prototype the new
//! dataset is created from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata schema version understood by the validator
pub const SCHEMA_VERSION_0_1: &str = "0.1";

/// All schema versions the service accepts
pub const KNOWN_SCHEMA_VERSIONS: &[&str] = &[SCHEMA_VERSION_0_1];

/// Discipline-specific metadata format of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataFormat {
    Archaeology,
    History,
    Sociology,
    LifeSciences,
    Unspecified,
}

impl MetadataFormat {
    /// Parse the wire value from the application-specific block
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "archaeology" => Some(MetadataFormat::Archaeology),
            "history" => Some(MetadataFormat::History),
            "sociology" => Some(MetadataFormat::Sociology),
            "life_sciences" => Some(MetadataFormat::LifeSciences),
            "unspecified" => Some(MetadataFormat::Unspecified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataFormat::Archaeology => "archaeology",
            MetadataFormat::History => "history",
            MetadataFormat::Sociology => "sociology",
            MetadataFormat::LifeSciences => "life_sciences",
            MetadataFormat::Unspecified => "unspecified",
        }
    }

    /// Default audience term a fresh dataset of this format starts with
    pub fn default_audience(&self) -> Option<&'static str> {
        match self {
            MetadataFormat::Archaeology => Some("Archaeology"),
            MetadataFormat::History => Some("History"),
            MetadataFormat::Sociology => Some("Social sciences"),
            MetadataFormat::LifeSciences => Some("Life sciences"),
            MetadataFormat::Unspecified => None,
        }
    }
}

impl fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-specific metadata block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSpecific {
    pub metadata_format: MetadataFormat,
}

/// Access regime requested for the dataset's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRights {
    Open,
    Restricted,
}

/// Canonical descriptive metadata of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub schema_version: String,
    pub title: String,
    #[serde(default)]
    pub creators: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Audience terms; may be empty on arrival and is then filled in from the
    /// format defaults by the enhancer
    #[serde(default)]
    pub audience: Vec<String>,
    pub application: ApplicationSpecific,
    #[serde(default)]
    pub access_rights: Option<AccessRights>,
}

impl MetadataDocument {
    pub fn format(&self) -> MetadataFormat {
        self.application.metadata_format
    }

    /// The empty prototype document a dataset of the given format is created
    /// with. Carries the format defaults (audience) that the enhancer merges
    /// into deposited metadata.
    pub fn prototype(format: MetadataFormat) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_0_1.to_string(),
            title: String::new(),
            creators: Vec::new(),
            description: None,
            audience: format
                .default_audience()
                .map(|term| vec![term.to_string()])
                .unwrap_or_default(),
            application: ApplicationSpecific {
                metadata_format: format,
            },
            access_rights: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_formats() {
        assert_eq!(
            MetadataFormat::parse("archaeology"),
            Some(MetadataFormat::Archaeology)
        );
        assert_eq!(
            MetadataFormat::parse("  History "),
            Some(MetadataFormat::History)
        );
        assert_eq!(
            MetadataFormat::parse("life_sciences"),
            Some(MetadataFormat::LifeSciences)
        );
        assert_eq!(MetadataFormat::parse("geology"), None);
        assert_eq!(MetadataFormat::parse(""), None);
    }

    #[test]
    fn prototype_carries_format_defaults() {
        let proto = MetadataDocument::prototype(MetadataFormat::Archaeology);
        assert_eq!(proto.audience, vec!["Archaeology".to_string()]);
        assert_eq!(proto.format(), MetadataFormat::Archaeology);
        assert!(proto.title.is_empty());

        let proto = MetadataDocument::prototype(MetadataFormat::Unspecified);
        assert!(proto.audience.is_empty());
    }

    #[test]
    fn document_round_trips_through_json() {
        let doc = MetadataDocument {
            schema_version: SCHEMA_VERSION_0_1.to_string(),
            title: "Bronze age settlements".to_string(),
            creators: vec!["J. Fields".to_string()],
            description: Some("Survey data".to_string()),
            audience: vec!["Archaeology".to_string()],
            application: ApplicationSpecific {
                metadata_format: MetadataFormat::Archaeology,
            },
            access_rights: Some(AccessRights::Open),
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"metadata_format\":\"archaeology\""));
        let back: MetadataDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
