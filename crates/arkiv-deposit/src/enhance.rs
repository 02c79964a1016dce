//! Format defaults enhancement
//!
//! A freshly created dataset carries its format's prototype metadata; the one
//! default merged into deposited metadata is the audience classification.

use arkiv_core::models::{Dataset, MetadataDocument};

/// Merge format defaults from the reference dataset into the document.
///
/// Appends the reference's first audience term iff the document's own audience
/// list is empty. Idempotent: reapplying to a document with a non-empty
/// audience list is a no-op.
pub fn enhance_with_defaults(document: &mut MetadataDocument, reference: &Dataset) {
    if !document.audience.is_empty() {
        return;
    }
    if let Some(term) = reference.metadata.audience.first() {
        document.audience.push(term.clone());
    }
}
