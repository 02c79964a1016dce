//! Schema validation diagnostics
//!
//! Validating a metadata payload produces a [`Diagnostics`] handle rather than
//! a hard error: schema findings are collected with a severity each, and the
//! overall verdict is derived from the collected set. Findings are reported to
//! the depositor verbatim, so messages must be self-contained.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a single validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory only; does not fail validation
    Warning,
    /// Schema violation; fails validation
    Error,
    /// Unprocessable document; fails validation and stops further checks
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// A single validation finding, anchored to a field path in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// JSON-pointer style path to the offending field ("/" for the document root)
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.pointer, self.message)
    }
}

/// Ordered collection of validation findings for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, pointer: impl Into<String>, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity,
            pointer: pointer.into(),
            message: message.into(),
        });
    }

    pub fn warning(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, pointer, message);
    }

    pub fn error(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, pointer, message);
    }

    pub fn fatal(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Fatal, pointer, message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.of_severity(Severity::Warning)
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.of_severity(Severity::Error)
    }

    pub fn fatals(&self) -> Vec<&Diagnostic> {
        self.of_severity(Severity::Fatal)
    }

    fn of_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.items.iter().filter(|d| d.severity == severity).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The overall verdict: passes iff no errors and no fatals were recorded.
    /// Warnings never fail validation.
    pub fn passed(&self) -> bool {
        self.errors().is_empty() && self.fatals().is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diagnostics_pass() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.passed());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn warnings_do_not_fail_validation() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning("/description", "no description given");
        assert!(diagnostics.passed());
        assert_eq!(diagnostics.warnings().len(), 1);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn errors_fail_validation() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error("/title", "title is required");
        assert!(!diagnostics.passed());
        assert_eq!(diagnostics.errors().len(), 1);
        assert!(diagnostics.fatals().is_empty());
    }

    #[test]
    fn fatals_fail_validation() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.fatal("/", "document root must be an object");
        assert!(!diagnostics.passed());
    }

    #[test]
    fn display_renders_one_finding_per_line() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error("/title", "title is required");
        diagnostics.warning("/audience", "no audience terms given");
        let rendered = diagnostics.to_string();
        assert_eq!(
            rendered,
            "error /title: title is required\nwarning /audience: no audience terms given"
        );
    }
}
