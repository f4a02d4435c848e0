//! Non-fatal anomalies found while building routes.
//!
//! Every report is kept in a [`Diagnostics`] collector handed back to the
//! caller and mirrored to `tracing`, so tests can assert on them without
//! capturing log output.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    DepthExceeded,
    CycleDetected,
    UnsupportedNestedInput,
    UnparsableDefault,
    UnknownScalarType,
    PathCollision,
    /// A query parameter whose default variable name was already taken.
    VariableRenamed,
    /// A root field whose synthesis failed with a hard error.
    FieldFailed,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::DepthExceeded => write!(f, "depth-exceeded"),
            DiagnosticKind::CycleDetected => write!(f, "cycle-detected"),
            DiagnosticKind::UnsupportedNestedInput => write!(f, "unsupported-nested-input"),
            DiagnosticKind::UnparsableDefault => write!(f, "unparsable-default"),
            DiagnosticKind::UnknownScalarType => write!(f, "unknown-scalar-type"),
            DiagnosticKind::PathCollision => write!(f, "path-collision"),
            DiagnosticKind::VariableRenamed => write!(f, "variable-renamed"),
            DiagnosticKind::FieldFailed => write!(f, "field-failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Field, parameter or path the report is about.
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        match kind {
            // Cycles are expected on any self-referencing schema.
            DiagnosticKind::CycleDetected => tracing::debug!(
                kind = %diagnostic.kind,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
            _ => tracing::warn!(
                kind = %diagnostic.kind,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
        }
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.of_kind(kind).next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
