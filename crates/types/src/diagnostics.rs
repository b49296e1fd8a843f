//! Non-fatal conditions recorded while interpreting a document.
//!
//! Every recoverable problem (a construct that does not parse, a bad numeric
//! field, a missing image) is downgraded to a [`Diagnostic`] and the run
//! continues with a documented fallback value.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A construct did not match its grammar and was dropped.
    GrammarMismatch,
    /// A numeric field could not be parsed; the prior value was kept.
    InvalidNumericField,
    /// A keyword was not one of the recognized values; a default was used.
    UnknownEnumValue,
    /// A style attribute name is not recognized.
    UnknownAttribute,
    /// A referenced resource (image) does not exist.
    MissingResource,
    /// Input the grammar cannot express, such as a quote inside quoted content.
    UnsupportedInput,
    /// The document has no page blocks.
    EmptyDocument,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::GrammarMismatch => "grammar mismatch",
            DiagnosticKind::InvalidNumericField => "invalid numeric field",
            DiagnosticKind::UnknownEnumValue => "unknown value",
            DiagnosticKind::UnknownAttribute => "unknown attribute",
            DiagnosticKind::MissingResource => "missing resource",
            DiagnosticKind::UnsupportedInput => "unsupported input",
            DiagnosticKind::EmptyDocument => "empty document",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// An ordered collection of diagnostics. Each pushed entry is also logged at
/// `warn` level so a CLI user sees it even without inspecting the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
        };
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Moves all entries of `other` to the end of this collection without
    /// logging them a second time.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
