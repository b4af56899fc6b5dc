//! Host diagnostics as seen by the suppression pass.
//!
//! The pass needs two things from whatever collects the host's errors: a
//! look at the most recent diagnostic, and a way to take it back. Both are
//! expressed by [`DiagnosticSink`]. [`DiagnosticBuffer`] is an in-memory sink
//! for hosts that have nothing better, and for tests.

use std::fmt;

use opover_core::Span;
use tracing::debug;

/// A single diagnostic reported by the host checker.
///
/// # Examples
///
/// ```rust
/// use opover::{Diagnostic, DiagnosticKind, Span};
///
/// let diagnostic = Diagnostic::error(Span::new(8, 15), "bad operand types for '+'")
///     .in_section("Vec.java");
///
/// assert_eq!(diagnostic.kind, DiagnosticKind::Error);
/// assert_eq!(diagnostic.to_string(), "Vec.java:8..15: error: bad operand types for '+'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity level of this diagnostic
    pub kind: DiagnosticKind,
    /// The diagnostic message text
    pub message: String,
    /// The source file or section name, if available
    pub section: Option<String>,
    /// The source range the diagnostic covers
    pub span: Span,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            section: None,
            span,
        }
    }

    /// Create an error.
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, span, message)
    }

    /// Create a warning.
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, span, message)
    }

    /// Create an informational message.
    pub fn info(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, span, message)
    }

    /// Attach a source file or section name.
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Whether this is an error.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}

/// The severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A hard error. Only errors can be retracted.
    Error,
    /// A warning about potentially problematic code.
    Warning,
    /// An informational message.
    Info,
}

impl DiagnosticKind {
    /// Lowercase label used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        }
    }
}

/// Where the host collects diagnostics while checking a file.
pub trait DiagnosticSink {
    /// The most recently reported diagnostic.
    fn last_diagnostic(&self) -> Option<&Diagnostic>;

    /// Number of errors currently held.
    fn error_count(&self) -> usize;

    /// Remove the most recent diagnostic if it is an error.
    ///
    /// Implementations keep [`DiagnosticSink::error_count`] in step with the
    /// removal. Returns the removed diagnostic, or `None` when the most
    /// recent one is not an error.
    fn retract_last_error(&mut self) -> Option<Diagnostic>;

    /// Whether the most recent diagnostic is an error covering exactly `span`.
    fn is_flagged(&self, span: Span) -> bool {
        if self.error_count() == 0 {
            return false;
        }
        self.last_diagnostic()
            .is_some_and(|diagnostic| diagnostic.is_error() && diagnostic.span == span)
    }
}

/// In-memory diagnostic collection.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBuffer {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticBuffer {
    /// Creates a new, empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic to the collection.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` if the collection contains any error diagnostics.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Total number of diagnostics of every kind.
    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }
}

impl DiagnosticSink for DiagnosticBuffer {
    fn last_diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostics.last()
    }

    fn error_count(&self) -> usize {
        self.error_count
    }

    fn retract_last_error(&mut self) -> Option<Diagnostic> {
        if !self.diagnostics.last().is_some_and(Diagnostic::is_error) {
            return None;
        }
        let retracted = self.diagnostics.pop()?;
        self.error_count = self.error_count.saturating_sub(1);
        debug!(span = %retracted.span, message = %retracted.message, "retracted diagnostic");
        Some(retracted)
    }
}

impl Extend<Diagnostic> for DiagnosticBuffer {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.add_diagnostic(diagnostic);
        }
    }
}

impl FromIterator<Diagnostic> for DiagnosticBuffer {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(section) = &self.section {
            write!(
                f,
                "{}:{}: {}: {}",
                section,
                self.span,
                self.kind.label(),
                self.message
            )
        } else {
            write!(f, "{}: {}: {}", self.span, self.kind.label(), self.message)
        }
    }
}
