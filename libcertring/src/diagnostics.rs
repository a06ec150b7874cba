//! Diagnostics for certring source text.
//!
//! Every diagnostic with a code is described by a [`DiagnosticRecord`]. Records are grouped into
//! [`DiagnosticRegistry`]s per phase, so that a front end can look up the long-form explanation of
//! any code it emitted.

use crate::common::Span;
use crate::parser::errors::ParseErrors;
use crate::ring::RingErrors;
use crate::scanner::errors::ScanErrors;

use std::collections::HashMap;

/// The kind of a certring diagnostic.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum DiagnosticKind {
    /// An error diagnostic. Generally, this diagnostic should be emitted for unrecoverable errors.
    Error,
    /// A warning diagnostic. The program can still be processed, but may not mean what was
    /// intended.
    Warning,
    /// A note diagnostic is a generic annotation with no specific connotation like `error`. It can
    /// be particularly useful as an associated diagnostic, for example in expanding on a primary
    /// error.
    Note,
    /// A help diagnostic should instruct the user how their input can be changed to work correctly
    /// with certring.
    Help,
}

/// A secondary diagnostic associated with a primary `Diagnostic`.
#[derive(Clone, Debug)]
pub struct AssociatedDiagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub msg: String,
}

/// A diagnostic for certring source text.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: Option<&'static str>,
    pub span: Span,
    pub title: String,
    pub msg: Option<String>,
    pub associated_diagnostics: Vec<AssociatedDiagnostic>,
    pub unspanned_associated_diagnostics: Vec<AssociatedDiagnostic>,
}

/// A record of a diagnostic code and its explanation.
pub(crate) trait DiagnosticRecord {
    const CODE: &'static str;
    const EXPLANATION: &'static str;
}

/// A set of diagnostic records produced by one phase of certring.
pub(crate) trait DiagnosticRegistry {
    fn codes_with_explanations() -> Vec<(&'static str, &'static str)>;
}

impl Diagnostic {
    /// Creates an error diagnostic at a span.
    pub(crate) fn span_err<S, M, N>(span: S, title: M, code: &'static str, msg: N) -> Diagnostic
    where
        S: Into<Span>,
        M: Into<String>,
        N: Into<Option<String>>,
    {
        Diagnostic {
            kind: DiagnosticKind::Error,
            code: Some(code),
            span: span.into(),
            title: title.into(),
            msg: msg.into(),
            associated_diagnostics: Vec::with_capacity(2),
            unspanned_associated_diagnostics: Vec::with_capacity(2),
        }
    }

    /// Adds a note to the diagnostic.
    pub(crate) fn with_note<M>(mut self, note: M) -> Diagnostic
    where
        M: Into<String>,
    {
        self.unspanned_associated_diagnostics
            .push(AssociatedDiagnostic {
                kind: DiagnosticKind::Note,
                span: self.span,
                msg: note.into(),
            });
        self
    }

    /// Adds a note to the diagnostic at a possibly different span.
    pub(crate) fn with_spanned_note<S, M>(mut self, span: S, note: M) -> Diagnostic
    where
        S: Into<Span>,
        M: Into<String>,
    {
        self.associated_diagnostics.push(AssociatedDiagnostic {
            kind: DiagnosticKind::Note,
            span: span.into(),
            msg: note.into(),
        });
        self
    }

    /// Adds a help message to the diagnostic.
    pub(crate) fn with_help<M>(mut self, help: M) -> Diagnostic
    where
        M: Into<String>,
    {
        self.unspanned_associated_diagnostics
            .push(AssociatedDiagnostic {
                kind: DiagnosticKind::Help,
                span: self.span,
                msg: help.into(),
            });
        self
    }

    /// Returns all diagnostic codes certring can emit, mapped to their explanations.
    pub fn all_codes_with_explanations() -> HashMap<&'static str, &'static str> {
        let mut codes = HashMap::new();
        codes.extend(ScanErrors::codes_with_explanations());
        codes.extend(ParseErrors::codes_with_explanations());
        codes.extend(RingErrors::codes_with_explanations());
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_codes_are_unique_and_explained() {
        let mut codes = ScanErrors::codes_with_explanations();
        codes.extend(ParseErrors::codes_with_explanations());
        codes.extend(RingErrors::codes_with_explanations());
        let all = Diagnostic::all_codes_with_explanations();

        assert_eq!(codes.len(), all.len());
        for (code, explanation) in all {
            assert!(!explanation.trim().is_empty(), "{} has no explanation", code);
        }
    }

    #[test]
    fn known_codes() {
        let all = Diagnostic::all_codes_with_explanations();
        for code in &["S0001", "P0001", "P0004", "P0005", "R0001", "R0006"] {
            assert!(all.contains_key(code), "missing {}", code);
        }
    }
}
