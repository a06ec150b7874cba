//! User-facing certring diagnostics.
//!
//! The diagnostics module renders [libcertring diagnostics][libcertring::diagnostics] and ring
//! compilation errors in a form pleasant for standard error.

use libcertring::diagnostics::{AssociatedDiagnostic, Diagnostic, DiagnosticKind};
use libcertring::RingError;

use annotate_snippets::{
    display_list::{DisplayList, FormatOptions},
    snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation},
};

pub fn sanitize_source_for_diagnostics(source: &str) -> String {
    let source = source.to_owned();
    source + " " // we might emit an EOF diagnostic, so add extra space.
}

pub fn emit_certring_diagnostics(
    origin: Option<&str>,
    source: &str,
    diagnostics: &[Diagnostic],
    color: bool,
) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let last_i = diagnostics.len() - 1;
    let mut emitted_diagnostics = String::new();

    for (i, diagnostic) in diagnostics.iter().enumerate() {
        let main_annotation_type = convert_diagnostic_kind(&diagnostic.kind);
        let mut annotations = Vec::with_capacity(diagnostic.associated_diagnostics.len() + 1);
        // The first annotation always points to the code that generated this diagnostic.
        let label = diagnostic.msg.clone().unwrap_or_default();
        annotations.push(SourceAnnotation {
            label: &label,
            annotation_type: main_annotation_type,
            range: diagnostic.span.into(),
        });
        for associated_diagnostic in diagnostic.associated_diagnostics.iter() {
            annotations.push(SourceAnnotation {
                label: &associated_diagnostic.msg,
                annotation_type: convert_diagnostic_kind(&associated_diagnostic.kind),
                range: associated_diagnostic.span.into(),
            });
        }
        let footer = diagnostic
            .unspanned_associated_diagnostics
            .iter()
            .map(convert_associated_diagnostic)
            .collect();

        let snippet = Snippet {
            title: Some(Annotation {
                label: Some(&diagnostic.title),
                id: diagnostic.code,
                annotation_type: main_annotation_type,
            }),
            footer,
            slices: vec![Slice {
                source,
                line_start: 1,
                origin,
                fold: true,
                annotations,
            }],
            opt: FormatOptions {
                color,
                ..Default::default()
            },
        };
        let suffix = if i != last_i { "\n" } else { "" };
        emitted_diagnostics.push_str(&format!("{}\n{}", DisplayList::from(snippet), suffix));
    }
    emitted_diagnostics
}

/// Renders an expression that could not be compiled into a ring.
pub fn emit_ring_error(source: &str, err: &RingError, color: bool) -> String {
    let help = format!("run `certring --explain {}` for more", err.code());
    emit_program_error(
        source,
        "Cannot normalize the program",
        Some(err.code()),
        &err.to_string(),
        &help,
        color,
    )
}

/// Renders a failed zero test.
pub fn emit_not_zero(source: &str, normal_form: &str, color: bool) -> String {
    let note = format!("normalizes to `{}`", normal_form);
    emit_program_error(
        source,
        "The program is not zero",
        None,
        "not zero",
        &note,
        color,
    )
}

/// Renders an error about the program as a whole.
///
/// Expressions do not carry source spans, so these errors point at the entire program.
fn emit_program_error(
    source: &str,
    title: &str,
    id: Option<&str>,
    label: &str,
    footer: &str,
    color: bool,
) -> String {
    let footer_type = match id {
        Some(_) => AnnotationType::Help,
        None => AnnotationType::Note,
    };
    let snippet = Snippet {
        title: Some(Annotation {
            label: Some(title),
            id,
            annotation_type: AnnotationType::Error,
        }),
        footer: vec![Annotation {
            label: Some(footer),
            id: None,
            annotation_type: footer_type,
        }],
        slices: vec![Slice {
            source,
            line_start: 1,
            origin: None,
            fold: true,
            annotations: vec![SourceAnnotation {
                label,
                annotation_type: AnnotationType::Error,
                range: (0, source.trim_end().len()),
            }],
        }],
        opt: FormatOptions {
            color,
            ..Default::default()
        },
    };
    format!("{}\n", DisplayList::from(snippet))
}

/// Converts an AssociatedDiagnostic to a footer Annotation.
fn convert_associated_diagnostic(diagnostic: &AssociatedDiagnostic) -> Annotation {
    Annotation {
        label: Some(&diagnostic.msg),
        id: None,
        annotation_type: convert_diagnostic_kind(&diagnostic.kind),
    }
}

fn convert_diagnostic_kind(diagnostic_kind: &DiagnosticKind) -> AnnotationType {
    match diagnostic_kind {
        DiagnosticKind::Error => AnnotationType::Error,
        DiagnosticKind::Warning => AnnotationType::Warning,
        DiagnosticKind::Note => AnnotationType::Note,
        DiagnosticKind::Help => AnnotationType::Help,
    }
}
