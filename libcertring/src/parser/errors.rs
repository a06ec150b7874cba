//! Diagnostic errors produced by the parser.

use crate::diagnostics::{DiagnosticRecord, DiagnosticRegistry};

macro_rules! define_errors {
    ($($(#[doc = $doc:expr])+ $code:ident: $error:ident $gen_macro:tt)*) => {$(
        $(#[doc = $doc])+
        pub(crate) struct $error;

        impl DiagnosticRecord for $error {
            const CODE: &'static str = stringify!($code);
            const EXPLANATION: &'static str = concat!($($doc, "\n"),+);
        })*

        /// Diagnostic errors produced by the parser.
        pub(crate) struct ParseErrors;

        impl DiagnosticRegistry for ParseErrors {
            fn codes_with_explanations() -> Vec<(&'static str, &'static str)> {
                let mut vec = Vec::new();
                $(vec.push(($error::CODE, $error::EXPLANATION));)*
                vec
            }
        }

        $(
            macro_rules! $error $gen_macro
        )*
    };
}

define_errors! {
    ///This error fires on tokens that are not connected to the rest of a certring program.
    ///
    ///For example, in the program
    ///
    ///```text
    ///1 + 2 3 + 4
    ///      ^^^^^- offending tokens
    ///```
    ///
    ///`3 + 4` is not connected to the expression `1 + 2`. certring does not read juxtaposition as
    ///multiplication; write `2 * x` rather than `2 x`.
    P0001: ExtraTokens {
        ($span:expr) => {
            Diagnostic::span_err(
                $span,
                "Unexpected extra tokens",
                ExtraTokens::CODE,
                "not connected to the expression".to_string(),
            )
            .with_help("consider deleting these tokens")
        }
    }

    ///This error fires on token sequences that are expected to parse as an expression, but do not.
    ///
    ///The following are examples of programs that emit this error:
    ///
    ///```text
    ///1 + *
    ///    ^- offending token
    ///```
    ///
    ///```text
    ///1 /
    ///   ^- offending token: end of file
    ///```
    ///
    ///In all cases such programs are malformed and should be refactored to include complete
    ///expressions.
    P0002: ExpectedExpr {
        ($span:expr, $found:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Expected an expression, found {}", $found),
                ExpectedExpr::CODE,
                "expected an expression".to_string(),
            )
        }
    }

    ///Every opening parenthesis must be closed by a matching `)`. This error fires when a
    ///parenthesized expression or the argument list of a function application is not closed, for
    ///example
    ///
    ///```text
    ///(1 + 2
    ///      ^- expected closing `)`
    ///```
    ///
    ///```text
    ///f(x, y
    ///      ^- expected closing `)`
    ///```
    P0003: UnclosedDelimiter {
        (at $cur_span:expr, opened at $open_span:expr; found $found:expr) => {
            Diagnostic::span_err(
                $cur_span,
                format!("Expected closing `)`, found {}", $found),
                UnclosedDelimiter::CODE,
                "expected closing `)`".to_string(),
            )
            .with_spanned_note($open_span, "opening `(` here")
        }
    }

    ///Patterns are illegal in an expression given to certring.
    ///
    ///Patterns like `_a` and `#n` stand for arbitrary terms and arbitrary integers in the schema
    ///lemmas of the proof kernel. They cannot be normalized, because they do not denote a
    ///particular value. If a pattern was written by mistake, use an atom name instead; for
    ///example, write `a` rather than `_a`.
    P0004: IllegalPattern {
        ($span:expr, $pat_name:expr) => {
            Diagnostic::span_err(
                $span,
                "Patterns cannot be used in an expression",
                IllegalPattern::CODE,
                "unexpected pattern".to_string(),
            )
            .with_help(format!(r#"consider using the atom "{}""#, &$pat_name[1..]))
        }
    }

    ///A proposition must relate two expressions with `=` or `!=`.
    ///
    ///For example, `_a + 0` is not a proposition, but `_a + 0 = _a` is.
    P0005: ExpectedRelation {
        ($span:expr, $found:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Expected `=` or `!=`, found {}", $found),
                ExpectedRelation::CODE,
                "expected a relation".to_string(),
            )
        }
    }
}
