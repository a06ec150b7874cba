//! Diagnostic errors produced by the scanner.

use crate::diagnostics::{DiagnosticRecord, DiagnosticRegistry};

macro_rules! define_errors {
    ($($(#[doc = $doc:expr])+ $code:ident: $error:ident $gen_macro:tt)*) => {$(
        $(#[doc = $doc])+
        pub(crate) struct $error;

        impl DiagnosticRecord for $error {
            const CODE: &'static str = stringify!($code);
            const EXPLANATION: &'static str = concat!($($doc, "\n"),+);
        })*

        /// Diagnostic errors produced by the scanner.
        pub(crate) struct ScanErrors;

        impl DiagnosticRegistry for ScanErrors {
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
    ///Tokens in a certring program must be part of the arithmetic language certring normalizes:
    ///integers, atom names, function applications, the operators `+ - * / ^`, parentheses, and
    ///the relations `=` and `!=`.
    ///
    ///This error is fired on any other character, for example
    ///
    ///```text
    ///1 + 2.5
    ///     ^- invalid token
    ///```
    ///
    ///certring works over exact rationals; write `5/2` instead of `2.5`.
    S0001: InvalidToken {
        ($span:expr, $did_you_mean:expr) => {{
            let mut diag = Diagnostic::span_err(
                $span,
                "Invalid token",
                InvalidToken::CODE,
                None::<String>,
            )
            .with_note("token must be part of an arithmetic expression");
            if let Some(did_you_mean) = $did_you_mean {
                diag = diag.with_help(format!(r#"did you mean "{}"?"#, did_you_mean));
            }
            diag
        }}
    }
}
