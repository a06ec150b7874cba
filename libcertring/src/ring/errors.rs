//! Errors compiling expressions into a polynomial ring.

use crate::diagnostics::DiagnosticRegistry;
use crate::grammar::RcExpr;

use thiserror::Error;

/// An expression that cannot be compiled into a ring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("`{0}` has a negative exponent")]
    NegativeExponent(RcExpr),

    #[error("`{0}` divides by zero")]
    ZeroDenominator(RcExpr),

    #[error("`{0}` is not a variable of the ring")]
    UnknownAtom(RcExpr),

    #[error("`{0}` is a variable of the ring more than once")]
    DuplicateVariable(RcExpr),

    #[error("there is no variable {index} in a ring of {len} variables")]
    VariableIndexOutOfRange { index: usize, len: usize },

    #[error("the exponent of `{0}` is too large")]
    ExponentOverflow(RcExpr),
}

impl RingError {
    /// The diagnostic code of the error. Its explanation is available from
    /// [`Diagnostic::all_codes_with_explanations`](crate::diagnostics::Diagnostic::all_codes_with_explanations).
    pub fn code(&self) -> &'static str {
        match self {
            Self::NegativeExponent(_) => "R0001",
            Self::ZeroDenominator(_) => "R0002",
            Self::UnknownAtom(_) => "R0003",
            Self::DuplicateVariable(_) => "R0004",
            Self::VariableIndexOutOfRange { .. } => "R0005",
            Self::ExponentOverflow(_) => "R0006",
        }
    }
}

const NEGATIVE_EXPONENT: &str = r#"Polynomials only have non-negative integer powers.

For example, `x ^ -1` is not a polynomial in `x`, so

```text
x ^ -1 * x
```

cannot be normalized. A power with a symbolic exponent, like `x ^ n`, is treated as an opaque
atom instead.
"#;

const ZERO_DENOMINATOR: &str = r#"A division has the literal `0` as its denominator.

Rational constants like `1 / 3` are coefficients of a polynomial, but `1 / 0` has no value.
"#;

const UNKNOWN_ATOM: &str = r#"A term that is not an arithmetic combination of smaller terms is not one of the variables of
the ring it is compiled in.

This can only happen when the variables of a ring are given explicitly, for example with
`--vars x,y` for the program `x + z`.
"#;

const DUPLICATE_VARIABLE: &str = r#"The variables of a ring must be distinct terms.

For example, `--vars x,y,x` lists `x` twice.
"#;

const VARIABLE_INDEX_OUT_OF_RANGE: &str = r#"A ring was asked for a variable past the end of its variable list.
"#;

const EXPONENT_OVERFLOW: &str = r#"An exponent does not fit in 32 bits.

Powers like `x ^ 99999999999` are far beyond anything that can be expanded. The same holds for
exponents that only grow past 32 bits while multiplying, like

```text
x ^ 4294967295 * x
```
"#;

/// Diagnostic errors produced while compiling into a ring.
pub(crate) struct RingErrors;

impl DiagnosticRegistry for RingErrors {
    fn codes_with_explanations() -> Vec<(&'static str, &'static str)> {
        vec![
            ("R0001", NEGATIVE_EXPONENT),
            ("R0002", ZERO_DENOMINATOR),
            ("R0003", UNKNOWN_ATOM),
            ("R0004", DUPLICATE_VARIABLE),
            ("R0005", VARIABLE_INDEX_OUT_OF_RANGE),
            ("R0006", EXPONENT_OVERFLOW),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expr;

    #[test]
    fn codes_are_registered() {
        let registered = RingErrors::codes_with_explanations();
        let errors = vec![
            RingError::NegativeExponent(Expr::atom("x")),
            RingError::ZeroDenominator(Expr::atom("x")),
            RingError::UnknownAtom(Expr::atom("x")),
            RingError::DuplicateVariable(Expr::atom("x")),
            RingError::VariableIndexOutOfRange { index: 1, len: 0 },
            RingError::ExponentOverflow(Expr::atom("x")),
        ];
        assert_eq!(errors.len(), registered.len());
        for (err, (code, _)) in errors.iter().zip(registered) {
            assert_eq!(err.code(), code);
        }
    }
}
