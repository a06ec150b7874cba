//! Exact evaluation of expressions over rational numbers.
//!
//! The evaluator shares no code with the ring engine or the kernel, so evaluating both sides of a
//! certificate at a few assignments is an independent check that the certified equation holds.

use crate::grammar::*;
use crate::kernel::Certificate;

use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;
use thiserror::Error;

/// Values of the atoms of an expression.
///
/// Any subterm can be assigned a value, not just named atoms; an assigned subterm is never
/// evaluated further. This is how opaque terms like `f(x)` or `z ^ n` get values.
pub type Assignment = HashMap<RcExpr, BigRational>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("`{0}` has no value")]
    Unassigned(RcExpr),

    #[error("`{0}` divides by zero")]
    DivisionByZero(RcExpr),

    #[error("`{0}` has an exponent that is not a small integer")]
    NonIntegerExponent(RcExpr),

    #[error("cannot evaluate the metavariable `{0}`")]
    Metavariable(RcExpr),

    #[error("cannot check a certificate with hypotheses")]
    OpenCertificate,
}

/// Evaluates an expression exactly.
pub fn evaluate(expr: &RcExpr, assignment: &Assignment) -> Result<BigRational, EvalError> {
    if let Some(value) = assignment.get(expr) {
        return Ok(value.clone());
    }
    match expr.as_ref() {
        Expr::Num(n) => Ok(BigRational::from_integer(n.clone())),
        Expr::Atom(_) | Expr::App(..) => Err(EvalError::Unassigned(RcExpr::clone(expr))),
        Expr::Meta(_) => Err(EvalError::Metavariable(RcExpr::clone(expr))),
        Expr::UnaryExpr(UnaryExpr { op, rhs }) => {
            let v = evaluate(rhs, assignment)?;
            Ok(match op {
                UnaryOperator::SignPositive => v,
                UnaryOperator::SignNegative => -v,
            })
        }
        Expr::BinaryExpr(BinaryExpr { op, lhs, rhs }) => {
            let l = evaluate(lhs, assignment)?;
            let r = evaluate(rhs, assignment)?;
            match op {
                BinaryOperator::Plus => Ok(l + r),
                BinaryOperator::Minus => Ok(l - r),
                BinaryOperator::Mult => Ok(l * r),
                BinaryOperator::Div if r.is_zero() => {
                    Err(EvalError::DivisionByZero(RcExpr::clone(expr)))
                }
                BinaryOperator::Div => Ok(l / r),
                BinaryOperator::Exp => power(expr, l, &r),
            }
        }
    }
}

fn power(
    expr: &RcExpr,
    base: BigRational,
    exponent: &BigRational,
) -> Result<BigRational, EvalError> {
    let k = match exponent.is_integer() {
        true => exponent.to_integer().to_i32(),
        false => None,
    }
    .ok_or_else(|| EvalError::NonIntegerExponent(RcExpr::clone(expr)))?;
    let magnitude = num_traits::pow(base, k.unsigned_abs() as usize);
    if k >= 0 {
        Ok(magnitude)
    } else if magnitude.is_zero() {
        Err(EvalError::DivisionByZero(RcExpr::clone(expr)))
    } else {
        Ok(magnitude.recip())
    }
}

/// Checks that a closed certificate holds at an assignment.
///
/// For an equation both sides must evaluate to the same value; for a disequation to different
/// values.
pub fn check_certificate(cert: &Certificate, assignment: &Assignment) -> Result<bool, EvalError> {
    if !cert.is_closed() {
        return Err(EvalError::OpenCertificate);
    }
    let (l, r) = (
        evaluate(cert.lhs(), assignment)?,
        evaluate(cert.rhs(), assignment)?,
    );
    Ok(match cert.conclusion() {
        Prop::Eq(..) => l == r,
        Prop::Ne(..) => l != r,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{compute, lemma, refl};
    use crate::{normalize, parse_expression, parse_expression_pattern, scan, LemmaName};

    fn integer(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    fn expr(program: &str) -> RcExpr {
        parse_expression(scan(program).tokens).program
    }

    fn assignment(values: &[(&str, BigRational)]) -> Assignment {
        values
            .iter()
            .map(|(term, value)| (expr(term), value.clone()))
            .collect()
    }

    macro_rules! evaluate_tests {
        ($($name:ident: $program:expr => $result:expr)*) => {
        $(
            #[test]
            fn $name() {
                let values = assignment(&[
                    ("x", integer(3)),
                    ("y", ratio(-1, 2)),
                    ("f(x)", integer(7)),
                    ("z ^ n", integer(5)),
                ]);
                let result: Result<BigRational, EvalError> = $result;
                assert_eq!(evaluate(&expr($program), &values), result);
            }
        )*
        }
    }

    evaluate_tests! {
        arithmetic:         "x * x - 2 * y + 1"     => Ok(integer(11))
        fractions:          "1 / 3 + y"             => Ok(ratio(-1, 6))
        signs:              "-(-x) + +y"            => Ok(ratio(5, 2))
        power:              "y ^ 3"                 => Ok(ratio(-1, 8))
        negative_power:     "x ^ -2"                => Ok(ratio(1, 9))
        zero_power:         "0 ^ 0"                 => Ok(integer(1))
        assigned_app:       "f(x) - x"              => Ok(integer(4))
        assigned_power:     "2 * z ^ n"             => Ok(integer(10))
        unassigned:         "x + w"                 => Err(EvalError::Unassigned(expr("w")))
        unassigned_app:     "f(y)"                  => Err(EvalError::Unassigned(expr("f(y)")))
        division_by_zero:   "x / (x - 3)"           => Err(EvalError::DivisionByZero(expr("x / (x - 3)")))
        zero_to_negative:   "(x - 3) ^ -1"          => Err(EvalError::DivisionByZero(expr("(x - 3) ^ -1")))
        rational_exponent:  "x ^ (1 / 2)"           => Err(EvalError::NonIntegerExponent(expr("x ^ (1 / 2)")))
    }

    #[test]
    fn metavariables() {
        let pattern = parse_expression_pattern(scan("_a").tokens).program;
        assert_eq!(
            evaluate(&pattern, &Assignment::new()),
            Err(EvalError::Metavariable(Expr::meta("_a")))
        );
    }

    #[test]
    fn checks_normal_forms() {
        let term = expr("(x - 2 * y) ^ 3 - f(x) * (x + 1 / 3)");
        let cert = normalize(&term).unwrap().certificate;
        for (x, y, f) in &[(0, 0, 0), (1, -2, 5), (-7, 3, 2)] {
            let values = assignment(&[
                ("x", integer(*x)),
                ("y", ratio(*y, 3)),
                ("f(x)", integer(*f)),
            ]);
            assert_eq!(check_certificate(&cert, &values), Ok(true));
        }
    }

    #[test]
    fn certificate_shapes() {
        let values = assignment(&[("x", integer(1))]);
        assert_eq!(check_certificate(&refl(expr("x + 1")), &values), Ok(true));
        let ne = compute(Prop::not_equal(expr("2 * 3"), expr("5"))).unwrap();
        assert_eq!(check_certificate(&ne, &Assignment::new()), Ok(true));
        assert_eq!(
            check_certificate(&lemma(LemmaName::PowOne), &values),
            Err(EvalError::Metavariable(Expr::meta("_x")))
        );
        assert_eq!(
            check_certificate(&lemma(LemmaName::OneMul), &values),
            Err(EvalError::OpenCertificate)
        );
    }
}
