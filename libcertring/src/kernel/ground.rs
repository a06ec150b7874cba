//! Decision of ground integer facts.

use crate::grammar::*;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Evaluates a closed integer expression built from literals, `+`, `-`, `*`, unary signs and
/// powers with a non-negative literal exponent. Returns `None` for anything else.
pub(super) fn eval_integer(expr: &RcExpr) -> Option<BigInt> {
    match expr.as_ref() {
        Expr::Num(n) => Some(n.clone()),
        Expr::UnaryExpr(UnaryExpr { op, rhs }) => {
            let n = eval_integer(rhs)?;
            Some(match op {
                UnaryOperator::SignPositive => n,
                UnaryOperator::SignNegative => -n,
            })
        }
        Expr::BinaryExpr(BinaryExpr { op, lhs, rhs }) => match op {
            BinaryOperator::Plus => Some(eval_integer(lhs)? + eval_integer(rhs)?),
            BinaryOperator::Minus => Some(eval_integer(lhs)? - eval_integer(rhs)?),
            BinaryOperator::Mult => Some(eval_integer(lhs)? * eval_integer(rhs)?),
            BinaryOperator::Exp => {
                let exp = rhs.as_num()?.to_u32()?;
                Some(eval_integer(lhs)?.pow(exp))
            }
            BinaryOperator::Div => None,
        },
        Expr::Atom(_) | Expr::App(..) | Expr::Meta(_) => None,
    }
}

/// Decides a ground fact. `None` if either side is not a ground integer expression.
pub(super) fn decide(prop: &Prop) -> Option<bool> {
    let lhs = eval_integer(prop.lhs())?;
    let rhs = eval_integer(prop.rhs())?;
    Some(match prop {
        Prop::Eq(..) => lhs == rhs,
        Prop::Ne(..) => lhs != rhs,
    })
}

#[cfg(test)]
mod tests {
    use super::decide;
    use crate::{parse_proposition, scan};

    macro_rules! decide_tests {
        ($($name:ident: $prop:expr => $result:expr)*) => {
        $(
            #[test]
            fn $name() {
                let prop = parse_proposition(scan($prop).tokens).program;
                assert_eq!(decide(&prop), $result);
            }
        )*
        }
    }

    decide_tests! {
        sum:               "2 * 5 + -3 * 4 = -2"             => Some(true)
        false_sum:         "1 + 1 = 3"                        => Some(false)
        disequality:       "6 != 0"                           => Some(true)
        false_disequality: "3 - 3 != 0"                       => Some(false)
        power:             "-2 ^ 3 + (-2) ^ 2 = -4"           => Some(true)
        bignum:            "99999999999 * 99999999999 = 9999999999800000000001" => Some(true)
        negation:          "-(4) = -4"                        => Some(true)
        atom:              "x - x = 0"                        => None
        division:          "4 / 2 = 2"                        => None
        negative_exponent: "2 ^ -1 = 0"                       => None
    }
}
