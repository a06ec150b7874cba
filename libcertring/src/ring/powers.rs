//! Power products `f0 * (f1 * (... * fk))` over the variables of a ring.
//!
//! The factor of a variable `x` with exponent `p` is `x ^ p`, or `1` if `p` is zero. A ring
//! without variables has the empty product `1`.

use super::proof::{bind, by, by_with, fact, int_eq, num};
use crate::grammar::{BinaryOperator, Expr, RcExpr};
use crate::kernel::{self, refl, Certificate, LemmaName, Substitution};

use lazy_static::lazy_static;
use num_bigint::BigInt;

/// Exponent bound of the table of derived `x ^ i * x ^ j = x ^ (i + j)` theorems.
pub const POW_CACHE_BOUND: u32 = 20;

lazy_static! {
    /// `_x ^ i * _x ^ j = _x ^ (i + j)` for `1 <= i, j <= POW_CACHE_BOUND`, indexed by
    /// `(i - 1) * POW_CACHE_BOUND + (j - 1)`.
    static ref POW_TABLE: Vec<Certificate> = {
        let mut table = Vec::with_capacity((POW_CACHE_BOUND * POW_CACHE_BOUND) as usize);
        for i in 1..=POW_CACHE_BOUND {
            for j in 1..=POW_CACHE_BOUND {
                table.push(derive_pow_add(i, j));
            }
        }
        table
    };
}

/// Derives the schematic theorem `_x ^ i * _x ^ j = _x ^ (i + j)`.
fn derive_pow_add(i: u32, j: u32) -> Certificate {
    let (i, j) = (BigInt::from(i), BigInt::from(j));
    let k = &i + &j;
    let subst = Substitution::default()
        .with("#i", num(&i))
        .with("#j", num(&j))
        .with("#k", num(&k));
    let sum = fact(int_eq(Expr::plus(num(&i), num(&j)), &k));
    let derived = kernel::instantiate(&kernel::lemma(LemmaName::PowAdd), &subst)
        .and_then(|inst| kernel::discharge(&inst, &sum));
    match derived {
        Ok(cert) => cert,
        Err(err) => {
            tracing::error!(%err, %i, %j, "could not derive the exponent sum");
            panic!("could not derive x ^ {} * x ^ {}: {}", i, j, err);
        }
    }
}

/// Proves `x ^ i * x ^ j = x ^ (i + j)` for positive `i`, `j`.
pub(crate) fn pow_add(x: &RcExpr, i: u32, j: u32) -> Certificate {
    if i <= POW_CACHE_BOUND && j <= POW_CACHE_BOUND {
        let schematic = &POW_TABLE[((i - 1) * POW_CACHE_BOUND + (j - 1)) as usize];
        return match kernel::instantiate(schematic, &bind("_x", x)) {
            Ok(cert) => cert,
            Err(err) => {
                tracing::error!(%err, %x, "could not instantiate the exponent sum");
                panic!("could not instantiate x ^ {} * x ^ {}: {}", i, j, err);
            }
        };
    }
    let (bi, bj) = (BigInt::from(i), BigInt::from(j));
    let sum = fact(int_eq(Expr::plus(num(&bi), num(&bj)), &(&bi + &bj)));
    by_with(LemmaName::PowAdd, &[&sum], bind("_x", x))
}

fn factor(var: &RcExpr, power: u32) -> RcExpr {
    match power {
        0 => Expr::num(1),
        p => Expr::exp(RcExpr::clone(var), Expr::num(p)),
    }
}

/// Builds the power product of `powers` over `vars`.
pub(crate) fn power_product(vars: &[RcExpr], powers: &[u32]) -> RcExpr {
    let mut factors = vars.iter().zip(powers).map(|(v, &p)| factor(v, p)).rev();
    match factors.next() {
        None => Expr::num(1),
        Some(last) => factors.fold(last, |rest, f| Expr::mult(f, rest)),
    }
}

/// Proves `P = 1` for the power product `P` of `k` zero exponents.
pub(crate) fn unit_product(k: usize) -> Certificate {
    let one = Expr::num(1);
    (1..k).fold(refl(one), |rest, _| by(LemmaName::OneMul, &[&rest]))
}

/// Proves `P = x` for the power product `P` with exponent `1` at `index` and `0` elsewhere.
pub(crate) fn variable_product(vars: &[RcExpr], index: usize) -> Certificate {
    let k = vars.len();
    let x = &vars[index];
    let mut cert = if index == k - 1 {
        by_with(LemmaName::PowOne, &[], bind("_x", x))
    } else {
        refl(Expr::num(1))
    };
    for j in (0..k - 1).rev() {
        cert = if j == index {
            by_with(LemmaName::PowOneMul, &[&cert], bind("_x", x))
        } else {
            by(LemmaName::OneMul, &[&cert])
        };
    }
    cert
}

/// Proves `f(p) * f(q) = f(p + q)` for the factors of one variable.
fn factor_product(var: &RcExpr, p: u32, q: u32) -> Certificate {
    match (p, q) {
        (0, _) => by(LemmaName::OneMul, &[&refl(factor(var, q))]),
        (_, 0) => by(LemmaName::MulOne, &[&refl(factor(var, p))]),
        (p, q) => pow_add(var, p, q),
    }
}

/// Proves `P(p) * P(q) = P(p + q)`.
pub(crate) fn multiply_products(vars: &[RcExpr], p: &[u32], q: &[u32]) -> Certificate {
    let k = vars.len();
    if k == 0 {
        return by(LemmaName::OneMul, &[&refl(Expr::num(1))]);
    }
    let mut cert = factor_product(&vars[k - 1], p[k - 1], q[k - 1]);
    for i in (0..k - 1).rev() {
        let head = factor_product(&vars[i], p[i], q[i]);
        cert = by(LemmaName::MulInterleave, &[&head, &cert]);
    }
    cert
}

/// Proves `P = Q`, where `Q` drops the unit factors of `P` and writes `x ^ 1` as `x`. `Q` is `1`
/// if every factor is a unit.
pub(crate) fn normalize_product(product: &RcExpr) -> Certificate {
    match product.as_ref() {
        Expr::BinaryExpr(b) if b.op == BinaryOperator::Mult => {
            let head = normalize_factor(&b.lhs);
            let rest = normalize_product(&b.rhs);
            if b.lhs.is_num(1) {
                by(LemmaName::OneMul, &[&rest])
            } else if rest.rhs().is_num(1) {
                by(LemmaName::MulUnitR, &[&head, &rest])
            } else {
                by(LemmaName::MulCong, &[&head, &rest])
            }
        }
        _ => normalize_factor(product),
    }
}

fn normalize_factor(f: &RcExpr) -> Certificate {
    match f.as_ref() {
        Expr::BinaryExpr(b) if b.op == BinaryOperator::Exp && b.rhs.is_num(1) => {
            by_with(LemmaName::PowOne, &[], bind("_x", &b.lhs))
        }
        _ => refl(RcExpr::clone(f)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::Emit;
    use crate::grammar::Prop;

    fn proves(cert: &Certificate, lhs: &RcExpr, rhs: &RcExpr) -> bool {
        *cert.conclusion() == Prop::equal(RcExpr::clone(lhs), RcExpr::clone(rhs))
    }

    fn vars(names: &[&str]) -> Vec<RcExpr> {
        names.iter().map(|n| Expr::atom(*n)).collect()
    }

    #[test]
    fn power_products() {
        let xyz = vars(&["x", "y", "z"]);
        assert_eq!(power_product(&xyz, &[2, 0, 1]).to_string(), "x ^ 2 * 1 * z ^ 1");
        assert_eq!(power_product(&xyz[..1], &[3]).to_string(), "x ^ 3");
        assert_eq!(power_product(&[], &[]).to_string(), "1");
    }

    #[test]
    fn unit_products() {
        for k in 0..4 {
            let ps = vec![0; k];
            let vs = vars(&["a", "b", "c", "d"][..k]);
            assert!(proves(&unit_product(k), &power_product(&vs, &ps), &Expr::num(1)));
        }
    }

    #[test]
    fn variable_products() {
        let xyz = vars(&["x", "y", "z"]);
        for i in 0..3 {
            let mut ps = vec![0; 3];
            ps[i] = 1;
            let cert = variable_product(&xyz, i);
            assert!(proves(&cert, &power_product(&xyz, &ps), &xyz[i]));
        }
    }

    #[test]
    fn multiplied_products() {
        let xy = vars(&["x", "y"]);
        let cert = multiply_products(&xy, &[2, 0], &[3, 1]);
        assert_eq!(
            cert.emit_pretty(),
            "|- x ^ 2 * 1 * x ^ 3 * y ^ 1 = x ^ 5 * y ^ 1"
        );
        let cert = multiply_products(&xy, &[0, 0], &[0, 0]);
        assert_eq!(cert.emit_pretty(), "|- 1 * 1 * 1 * 1 = 1 * 1");
    }

    #[test]
    fn pow_add_beyond_table() {
        let x = Expr::atom("x");
        assert_eq!(
            pow_add(&x, 21, 2).emit_pretty(),
            "|- x ^ 21 * x ^ 2 = x ^ 23"
        );
        assert_eq!(
            pow_add(&x, 20, 20).emit_pretty(),
            "|- x ^ 20 * x ^ 20 = x ^ 40"
        );
    }

    #[test]
    fn normalized_products() {
        let xyz = vars(&["x", "y", "z"]);
        let cases: &[(&[u32], &str)] = &[
            (&[2, 0, 1], "x ^ 2 * z"),
            (&[0, 1, 0], "y"),
            (&[0, 0, 0], "1"),
            (&[1, 1, 1], "x * y * z"),
            (&[0, 3, 4], "y ^ 3 * z ^ 4"),
        ];
        for (powers, normal) in cases {
            let product = power_product(&xyz, powers);
            let cert = normalize_product(&product);
            assert_eq!(cert.lhs(), &product);
            assert_eq!(cert.rhs().to_string(), *normal);
        }
    }
}
