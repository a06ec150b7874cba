use super::coefficient::Coefficient;
use super::powers::{
    multiply_products, normalize_product, power_product, unit_product, variable_product,
};
use super::proof::{by, chain};
use crate::grammar::{Expr, RcExpr};
use crate::kernel::{refl, Certificate, LemmaName};

use core::cmp::Ordering;
use num_traits::One;
use std::sync::Arc;

/// A rational coefficient times a product of powers of the ring variables, together with a
/// certificate that some source term equals it.
///
/// The certificate proves `term = (n / d) * P`, where `n / d` is the coefficient and `P` the
/// [power product](Monomial::product) of the exponents.
#[derive(Clone, Debug)]
pub struct Monomial {
    /// The coefficient, as its own term.
    coeff: Coefficient,
    powers: Arc<[u32]>,
    vars: Arc<[RcExpr]>,
    product: RcExpr,
    cert: Certificate,
}

impl Monomial {
    /// The constant monomial of `coeff`, with the coefficient's term.
    pub fn constant(vars: Arc<[RcExpr]>, coeff: &Coefficient) -> Self {
        let powers: Arc<[u32]> = vec![0; vars.len()].into();
        let product = power_product(&vars, &powers);
        let cert = by(
            LemmaName::MonoConst,
            &[coeff.certificate(), &unit_product(vars.len())],
        );
        Self {
            coeff: coeff.as_value(),
            powers,
            vars,
            product,
            cert,
        }
    }

    /// The `index`th ring variable, with the variable's term.
    ///
    /// # Panics
    ///
    /// If `index` is not the index of a variable.
    pub fn variable(vars: Arc<[RcExpr]>, index: usize) -> Self {
        let mut powers = vec![0; vars.len()];
        powers[index] = 1;
        let product = power_product(&vars, &powers);
        let cert = by(LemmaName::MonoVar, &[&variable_product(&vars, index)]);
        Self {
            coeff: Coefficient::value(1.into(), 1.into()),
            powers: powers.into(),
            vars,
            product,
            cert,
        }
    }

    /// A monomial over the same ring with a different certificate.
    fn with(&self, coeff: &Coefficient, powers: Arc<[u32]>, cert: Certificate) -> Self {
        Self {
            coeff: coeff.as_value(),
            product: power_product(&self.vars, &powers),
            powers,
            vars: Arc::clone(&self.vars),
            cert,
        }
    }

    /// The monomial `coeff * P` over the exponents of this one, as its own term.
    fn valued(&self, coeff: &Coefficient) -> Self {
        let coeff = coeff.as_value();
        let cert = refl(Expr::mult(RcExpr::clone(coeff.rhs()), RcExpr::clone(&self.product)));
        Self {
            coeff,
            cert,
            ..self.clone()
        }
    }

    /// The same monomial, as its own term.
    pub fn as_value(&self) -> Self {
        Self {
            cert: refl(RcExpr::clone(self.rhs())),
            ..self.clone()
        }
    }

    pub fn coefficient(&self) -> &Coefficient {
        &self.coeff
    }

    pub fn powers(&self) -> &[u32] {
        &self.powers
    }

    /// The power product `P` of the exponents.
    pub fn product(&self) -> &RcExpr {
        &self.product
    }

    pub fn term(&self) -> &RcExpr {
        self.cert.lhs()
    }

    /// `(n / d) * P`.
    pub fn rhs(&self) -> &RcExpr {
        self.cert.rhs()
    }

    pub fn certificate(&self) -> &Certificate {
        &self.cert
    }

    /// `term * other.term = c * P` with the product coefficient and summed exponents.
    ///
    /// # Panics
    ///
    /// If a summed exponent does not fit a `u32`. [`TreePolynomial::checked_multiply`] and
    /// [`TreePolynomial::checked_pow`] rule this out up front.
    ///
    /// [`TreePolynomial::checked_multiply`]: super::TreePolynomial::checked_multiply
    /// [`TreePolynomial::checked_pow`]: super::TreePolynomial::checked_pow
    pub fn multiply(&self, other: &Monomial) -> Monomial {
        let powers = match add_powers(&self.powers, &other.powers) {
            Some(powers) => powers,
            None => {
                tracing::error!(lhs = %self.rhs(), rhs = %other.rhs(), "exponent overflow");
                panic!("the exponents of `{}` * `{}` overflow", self.rhs(), other.rhs());
            }
        };
        let coeff = self.coeff.multiply(&other.coeff);
        let products = multiply_products(&self.vars, &self.powers, &other.powers);
        let cert = by(
            LemmaName::MonoMul,
            &[
                &self.cert,
                &other.cert,
                coeff.certificate(),
                &products,
            ],
        );
        self.with(&coeff, powers, cert)
    }

    /// `-term = -c * P`.
    pub fn negate(&self) -> Monomial {
        let coeff = self.coeff.negate();
        let cert = by(LemmaName::MonoNeg, &[&self.cert, coeff.certificate()]);
        self.with(&coeff, Arc::clone(&self.powers), cert)
    }

    /// `term + other.term = (c1 + c2) * P` if both monomials have the same exponents.
    pub fn add_same_powers(&self, other: &Monomial) -> Option<Monomial> {
        if self.powers != other.powers {
            return None;
        }
        let coeff = self.coeff.add(&other.coeff);
        let cert = by(
            LemmaName::MonoAdd,
            &[&self.cert, &other.cert, coeff.certificate()],
        );
        Some(self.with(&coeff, Arc::clone(&self.powers), cert))
    }

    /// The monomial order: reverse lexicographic on the exponents. For variables `[x, y]`,
    ///
    /// ```text
    /// x^2 < x*y < x < y^2 < y < 1
    /// ```
    pub fn compare(&self, other: &Monomial) -> Ordering {
        compare_powers(&self.powers, &other.powers)
    }

    /// Proves `term = N` for the normal form `N` of the monomial.
    ///
    /// A zero coefficient gives `0`. Otherwise unit factors are dropped, `x ^ 1` is written `x`, a
    /// unit coefficient is dropped and a constant product leaves the bare coefficient. A negative
    /// coefficient is factored out first, giving `-(k * Q)`, `-Q` or `-k`; a negative integer
    /// constant is the literal itself.
    pub fn normalized(&self) -> Certificate {
        if self.coeff.is_zero() {
            return by(
                LemmaName::MonoZero,
                &[&self.cert, &self.coeff.normalized_form()],
            );
        }
        let integer_constant =
            self.powers.iter().all(|&p| p == 0) && self.coeff.denom().is_one();
        if self.coeff.is_negative() && !integer_constant {
            let positive = self.coeff.negate();
            let factored = by(
                LemmaName::MonoFactorSign,
                &[&self.cert, positive.certificate()],
            );
            let inner = self.valued(&positive).normalized();
            return chain(&factored, &by(LemmaName::NegCong, &[&inner]));
        }

        let coeff = self.coeff.normalized_form();
        let product = normalize_product(&self.product);
        if self.coeff.is_one() {
            by(LemmaName::MonoUnitCoeff, &[&self.cert, &coeff, &product])
        } else if product.rhs().is_num(1) {
            by(LemmaName::MonoNormConst, &[&self.cert, &coeff, &product])
        } else {
            by(LemmaName::MonoNormPos, &[&self.cert, &coeff, &product])
        }
    }

    /// Splits the coefficient as [`Coefficient::approx`] does.
    ///
    /// Returns a certificate of `term = c1 * P + c2 * P` for the unreduced parts `c1`, `c2` of the
    /// split, and the two parts as monomials with terms `c1 * P` and `c2 * P`.
    pub fn approx(&self, precision: u32) -> (Certificate, Monomial, Monomial) {
        let (split, c1, c2) = self.coeff.approx(precision);
        let cert = by(LemmaName::MonoSplit, &[&self.cert, &split]);
        let part = |c: &Coefficient| {
            let cert = by(LemmaName::MulCong, &[c.certificate(), &refl(RcExpr::clone(&self.product))]);
            self.with(c, Arc::clone(&self.powers), cert)
        };
        (cert, part(&c1), part(&c2))
    }
}

/// Sums two exponent lists, or `None` if a sum does not fit a `u32`.
pub(crate) fn add_powers(a: &[u32], b: &[u32]) -> Option<Arc<[u32]>> {
    a.iter()
        .zip(b)
        .map(|(p, q)| p.checked_add(*q))
        .collect::<Option<Vec<_>>>()
        .map(Into::into)
}

pub(crate) fn compare_powers(a: &[u32], b: &[u32]) -> Ordering {
    a.cmp(b).reverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::Emit;

    fn ring(names: &[&str]) -> Arc<[RcExpr]> {
        names.iter().map(|n| Expr::atom(*n)).collect::<Vec<_>>().into()
    }

    fn var(vars: &Arc<[RcExpr]>, i: usize) -> Monomial {
        Monomial::variable(Arc::clone(vars), i)
    }

    fn constant(vars: &Arc<[RcExpr]>, n: i64, d: i64) -> Monomial {
        Monomial::constant(Arc::clone(vars), &Coefficient::ratio(n, d).unwrap())
    }

    #[test]
    fn constructors() {
        let xy = ring(&["x", "y"]);
        assert_eq!(var(&xy, 1).certificate().emit_pretty(), "|- y = 1 / 1 * 1 * y ^ 1");
        let half = Monomial::constant(Arc::clone(&xy), &Coefficient::ratio(2, 4).unwrap());
        assert_eq!(half.certificate().emit_pretty(), "|- 2 / 4 = 1 / 2 * 1 * 1");
        let none = ring(&[]);
        let three = Monomial::constant(none, &Coefficient::constant(3));
        assert_eq!(three.certificate().emit_pretty(), "|- 3 = 3 / 1 * 1");
    }

    #[test]
    fn multiply() {
        let xy = ring(&["x", "y"]);
        let (x, y) = (var(&xy, 0), var(&xy, 1));
        let xxy = x.multiply(&x).multiply(&y);
        assert_eq!(xxy.powers(), &[2, 1]);
        assert_eq!(xxy.term().to_string(), "x * x * y");
        assert_eq!(xxy.rhs().to_string(), "1 / 1 * x ^ 2 * y ^ 1");
    }

    #[test]
    fn negate_and_add() {
        let xy = ring(&["x", "y"]);
        let (x, y) = (var(&xy, 0), var(&xy, 1));
        let neg = x.negate();
        assert_eq!(neg.certificate().emit_pretty(), "|- -x = -1 / 1 * x ^ 1 * 1");
        let zero = x.add_same_powers(&neg).unwrap();
        assert!(zero.coefficient().is_zero());
        assert_eq!(zero.term().to_string(), "x + -x");
        assert!(x.add_same_powers(&y).is_none());
    }

    #[test]
    fn add_powers_overflow() {
        assert_eq!(add_powers(&[1, 2], &[3, 0]).as_deref(), Some(&[4, 2][..]));
        assert_eq!(add_powers(&[u32::MAX, 0], &[0, 7]).as_deref(), Some(&[u32::MAX, 7][..]));
        assert!(add_powers(&[u32::MAX, 0], &[1, 0]).is_none());
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn multiply_overflow_panics() {
        let vars = ring(&["x"]);
        let x = var(&vars, 0);
        let big = x.with(x.coefficient(), vec![u32::MAX].into(), x.certificate().clone());
        big.multiply(&x);
    }

    #[test]
    fn order() {
        let xy = ring(&["x", "y"]);
        let (x, y) = (var(&xy, 0), var(&xy, 1));
        let one = Monomial::constant(Arc::clone(&xy), &Coefficient::constant(1));
        let sorted = vec![
            x.multiply(&x),
            x.multiply(&y),
            x.clone(),
            y.multiply(&y),
            y.clone(),
            one,
        ];
        for (i, a) in sorted.iter().enumerate() {
            for (j, b) in sorted.iter().enumerate() {
                assert_eq!(a.compare(b), i.cmp(&j), "{} vs {}", a.rhs(), b.rhs());
            }
        }
    }

    macro_rules! normalized_tests {
        ($($name:ident: $mono:expr => $normal:expr)*) => {
        $(
            #[test]
            fn $name() {
                let xy = ring(&["x", "y"]);
                let (x, y) = (var(&xy, 0), var(&xy, 1));
                let _ = (&x, &y);
                let mono: Monomial = $mono(&xy, &x, &y);
                let cert = mono.normalized();
                assert_eq!(cert.lhs(), mono.term());
                assert_eq!(cert.rhs().to_string(), $normal);
            }
        )*
        }
    }

    mod normalized {
        use super::*;

        normalized_tests! {
            variable:       |_, x: &Monomial, _| x.clone()                           => "x"
            power:          |_, x: &Monomial, y: &Monomial| x.multiply(x).multiply(y) => "x ^ 2 * y"
            negated:        |_, x: &Monomial, _| x.negate()                          => "-x"
            scaled:         |v, x: &Monomial, _| constant(v, 2, 1).multiply(x)       => "2 * x"
            negative_scale: |v, _, y: &Monomial| constant(v, -3, 2).multiply(y)      => "-(3 / 2 * y)"
            integer_constant: |v, _, _| constant(v, 5, 1)                            => "5"
            neg_constant:   |v, _, _| constant(v, -5, 1)                             => "-5"
            neg_fraction:   |v, _, _| constant(v, -1, 3)                             => "-(1 / 3)"
            unit_constant:  |v, _, _| constant(v, 1, 1)                              => "1"
            zero:           |v, x: &Monomial, _| constant(v, 0, 1).multiply(x)       => "0"
        }
    }

    #[test]
    fn approx() {
        let xy = ring(&["x", "y"]);
        let m = constant(&xy, 2, 3).multiply(&var(&xy, 0)).as_value();
        let (cert, rounded, rest) = m.approx(1);
        assert_eq!(cert.lhs(), m.term());
        assert_eq!(
            cert.rhs().to_string(),
            "6 / 10 * x ^ 1 * 1 + 2 / 30 * x ^ 1 * 1"
        );
        assert_eq!(rounded.rhs().to_string(), "3 / 5 * x ^ 1 * 1");
        assert_eq!(rest.rhs().to_string(), "1 / 15 * x ^ 1 * 1");
        assert_eq!(rounded.powers(), m.powers());
    }
}
