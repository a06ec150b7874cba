use super::proof::{by, by_with, bind, fact, int_eq, nonzero, num};
use crate::grammar::{Expr, RcExpr};
use crate::kernel::{refl, Certificate, LemmaName};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// An exact rational number, together with a certificate that some source term equals it.
///
/// The certificate always proves `term = n / d`, where the right-hand side is the literal fraction
/// of the numerator and denominator. The results of arithmetic are reduced: the denominator is
/// positive and coprime to the numerator, and zero is `0 / 1`.
#[derive(Clone, Debug)]
pub struct Coefficient {
    num: BigInt,
    den: BigInt,
    cert: Certificate,
}

impl Coefficient {
    /// The integer `n`, with term `n`.
    pub fn constant<N: Into<BigInt>>(n: N) -> Self {
        let n = n.into();
        let cert = by_with(LemmaName::CoeffOfInt, &[], bind("#n", &num(&n)));
        Self {
            num: n,
            den: BigInt::one(),
            cert,
        }
    }

    /// The fraction `n / d`, with term `n / d`. `None` if `d` is zero.
    pub fn ratio<N: Into<BigInt>, D: Into<BigInt>>(n: N, d: D) -> Option<Self> {
        let (num, den) = (n.into(), d.into());
        if den.is_zero() {
            return None;
        }
        Some(Self::value(num, den).reduce())
    }

    /// The fraction `n / d` as its own term.
    pub(crate) fn value(num: BigInt, den: BigInt) -> Self {
        let cert = refl(Expr::div(Expr::num(num.clone()), Expr::num(den.clone())));
        Self { num, den, cert }
    }

    /// This coefficient as its own term.
    pub fn as_value(&self) -> Self {
        Self::value(self.num.clone(), self.den.clone())
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn term(&self) -> &RcExpr {
        self.cert.lhs()
    }

    /// The literal `n / d`.
    pub fn rhs(&self) -> &RcExpr {
        self.cert.rhs()
    }

    /// Proves `term = n / d`.
    pub fn certificate(&self) -> &Certificate {
        &self.cert
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.num.is_one() && self.den.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative() != self.den.is_negative() && !self.num.is_zero()
    }

    /// Brings the fraction to lowest terms with a positive denominator.
    fn reduce(self) -> Self {
        let mut g = self.num.gcd(&self.den);
        if self.den.is_negative() {
            g = -g;
        }
        if g.is_one() {
            return self;
        }
        let (m, e) = (&self.num / &g, &self.den / &g);
        let cert = by(
            LemmaName::CoeffReduce,
            &[
                &self.cert,
                &fact(int_eq(Expr::mult(num(&m), num(&g)), &self.num)),
                &fact(int_eq(Expr::mult(num(&e), num(&g)), &self.den)),
                &fact(nonzero(&g)),
            ],
        );
        Self {
            num: m,
            den: e,
            cert,
        }
    }

    /// `-term = -n / d`.
    pub fn negate(&self) -> Self {
        let m = -&self.num;
        let cert = by(
            LemmaName::CoeffNeg,
            &[
                &self.cert,
                &fact(int_eq(Expr::neg(num(&self.num)), &m)),
            ],
        );
        Self {
            num: m,
            den: self.den.clone(),
            cert,
        }
    }

    fn combine(&self, other: &Self, lemma: LemmaName, pn: BigInt, pn_term: RcExpr) -> Self {
        let pd = &self.den * &other.den;
        let cert = by(
            lemma,
            &[
                &self.cert,
                &other.cert,
                &fact(int_eq(pn_term, &pn)),
                &fact(int_eq(Expr::mult(num(&self.den), num(&other.den)), &pd)),
                &fact(nonzero(&self.den)),
                &fact(nonzero(&other.den)),
            ],
        );
        Self {
            num: pn,
            den: pd,
            cert,
        }
        .reduce()
    }

    /// `term + other.term = (ln * rd + rn * ld) / (ld * rd)`, reduced.
    pub fn add(&self, other: &Self) -> Self {
        let pn = &self.num * &other.den + &other.num * &self.den;
        let pn_term = Expr::plus(
            Expr::mult(num(&self.num), num(&other.den)),
            Expr::mult(num(&other.num), num(&self.den)),
        );
        self.combine(other, LemmaName::CoeffAdd, pn, pn_term)
    }

    /// `term - other.term = (ln * rd - rn * ld) / (ld * rd)`, reduced.
    pub fn sub(&self, other: &Self) -> Self {
        let pn = &self.num * &other.den - &other.num * &self.den;
        let pn_term = Expr::minus(
            Expr::mult(num(&self.num), num(&other.den)),
            Expr::mult(num(&other.num), num(&self.den)),
        );
        self.combine(other, LemmaName::CoeffSub, pn, pn_term)
    }

    /// `term * other.term = (ln * rn) / (ld * rd)`, reduced.
    pub fn multiply(&self, other: &Self) -> Self {
        let pn = &self.num * &other.num;
        let pn_term = Expr::mult(num(&self.num), num(&other.num));
        self.combine(other, LemmaName::CoeffMul, pn, pn_term)
    }

    /// Proves `term = k`, where `k` is the literal `0` for a zero numerator, the bare numerator for
    /// a unit denominator, and `n / d` otherwise.
    pub fn normalized_form(&self) -> Certificate {
        if self.num.is_zero() {
            by(
                LemmaName::CoeffZero,
                &[&self.cert, &fact(nonzero(&self.den))],
            )
        } else if self.den.is_one() {
            by(LemmaName::CoeffUnitDen, &[&self.cert])
        } else {
            self.cert.clone()
        }
    }

    /// Splits off `a / b`.
    ///
    /// Returns a certificate of `term = a / b + e / f` with `e / f` the difference of this
    /// coefficient and `a / b`, and the two parts as reduced coefficients with terms `a / b` and
    /// `e / f`.
    ///
    /// # Panics
    ///
    /// If `b` is zero.
    pub fn split(&self, a: &BigInt, b: &BigInt) -> (Certificate, Coefficient, Coefficient) {
        let (n, d) = (&self.num, &self.den);
        let e = n * b - a * d;
        let f = d * b;
        // `fact` rejects `b != 0` when `b` is zero.
        let cert = by(
            LemmaName::CoeffSplit,
            &[
                &self.cert,
                &fact(int_eq(
                    Expr::minus(Expr::mult(num(n), num(b)), Expr::mult(num(a), num(d))),
                    &e,
                )),
                &fact(int_eq(Expr::mult(num(d), num(b)), &f)),
                &fact(nonzero(d)),
                &fact(nonzero(b)),
            ],
        );
        let c1 = Self::value(a.clone(), b.clone()).reduce();
        let c2 = Self::value(e, f).reduce();
        (cert, c1, c2)
    }

    /// Splits the coefficient into its value rounded toward negative infinity to `precision`
    /// decimal digits, and the remainder. See [`split`](Coefficient::split).
    pub fn approx(&self, precision: u32) -> (Certificate, Coefficient, Coefficient) {
        let b = BigInt::from(10u32).pow(precision);
        let a = (&self.num * &b).div_floor(&self.den);
        self.split(&a, &b)
    }
}

#[cfg(test)]
mod tests {
    use super::Coefficient;
    use crate::emit::Emit;
    use num_bigint::BigInt;

    fn ratio(n: i64, d: i64) -> Coefficient {
        Coefficient::ratio(n, d).unwrap()
    }

    macro_rules! coefficient_tests {
        ($($name:ident: $coeff:expr => $cert:expr)*) => {
        $(
            #[test]
            fn $name() {
                let coeff: Coefficient = $coeff;
                assert_eq!(coeff.certificate().emit_pretty(), $cert);
            }
        )*
        }
    }

    coefficient_tests! {
        constant:           Coefficient::constant(7)                => "|- 7 = 7 / 1"
        reduced_ratio:      ratio(6, 4)                             => "|- 6 / 4 = 3 / 2"
        negative_den:       ratio(3, -6)                            => "|- 3 / -6 = -1 / 2"
        zero_ratio:         ratio(0, -5)                            => "|- 0 / -5 = 0 / 1"
        lowest_terms:       ratio(2, 3)                             => "|- 2 / 3 = 2 / 3"
        negate:             ratio(2, 3).negate()                    => "|- -(2 / 3) = -2 / 3"
        add:                ratio(1, 2).add(&ratio(1, 3))           => "|- 1 / 2 + 1 / 3 = 5 / 6"
        add_reduces:        ratio(1, 6).add(&ratio(1, 3))           => "|- 1 / 6 + 1 / 3 = 1 / 2"
        add_to_zero:        ratio(1, 2).add(&ratio(-1, 2))          => "|- 1 / 2 + -1 / 2 = 0 / 1"
        sub:                ratio(1, 2).sub(&ratio(1, 3))           => "|- 1 / 2 - 1 / 3 = 1 / 6"
        multiply:           ratio(2, 3).multiply(&ratio(9, 4))      => "|- 2 / 3 * (9 / 4) = 3 / 2"
        multiply_constants: Coefficient::constant(3).multiply(&Coefficient::constant(-2))
                                                                    => "|- 3 * -2 = -6 / 1"
    }

    #[test]
    fn predicates() {
        assert!(ratio(0, 3).is_zero());
        assert!(ratio(4, 4).is_one());
        assert!(ratio(-1, 2).is_negative());
        assert!(!ratio(0, -2).is_negative());
        assert!(Coefficient::ratio(1, 0).is_none());
    }

    #[test]
    fn normalized_form() {
        assert_eq!(ratio(0, 3).normalized_form().emit_pretty(), "|- 0 / 3 = 0");
        assert_eq!(ratio(8, 2).normalized_form().emit_pretty(), "|- 8 / 2 = 4");
        assert_eq!(ratio(1, 2).normalized_form().emit_pretty(), "|- 1 / 2 = 1 / 2");
    }

    #[test]
    fn split() {
        let (cert, c1, c2) = ratio(7, 4).split(&BigInt::from(1), &BigInt::from(2));
        assert_eq!(cert.emit_pretty(), "|- 7 / 4 = 1 / 2 + 10 / 8");
        assert_eq!(c1.certificate().emit_pretty(), "|- 1 / 2 = 1 / 2");
        assert_eq!(c2.certificate().emit_pretty(), "|- 10 / 8 = 5 / 4");
    }

    #[test]
    fn approx_rounds_toward_negative_infinity() {
        let (_, rounded, rest) = ratio(2, 3).approx(2);
        assert_eq!(rounded.numer(), &BigInt::from(33));
        assert_eq!(rounded.denom(), &BigInt::from(50));
        assert_eq!(rounded.rhs().to_string(), "33 / 50");
        assert_eq!(rest.rhs().to_string(), "1 / 150");

        let (_, rounded, rest) = ratio(-2, 3).approx(1);
        assert_eq!(rounded.rhs().to_string(), "-7 / 10");
        assert_eq!(rest.rhs().to_string(), "1 / 30");
    }

    #[test]
    #[should_panic]
    fn split_by_zero_denominator_is_fatal() {
        ratio(1, 2).split(&BigInt::from(1), &BigInt::from(0));
    }
}
