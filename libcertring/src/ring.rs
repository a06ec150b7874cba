//! The certifying polynomial ring.
//!
//! A [`PolynomialRing`] fixes an ordered list of variables and compiles expressions over them into
//! [`TreePolynomial`]s. Every value of the ring (coefficients, monomials and polynomials) carries a
//! certificate that its source term equals its structural value, and every operation on values
//! derives the certificate of its result from the certificates of its operands through the
//! [kernel](crate::kernel).

mod arith;
mod coefficient;
mod errors;
mod monomial;
mod normalize;
mod partition;
mod powers;
mod proof;
mod tree;

pub use coefficient::Coefficient;
pub use errors::RingError;
pub(crate) use errors::RingErrors;
pub use monomial::Monomial;
pub use powers::POW_CACHE_BOUND;
pub use tree::{Growth, Node, TreePolynomial};

use crate::grammar::*;
use crate::kernel::LemmaName;
use proof::{by, fact, int_eq};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use std::collections::HashSet;
use std::sync::Arc;

/// Polynomials with rational coefficients over a fixed, ordered list of variables.
///
/// A variable can be any expression; two variables are the same iff they are structurally equal.
#[derive(Clone, Debug)]
pub struct PolynomialRing {
    vars: Arc<[RcExpr]>,
}

impl PolynomialRing {
    pub fn new<I>(vars: I) -> Result<Self, RingError>
    where
        I: IntoIterator<Item = RcExpr>,
    {
        let vars: Vec<RcExpr> = vars.into_iter().collect();
        let mut seen = HashSet::with_capacity(vars.len());
        if let Some(dup) = vars.iter().find(|v| !seen.insert(*v)) {
            return Err(RingError::DuplicateVariable(RcExpr::clone(dup)));
        }
        tracing::debug!(
            vars = %vars.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "),
            "built a polynomial ring"
        );
        Ok(Self { vars: vars.into() })
    }

    pub fn vars(&self) -> &[RcExpr] {
        &self.vars
    }

    /// The index of a variable of the ring.
    pub fn index_of(&self, term: &RcExpr) -> Option<usize> {
        self.vars.iter().position(|v| v == term)
    }

    fn monomial(&self, m: &Monomial) -> TreePolynomial {
        TreePolynomial::from_monomial(Arc::clone(&self.vars), m)
    }

    /// The constant `n`, with term `n`.
    pub fn constant<N: Into<BigInt>>(&self, n: N) -> TreePolynomial {
        let coeff = Coefficient::constant(n);
        self.monomial(&Monomial::constant(Arc::clone(&self.vars), &coeff))
    }

    /// The constant `n / d`, with term `n / d`.
    pub fn rational<N, D>(&self, n: N, d: D) -> Result<TreePolynomial, RingError>
    where
        N: Into<BigInt>,
        D: Into<BigInt>,
    {
        let (n, d): (BigInt, BigInt) = (n.into(), d.into());
        let term = Expr::frac(n.clone(), d.clone());
        match Coefficient::ratio(n, d) {
            Some(coeff) => Ok(self.monomial(&Monomial::constant(Arc::clone(&self.vars), &coeff))),
            None => Err(RingError::ZeroDenominator(term)),
        }
    }

    /// The `index`th variable, with the variable's term.
    pub fn variable(&self, index: usize) -> Result<TreePolynomial, RingError> {
        if index >= self.vars.len() {
            return Err(RingError::VariableIndexOutOfRange {
                index,
                len: self.vars.len(),
            });
        }
        Ok(self.monomial(&Monomial::variable(Arc::clone(&self.vars), index)))
    }

    /// The zero polynomial, with term `0`. Unlike `constant(0)` it stores no monomial.
    pub fn zero(&self) -> TreePolynomial {
        TreePolynomial::zero(Arc::clone(&self.vars))
    }

    pub fn one(&self) -> TreePolynomial {
        self.constant(1)
    }

    /// Compiles an expression into the ring.
    ///
    /// `+`, `-`, `*`, unary signs, integer literals, divisions of integer literals and powers with
    /// an integer literal exponent become the corresponding operations of the ring. Every other
    /// subterm must be a variable of the ring. The certificate of the result has the expression
    /// itself as its left-hand side. A product or power with an exponent past `u32::MAX` is
    /// [`RingError::ExponentOverflow`].
    pub fn of_term(&self, expr: &RcExpr) -> Result<TreePolynomial, RingError> {
        match expr.as_ref() {
            Expr::Num(n) => Ok(self.constant(n.clone())),
            Expr::BinaryExpr(BinaryExpr { op, lhs, rhs }) => match op {
                BinaryOperator::Plus => Ok(self.of_term(lhs)?.add(&self.of_term(rhs)?)),
                BinaryOperator::Minus => Ok(self.of_term(lhs)?.sub(&self.of_term(rhs)?)),
                BinaryOperator::Mult => self
                    .of_term(lhs)?
                    .checked_multiply(&self.of_term(rhs)?)
                    .ok_or_else(|| RingError::ExponentOverflow(RcExpr::clone(expr))),
                BinaryOperator::Div => match (lhs.as_num(), rhs.as_num()) {
                    (Some(n), Some(d)) => self
                        .rational(n.clone(), d.clone())
                        .map_err(|_| RingError::ZeroDenominator(RcExpr::clone(expr))),
                    _ if rhs.is_num(0) => Err(RingError::ZeroDenominator(RcExpr::clone(expr))),
                    _ => self.atom(expr),
                },
                BinaryOperator::Exp => self.power(expr, lhs, rhs),
            },
            Expr::UnaryExpr(UnaryExpr { op, rhs }) => {
                let p = self.of_term(rhs)?;
                Ok(match op {
                    UnaryOperator::SignNegative => p.negate(),
                    UnaryOperator::SignPositive => {
                        let cert = by(LemmaName::PosId, &[p.certificate()]);
                        p.with_cert(cert)
                    }
                })
            }
            Expr::Atom(_) | Expr::App(..) | Expr::Meta(_) => self.atom(expr),
        }
    }

    fn power(
        &self,
        expr: &RcExpr,
        base: &RcExpr,
        exponent: &RcExpr,
    ) -> Result<TreePolynomial, RingError> {
        let n = match exponent.as_signed_num() {
            Some(n) => n,
            None => return self.atom(expr),
        };
        if n.is_negative() {
            return Err(RingError::NegativeExponent(RcExpr::clone(expr)));
        }
        let k = n
            .to_u32()
            .ok_or_else(|| RingError::ExponentOverflow(RcExpr::clone(expr)))?;
        let p = self
            .of_term(base)?
            .checked_pow(k)
            .ok_or_else(|| RingError::ExponentOverflow(RcExpr::clone(expr)))?;
        if exponent.as_num().is_some() {
            return Ok(p);
        }
        // A signed literal, like `+2`.
        let exponent = fact(int_eq(RcExpr::clone(exponent), &n));
        let cert = by(LemmaName::ExpCong, &[&exponent, p.certificate()]);
        Ok(p.with_cert(cert))
    }

    fn atom(&self, expr: &RcExpr) -> Result<TreePolynomial, RingError> {
        match self.index_of(expr) {
            Some(index) => self.variable(index),
            None => Err(RingError::UnknownAtom(RcExpr::clone(expr))),
        }
    }
}
