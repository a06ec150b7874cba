//! Normal forms of tree polynomials.
//!
//! The normal form of a polynomial is the left-associated sum of its normalized monomials, in
//! monomial order, with zero monomials dropped and `a + -b` written `a - b`. The zero polynomial is
//! `0`.

use super::proof::{bind, by, by_with, chain, fact, int_eq, num};
use super::tree::{Node, TreePolynomial};
use crate::grammar::{BinaryExpr, BinaryOperator, Expr, RcExpr, UnaryExpr, UnaryOperator};
use crate::kernel::{refl, Certificate, LemmaName};

use num_traits::Signed;

impl TreePolynomial {
    /// Proves `term = N` for the normal form `N` of the polynomial.
    pub fn normalized(&self) -> Certificate {
        let monomials = normalize_monomials(&self.root);
        let sum = reassoc(monomials.rhs());
        chain(&self.cert, &chain(&monomials, &sum))
    }

    /// Proves `term = 0` if the polynomial is zero.
    pub fn zero_test(&self) -> Option<Certificate> {
        let cert = self.normalized();
        if cert.rhs().is_num(0) {
            Some(cert)
        } else {
            None
        }
    }
}

/// Normalizes every monomial in place, keeping the shape of the tree.
fn normalize_monomials(node: &Node) -> Certificate {
    match node {
        Node::Empty => refl(Expr::num(0)),
        Node::Branch2 {
            left, value, right, ..
        } => by(
            LemmaName::AddCong3,
            &[
                &normalize_monomials(left),
                &value.normalized(),
                &normalize_monomials(right),
            ],
        ),
        Node::Branch3 {
            left,
            v1,
            mid,
            v2,
            right,
            ..
        } => by(
            LemmaName::AddCong5,
            &[
                &normalize_monomials(left),
                &v1.normalized(),
                &normalize_monomials(mid),
                &v2.normalized(),
                &normalize_monomials(right),
            ],
        ),
    }
}

/// Flattens a tree of sums into one left-associated chain.
fn reassoc(sum: &RcExpr) -> Certificate {
    match sum.as_ref() {
        Expr::BinaryExpr(BinaryExpr {
            op: BinaryOperator::Plus,
            lhs,
            rhs,
        }) => {
            let left = reassoc(lhs);
            let rest = append(left.rhs(), rhs);
            by(LemmaName::AddCongTrans, &[&left, &rest])
        }
        _ => refl(RcExpr::clone(sum)),
    }
}

/// Proves `acc + b = c`, where `acc` is a normalized chain and `c` extends it by the summands of `b`.
fn append(acc: &RcExpr, b: &RcExpr) -> Certificate {
    if b.is_num(0) {
        return by_with(LemmaName::AddZeroR, &[], bind("_a", acc));
    }
    match b.as_ref() {
        Expr::BinaryExpr(BinaryExpr {
            op: BinaryOperator::Plus,
            lhs,
            rhs,
        }) => {
            let first = append(acc, lhs);
            let second = append(first.rhs(), rhs);
            by(LemmaName::AddAssocChain, &[&first, &second])
        }
        _ if acc.is_num(0) => by(LemmaName::AddZeroLT, &[&refl(RcExpr::clone(b))]),
        Expr::UnaryExpr(UnaryExpr {
            op: UnaryOperator::SignNegative,
            rhs,
        }) => by_with(
            LemmaName::AddNegSub,
            &[],
            bind("_a", acc).with("_b", RcExpr::clone(rhs)),
        ),
        Expr::Num(n) if n.is_negative() => {
            let m = -n;
            by_with(
                LemmaName::AddNegLit,
                &[&fact(int_eq(Expr::neg(num(&m)), n))],
                bind("_a", acc),
            )
        }
        _ => refl(Expr::plus(RcExpr::clone(acc), RcExpr::clone(b))),
    }
}
