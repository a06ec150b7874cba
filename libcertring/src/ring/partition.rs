//! Splitting a polynomial into two polynomials that sum back to it.

use super::monomial::Monomial;
use super::proof::{by, chain};
use super::tree::{Node, TreePolynomial};
use crate::kernel::{refl, Certificate, LemmaName};

use num_bigint::BigInt;
use std::sync::Arc;

impl TreePolynomial {
    /// Separates the monomials satisfying `predicate` from the rest.
    ///
    /// The predicate is called with the numerator, denominator and exponents of every stored
    /// monomial. Returns a certificate of `term = p1.term + p2.term`, the polynomial `p1` of the
    /// monomials satisfying the predicate and the polynomial `p2` of the others.
    ///
    /// # Panics
    ///
    /// If the two parts do not sum back to the polynomial.
    pub fn partition<P>(&self, predicate: P) -> (Certificate, TreePolynomial, TreePolynomial)
    where
        P: Fn(&BigInt, &BigInt, &[u32]) -> bool,
    {
        let (yes, no): (Vec<&Monomial>, Vec<&Monomial>) =
            self.monomials().into_iter().partition(|m| {
                let coeff = m.coefficient();
                predicate(coeff.numer(), coeff.denom(), m.powers())
            });
        let (p1, p2) = (self.rebuild(&yes), self.rebuild(&no));

        let rest = self.sub(&p1).sub(&p2);
        let zero = match rest.zero_test() {
            Some(cert) => cert,
            None => {
                tracing::error!(
                    term = %self.term(),
                    left = %p1.rhs(),
                    right = %p2.rhs(),
                    rest = %rest.normalized().rhs(),
                    "partition does not sum back to the polynomial"
                );
                panic!("partition of `{}` does not sum back to it", self.term());
            }
        };
        let cert = by(LemmaName::PartitionSplit, &[&zero]);
        (cert, p1, p2)
    }

    fn rebuild(&self, monomials: &[&Monomial]) -> TreePolynomial {
        let vars = Arc::clone(&self.vars);
        match monomials.split_first() {
            None => TreePolynomial::zero(vars),
            Some((first, rest)) => rest.iter().fold(
                TreePolynomial::from_monomial(vars, first),
                |p, m| p.insert(m),
            ),
        }
    }

    /// Rounds every coefficient toward negative infinity to `precision` decimal digits.
    ///
    /// Returns a certificate of `term = rhs(rounded) + rhs(remainder)`, the polynomial of rounded
    /// coefficients and the polynomial of remainders. Both have the shape of this polynomial and
    /// are their own terms.
    pub fn approx(&self, precision: u32) -> (Certificate, TreePolynomial, TreePolynomial) {
        let (split, rounded, remainder) = approx_node(&self.root, precision);
        let cert = chain(&self.cert, &split);
        let part = |root: Arc<Node>| {
            let cert = refl(root.rhs());
            self.with_root(root, cert)
        };
        (cert, part(rounded), part(remainder))
    }

    /// Like [`approx`](TreePolynomial::approx), but proves `term = R + E` for the normal forms `R`
    /// of the rounded polynomial and `E` of the remainder.
    pub fn approx_normalized(
        &self,
        precision: u32,
    ) -> (Certificate, TreePolynomial, TreePolynomial) {
        let (split, rounded, remainder) = self.approx(precision);
        let cert = by(
            LemmaName::SplitCong,
            &[&split, &rounded.normalized(), &remainder.normalized()],
        );
        (cert, rounded, remainder)
    }
}

fn approx_value(value: &Monomial, precision: u32) -> (Certificate, Monomial, Monomial) {
    let (split, rounded, remainder) = value.approx(precision);
    let cert = by(
        LemmaName::SplitCong,
        &[&split, rounded.certificate(), remainder.certificate()],
    );
    (cert, rounded, remainder)
}

/// Proves `rhs(node) = rhs(rounded) + rhs(remainder)`.
fn approx_node(node: &Node, precision: u32) -> (Certificate, Arc<Node>, Arc<Node>) {
    match node {
        Node::Empty => (by(LemmaName::ZeroSplit, &[]), Node::empty(), Node::empty()),
        Node::Branch2 {
            left, value, right, ..
        } => {
            let (cl, l1, l2) = approx_node(left, precision);
            let (cv, v1, v2) = approx_value(value, precision);
            let (cr, r1, r2) = approx_node(right, precision);
            (
                by(LemmaName::ApproxB2, &[&cl, &cv, &cr]),
                Node::branch2(l1, v1, r1),
                Node::branch2(l2, v2, r2),
            )
        }
        Node::Branch3 {
            left,
            v1,
            mid,
            v2,
            right,
            ..
        } => {
            let (cl, l1, l2) = approx_node(left, precision);
            let (ca, a1, a2) = approx_value(v1, precision);
            let (cm, m1, m2) = approx_node(mid, precision);
            let (cb, b1, b2) = approx_value(v2, precision);
            let (cr, r1, r2) = approx_node(right, precision);
            (
                by(LemmaName::ApproxB3, &[&cl, &ca, &cm, &cb, &cr]),
                Node::branch3(l1, a1, m1, b1, r1),
                Node::branch3(l2, a2, m2, b2, r2),
            )
        }
    }
}
