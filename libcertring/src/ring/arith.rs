//! Certified arithmetic on tree polynomials.
//!
//! Sums and products fold over the nodes of one operand. Every fold step is one lemma for the
//! shape of the node it consumes.

use super::coefficient::Coefficient;
use super::monomial::{add_powers, Monomial};
use super::proof::{bind, by, by_with, fact, int_eq, num};
use super::tree::{Node, TreePolynomial};
use crate::grammar::Expr;
use crate::kernel::{Certificate, LemmaName};

use num_bigint::BigInt;
use std::sync::Arc;

impl TreePolynomial {
    /// The constant polynomial `1`, with term `1`.
    pub(super) fn unit(&self) -> TreePolynomial {
        let vars = Arc::clone(&self.vars);
        let one = Monomial::constant(Arc::clone(&vars), &Coefficient::constant(1));
        TreePolynomial::from_monomial(vars, &one)
    }

    /// `term + other.term`.
    pub fn add(&self, other: &TreePolynomial) -> TreePolynomial {
        let sum = self.add_node(&other.root);
        let cert = by(LemmaName::AddCongR, &[&other.cert, &sum.cert]);
        sum.with_cert(cert)
    }

    /// Proves `term + rhs(node) = s`.
    fn add_node(&self, node: &Node) -> TreePolynomial {
        match node {
            Node::Empty => self.with_cert(by(LemmaName::AddZero, &[&self.cert])),
            Node::Branch2 {
                left, value, right, ..
            } => {
                let sum = self.add_node(left).insert(value).add_node(right);
                sum.with_cert(by(LemmaName::AddB2, &[&sum.cert]))
            }
            Node::Branch3 {
                left,
                v1,
                mid,
                v2,
                right,
                ..
            } => {
                let sum = self
                    .add_node(left)
                    .insert(v1)
                    .add_node(mid)
                    .insert(v2)
                    .add_node(right);
                sum.with_cert(by(LemmaName::AddB3, &[&sum.cert]))
            }
        }
    }

    /// `term - other.term`.
    pub fn sub(&self, other: &TreePolynomial) -> TreePolynomial {
        let diff = self.sub_node(&other.root);
        let cert = by(LemmaName::SubCongR, &[&other.cert, &diff.cert]);
        diff.with_cert(cert)
    }

    /// Proves `term - rhs(node) = s`.
    fn sub_node(&self, node: &Node) -> TreePolynomial {
        match node {
            Node::Empty => self.with_cert(by(LemmaName::SubZero, &[&self.cert])),
            Node::Branch2 {
                left, value, right, ..
            } => {
                let diff = self.sub_node(left).sub_value(value).sub_node(right);
                diff.with_cert(by(LemmaName::SubB2, &[&diff.cert]))
            }
            Node::Branch3 {
                left,
                v1,
                mid,
                v2,
                right,
                ..
            } => {
                let diff = self
                    .sub_node(left)
                    .sub_value(v1)
                    .sub_node(mid)
                    .sub_value(v2)
                    .sub_node(right);
                diff.with_cert(by(LemmaName::SubB3, &[&diff.cert]))
            }
        }
    }

    fn sub_value(&self, value: &Monomial) -> TreePolynomial {
        let sum = self.insert(&value.negate());
        sum.with_cert(by(LemmaName::SubMono, &[&sum.cert]))
    }

    /// `-term`. The tree keeps its shape.
    pub fn negate(&self) -> TreePolynomial {
        let (root, c) = negate_node(&self.root);
        let cert = by(LemmaName::NegTrans, &[&self.cert, &c]);
        self.with_root(root, cert)
    }

    /// `term * m.term`. Multiplying by a monomial preserves the monomial order, so the tree keeps
    /// its shape.
    pub fn multiply_monomial(&self, m: &Monomial) -> TreePolynomial {
        let (root, c) = scale_node(&self.root, m);
        let cert = by(LemmaName::MulCongL, &[&self.cert, &c]);
        self.with_root(root, cert)
    }

    /// `term * other.term`.
    ///
    /// # Panics
    ///
    /// If an exponent of the product does not fit a `u32`.
    pub fn multiply(&self, other: &TreePolynomial) -> TreePolynomial {
        let product = self.multiply_node(&other.root);
        let cert = by(LemmaName::MulCongR, &[&other.cert, &product.cert]);
        product.with_cert(cert)
    }

    /// Proves `term * rhs(node) = s`.
    fn multiply_node(&self, node: &Node) -> TreePolynomial {
        match node {
            Node::Empty => {
                let cert = by_with(LemmaName::MulZeroR, &[], bind("_p", self.term()));
                TreePolynomial::zero(Arc::clone(&self.vars)).with_cert(cert)
            }
            Node::Branch2 {
                left, value, right, ..
            } => {
                let sum = self
                    .multiply_node(left)
                    .add(&self.multiply_monomial(value))
                    .add(&self.multiply_node(right));
                sum.with_cert(by(LemmaName::MulB2, &[&sum.cert]))
            }
            Node::Branch3 {
                left,
                v1,
                mid,
                v2,
                right,
                ..
            } => {
                let sum = self
                    .multiply_node(left)
                    .add(&self.multiply_monomial(v1))
                    .add(&self.multiply_node(mid))
                    .add(&self.multiply_monomial(v2))
                    .add(&self.multiply_node(right));
                sum.with_cert(by(LemmaName::MulB3, &[&sum.cert]))
            }
        }
    }

    /// `term * other.term`, or `None` if an exponent of the product does not fit a `u32`.
    pub fn checked_multiply(&self, other: &TreePolynomial) -> Option<TreePolynomial> {
        add_powers(&self.degrees(), &other.degrees())?;
        Some(self.multiply(other))
    }

    /// `term ^ n`, or `None` if an exponent of the power does not fit a `u32`.
    pub fn checked_pow(&self, n: u32) -> Option<TreePolynomial> {
        for d in self.degrees() {
            d.checked_mul(n)?;
        }
        Some(self.pow(n))
    }

    /// `term ^ n`, by repeated squaring.
    ///
    /// # Panics
    ///
    /// If an exponent of the power does not fit a `u32`.
    pub fn pow(&self, n: u32) -> TreePolynomial {
        match n {
            0 => {
                let one = self.unit();
                let cert = by_with(LemmaName::PowZero, &[&one.cert], bind("_p", self.term()));
                one.with_cert(cert)
            }
            1 => self.with_cert(by(LemmaName::PowOneP, &[&self.cert])),
            n => {
                let half = self.pow(n / 2);
                let square = half.multiply(&half);
                let even = n % 2 == 0;
                let (m, n) = (BigInt::from(n / 2), BigInt::from(n));
                let twice = Expr::plus(num(&m), num(&m));
                if even {
                    let cert = by(
                        LemmaName::PowEven,
                        &[&fact(int_eq(twice, &n)), &square.cert],
                    );
                    square.with_cert(cert)
                } else {
                    let full = square.multiply(self);
                    let cert = by(
                        LemmaName::PowOdd,
                        &[
                            &fact(int_eq(Expr::plus(twice, Expr::num(1)), &n)),
                            &full.cert,
                        ],
                    );
                    full.with_cert(cert)
                }
            }
        }
    }
}

/// Proves `-rhs(node) = rhs(negated)`.
fn negate_node(node: &Node) -> (Arc<Node>, Certificate) {
    match node {
        Node::Empty => (Node::empty(), by(LemmaName::NegZero, &[])),
        Node::Branch2 {
            left, value, right, ..
        } => {
            let (l, cl) = negate_node(left);
            let v = value.negate();
            let (r, cr) = negate_node(right);
            let cert = by(LemmaName::NegB2, &[&cl, v.certificate(), &cr]);
            (Node::branch2(l, v, r), cert)
        }
        Node::Branch3 {
            left,
            v1,
            mid,
            v2,
            right,
            ..
        } => {
            let (l, cl) = negate_node(left);
            let a = v1.negate();
            let (m, cm) = negate_node(mid);
            let b = v2.negate();
            let (r, cr) = negate_node(right);
            let cert = by(
                LemmaName::NegB3,
                &[&cl, a.certificate(), &cm, b.certificate(), &cr],
            );
            (Node::branch3(l, a, m, b, r), cert)
        }
    }
}

/// Proves `rhs(node) * m.term = rhs(scaled)`.
fn scale_node(node: &Node, m: &Monomial) -> (Arc<Node>, Certificate) {
    match node {
        Node::Empty => {
            let cert = by_with(LemmaName::MulZeroL, &[], bind("_i", m.term()));
            (Node::empty(), cert)
        }
        Node::Branch2 {
            left, value, right, ..
        } => {
            let (l, cl) = scale_node(left, m);
            let v = value.multiply(m);
            let (r, cr) = scale_node(right, m);
            let cert = by(LemmaName::MulMonoB2, &[&cl, v.certificate(), &cr]);
            (Node::branch2(l, v, r), cert)
        }
        Node::Branch3 {
            left,
            v1,
            mid,
            v2,
            right,
            ..
        } => {
            let (l, cl) = scale_node(left, m);
            let a = v1.multiply(m);
            let (md, cm) = scale_node(mid, m);
            let b = v2.multiply(m);
            let (r, cr) = scale_node(right, m);
            let cert = by(
                LemmaName::MulMonoB3,
                &[&cl, a.certificate(), &cm, b.certificate(), &cr],
            );
            (Node::branch3(l, a, md, b, r), cert)
        }
    }
}
