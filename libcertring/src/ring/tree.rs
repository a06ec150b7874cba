//! Persistent 2-3 trees of monomials.
//!
//! A tree is never changed in place. Insertion rebuilds the path from the root to the insertion
//! point and shares every other subtree with the tree it was derived from.

use super::monomial::{compare_powers, Monomial};
use super::proof::by;
use crate::grammar::{Expr, RcExpr};
use crate::kernel::{refl, Certificate, LemmaName, Substitution};

use core::cmp::Ordering;
use std::sync::Arc;

/// A node of a 2-3 tree of monomials, ordered by [`Monomial::compare`].
///
/// The monomials stored in a node are their own terms, and each branch caches its structural
/// value (see [`Node::rhs`]).
#[derive(Clone, Debug)]
pub enum Node {
    Empty,
    Branch2 {
        left: Arc<Node>,
        value: Monomial,
        right: Arc<Node>,
        rhs: RcExpr,
    },
    Branch3 {
        left: Arc<Node>,
        v1: Monomial,
        mid: Arc<Node>,
        v2: Monomial,
        right: Arc<Node>,
        rhs: RcExpr,
    },
}

impl Node {
    pub(super) fn empty() -> Arc<Node> {
        Arc::new(Node::Empty)
    }

    pub(super) fn branch2(left: Arc<Node>, value: Monomial, right: Arc<Node>) -> Arc<Node> {
        let value = value.as_value();
        let rhs = Expr::plus(
            Expr::plus(left.rhs(), RcExpr::clone(value.rhs())),
            right.rhs(),
        );
        Arc::new(Node::Branch2 {
            left,
            value,
            right,
            rhs,
        })
    }

    pub(super) fn branch3(
        left: Arc<Node>,
        v1: Monomial,
        mid: Arc<Node>,
        v2: Monomial,
        right: Arc<Node>,
    ) -> Arc<Node> {
        let (v1, v2) = (v1.as_value(), v2.as_value());
        let rhs = Expr::plus(
            Expr::plus(
                Expr::plus(
                    Expr::plus(left.rhs(), RcExpr::clone(v1.rhs())),
                    mid.rhs(),
                ),
                RcExpr::clone(v2.rhs()),
            ),
            right.rhs(),
        );
        Arc::new(Node::Branch3 {
            left,
            v1,
            mid,
            v2,
            right,
            rhs,
        })
    }

    /// The structural value of the node:
    ///
    /// ```text
    /// Empty                        0
    /// Branch2(l, v, r)             (l + v) + r
    /// Branch3(l, v1, m, v2, r)     (((l + v1) + m) + v2) + r
    /// ```
    pub fn rhs(&self) -> RcExpr {
        match self {
            Node::Empty => Expr::num(0),
            Node::Branch2 { rhs, .. } | Node::Branch3 { rhs, .. } => RcExpr::clone(rhs),
        }
    }

    /// Proves `rhs = rhs`.
    pub fn certificate(&self) -> Certificate {
        refl(self.rhs())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// Distance from this node to its leaves.
    pub fn height(&self) -> usize {
        match self {
            Node::Empty => 0,
            Node::Branch2 { left, .. } | Node::Branch3 { left, .. } => 1 + left.height(),
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Monomial>) {
        match self {
            Node::Empty => {}
            Node::Branch2 {
                left, value, right, ..
            } => {
                left.collect(out);
                out.push(value);
                right.collect(out);
            }
            Node::Branch3 {
                left,
                v1,
                mid,
                v2,
                right,
                ..
            } => {
                left.collect(out);
                out.push(v1);
                mid.collect(out);
                out.push(v2);
                right.collect(out);
            }
        }
    }

    fn lookup(&self, powers: &[u32]) -> Option<&Monomial> {
        match self {
            Node::Empty => None,
            Node::Branch2 {
                left, value, right, ..
            } => match compare_powers(powers, value.powers()) {
                Ordering::Equal => Some(value),
                Ordering::Less => left.lookup(powers),
                Ordering::Greater => right.lookup(powers),
            },
            Node::Branch3 {
                left,
                v1,
                mid,
                v2,
                right,
                ..
            } => match compare_powers(powers, v1.powers()) {
                Ordering::Equal => Some(v1),
                Ordering::Less => left.lookup(powers),
                Ordering::Greater => match compare_powers(powers, v2.powers()) {
                    Ordering::Equal => Some(v2),
                    Ordering::Less => mid.lookup(powers),
                    Ordering::Greater => right.lookup(powers),
                },
            },
        }
    }

    /// Binds the lemma metavariables that name the parts of a branch: `_l`, `_v`, `_r` for a
    /// 2-node and `_l`, `_v`, `_m`, `_y`, `_r` for a 3-node.
    pub(super) fn shape(&self) -> Substitution {
        match self {
            Node::Empty => Substitution::default(),
            Node::Branch2 {
                left, value, right, ..
            } => Substitution::default()
                .with("_l", left.rhs())
                .with("_v", RcExpr::clone(value.rhs()))
                .with("_r", right.rhs()),
            Node::Branch3 {
                left,
                v1,
                mid,
                v2,
                right,
                ..
            } => Substitution::default()
                .with("_l", left.rhs())
                .with("_v", RcExpr::clone(v1.rhs()))
                .with("_m", mid.rhs())
                .with("_y", RcExpr::clone(v2.rhs()))
                .with("_r", right.rhs()),
        }
    }

    /// Checks the balance of the tree and the cached values. Returns the height.
    fn check(&self) -> Result<usize, String> {
        let (heights, expected) = match self {
            Node::Empty => return Ok(0),
            Node::Branch2 {
                left, value, right, ..
            } => (
                vec![left.check()?, right.check()?],
                Node::branch2(Arc::clone(left), value.clone(), Arc::clone(right)),
            ),
            Node::Branch3 {
                left,
                v1,
                mid,
                v2,
                right,
                ..
            } => (
                vec![left.check()?, mid.check()?, right.check()?],
                Node::branch3(
                    Arc::clone(left),
                    v1.clone(),
                    Arc::clone(mid),
                    v2.clone(),
                    Arc::clone(right),
                ),
            ),
        };
        if heights.iter().any(|&h| h != heights[0]) {
            return Err(format!(
                "children of `{}` have heights {:?}",
                self.rhs(),
                heights
            ));
        }
        if expected.rhs() != self.rhs() {
            return Err(format!(
                "cached value `{}` should be `{}`",
                self.rhs(),
                expected.rhs()
            ));
        }
        Ok(heights[0] + 1)
    }
}

/// The outcome of inserting into a subtree.
#[derive(Clone, Debug)]
pub enum Growth {
    /// The subtree kept its height.
    Stay(Arc<Node>),
    /// The subtree split into a 2-node one level higher. The parent must absorb the split or
    /// split in turn.
    Sprout {
        left: Arc<Node>,
        value: Monomial,
        right: Arc<Node>,
    },
}

impl Growth {
    pub fn into_node(self) -> Arc<Node> {
        match self {
            Growth::Stay(node) => node,
            Growth::Sprout { left, value, right } => Node::branch2(left, value, right),
        }
    }
}

fn combine(value: &Monomial, m: &Monomial) -> Monomial {
    match value.add_same_powers(m) {
        Some(sum) => sum,
        // `compare` is only equal for equal exponents.
        None => unreachable!(),
    }
}

/// Inserts `m` into `node`, proving `rhs(node) + m.term = rhs(grown)`.
fn insert_node(node: &Node, m: &Monomial) -> (Growth, Certificate) {
    match node {
        Node::Empty => {
            let cert = by(LemmaName::InsEmpty, &[m.certificate()]);
            let growth = Growth::Sprout {
                left: Node::empty(),
                value: m.clone(),
                right: Node::empty(),
            };
            (growth, cert)
        }
        Node::Branch2 {
            left, value, right, ..
        } => {
            let shape = node.shape();
            match m.compare(value) {
                Ordering::Equal => {
                    let sum = combine(value, m);
                    let cert = by_shape(LemmaName::B2Eq, sum.certificate(), shape);
                    let node = Node::branch2(Arc::clone(left), sum, Arc::clone(right));
                    (Growth::Stay(node), cert)
                }
                Ordering::Less => {
                    let (growth, c) = insert_node(left, m);
                    let cert = by_shape(LemmaName::B2Left, &c, shape);
                    let node = match growth {
                        Growth::Stay(l) => Node::branch2(l, value.clone(), Arc::clone(right)),
                        Growth::Sprout {
                            left: a,
                            value: u,
                            right: b,
                        } => Node::branch3(a, u, b, value.clone(), Arc::clone(right)),
                    };
                    (Growth::Stay(node), cert)
                }
                Ordering::Greater => match insert_node(right, m) {
                    (Growth::Stay(r), c) => {
                        let cert = by_shape(LemmaName::B2Right, &c, shape);
                        let node = Node::branch2(Arc::clone(left), value.clone(), r);
                        (Growth::Stay(node), cert)
                    }
                    (
                        Growth::Sprout {
                            left: a,
                            value: u,
                            right: b,
                        },
                        c,
                    ) => {
                        let cert = by_shape(LemmaName::B2RightSprout, &c, shape);
                        let node = Node::branch3(Arc::clone(left), value.clone(), a, u, b);
                        (Growth::Stay(node), cert)
                    }
                },
            }
        }
        Node::Branch3 {
            left,
            v1,
            mid,
            v2,
            right,
            ..
        } => {
            let shape = node.shape();
            let (l, m1, md, m2, r) = (left, v1.clone(), mid, v2.clone(), right);
            let keep = Arc::clone;
            match (m.compare(v1), m.compare(v2)) {
                (Ordering::Equal, _) => {
                    let sum = combine(v1, m);
                    let cert = by_shape(LemmaName::B3EqV1, sum.certificate(), shape);
                    let node = Node::branch3(keep(l), sum, keep(md), m2, keep(r));
                    (Growth::Stay(node), cert)
                }
                (_, Ordering::Equal) => {
                    let sum = combine(v2, m);
                    let cert = by_shape(LemmaName::B3EqV2, sum.certificate(), shape);
                    let node = Node::branch3(keep(l), m1, keep(md), sum, keep(r));
                    (Growth::Stay(node), cert)
                }
                (Ordering::Less, _) => match insert_node(left, m) {
                    (Growth::Stay(a), c) => {
                        let cert = by_shape(LemmaName::B3LeftStay, &c, shape);
                        let node = Node::branch3(a, m1, keep(md), m2, keep(r));
                        (Growth::Stay(node), cert)
                    }
                    (Growth::Sprout { left: a, value: u, right: b }, c) => {
                        let cert = by_shape(LemmaName::B3LeftSprout, &c, shape);
                        let growth = Growth::Sprout {
                            left: Node::branch2(a, u, b),
                            value: m1,
                            right: Node::branch2(keep(md), m2, keep(r)),
                        };
                        (growth, cert)
                    }
                },
                (_, Ordering::Less) => match insert_node(mid, m) {
                    (Growth::Stay(a), c) => {
                        let cert = by_shape(LemmaName::B3MidStay, &c, shape);
                        let node = Node::branch3(keep(l), m1, a, m2, keep(r));
                        (Growth::Stay(node), cert)
                    }
                    (Growth::Sprout { left: a, value: u, right: b }, c) => {
                        let cert = by_shape(LemmaName::B3MidSprout, &c, shape);
                        let growth = Growth::Sprout {
                            left: Node::branch2(keep(l), m1, a),
                            value: u,
                            right: Node::branch2(b, m2, keep(r)),
                        };
                        (growth, cert)
                    }
                },
                _ => match insert_node(right, m) {
                    (Growth::Stay(a), c) => {
                        let cert = by_shape(LemmaName::B3RightStay, &c, shape);
                        let node = Node::branch3(keep(l), m1, keep(md), m2, a);
                        (Growth::Stay(node), cert)
                    }
                    (Growth::Sprout { left: a, value: u, right: b }, c) => {
                        let cert = by_shape(LemmaName::B3RightSprout, &c, shape);
                        let growth = Growth::Sprout {
                            left: Node::branch2(keep(l), m1, keep(md)),
                            value: m2,
                            right: Node::branch2(a, u, b),
                        };
                        (growth, cert)
                    }
                },
            }
        }
    }
}

fn by_shape(lemma: LemmaName, premise: &Certificate, shape: Substitution) -> Certificate {
    super::proof::by_with(lemma, &[premise], shape)
}

/// A polynomial over the variables of a ring, stored as a 2-3 tree of monomials, together with a
/// certificate that its source term equals the structural value of the root.
#[derive(Clone, Debug)]
pub struct TreePolynomial {
    pub(super) vars: Arc<[RcExpr]>,
    pub(super) root: Arc<Node>,
    pub(super) cert: Certificate,
}

impl TreePolynomial {
    /// The zero polynomial, with term `0`.
    pub fn zero(vars: Arc<[RcExpr]>) -> Self {
        Self {
            vars,
            root: Node::empty(),
            cert: refl(Expr::num(0)),
        }
    }

    /// The polynomial of a single monomial, with the monomial's term.
    pub fn from_monomial(vars: Arc<[RcExpr]>, m: &Monomial) -> Self {
        let (growth, cert) = insert_node(&Node::Empty, m);
        let cert = by(LemmaName::ZeroAddL, &[&cert]);
        Self {
            vars,
            root: growth.into_node(),
            cert,
        }
    }

    pub(super) fn with_root(&self, root: Arc<Node>, cert: Certificate) -> Self {
        Self {
            vars: Arc::clone(&self.vars),
            root,
            cert,
        }
    }

    pub(super) fn with_cert(&self, cert: Certificate) -> Self {
        self.with_root(Arc::clone(&self.root), cert)
    }

    /// The same polynomial, as its own term.
    pub fn as_value(&self) -> Self {
        self.with_cert(self.root.certificate())
    }

    pub fn vars(&self) -> &[RcExpr] {
        &self.vars
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn term(&self) -> &RcExpr {
        self.cert.lhs()
    }

    pub fn rhs(&self) -> &RcExpr {
        self.cert.rhs()
    }

    /// Proves `term = rhs`.
    pub fn certificate(&self) -> &Certificate {
        &self.cert
    }

    /// Adds a monomial, proving `term + m.term = rhs'`.
    ///
    /// A monomial with the exponents of a stored one is combined with it. Otherwise it is placed in
    /// order, splitting full nodes on the way back up; a split that reaches the root grows the tree
    /// by one level.
    pub fn insert(&self, m: &Monomial) -> Self {
        let (growth, c) = insert_node(&self.root, m);
        if let Growth::Sprout { value, .. } = &growth {
            tracing::trace!(
                height = self.root.height() + 1,
                root = %value.rhs(),
                "tree grew"
            );
        }
        let cert = by(LemmaName::AddCongL, &[&self.cert, &c]);
        self.with_root(growth.into_node(), cert)
    }

    /// The stored monomial with the given exponents, if any.
    pub fn lookup(&self, powers: &[u32]) -> Option<&Monomial> {
        self.root.lookup(powers)
    }

    /// The stored monomials, in increasing order.
    pub fn monomials(&self) -> Vec<&Monomial> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out
    }

    /// Number of stored monomials, including any with a zero coefficient.
    pub fn len(&self) -> usize {
        self.monomials().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// The largest exponent of each variable over the stored monomials.
    pub fn degrees(&self) -> Vec<u32> {
        let mut degrees = vec![0; self.vars.len()];
        for m in self.monomials() {
            for (d, &p) in degrees.iter_mut().zip(m.powers()) {
                *d = (*d).max(p);
            }
        }
        degrees
    }

    /// Checks that all leaves are at the same depth, that the stored monomials are strictly
    /// increasing, and that the certificate proves the value of the root.
    pub fn check_invariants(&self) -> Result<(), String> {
        self.root.check()?;
        let monomials = self.monomials();
        for pair in monomials.windows(2) {
            if pair[0].compare(pair[1]) != Ordering::Less {
                return Err(format!(
                    "`{}` is stored before `{}`",
                    pair[0].rhs(),
                    pair[1].rhs()
                ));
            }
        }
        if let Some(m) = monomials.iter().find(|m| m.powers().len() != self.vars.len()) {
            return Err(format!("`{}` has the wrong number of exponents", m.rhs()));
        }
        if *self.rhs() != self.root.rhs() {
            return Err(format!(
                "the certificate proves `{}`, but the tree is `{}`",
                self.rhs(),
                self.root.rhs()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::{Coefficient, PolynomialRing};
    use crate::{parse_expression, scan};
    use num_bigint::BigInt;

    fn ring(names: &[&str]) -> PolynomialRing {
        PolynomialRing::new(names.iter().map(|n| Expr::atom(*n))).unwrap()
    }

    fn compile(ring: &PolynomialRing, program: &str) -> TreePolynomial {
        ring.of_term(&parse_expression(scan(program).tokens).program)
            .unwrap()
    }

    /// `x ^ i` as a monomial of the ring `[x]`.
    fn power(i: u32) -> Monomial {
        let vars: Arc<[RcExpr]> = vec![Expr::atom("x")].into();
        let x = Monomial::variable(Arc::clone(&vars), 0);
        (1..i).fold(x.clone(), |p, _| p.multiply(&x))
    }

    #[test]
    fn insert_into_empty() {
        let xs = ring(&["x"]);
        let p = xs.zero().insert(&power(2));
        assert_eq!(p.len(), 1);
        assert_eq!(p.height(), 1);
        assert_eq!(p.term().to_string(), "0 + x * x");
        assert_eq!(p.rhs().to_string(), "0 + 1 / 1 * x ^ 2 + 0");
        p.check_invariants().unwrap();
    }

    #[test]
    fn insert_grows_in_order() {
        let xs = ring(&["x"]);
        let mut p = xs.zero();
        for i in &[3, 1, 4, 5, 9, 2, 6, 8, 7, 10, 12, 11] {
            p = p.insert(&power(*i));
            p.check_invariants().unwrap();
        }
        let powers: Vec<u32> = p.monomials().iter().map(|m| m.powers()[0]).collect();
        assert_eq!(powers, vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
        assert!(p.height() >= 2 && p.height() <= 3);
    }

    #[test]
    fn insert_combines_equal_exponents() {
        let xs = ring(&["x"]);
        let p = xs.zero().insert(&power(2)).insert(&power(1)).insert(&power(2));
        assert_eq!(p.len(), 2);
        let square = p.lookup(&[2]).unwrap();
        assert_eq!(square.coefficient().numer(), &BigInt::from(2));
        p.check_invariants().unwrap();
    }

    #[test]
    fn insert_shares_untouched_subtrees() {
        let xs = ring(&["x"]);
        let p = (1..=7).fold(xs.zero(), |p, i| p.insert(&power(i)));
        let q = p.insert(&power(7));
        let (right, right_q) = match (p.root(), q.root()) {
            (Node::Branch2 { right, .. }, Node::Branch2 { right: right_q, .. })
            | (Node::Branch3 { right, .. }, Node::Branch3 { right: right_q, .. }) => {
                (right, right_q)
            }
            _ => panic!("insertion changed the root's shape"),
        };
        assert!(Arc::ptr_eq(right, right_q));
    }

    #[test]
    fn lookup() {
        let xy = ring(&["x", "y"]);
        let p = compile(&xy, "x * y + 3 * y + 2");
        assert!(p.lookup(&[1, 1]).is_some());
        assert_eq!(
            p.lookup(&[0, 1]).unwrap().coefficient().numer(),
            &BigInt::from(3)
        );
        assert_eq!(p.lookup(&[0, 0]).unwrap().coefficient().numer(), &BigInt::from(2));
        assert!(p.lookup(&[1, 0]).is_none());
    }

    #[test]
    fn degrees() {
        let xy = ring(&["x", "y"]);
        assert_eq!(compile(&xy, "x * y ^ 3 + x ^ 2 - y").degrees(), vec![2, 3]);
        assert_eq!(compile(&xy, "x - x").degrees(), vec![1, 0]);
        assert_eq!(xy.zero().degrees(), vec![0, 0]);
    }

    #[test]
    fn from_monomial() {
        let xs = ring(&["x"]);
        let p = TreePolynomial::from_monomial(
            Arc::from(xs.vars()),
            &Monomial::constant(Arc::from(xs.vars()), &Coefficient::constant(4)),
        );
        assert_eq!(p.certificate().conclusion().to_string(), "4 = 0 + 4 / 1 * 1 + 0");
        p.check_invariants().unwrap();
    }

    #[test]
    fn corrupted_cache_is_caught() {
        let xs = ring(&["x"]);
        let p = xs.zero().insert(&power(1));
        let bad = match p.root() {
            Node::Branch2 { left, value, right, .. } => Node::Branch2 {
                left: Arc::clone(left),
                value: value.clone(),
                right: Arc::clone(right),
                rhs: Expr::num(0),
            },
            _ => unreachable!(),
        };
        let bad = p.with_root(Arc::new(bad), p.certificate().clone());
        assert!(bad.check_invariants().is_err());
    }
}
