//! The libcertring expression grammar.
//!
//! Expressions are immutable and shared through [`RcExpr`]. Two expressions are the same term iff
//! they are structurally equal; the kernel compares terms this way when it chains and discharges
//! certificates.

pub mod collectors;
mod visit;
pub use visit::*;

use crate::scanner::types::{Token, TokenType};

use core::cmp::Ordering;
use core::convert::TryFrom;
use num_bigint::BigInt;
use num_traits::Signed;
use std::sync::Arc;

/// A shared, immutable expression.
pub type RcExpr = Arc<Expr>;

/// An arithmetic expression, or an expression pattern if it contains [metavariables](Expr::Meta).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Expr {
    /// An integer literal.
    Num(BigInt),
    /// A named opaque atom, like `x`.
    Atom(String),
    /// An uninterpreted function application, like `f(x, y)`.
    App(String, Vec<RcExpr>),
    /// A schematic variable, named with its sigil. `_a` stands for any term, `#a` for an integer
    /// literal.
    Meta(String),
    BinaryExpr(BinaryExpr),
    UnaryExpr(UnaryExpr),
}

impl Expr {
    pub fn num<N: Into<BigInt>>(n: N) -> RcExpr {
        Arc::new(Self::Num(n.into()))
    }

    pub fn atom<S: Into<String>>(name: S) -> RcExpr {
        Arc::new(Self::Atom(name.into()))
    }

    pub fn app<S: Into<String>>(name: S, args: Vec<RcExpr>) -> RcExpr {
        Arc::new(Self::App(name.into(), args))
    }

    pub fn meta<S: Into<String>>(name: S) -> RcExpr {
        Arc::new(Self::Meta(name.into()))
    }

    pub fn binary(op: BinaryOperator, lhs: RcExpr, rhs: RcExpr) -> RcExpr {
        Arc::new(Self::BinaryExpr(BinaryExpr { op, lhs, rhs }))
    }

    pub fn unary(op: UnaryOperator, rhs: RcExpr) -> RcExpr {
        Arc::new(Self::UnaryExpr(UnaryExpr { op, rhs }))
    }

    pub fn plus(lhs: RcExpr, rhs: RcExpr) -> RcExpr {
        Self::binary(BinaryOperator::Plus, lhs, rhs)
    }

    pub fn minus(lhs: RcExpr, rhs: RcExpr) -> RcExpr {
        Self::binary(BinaryOperator::Minus, lhs, rhs)
    }

    pub fn mult(lhs: RcExpr, rhs: RcExpr) -> RcExpr {
        Self::binary(BinaryOperator::Mult, lhs, rhs)
    }

    pub fn div(lhs: RcExpr, rhs: RcExpr) -> RcExpr {
        Self::binary(BinaryOperator::Div, lhs, rhs)
    }

    pub fn exp(lhs: RcExpr, rhs: RcExpr) -> RcExpr {
        Self::binary(BinaryOperator::Exp, lhs, rhs)
    }

    pub fn neg(rhs: RcExpr) -> RcExpr {
        Self::unary(UnaryOperator::SignNegative, rhs)
    }

    pub fn pos(rhs: RcExpr) -> RcExpr {
        Self::unary(UnaryOperator::SignPositive, rhs)
    }

    /// The rational literal `n / d`.
    pub fn frac<N: Into<BigInt>, D: Into<BigInt>>(n: N, d: D) -> RcExpr {
        Self::div(Self::num(n), Self::num(d))
    }

    /// Returns the value of an integer literal.
    pub fn as_num(&self) -> Option<&BigInt> {
        match self {
            Self::Num(n) => Some(n),
            _ => None,
        }
    }

    /// Whether this is the integer literal `n`.
    pub fn is_num<N: Into<BigInt>>(&self, n: N) -> bool {
        let n = n.into();
        matches!(self, Self::Num(k) if *k == n)
    }

    /// Returns the value of an integer literal, possibly written with a leading unary sign.
    pub fn as_signed_num(&self) -> Option<BigInt> {
        match self {
            Self::Num(n) => Some(n.clone()),
            Self::UnaryExpr(UnaryExpr { op, rhs }) => {
                let n = rhs.as_signed_num()?;
                Some(match op {
                    UnaryOperator::SignPositive => n,
                    UnaryOperator::SignNegative => -n,
                })
            }
            _ => None,
        }
    }

    /// Whether a polynomial ring treats this expression as an opaque atom rather than an
    /// arithmetic combination of smaller terms.
    ///
    /// The arithmetic combinators are `+`, `-`, `*`, unary signs, powers with an integer literal
    /// exponent, integer literals, and the division of two integer literals. Everything else,
    /// including divisions by non-literals and powers with symbolic exponents, is an atom.
    pub fn is_ring_atom(&self) -> bool {
        match self {
            Self::Num(_) | Self::UnaryExpr(_) => false,
            Self::Atom(_) | Self::App(..) | Self::Meta(_) => true,
            Self::BinaryExpr(BinaryExpr { op, lhs, rhs }) => match op {
                BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Mult => false,
                BinaryOperator::Div => !(lhs.as_num().is_some() && rhs.as_num().is_some()),
                BinaryOperator::Exp => rhs.as_signed_num().is_none(),
            },
        }
    }

    /// Whether this is a negative integer literal, which is emitted with a leading `-`.
    pub(crate) fn is_negative_num(&self) -> bool {
        matches!(self, Self::Num(n) if n.is_negative())
    }
}

impl From<BigInt> for Expr {
    fn from(n: BigInt) -> Self {
        Self::Num(n)
    }
}

impl From<BinaryExpr> for Expr {
    fn from(binary_expr: BinaryExpr) -> Self {
        Self::BinaryExpr(binary_expr)
    }
}

impl From<UnaryExpr> for Expr {
    fn from(unary_expr: UnaryExpr) -> Self {
        Self::UnaryExpr(unary_expr)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum BinaryOperator {
    // Discriminant values exist for ease of operator precedence. Operators in the same decade
    // have the same precedence.
    Plus = 1,
    Minus = 2,
    Mult = 10,
    Div = 11,
    Exp = 20,
}

impl BinaryOperator {
    pub fn precedence(&self) -> u8 {
        (*self as u8) / 10
    }

    pub fn is_associative(&self) -> bool {
        matches!(self, Self::Plus | Self::Mult)
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, Self::Exp)
    }
}

impl PartialOrd for BinaryOperator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }

        match self.precedence().cmp(&other.precedence()) {
            Ordering::Equal => None,
            ord => Some(ord),
        }
    }
}

impl TryFrom<&Token> for BinaryOperator {
    type Error = ();

    fn try_from(token: &Token) -> Result<Self, Self::Error> {
        use BinaryOperator::*;
        match token.ty {
            TokenType::Plus => Ok(Plus),
            TokenType::Minus => Ok(Minus),
            TokenType::Mult => Ok(Mult),
            TokenType::Div => Ok(Div),
            TokenType::Exp => Ok(Exp),
            _ => Err(()),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct BinaryExpr {
    pub op: BinaryOperator,
    pub lhs: RcExpr,
    pub rhs: RcExpr,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum UnaryOperator {
    SignPositive,
    SignNegative,
}

impl TryFrom<&Token> for UnaryOperator {
    type Error = ();

    fn try_from(token: &Token) -> Result<Self, Self::Error> {
        use UnaryOperator::*;
        match token.ty {
            TokenType::Plus => Ok(SignPositive),
            TokenType::Minus => Ok(SignNegative),
            _ => Err(()),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct UnaryExpr {
    pub op: UnaryOperator,
    pub rhs: RcExpr,
}

/// An equation or disequation between two expressions.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Prop {
    /// `lhs = rhs`
    Eq(RcExpr, RcExpr),
    /// `lhs != rhs`
    Ne(RcExpr, RcExpr),
}

impl Prop {
    pub fn equal(lhs: RcExpr, rhs: RcExpr) -> Self {
        Self::Eq(lhs, rhs)
    }

    pub fn not_equal(lhs: RcExpr, rhs: RcExpr) -> Self {
        Self::Ne(lhs, rhs)
    }

    pub fn lhs(&self) -> &RcExpr {
        match self {
            Self::Eq(lhs, _) | Self::Ne(lhs, _) => lhs,
        }
    }

    pub fn rhs(&self) -> &RcExpr {
        match self {
            Self::Eq(_, rhs) | Self::Ne(_, rhs) => rhs,
        }
    }

    pub fn is_equation(&self) -> bool {
        matches!(self, Self::Eq(..))
    }

    /// Rebuilds the proposition with both sides mapped over `f`.
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&RcExpr) -> RcExpr,
    {
        match self {
            Self::Eq(lhs, rhs) => Self::Eq(f(lhs), f(rhs)),
            Self::Ne(lhs, rhs) => Self::Ne(f(lhs), f(rhs)),
        }
    }
}
