//! libcertring is a certifying polynomial normalizer.
//!
//! Given an arithmetic expression over opaque atoms, libcertring computes a canonical
//! sum-of-monomials form of the expression together with a [`Certificate`](kernel::Certificate)
//! proving that the expression equals that form. Certificates are only ever produced by the small
//! proof [kernel](kernel), which instantiates a fixed library of schema lemmas, chains equalities
//! transitively, and decides ground integer facts. The ring engine is an untrusted client of that
//! kernel: a bug in the engine can make it fail, but never make it return a false certificate.
//!
//! The pipeline is
//!
//! ```text
//! source --scan--> tokens --parse--> Expr --PolynomialRing::of_term--> TreePolynomial
//!                                                                          |
//!                                              Certificate <--normalized---+
//! ```
//!
//! Polynomials are stored as persistent 2-3 trees of monomials ordered by a reverse-lexicographic
//! monomial order; every node of a tree has a structural value, and each tree carries a
//! certificate that its source term equals the structural value of its root.

pub mod common;
pub mod diagnostics;

pub mod scanner;
pub use scanner::{scan, ScanResult};

mod parser;
pub use parser::{parse_expression, parse_expression_pattern, parse_proposition, ParseResult};

mod grammar;
pub use grammar::*;

mod emit;
pub use emit::{Emit, EmitFormat};

pub mod kernel;
pub use kernel::{Certificate, KernelError, LemmaName};

mod ring;
pub use ring::{
    Coefficient, Growth, Monomial, Node, PolynomialRing, RingError, TreePolynomial, POW_CACHE_BOUND,
};

pub use zero_test::{is_zero, normalize, Normalized};

pub mod eval;

mod proptests;

mod utils;
